use std::collections::{HashMap, VecDeque};

use crate::{
    assets::decode::PreparedImage,
    foundation::{
        core::{Affine, FrameIndex, Rect},
        error::{ScrubError, ScrubResult},
    },
};

/// Readback of a surface's backing store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in backing pixels.
    pub width: u32,
    /// Height in backing pixels.
    pub height: u32,
    /// Row-major RGBA8 bytes.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied.
    pub premultiplied: bool,
}

/// 2D drawing surface the renderer paints into.
///
/// Coordinates passed to [`clear_rect`](Self::clear_rect) and [`draw_image`](Self::draw_image)
/// are in CSS pixel space; the surface maps them through the scale set by
/// [`set_scale`](Self::set_scale).
pub trait CanvasSurface {
    /// Reallocate the backing store. Contents are discarded and the scale resets to 1.
    fn resize(&mut self, backing_width: u32, backing_height: u32) -> ScrubResult<()>;

    /// Uniform scale from CSS pixels to backing pixels.
    fn set_scale(&mut self, scale: f64);

    /// Reset `rect` to transparent.
    fn clear_rect(&mut self, rect: Rect);

    /// Paint `image` of frame `frame` stretched into `dest`.
    fn draw_image(&mut self, frame: FrameIndex, image: &PreparedImage, dest: Rect)
    -> ScrubResult<()>;
}

const DEFAULT_PAINT_CACHE: usize = 8;

/// CPU canvas backed by a `vello_cpu` pixmap.
///
/// Converted frame paints are kept in a small LRU keyed by frame index; frames are immutable once
/// ready, so the key never goes stale.
pub struct PixmapCanvas {
    width: u16,
    height: u16,
    scale: f64,
    pixmap: Option<vello_cpu::Pixmap>,
    paints: HashMap<FrameIndex, vello_cpu::Image>,
    lru: VecDeque<FrameIndex>,
    capacity: usize,
}

impl std::fmt::Debug for PixmapCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("scale", &self.scale)
            .field("cached_paints", &self.paints.len())
            .finish()
    }
}

impl Default for PixmapCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PixmapCanvas {
    /// Zero-sized canvas; call [`CanvasSurface::resize`] before drawing.
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            scale: 1.0,
            pixmap: None,
            paints: HashMap::new(),
            lru: VecDeque::new(),
            capacity: DEFAULT_PAINT_CACHE,
        }
    }

    /// Backing-store size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    /// Current CSS-to-backing scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Premultiplied RGBA8 value at backing pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let pixmap = self.pixmap.as_ref()?;
        if x >= u32::from(self.width) || y >= u32::from(self.height) {
            return None;
        }
        let off = (y as usize * usize::from(self.width) + x as usize) * 4;
        let px = pixmap.data_as_u8_slice().get(off..off + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Copy out the backing store.
    pub fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self
                .pixmap
                .as_ref()
                .map(|p| p.data_as_u8_slice().to_vec())
                .unwrap_or_default(),
            premultiplied: true,
        }
    }

    fn paint_for(&mut self, frame: FrameIndex, image: &PreparedImage) -> ScrubResult<vello_cpu::Image> {
        if let Some(paint) = self.paints.get(&frame) {
            let paint = paint.clone();
            self.touch(frame);
            return Ok(paint);
        }

        let pixmap = image_premul_bytes_to_pixmap(image)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        if self.capacity > 0 {
            while self.paints.len() >= self.capacity {
                let Some(old) = self.lru.pop_front() else {
                    break;
                };
                self.paints.remove(&old);
            }
            self.paints.insert(frame, paint.clone());
            self.lru.push_back(frame);
        }
        Ok(paint)
    }

    fn touch(&mut self, frame: FrameIndex) {
        if let Some(pos) = self.lru.iter().position(|k| *k == frame) {
            self.lru.remove(pos);
        }
        self.lru.push_back(frame);
    }
}

impl CanvasSurface for PixmapCanvas {
    fn resize(&mut self, backing_width: u32, backing_height: u32) -> ScrubResult<()> {
        let width: u16 = backing_width
            .try_into()
            .map_err(|_| ScrubError::render("canvas width exceeds u16"))?;
        let height: u16 = backing_height
            .try_into()
            .map_err(|_| ScrubError::render("canvas height exceeds u16"))?;

        self.width = width;
        self.height = height;
        self.scale = 1.0;
        self.pixmap = (width > 0 && height > 0).then(|| vello_cpu::Pixmap::new(width, height));
        Ok(())
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
    }

    fn clear_rect(&mut self, rect: Rect) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let w = usize::from(self.width);
        let h = usize::from(self.height);
        let scaled = Affine::scale(self.scale).transform_rect_bbox(rect);
        let x0 = scaled.x0.floor().clamp(0.0, w as f64) as usize;
        let x1 = scaled.x1.ceil().clamp(0.0, w as f64) as usize;
        let y0 = scaled.y0.floor().clamp(0.0, h as f64) as usize;
        let y1 = scaled.y1.ceil().clamp(0.0, h as f64) as usize;
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let data = pixmap.data_as_u8_slice_mut();
        for row in data.chunks_exact_mut(w * 4).take(y1).skip(y0) {
            row[x0 * 4..x1 * 4].fill(0);
        }
    }

    fn draw_image(
        &mut self,
        frame: FrameIndex,
        image: &PreparedImage,
        dest: Rect,
    ) -> ScrubResult<()> {
        if self.pixmap.is_none() || image.width == 0 || image.height == 0 {
            return Ok(());
        }
        let paint = self.paint_for(frame, image)?;
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));

        let transform = Affine::scale(self.scale)
            * Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(dest.width() / iw, dest.height() / ih);

        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        ctx.flush();

        let Some(pixmap) = self.pixmap.as_mut() else {
            return Ok(());
        };
        ctx.render_to_pixmap(pixmap);
        Ok(())
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn image_premul_bytes_to_pixmap(image: &PreparedImage) -> ScrubResult<vello_cpu::Pixmap> {
    let w: u16 = image
        .width
        .try_into()
        .map_err(|_| ScrubError::render("frame width exceeds u16"))?;
    let h: u16 = image
        .height
        .try_into()
        .map_err(|_| ScrubError::render("frame height exceeds u16"))?;
    if image.rgba8_premul.len() != image.width as usize * image.height as usize * 4 {
        return Err(ScrubError::render("prepared frame byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(image.width as usize * image.height as usize);
    for px in image.rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
