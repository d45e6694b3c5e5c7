use crate::{
    assets::cache::ImageCache,
    foundation::{
        core::{FrameIndex, Rect, Size, Viewport},
        error::ScrubResult,
    },
    render::{fit::cover_fit, surface::CanvasSurface},
};

/// Result of one paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderOutcome {
    /// The frame was drawn into `rect` (CSS pixels).
    Drawn {
        /// Frame painted.
        frame: FrameIndex,
        /// Cover-fit destination.
        rect: Rect,
    },
    /// The frame was not ready (pending, failed, or out of range); the canvas was only cleared.
    Skipped {
        /// Frame requested.
        frame: FrameIndex,
    },
}

impl RenderOutcome {
    /// True for [`RenderOutcome::Drawn`].
    pub fn is_drawn(&self) -> bool {
        matches!(self, Self::Drawn { .. })
    }
}

/// Paints cached frames onto a [`CanvasSurface`] with cover-fit placement.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    drawn: u64,
    skipped: u64,
}

impl Renderer {
    /// Fresh renderer with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the backing store to `viewport` and pre-scale the surface by its device pixel ratio,
    /// so draw coordinates stay in CSS pixels.
    pub fn configure_surface<S: CanvasSurface + ?Sized>(
        &self,
        viewport: Viewport,
        surface: &mut S,
    ) -> ScrubResult<()> {
        let (w, h) = viewport.backing_size();
        surface.resize(w, h)?;
        surface.set_scale(viewport.device_pixel_ratio);
        Ok(())
    }

    /// Clear the canvas and draw `frame` if it is ready.
    ///
    /// A frame that is not ready is a skip, not an error; the canvas is left cleared. Rendering
    /// the same frame twice with an unchanged viewport yields identical pixels.
    pub fn render<S: CanvasSurface + ?Sized>(
        &mut self,
        frame: FrameIndex,
        viewport: Viewport,
        cache: &ImageCache,
        surface: &mut S,
    ) -> ScrubResult<RenderOutcome> {
        surface.clear_rect(viewport.css_rect());

        let placed = cache.get(frame).and_then(|image| {
            let size = Size::new(f64::from(image.width), f64::from(image.height));
            cover_fit(size, viewport.css_size()).map(|rect| (image, rect))
        });
        let Some((image, rect)) = placed else {
            self.skipped += 1;
            return Ok(RenderOutcome::Skipped { frame });
        };

        surface.draw_image(frame, image, rect)?;
        self.drawn += 1;
        tracing::debug!(frame = frame.0, x = rect.x0, y = rect.y0, "frame drawn");
        Ok(RenderOutcome::Drawn { frame, rect })
    }

    /// Paints that drew a frame.
    pub fn drawn(&self) -> u64 {
        self.drawn
    }

    /// Paints that were skipped.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
