use super::*;
use crate::{
    assets::decode::PreparedImage, foundation::error::LoadFailure, render::surface::PixmapCanvas,
};

#[derive(Debug, PartialEq)]
enum Call {
    Resize(u32, u32),
    Scale(f64),
    Clear(Rect),
    Draw(FrameIndex, Rect),
}

#[derive(Default)]
struct RecordingSurface {
    calls: Vec<Call>,
}

impl CanvasSurface for RecordingSurface {
    fn resize(&mut self, w: u32, h: u32) -> ScrubResult<()> {
        self.calls.push(Call::Resize(w, h));
        Ok(())
    }

    fn set_scale(&mut self, scale: f64) {
        self.calls.push(Call::Scale(scale));
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.calls.push(Call::Clear(rect));
    }

    fn draw_image(&mut self, frame: FrameIndex, _image: &PreparedImage, dest: Rect) -> ScrubResult<()> {
        self.calls.push(Call::Draw(frame, dest));
        Ok(())
    }
}

fn gradient(width: u32, height: u32) -> PreparedImage {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 40) as u8, (y * 60) as u8, 128, 255]);
        }
    }
    PreparedImage::from_premul(width, height, data).unwrap()
}

fn cache_with(frames: &[(usize, Result<PreparedImage, ()>)], len: usize) -> ImageCache {
    let mut cache = ImageCache::new(len);
    for (i, outcome) in frames {
        let idx = FrameIndex(*i);
        cache.mark_pending(idx);
        let outcome = outcome
            .clone()
            .map_err(|_| LoadFailure::new(idx, format!("f{i}"), "broken"));
        cache.resolve(idx, outcome);
    }
    cache
}

#[test]
fn configure_surface_sizes_backing_store_then_scales() {
    let mut surface = RecordingSurface::default();
    let vp = Viewport::new(400.0, 300.0, 2.0).unwrap();
    Renderer::new().configure_surface(vp, &mut surface).unwrap();
    assert_eq!(surface.calls, vec![Call::Resize(800, 600), Call::Scale(2.0)]);
}

#[test]
fn ready_frame_is_cleared_then_cover_fitted() {
    let cache = cache_with(&[(0, Ok(gradient(1920, 1080)))], 1);
    let vp = Viewport::new(800.0, 1000.0, 1.0).unwrap();
    let mut surface = RecordingSurface::default();
    let mut renderer = Renderer::new();

    let out = renderer
        .render(FrameIndex(0), vp, &cache, &mut surface)
        .unwrap();
    assert!(out.is_drawn());
    assert_eq!(surface.calls.len(), 2);
    assert_eq!(surface.calls[0], Call::Clear(Rect::new(0.0, 0.0, 800.0, 1000.0)));
    let Call::Draw(frame, rect) = &surface.calls[1] else {
        panic!("expected draw call");
    };
    assert_eq!(*frame, FrameIndex(0));
    assert!((rect.height() - 1000.0).abs() < 1e-9);
    assert!((rect.x0 + 488.888_888).abs() < 1e-3);
    assert_eq!(renderer.drawn(), 1);
}

#[test]
fn failed_frame_clears_without_drawing() {
    let cache = cache_with(&[(0, Err(()))], 1);
    let vp = Viewport::new(100.0, 100.0, 1.0).unwrap();
    let mut surface = RecordingSurface::default();
    let mut renderer = Renderer::new();

    let out = renderer
        .render(FrameIndex(0), vp, &cache, &mut surface)
        .unwrap();
    assert_eq!(out, RenderOutcome::Skipped { frame: FrameIndex(0) });
    assert_eq!(surface.calls, vec![Call::Clear(vp.css_rect())]);
    assert_eq!(renderer.skipped(), 1);
}

#[test]
fn pending_and_out_of_range_frames_are_skips() {
    let mut cache = ImageCache::new(2);
    cache.mark_pending(FrameIndex(0));
    let vp = Viewport::new(10.0, 10.0, 1.0).unwrap();
    let mut surface = RecordingSurface::default();
    let mut renderer = Renderer::new();

    for f in [0, 1, 7] {
        let out = renderer
            .render(FrameIndex(f), vp, &cache, &mut surface)
            .unwrap();
        assert!(!out.is_drawn());
    }
    assert_eq!(renderer.skipped(), 3);
    assert!(surface.calls.iter().all(|c| matches!(c, Call::Clear(_))));
}

#[test]
fn rendering_twice_is_pixel_identical() {
    let cache = cache_with(&[(0, Ok(gradient(6, 4)))], 1);
    let vp = Viewport::new(10.0, 12.0, 2.0).unwrap();
    let mut canvas = PixmapCanvas::new();
    let mut renderer = Renderer::new();
    renderer.configure_surface(vp, &mut canvas).unwrap();

    renderer
        .render(FrameIndex(0), vp, &cache, &mut canvas)
        .unwrap();
    let first = canvas.snapshot();
    renderer
        .render(FrameIndex(0), vp, &cache, &mut canvas)
        .unwrap();
    let second = canvas.snapshot();

    assert_eq!(first.width, 20);
    assert_eq!(first.height, 24);
    assert!(first.data.iter().any(|b| *b != 0));
    assert_eq!(first, second);
}

#[test]
fn skipped_frame_leaves_a_blank_canvas() {
    let cache = cache_with(&[(0, Ok(gradient(4, 4))), (1, Err(()))], 2);
    let vp = Viewport::new(8.0, 8.0, 1.0).unwrap();
    let mut canvas = PixmapCanvas::new();
    let mut renderer = Renderer::new();
    renderer.configure_surface(vp, &mut canvas).unwrap();

    renderer
        .render(FrameIndex(0), vp, &cache, &mut canvas)
        .unwrap();
    assert!(canvas.snapshot().data.iter().any(|b| *b != 0));

    renderer
        .render(FrameIndex(1), vp, &cache, &mut canvas)
        .unwrap();
    assert!(canvas.snapshot().data.iter().all(|b| *b == 0));
}
