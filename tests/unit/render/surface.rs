use super::*;

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> PreparedImage {
    let data = rgba.repeat(width as usize * height as usize);
    PreparedImage::from_premul(width, height, data).unwrap()
}

const RED: [u8; 4] = [255, 0, 0, 255];

#[test]
fn resize_allocates_transparent_store_and_resets_scale() {
    let mut canvas = PixmapCanvas::new();
    canvas.set_scale(3.0);
    canvas.resize(4, 2).unwrap();
    assert_eq!(canvas.size(), (4, 2));
    assert_eq!(canvas.scale(), 1.0);

    let snap = canvas.snapshot();
    assert_eq!(snap.data.len(), 4 * 2 * 4);
    assert!(snap.data.iter().all(|b| *b == 0));
    assert!(snap.premultiplied);
}

#[test]
fn oversized_canvas_is_rejected() {
    let mut canvas = PixmapCanvas::new();
    assert!(matches!(
        canvas.resize(70_000, 1),
        Err(ScrubError::Render(_))
    ));
}

#[test]
fn zero_sized_canvas_ignores_draws() {
    let mut canvas = PixmapCanvas::new();
    canvas.resize(0, 0).unwrap();
    canvas
        .draw_image(FrameIndex(0), &solid(2, 2, RED), Rect::new(0.0, 0.0, 2.0, 2.0))
        .unwrap();
    canvas.clear_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
    assert!(canvas.snapshot().data.is_empty());
    assert_eq!(canvas.pixel(0, 0), None);
}

#[test]
fn draw_image_fills_destination_through_scale() {
    let mut canvas = PixmapCanvas::new();
    canvas.resize(8, 8).unwrap();
    canvas.set_scale(2.0);
    canvas
        .draw_image(FrameIndex(0), &solid(2, 2, RED), Rect::new(0.0, 0.0, 4.0, 4.0))
        .unwrap();

    assert_eq!(canvas.pixel(3, 3), Some(RED));
    assert_eq!(canvas.pixel(6, 6), Some(RED));
}

#[test]
fn clear_rect_maps_css_pixels_to_backing_pixels() {
    let mut canvas = PixmapCanvas::new();
    canvas.resize(8, 8).unwrap();
    canvas.set_scale(2.0);
    canvas
        .draw_image(FrameIndex(0), &solid(2, 2, RED), Rect::new(0.0, 0.0, 4.0, 4.0))
        .unwrap();

    canvas.clear_rect(Rect::new(0.0, 0.0, 2.0, 4.0));
    assert_eq!(canvas.pixel(1, 1), Some([0, 0, 0, 0]));
    assert_eq!(canvas.pixel(3, 7), Some([0, 0, 0, 0]));
    assert_eq!(canvas.pixel(6, 6), Some(RED));

    canvas.clear_rect(Rect::new(-10.0, -10.0, 100.0, 100.0));
    assert!(canvas.snapshot().data.iter().all(|b| *b == 0));
}

#[test]
fn paint_cache_is_bounded() {
    let mut canvas = PixmapCanvas::new();
    canvas.resize(2, 2).unwrap();
    for i in 0..(DEFAULT_PAINT_CACHE + 5) {
        canvas
            .draw_image(FrameIndex(i), &solid(1, 1, RED), Rect::new(0.0, 0.0, 2.0, 2.0))
            .unwrap();
    }
    assert_eq!(canvas.paints.len(), DEFAULT_PAINT_CACHE);
    assert_eq!(canvas.lru.len(), DEFAULT_PAINT_CACHE);
    assert!(!canvas.paints.contains_key(&FrameIndex(0)));
    assert!(canvas.paints.contains_key(&FrameIndex(DEFAULT_PAINT_CACHE + 4)));
}

#[test]
fn mismatched_image_bytes_are_a_render_error() {
    let bad = PreparedImage {
        width: 2,
        height: 2,
        rgba8_premul: std::sync::Arc::new(vec![0; 3]),
    };
    let mut canvas = PixmapCanvas::new();
    canvas.resize(2, 2).unwrap();
    assert!(
        canvas
            .draw_image(FrameIndex(0), &bad, Rect::new(0.0, 0.0, 2.0, 2.0))
            .is_err()
    );
}
