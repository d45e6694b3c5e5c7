use crate::foundation::core::{Rect, Size};

/// Cover-fit placement of an image inside a canvas, in canvas coordinates.
///
/// Preserves the image aspect ratio and fills the canvas completely. The overflowing axis is
/// centered and cropped: a relatively wider image matches the canvas height and spills left and
/// right; otherwise it matches the canvas width and spills top and bottom.
///
/// Returns `None` when either size has a zero or non-finite dimension.
pub fn cover_fit(image: Size, canvas: Size) -> Option<Rect> {
    if !is_drawable(image) || !is_drawable(canvas) {
        return None;
    }
    let image_aspect = image.width / image.height;
    let canvas_aspect = canvas.width / canvas.height;

    let (draw_w, draw_h, draw_x, draw_y) = if image_aspect > canvas_aspect {
        let draw_h = canvas.height;
        let draw_w = draw_h * image_aspect;
        (draw_w, draw_h, (canvas.width - draw_w) / 2.0, 0.0)
    } else {
        let draw_w = canvas.width;
        let draw_h = draw_w / image_aspect;
        (draw_w, draw_h, 0.0, (canvas.height - draw_h) / 2.0)
    };

    Some(Rect::new(draw_x, draw_y, draw_x + draw_w, draw_y + draw_h))
}

fn is_drawable(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/render/fit.rs"]
mod tests;
