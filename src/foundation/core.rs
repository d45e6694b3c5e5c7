use crate::foundation::error::{ScrubError, ScrubResult};

pub use kurbo::{Affine, Rect, Size};

/// Zero-based position of a frame within the sequence.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub usize);

impl FrameIndex {
    /// One-based frame number, as used by resource locators.
    pub fn ordinal(self) -> usize {
        self.0 + 1
    }
}

/// Current canvas geometry: CSS pixel size plus device pixel ratio.
///
/// Mutated only on resize; read by the renderer on every paint.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub css_width: f64,
    /// Height in CSS pixels.
    pub css_height: f64,
    /// Device pixel ratio (backing pixels per CSS pixel).
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// Build a validated viewport. A non-positive or non-finite ratio falls back to 1.
    pub fn new(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> ScrubResult<Self> {
        if !css_width.is_finite() || !css_height.is_finite() || css_width < 0.0 || css_height < 0.0
        {
            return Err(ScrubError::configuration(
                "viewport dimensions must be finite and >= 0",
            ));
        }
        let device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Ok(Self {
            css_width,
            css_height,
            device_pixel_ratio,
        })
    }

    /// CSS pixel size.
    pub fn css_size(self) -> Size {
        Size::new(self.css_width, self.css_height)
    }

    /// Full canvas rectangle in CSS pixel space.
    pub fn css_rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.css_width, self.css_height)
    }

    /// Backing-store resolution: CSS size times device pixel ratio, rounded down.
    pub fn backing_size(self) -> (u32, u32) {
        let w = (self.css_width * self.device_pixel_ratio).floor();
        let h = (self.css_height * self.device_pixel_ratio).floor();
        (w.clamp(0.0, f64::from(u32::MAX)) as u32, h.clamp(0.0, f64::from(u32::MAX)) as u32)
    }

    /// Width over height, or `None` for a degenerate viewport.
    pub fn aspect(self) -> Option<f64> {
        (self.css_width > 0.0 && self.css_height > 0.0).then(|| self.css_width / self.css_height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
