use crate::foundation::core::FrameIndex;

/// Map normalized scroll progress onto a frame index.
///
/// Progress is rescaled over the reveal window, `min(progress / reveal_fraction, 1)`, so the
/// trailing `1 - reveal_fraction` of scroll holds the last frame, then spread over
/// `0..=frame_count - 1` with round-half-up. Pure and monotonic non-decreasing in `progress`.
///
/// Out-of-range or NaN progress is clamped into `[0, 1]` (NaN reads as 0). A reveal fraction that
/// is not in `(0, 1]` is treated as 1. `frame_count` of 0 or 1 always yields frame 0.
pub fn map_progress_to_frame(progress: f64, frame_count: usize, reveal_fraction: f64) -> FrameIndex {
    if frame_count < 2 {
        return FrameIndex(0);
    }
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let reveal = if reveal_fraction.is_finite() && reveal_fraction > 0.0 {
        reveal_fraction.min(1.0)
    } else {
        1.0
    };

    let rescaled = (progress / reveal).min(1.0);
    let last = frame_count - 1;
    let frame = (rescaled * last as f64).round() as usize;
    FrameIndex(frame.min(last))
}

#[cfg(test)]
#[path = "../tests/unit/mapper.rs"]
mod tests;
