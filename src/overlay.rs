use serde::Serialize;

/// Opacity and depth of one overlay layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LayerState {
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Depth offset in CSS pixels; negative moves away from the viewer.
    pub translate_z: f64,
}

/// Scroll-driven overlay choreography at one progress value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OverlayState {
    /// Navigation bar opacity.
    pub nav_opacity: f64,
    /// Title block over the sequence.
    pub header: LayerState,
    /// Closing hero image.
    pub hero: LayerState,
}

impl Default for OverlayState {
    fn default() -> Self {
        overlay_at(0.0)
    }
}

const NAV_FADE_END: f64 = 0.1;
const HEADER_END: f64 = 0.25;
const HEADER_FADE_START: f64 = 0.2;
const HEADER_DEPTH: f64 = -500.0;
const HERO_START: f64 = 0.6;
const HERO_OPAQUE: f64 = 0.8;
const HERO_END: f64 = 0.9;
const HERO_DEPTH: f64 = 1000.0;

/// Overlay state for scroll progress `progress` (clamped to `[0, 1]`, NaN reads as 0).
///
/// The nav fades out over the first tenth. The header recedes to -500px over the first quarter
/// and fades during its last 0.05. The hero image approaches from +1000px between 0.6 and 0.9,
/// reaching full opacity at 0.8.
pub fn overlay_at(progress: f64) -> OverlayState {
    let p = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };

    let nav_opacity = if p <= NAV_FADE_END {
        1.0 - p / NAV_FADE_END
    } else {
        0.0
    };

    let header = if p <= HEADER_END {
        let fade = if p >= HEADER_FADE_START {
            ((p - HEADER_FADE_START) / (HEADER_END - HEADER_FADE_START)).min(1.0)
        } else {
            0.0
        };
        LayerState {
            opacity: 1.0 - fade,
            translate_z: (p / HEADER_END) * HEADER_DEPTH,
        }
    } else {
        LayerState {
            opacity: 0.0,
            translate_z: HEADER_DEPTH,
        }
    };

    let hero = if p < HERO_START {
        LayerState {
            opacity: 0.0,
            translate_z: HERO_DEPTH,
        }
    } else if p <= HERO_END {
        let t = (p - HERO_START) / (HERO_END - HERO_START);
        LayerState {
            opacity: if p <= HERO_OPAQUE {
                (p - HERO_START) / (HERO_OPAQUE - HERO_START)
            } else {
                1.0
            },
            translate_z: HERO_DEPTH - t * HERO_DEPTH,
        }
    } else {
        LayerState {
            opacity: 1.0,
            translate_z: 0.0,
        }
    };

    OverlayState {
        nav_opacity,
        header,
        hero,
    }
}

#[cfg(test)]
#[path = "../tests/unit/overlay.rs"]
mod tests;
