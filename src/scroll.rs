/// Host scroll position, as the controller sees it.
///
/// The source owns the progress value; the controller only reads it, and locks or unlocks page
/// scrolling around the loading phase.
pub trait ScrollSource {
    /// Unlock scrolling.
    fn start(&mut self);

    /// Lock scrolling; offset changes are refused until [`start`](Self::start).
    fn stop(&mut self);

    /// Whether scrolling is locked.
    fn is_locked(&self) -> bool;

    /// Progress through the pinned region, in `[0, 1]`.
    fn progress(&self) -> f64;

    /// Recompute cached geometry after the viewport height changed.
    fn refresh(&mut self, viewport_height: f64);
}

/// Headless scroll source for a pinned region `length_viewports` viewport heights long, starting
/// at `pin_start`.
///
/// The end-of-pin offset is cached and only recomputed by [`ScrollSource::refresh`].
#[derive(Clone, Debug, PartialEq)]
pub struct PinnedScroll {
    offset: f64,
    pin_start: f64,
    length_viewports: f64,
    viewport_height: f64,
    pin_end: f64,
    locked: bool,
}

impl PinnedScroll {
    /// Unlocked source at offset 0.
    pub fn new(pin_start: f64, viewport_height: f64, length_viewports: f64) -> Self {
        let mut scroll = Self {
            offset: 0.0,
            pin_start: finite_or_zero(pin_start),
            length_viewports: finite_or_zero(length_viewports).max(0.0),
            viewport_height: 0.0,
            pin_end: 0.0,
            locked: false,
        };
        scroll.refresh(viewport_height);
        scroll
    }

    /// Current scroll offset.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Cached offset where the pin releases.
    pub fn pin_end(&self) -> f64 {
        self.pin_end
    }

    /// Viewport height the cache was last computed for.
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Move to `offset`. Refused (returns `false`) while locked or for a non-finite offset.
    pub fn scroll_to(&mut self, offset: f64) -> bool {
        if self.locked || !offset.is_finite() {
            return false;
        }
        self.offset = offset.max(0.0);
        true
    }

    /// Move by `delta`. Same rules as [`scroll_to`](Self::scroll_to).
    pub fn scroll_by(&mut self, delta: f64) -> bool {
        self.scroll_to(self.offset + delta)
    }

    /// Offset at which progress reaches `progress` under the current cache.
    pub fn offset_for(&self, progress: f64) -> f64 {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.pin_start + p * (self.pin_end - self.pin_start)
    }
}

impl ScrollSource for PinnedScroll {
    fn start(&mut self) {
        self.locked = false;
    }

    fn stop(&mut self) {
        self.locked = true;
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn progress(&self) -> f64 {
        let distance = self.pin_end - self.pin_start;
        if distance <= 0.0 {
            return 0.0;
        }
        ((self.offset - self.pin_start) / distance).clamp(0.0, 1.0)
    }

    fn refresh(&mut self, viewport_height: f64) {
        self.viewport_height = finite_or_zero(viewport_height).max(0.0);
        self.pin_end = self.pin_start + self.viewport_height * self.length_viewports;
        tracing::debug!(
            viewport_height = self.viewport_height,
            pin_end = self.pin_end,
            "pinned region refreshed"
        );
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

#[cfg(test)]
#[path = "../tests/unit/scroll.rs"]
mod tests;
