use std::time::{Duration, Instant};

use crate::{
    assets::cache::ImageCache,
    config::PlayerConfig,
    foundation::{
        core::{FrameIndex, Viewport},
        error::ScrubResult,
    },
    loader::{
        fetch::{FrameFetcher, LoadCompletion},
        progressive::{LoadSignal, LoadStats, ProgressiveLoader},
    },
    mapper::map_progress_to_frame,
    overlay::{OverlayState, overlay_at},
    render::{
        renderer::{RenderOutcome, Renderer},
        surface::CanvasSurface,
    },
    scroll::ScrollSource,
};

/// Controller lifecycle. Moves from `Loading` to `Interactive` once and never back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Critical frames are loading; scrolling is locked.
    Loading,
    /// Scrolling drives the displayed frame.
    Interactive,
}

/// Host events fed to [`ScrubController::handle`].
#[derive(Clone, Debug)]
pub enum Input {
    /// A fetcher finished one frame.
    FrameLoaded(LoadCompletion),
    /// The scroll source moved; its progress is re-read.
    ScrollUpdate,
    /// The viewport changed size or pixel ratio.
    Resize(Viewport),
}

/// What the host should reflect after an input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Notice {
    /// Critical-wave load percentage.
    Progress(u8),
    /// The player became interactive.
    Interactive,
    /// The canvas was repainted.
    Rendered(RenderOutcome),
}

/// Single-threaded scheduler tying the loader, mapper, and renderer to host events.
///
/// Every input runs to completion before the next is handled, and every paint goes through one
/// render path, so the cache and canvas need no locking.
pub struct ScrubController<F, S, C> {
    config: PlayerConfig,
    fetcher: F,
    scroll: S,
    surface: C,
    viewport: Viewport,
    cache: ImageCache,
    loader: ProgressiveLoader,
    renderer: Renderer,
    phase: Phase,
    current_frame: FrameIndex,
    progress: f64,
    overlay: OverlayState,
    booted: bool,
}

impl<F, S, C> std::fmt::Debug for ScrubController<F, S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrubController")
            .field("phase", &self.phase)
            .field("current_frame", &self.current_frame)
            .field("progress", &self.progress)
            .field("viewport", &self.viewport)
            .field("stats", &self.loader.stats())
            .finish_non_exhaustive()
    }
}

impl<F, S, C> ScrubController<F, S, C>
where
    F: FrameFetcher,
    S: ScrollSource,
    C: CanvasSurface,
{
    /// Validate `config` and assemble a controller. Nothing is requested until [`boot`](Self::boot).
    pub fn new(
        config: PlayerConfig,
        fetcher: F,
        scroll: S,
        surface: C,
        viewport: Viewport,
    ) -> ScrubResult<Self> {
        let sequence = config.sequence()?;
        let cache = ImageCache::new(sequence.len());
        Ok(Self {
            config,
            fetcher,
            scroll,
            surface,
            viewport,
            cache,
            loader: ProgressiveLoader::new(sequence),
            renderer: Renderer::new(),
            phase: Phase::Loading,
            current_frame: FrameIndex(0),
            progress: 0.0,
            overlay: OverlayState::default(),
            booted: false,
        })
    }

    /// Lock scrolling, size the canvas, and issue the critical wave. Runs once.
    #[tracing::instrument(level = "info", skip_all, fields(frames = self.cache.len()))]
    pub fn boot(&mut self) -> ScrubResult<Vec<Notice>> {
        if self.booted {
            return Ok(Vec::new());
        }

        self.scroll.stop();
        self.renderer
            .configure_surface(self.viewport, &mut self.surface)?;
        self.booted = true;
        let signals = self.loader.start(&mut self.cache, &self.fetcher);
        self.apply(signals)
    }

    /// Handle one host event.
    pub fn handle(&mut self, input: Input) -> ScrubResult<Vec<Notice>> {
        match input {
            Input::FrameLoaded(completion) => {
                let signals = self
                    .loader
                    .on_completion(completion, &mut self.cache, &self.fetcher);
                self.apply(signals)
            }
            Input::ScrollUpdate => {
                if self.phase != Phase::Interactive {
                    return Ok(Vec::new());
                }
                self.progress = self.scroll.progress();
                self.current_frame = map_progress_to_frame(
                    self.progress,
                    self.cache.len(),
                    self.config.reveal_fraction,
                );
                self.overlay = overlay_at(self.progress);
                let outcome = self.paint()?;
                Ok(vec![Notice::Rendered(outcome)])
            }
            Input::Resize(viewport) => {
                self.renderer
                    .configure_surface(viewport, &mut self.surface)?;
                self.viewport = viewport;
                let outcome = self.paint()?;
                self.scroll.refresh(viewport.css_height);
                tracing::debug!(
                    width = viewport.css_width,
                    height = viewport.css_height,
                    dpr = viewport.device_pixel_ratio,
                    "viewport resized"
                );
                Ok(vec![Notice::Rendered(outcome)])
            }
        }
    }

    /// Drain completions that are already waiting, without blocking.
    pub fn pump(&mut self) -> ScrubResult<Vec<Notice>> {
        let mut notices = Vec::new();
        loop {
            let next = self.loader.completions().try_recv();
            let Ok(completion) = next else {
                break;
            };
            notices.extend(self.handle(Input::FrameLoaded(completion))?);
        }
        Ok(notices)
    }

    /// Wait for completions until every frame is ready or failed, or `timeout` elapses.
    ///
    /// Frames still pending at the deadline stay pending. Before [`boot`](Self::boot) nothing is
    /// in flight and this returns at once.
    pub fn pump_blocking(&mut self, timeout: Duration) -> ScrubResult<Vec<Notice>> {
        if !self.booted {
            return Ok(Vec::new());
        }
        let deadline = Instant::now() + timeout;
        let mut notices = self.pump()?;
        while !self.cache.all_terminal() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            // The loader holds a sender, so the only error is the deadline.
            let Ok(completion) = self.loader.completions().recv_timeout(remaining) else {
                tracing::warn!(
                    pending = self.loader.stats().pending(),
                    "timed out waiting for frames"
                );
                break;
            };
            notices.extend(self.handle(Input::FrameLoaded(completion))?);
        }
        Ok(notices)
    }

    fn apply(&mut self, signals: Vec<LoadSignal>) -> ScrubResult<Vec<Notice>> {
        let mut notices = Vec::with_capacity(signals.len());
        for signal in signals {
            match signal {
                LoadSignal::Progress(p) => notices.push(Notice::Progress(p)),
                LoadSignal::CriticalComplete => {
                    if self.phase == Phase::Interactive {
                        continue;
                    }
                    let outcome = self.paint()?;
                    self.scroll.start();
                    self.phase = Phase::Interactive;
                    tracing::info!(frame = self.current_frame.0, "player interactive");
                    notices.push(Notice::Rendered(outcome));
                    notices.push(Notice::Interactive);
                }
            }
        }
        Ok(notices)
    }

    fn paint(&mut self) -> ScrubResult<RenderOutcome> {
        self.renderer.render(
            self.current_frame,
            self.viewport,
            &self.cache,
            &mut self.surface,
        )
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Frame most recently selected for display.
    pub fn current_frame(&self) -> FrameIndex {
        self.current_frame
    }

    /// Scroll progress read on the last update.
    pub fn scroll_progress(&self) -> f64 {
        self.progress
    }

    /// Critical-wave load percentage.
    pub fn load_progress(&self) -> u8 {
        self.loader.critical_progress()
    }

    /// Overlay state for the last scroll update.
    pub fn overlay(&self) -> OverlayState {
        self.overlay
    }

    /// Loader counters.
    pub fn stats(&self) -> LoadStats {
        self.loader.stats()
    }

    /// Frame slots.
    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    /// Renderer counters.
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Active configuration.
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Frame source.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Canvas being painted.
    pub fn surface(&self) -> &C {
        &self.surface
    }

    /// Scroll source.
    pub fn scroll(&self) -> &S {
        &self.scroll
    }

    /// Scroll source, for hosts that move it directly. Follow with [`Input::ScrollUpdate`].
    pub fn scroll_mut(&mut self) -> &mut S {
        &mut self.scroll
    }
}

#[cfg(test)]
#[path = "../tests/unit/controller.rs"]
mod tests;
