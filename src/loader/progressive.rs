use crossbeam_channel::{Receiver, Sender};

use crate::{
    assets::cache::ImageCache,
    foundation::core::FrameIndex,
    loader::fetch::{FrameFetcher, FrameRequest, LoadCompletion},
    sequence::{FrameSequence, Wave},
};

/// Milestones reported by the loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadSignal {
    /// Percentage of the critical wave settled, in `0..=100`.
    Progress(u8),
    /// Every critical frame settled; the background wave has been issued. Fires once.
    CriticalComplete,
}

/// Running counters of the loader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Requests issued so far, both waves.
    pub requested: usize,
    /// Completions that produced an image.
    pub ready: usize,
    /// Completions that failed.
    pub failed: usize,
    /// Critical-wave completions observed.
    pub critical_settled: usize,
    /// Background-wave requests issued.
    pub background_issued: usize,
}

impl LoadStats {
    /// Requests issued but not yet completed.
    pub fn pending(&self) -> usize {
        self.requested.saturating_sub(self.ready + self.failed)
    }
}

/// Two-wave frame loader.
///
/// The critical wave (`0..critical_count`) is issued on [`start`](Self::start). Completions arrive
/// on the loader's channel and are fed back through [`on_completion`](Self::on_completion); once
/// `critical_count` of them have been observed, successes and failures alike, the loader signals
/// [`LoadSignal::CriticalComplete`] and issues the background wave. Synchronization is by count,
/// not by index order. Nothing is retried or cancelled.
#[derive(Debug)]
pub struct ProgressiveLoader {
    sequence: FrameSequence,
    tx: Sender<LoadCompletion>,
    rx: Receiver<LoadCompletion>,
    started: bool,
    critical_signalled: bool,
    stats: LoadStats,
}

impl ProgressiveLoader {
    /// Loader for `sequence` with a fresh completion channel.
    pub fn new(sequence: FrameSequence) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            sequence,
            tx,
            rx,
            started: false,
            critical_signalled: false,
            stats: LoadStats::default(),
        }
    }

    /// Receiving half of the completion channel.
    pub fn completions(&self) -> &Receiver<LoadCompletion> {
        &self.rx
    }

    /// Sequence being loaded.
    pub fn sequence(&self) -> &FrameSequence {
        &self.sequence
    }

    /// Counters so far.
    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// Whether [`LoadSignal::CriticalComplete`] has fired.
    pub fn is_critical_complete(&self) -> bool {
        self.critical_signalled
    }

    /// Settled share of the critical wave as a rounded percentage. An empty wave reads 100.
    pub fn critical_progress(&self) -> u8 {
        percent(self.stats.critical_settled, self.sequence.critical_count())
    }

    /// Issue the critical wave. With an empty critical wave, completes it immediately and issues
    /// the background wave. Calling again is a no-op.
    pub fn start(&mut self, cache: &mut ImageCache, fetcher: &dyn FrameFetcher) -> Vec<LoadSignal> {
        if self.started {
            return Vec::new();
        }
        self.started = true;

        self.issue_wave(Wave::Critical, cache, fetcher);
        if self.sequence.critical_count() == 0 {
            return self.finish_critical(cache, fetcher).into_iter().collect();
        }
        Vec::new()
    }

    /// Absorb one completion: settle its slot, count it, and report milestones.
    ///
    /// Completions for unknown, unrequested or already settled slots are logged and ignored.
    pub fn on_completion(
        &mut self,
        completion: LoadCompletion,
        cache: &mut ImageCache,
        fetcher: &dyn FrameFetcher,
    ) -> Vec<LoadSignal> {
        let index = completion.index;
        if let Err(failure) = &completion.outcome {
            tracing::warn!(index = index.0, locator = %failure.locator, reason = %failure.reason, "frame failed to load");
        }
        let loaded = completion.is_ready();
        if !cache.resolve(index, completion.outcome) {
            tracing::warn!(index = index.0, "ignoring completion for a slot that is not pending");
            return Vec::new();
        }
        if loaded {
            self.stats.ready += 1;
        } else {
            self.stats.failed += 1;
        }

        if self.sequence.wave_of(index) == Wave::Background {
            return Vec::new();
        }

        self.stats.critical_settled += 1;
        let progress = self.critical_progress();
        tracing::debug!(index = index.0, progress, "critical frame settled");

        let mut signals = vec![LoadSignal::Progress(progress)];
        if self.stats.critical_settled == self.sequence.critical_count() {
            signals.extend(self.finish_critical(cache, fetcher));
        }
        signals
    }

    fn finish_critical(
        &mut self,
        cache: &mut ImageCache,
        fetcher: &dyn FrameFetcher,
    ) -> Option<LoadSignal> {
        if self.critical_signalled {
            return None;
        }
        self.critical_signalled = true;
        tracing::info!(
            ready = self.stats.ready,
            failed = self.stats.failed,
            "critical wave complete"
        );
        self.issue_wave(Wave::Background, cache, fetcher);
        Some(LoadSignal::CriticalComplete)
    }

    #[tracing::instrument(level = "debug", skip(self, cache, fetcher))]
    fn issue_wave(&mut self, wave: Wave, cache: &mut ImageCache, fetcher: &dyn FrameFetcher) {
        let mut issued = 0usize;
        for index in self.sequence.wave(wave) {
            if self.issue(index, cache, fetcher) {
                issued += 1;
            }
        }
        if wave == Wave::Background {
            self.stats.background_issued += issued;
        }
        tracing::info!(?wave, issued, "load wave issued");
    }

    fn issue(&mut self, index: FrameIndex, cache: &mut ImageCache, fetcher: &dyn FrameFetcher) -> bool {
        if !cache.mark_pending(index) {
            return false;
        }
        self.stats.requested += 1;
        fetcher.fetch(
            FrameRequest {
                index,
                locator: self.sequence.locator(index),
            },
            self.tx.clone(),
        );
        true
    }
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((done as f64 / total as f64) * 100.0).round().min(100.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/loader/progressive.rs"]
mod tests;
