use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{ScrubError, ScrubResult},
    sequence::{FramePathTemplate, FrameSequence},
};

/// Player configuration. Every field has a default, so `{}` is a valid document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// Number of frames in the sequence.
    pub frame_count: usize,
    /// Frames that must settle before the page becomes interactive.
    pub critical_count: usize,
    /// Locator template for frame resources.
    pub path: FramePathTemplate,
    /// Leading fraction of scroll progress mapped across the full frame range.
    pub reveal_fraction: f64,
    /// Pinned region length as a multiple of viewport height.
    pub pin_length_viewports: f64,
    /// Worker threads for the filesystem fetcher. `None` uses rayon defaults.
    pub loader_threads: Option<usize>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            frame_count: 209,
            critical_count: 50,
            path: FramePathTemplate::default(),
            reveal_fraction: 0.9,
            pin_length_viewports: 7.0,
            loader_threads: None,
        }
    }
}

impl PlayerConfig {
    /// Parse a JSON document. The result is not yet validated.
    pub fn from_json_str(json: &str) -> ScrubResult<Self> {
        serde_json::from_str(json).map_err(|e| ScrubError::serde(format!("player config: {e}")))
    }

    /// Read and parse a JSON file. The result is not yet validated.
    pub fn from_path(path: &Path) -> ScrubResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open player config '{}'", path.display()))?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| ScrubError::serde(format!("player config '{}': {e}", path.display())))
    }

    /// Check every field; fails fast with [`ScrubError::Configuration`].
    pub fn validate(&self) -> ScrubResult<()> {
        if self.frame_count == 0 {
            return Err(ScrubError::configuration("frame_count must be > 0"));
        }
        if self.critical_count > self.frame_count {
            return Err(ScrubError::configuration(format!(
                "critical_count ({}) exceeds frame_count ({})",
                self.critical_count, self.frame_count
            )));
        }
        if !self.reveal_fraction.is_finite()
            || self.reveal_fraction <= 0.0
            || self.reveal_fraction > 1.0
        {
            return Err(ScrubError::configuration(
                "reveal_fraction must be finite and in (0, 1]",
            ));
        }
        if !self.pin_length_viewports.is_finite() || self.pin_length_viewports <= 0.0 {
            return Err(ScrubError::configuration(
                "pin_length_viewports must be finite and > 0",
            ));
        }
        if self.loader_threads == Some(0) {
            return Err(ScrubError::configuration("loader_threads must be > 0"));
        }
        self.path.validate()
    }

    /// Build the frame sequence this configuration describes.
    pub fn sequence(&self) -> ScrubResult<FrameSequence> {
        self.validate()?;
        FrameSequence::new(self.frame_count, self.critical_count, self.path.clone())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
