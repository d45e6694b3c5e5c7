use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::FrameIndex,
    error::{ScrubError, ScrubResult},
};

/// Locator template for frame resources: `{directory}/{prefix}{NNN}.{extension}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FramePathTemplate {
    /// Directory part, without a trailing slash.
    pub directory: String,
    /// File stem prefix placed before the frame number.
    pub prefix: String,
    /// Zero-pad width of the one-based frame number.
    pub digits: usize,
    /// File extension, without the dot.
    pub extension: String,
}

impl Default for FramePathTemplate {
    fn default() -> Self {
        Self {
            directory: "/Frames".to_string(),
            prefix: "frame_".to_string(),
            digits: 3,
            extension: "jpg".to_string(),
        }
    }
}

impl FramePathTemplate {
    pub(crate) fn validate(&self) -> ScrubResult<()> {
        if self.digits == 0 {
            return Err(ScrubError::configuration("path.digits must be > 0"));
        }
        if self.extension.trim().is_empty() {
            return Err(ScrubError::configuration("path.extension must be non-empty"));
        }
        Ok(())
    }

    /// Resolve the locator of frame `index`.
    pub fn locate(&self, index: FrameIndex) -> String {
        let dir = self.directory.trim_end_matches('/');
        format!(
            "{dir}/{}{:0width$}.{}",
            self.prefix,
            index.ordinal(),
            self.extension,
            width = self.digits
        )
    }
}

/// Load wave a frame belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wave {
    /// Frames that gate the first interactive paint.
    Critical,
    /// Frames loaded silently after the page turns interactive.
    Background,
}

/// Ordered, fixed-length list of frame slots with deterministic locators.
///
/// Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSequence {
    len: usize,
    critical_count: usize,
    template: FramePathTemplate,
}

#[allow(clippy::len_without_is_empty)]
impl FrameSequence {
    /// Build a sequence of `len` frames whose first `critical_count` frames form the critical wave.
    pub fn new(len: usize, critical_count: usize, template: FramePathTemplate) -> ScrubResult<Self> {
        if len == 0 {
            return Err(ScrubError::configuration("frame_count must be > 0"));
        }
        if critical_count > len {
            return Err(ScrubError::configuration(format!(
                "critical_count ({critical_count}) exceeds frame_count ({len})"
            )));
        }
        template.validate()?;
        Ok(Self {
            len,
            critical_count,
            template,
        })
    }

    /// Number of frames; never zero.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Size of the critical wave.
    pub fn critical_count(&self) -> usize {
        self.critical_count
    }

    /// Last valid frame index.
    pub fn last(&self) -> FrameIndex {
        FrameIndex(self.len - 1)
    }

    /// Whether `index` addresses a slot of this sequence.
    pub fn contains(&self, index: FrameIndex) -> bool {
        index.0 < self.len
    }

    /// Wave that loads `index`.
    pub fn wave_of(&self, index: FrameIndex) -> Wave {
        if index.0 < self.critical_count {
            Wave::Critical
        } else {
            Wave::Background
        }
    }

    /// Indices of one wave, in ascending order.
    pub fn wave(&self, wave: Wave) -> impl Iterator<Item = FrameIndex> + use<> {
        let range = match wave {
            Wave::Critical => 0..self.critical_count,
            Wave::Background => self.critical_count..self.len,
        };
        range.map(FrameIndex)
    }

    /// Resource locator of frame `index`.
    pub fn locator(&self, index: FrameIndex) -> String {
        self.template.locate(index)
    }

    /// Locator template in use.
    pub fn template(&self) -> &FramePathTemplate {
        &self.template
    }
}
