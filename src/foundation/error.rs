use crate::foundation::core::FrameIndex;

/// Convenience result type used across framescrub.
pub type ScrubResult<T> = Result<T, ScrubError>;

/// Top-level error taxonomy used by player APIs.
#[derive(thiserror::Error, Debug)]
pub enum ScrubError {
    /// Invalid player configuration; raised before any frame is requested.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A single frame could not be fetched or decoded.
    #[error(transparent)]
    Load(#[from] LoadFailure),

    /// The drawing surface rejected an operation.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrubError {
    /// Build a [`ScrubError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`ScrubError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ScrubError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Failure to fetch or decode one frame.
///
/// Non-fatal: the loader counts it toward wave completion, marks the slot failed and moves on.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("load failure for frame {} ('{locator}'): {reason}", index.0)]
pub struct LoadFailure {
    /// Frame that failed.
    pub index: FrameIndex,
    /// Resource locator that was requested.
    pub locator: String,
    /// Human-readable cause.
    pub reason: String,
}

impl LoadFailure {
    /// Build a failure record for `index`.
    pub fn new(index: FrameIndex, locator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            index,
            locator: locator.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
