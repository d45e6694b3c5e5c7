use crate::{
    assets::decode::PreparedImage,
    foundation::{core::FrameIndex, error::LoadFailure},
};

/// Externally visible lifecycle of a frame slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// No request issued yet.
    Unrequested,
    /// Request in flight.
    Pending,
    /// Decoded image available.
    Ready,
    /// Fetch or decode failed; terminal, rendered as a skip.
    Failed,
}

impl SlotState {
    /// Ready or Failed.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

#[derive(Clone, Debug)]
enum FrameSlot {
    Unrequested,
    Pending,
    Ready(PreparedImage),
    Failed(LoadFailure),
}

impl FrameSlot {
    fn state(&self) -> SlotState {
        match self {
            Self::Unrequested => SlotState::Unrequested,
            Self::Pending => SlotState::Pending,
            Self::Ready(_) => SlotState::Ready,
            Self::Failed(_) => SlotState::Failed,
        }
    }
}

/// Per-frame image store indexed by frame number.
///
/// Slots only move forward (Unrequested -> Pending -> Ready | Failed) and each terminal state is
/// written once. Out-of-order writes are rejected and leave the slot as it was.
#[derive(Clone, Debug)]
pub struct ImageCache {
    slots: Vec<FrameSlot>,
}

impl ImageCache {
    /// Cache with `len` unrequested slots.
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![FrameSlot::Unrequested; len],
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True for a zero-slot cache.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// State of slot `index`; `None` when out of range.
    pub fn state(&self, index: FrameIndex) -> Option<SlotState> {
        self.slots.get(index.0).map(FrameSlot::state)
    }

    /// Whether frame `index` can be drawn.
    pub fn is_ready(&self, index: FrameIndex) -> bool {
        self.state(index) == Some(SlotState::Ready)
    }

    /// Decoded image of frame `index`, if ready.
    pub fn get(&self, index: FrameIndex) -> Option<&PreparedImage> {
        match self.slots.get(index.0)? {
            FrameSlot::Ready(img) => Some(img),
            _ => None,
        }
    }

    /// Failure recorded for frame `index`, if any.
    pub fn failure(&self, index: FrameIndex) -> Option<&LoadFailure> {
        match self.slots.get(index.0)? {
            FrameSlot::Failed(f) => Some(f),
            _ => None,
        }
    }

    /// Record that a request for `index` was issued. Returns false unless the slot was unrequested.
    pub fn mark_pending(&mut self, index: FrameIndex) -> bool {
        match self.slots.get_mut(index.0) {
            Some(slot) if matches!(slot, FrameSlot::Unrequested) => {
                *slot = FrameSlot::Pending;
                true
            }
            _ => false,
        }
    }

    /// Settle a pending slot with the outcome of its request. Returns false unless the slot was
    /// pending.
    pub fn resolve(&mut self, index: FrameIndex, outcome: Result<PreparedImage, LoadFailure>) -> bool {
        match self.slots.get_mut(index.0) {
            Some(slot) if matches!(slot, FrameSlot::Pending) => {
                *slot = match outcome {
                    Ok(img) => FrameSlot::Ready(img),
                    Err(failure) => FrameSlot::Failed(failure),
                };
                true
            }
            _ => false,
        }
    }

    /// Number of slots in `state`.
    pub fn count(&self, state: SlotState) -> usize {
        self.slots.iter().filter(|s| s.state() == state).count()
    }

    /// True once every slot is Ready or Failed.
    pub fn all_terminal(&self) -> bool {
        self.slots.iter().all(|s| s.state().is_terminal())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
