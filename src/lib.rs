//! Framescrub is a scroll-driven image-sequence player core.
//!
//! A fixed sequence of still frames is loaded in two priority waves, the displayed frame follows a
//! normalized scroll progress, and the current frame is painted onto a canvas with cover-fit
//! placement. Host events (load completions, scroll updates, resizes) are fed one at a time to a
//! single-threaded [`ScrubController`].
//!
//! # Pipeline overview
//!
//! 1. **Load**: [`ProgressiveLoader`] issues the critical wave, then the background wave once every
//!    critical frame settled. Fetchers report on a completion channel.
//! 2. **Cache**: [`ImageCache`] holds write-once frame slots of decoded premultiplied RGBA8.
//! 3. **Map**: [`map_progress_to_frame`] turns scroll progress into a frame index.
//! 4. **Render**: [`Renderer`] clears the canvas and draws the frame cover-fitted, in CSS pixels
//!    pre-scaled by the device pixel ratio.
//!
//! A frame that failed or is still pending renders as a cleared canvas; that is not an error.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod controller;
mod foundation;
mod loader;
mod mapper;
mod overlay;
mod render;
mod scroll;
mod sequence;

pub use assets::cache::{ImageCache, SlotState};
pub use assets::decode::{PreparedImage, decode_image};
pub use config::PlayerConfig;
pub use controller::{Input, Notice, Phase, ScrubController};
pub use foundation::core::{Affine, FrameIndex, Rect, Size, Viewport};
pub use foundation::error::{LoadFailure, ScrubError, ScrubResult};
pub use loader::fetch::{
    CompletionSender, FrameFetcher, FrameRequest, FsFrameFetcher, LoadCompletion,
    MemoryFrameFetcher, normalize_locator,
};
pub use loader::progressive::{LoadSignal, LoadStats, ProgressiveLoader};
pub use mapper::map_progress_to_frame;
pub use overlay::{LayerState, OverlayState, overlay_at};
pub use render::fit::cover_fit;
pub use render::renderer::{RenderOutcome, Renderer};
pub use render::surface::{CanvasSurface, FrameRGBA, PixmapCanvas};
pub use scroll::{PinnedScroll, ScrollSource};
pub use sequence::{FramePathTemplate, FrameSequence, Wave};
