use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    assets::decode::{PreparedImage, decode_image},
    foundation::{
        core::FrameIndex,
        error::{LoadFailure, ScrubError, ScrubResult},
    },
};

/// One frame load request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRequest {
    /// Slot being filled.
    pub index: FrameIndex,
    /// Resource locator of the frame.
    pub locator: String,
}

/// Outcome of one [`FrameRequest`], delivered over the completion channel.
#[derive(Clone, Debug)]
pub struct LoadCompletion {
    /// Slot the outcome belongs to.
    pub index: FrameIndex,
    /// Decoded image or the reason it could not be produced.
    pub outcome: Result<PreparedImage, LoadFailure>,
}

impl LoadCompletion {
    /// Successful completion.
    pub fn ready(index: FrameIndex, image: PreparedImage) -> Self {
        Self {
            index,
            outcome: Ok(image),
        }
    }

    /// Failed completion.
    pub fn failed(failure: LoadFailure) -> Self {
        Self {
            index: failure.index,
            outcome: Err(failure),
        }
    }

    /// Whether the frame loaded.
    pub fn is_ready(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Sending half of the completion channel handed to fetchers.
pub type CompletionSender = crossbeam_channel::Sender<LoadCompletion>;

/// Source of frame images.
///
/// Implementations start the load and return immediately. Each request should eventually produce
/// exactly one [`LoadCompletion`] on `done`; a request that never completes leaves its slot
/// pending. A closed channel means the player is gone and the result may be dropped.
pub trait FrameFetcher {
    /// Begin loading `request`.
    fn fetch(&self, request: FrameRequest, done: CompletionSender);
}

/// Loads frames from a directory tree on a dedicated rayon pool.
///
/// Locators are resolved relative to `root`; a leading `/` is ignored.
pub struct FsFrameFetcher {
    root: PathBuf,
    pool: rayon::ThreadPool,
}

impl std::fmt::Debug for FsFrameFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsFrameFetcher")
            .field("root", &self.root)
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}

impl FsFrameFetcher {
    /// Fetcher rooted at `root` using `threads` workers (`None` = rayon default).
    pub fn new(root: impl Into<PathBuf>, threads: Option<usize>) -> ScrubResult<Self> {
        Ok(Self {
            root: root.into(),
            pool: build_thread_pool(threads)?,
        })
    }

    /// Directory locators are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FrameFetcher for FsFrameFetcher {
    fn fetch(&self, request: FrameRequest, done: CompletionSender) {
        let root = self.root.clone();
        self.pool.spawn(move || {
            let index = request.index;
            let completion = match read_frame(&root, &request.locator) {
                Ok(image) => LoadCompletion::ready(index, image),
                Err(e) => LoadCompletion::failed(LoadFailure::new(
                    index,
                    request.locator,
                    format!("{e:#}"),
                )),
            };
            if done.send(completion).is_err() {
                tracing::debug!(index = index.0, "completion channel closed; result dropped");
            }
        });
    }
}

fn read_frame(root: &Path, locator: &str) -> anyhow::Result<PreparedImage> {
    let rel = normalize_locator(locator)?;
    let path = root.join(Path::new(&rel));
    let bytes = std::fs::read(&path)
        .with_context(|| format!("read frame bytes from '{}'", path.display()))?;
    Ok(decode_image(&bytes)?)
}

/// In-memory frame store keyed by locator; completes synchronously on the calling thread.
///
/// Useful for tests and for hosts that already hold the encoded bytes.
#[derive(Clone, Debug, Default)]
pub struct MemoryFrameFetcher {
    encoded: HashMap<String, Vec<u8>>,
}

impl MemoryFrameFetcher {
    /// Empty store; every fetch fails until frames are inserted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register encoded bytes for `locator`.
    pub fn insert(&mut self, locator: impl Into<String>, encoded: Vec<u8>) {
        self.encoded.insert(locator.into(), encoded);
    }

    /// Number of registered frames.
    pub fn len(&self) -> usize {
        self.encoded.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.encoded.is_empty()
    }
}

impl FrameFetcher for MemoryFrameFetcher {
    fn fetch(&self, request: FrameRequest, done: CompletionSender) {
        let outcome = match self.encoded.get(&request.locator) {
            Some(bytes) => decode_image(bytes).map_err(|e| {
                LoadFailure::new(request.index, request.locator.clone(), e.to_string())
            }),
            None => Err(LoadFailure::new(
                request.index,
                request.locator.clone(),
                "no such frame",
            )),
        };
        let _ = done.send(LoadCompletion {
            index: request.index,
            outcome,
        });
    }
}

/// Turn a frame locator into a safe relative path.
///
/// The result uses `/` separators, drops `.` segments and any leading `/`, and rejects parent
/// traversals (`..`).
pub fn normalize_locator(locator: &str) -> ScrubResult<String> {
    let s = locator.replace('\\', "/");
    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ScrubError::configuration(format!(
                "frame locator '{locator}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ScrubError::configuration(format!(
            "frame locator '{locator}' must contain a file name"
        )));
    }

    Ok(out.join("/"))
}

fn build_thread_pool(threads: Option<usize>) -> ScrubResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ScrubError::configuration(
            "loader_threads must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("frame-fetch-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ScrubError::configuration(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/loader/fetch.rs"]
mod tests;
