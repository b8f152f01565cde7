//! Options for a presentation run.

use std::path::PathBuf;
use std::time::Duration;

use crate::device::ShowFlags;
use crate::frame::Frame;

/// Preprocessing hook applied to every frame before display.
pub type FrameTransform = Box<dyn FnMut(Frame) -> Frame + Send>;

/// Produces the destination path for the i-th frame's capture.
pub type PathNamer = Box<dyn FnMut(usize) -> PathBuf + Send>;

/// Default destination path for frame `index`: `"{index}.jpg"`.
pub fn default_path_name(index: usize) -> PathBuf {
    PathBuf::from(format!("{index}.jpg"))
}

/// Hardware rise time of typical panels; overridable per run.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(10);

/// Tuning knobs for one presentation run.
///
/// The default runs with automatic placement, a 10 ms settle delay, no
/// pacing interval, identity preprocessing and `"{i}.jpg"` naming.
pub struct PresentOptions {
    /// Display-mode word forwarded to every show call.
    pub flags: ShowFlags,
    /// Fixed pause after each show, covering the panel's rise time.
    pub settle: Duration,
    /// Fixed cadence between frames; `None` proceeds as soon as the device
    /// and consumer are ready.
    pub pacing: Option<Duration>,
    /// Per-frame preprocessing; identity when `None`.
    pub transform: Option<FrameTransform>,
    /// Destination-path naming; [`default_path_name`] when `None`.
    pub namer: Option<PathNamer>,
}

impl Default for PresentOptions {
    fn default() -> Self {
        Self {
            flags: ShowFlags::default(),
            settle: DEFAULT_SETTLE,
            pacing: None,
            transform: None,
            namer: None,
        }
    }
}

impl PresentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(mut self, flags: ShowFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn pacing(mut self, pacing: Duration) -> Self {
        self.pacing = Some(pacing);
        self
    }

    pub fn transform(mut self, transform: impl FnMut(Frame) -> Frame + Send + 'static) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    pub fn namer(mut self, namer: impl FnMut(usize) -> PathBuf + Send + 'static) -> Self {
        self.namer = Some(Box::new(namer));
        self
    }
}

impl std::fmt::Debug for PresentOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentOptions")
            .field("flags", &self.flags)
            .field("settle", &self.settle)
            .field("pacing", &self.pacing)
            .field("transform", &self.transform.is_some())
            .field("namer", &self.namer.is_some())
            .finish()
    }
}
