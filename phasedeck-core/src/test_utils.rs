//! Shared test utilities for integration and unit tests

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::device::{ShowFlags, SlmDevice};
use crate::error::SlmError;
use crate::frame::PhaseMask;

/// One recorded show call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShownFrame {
    File(PathBuf),
    Mask { height: u32, width: u32 },
}

/// Scripted SLM for tests: records every show call and can be told to
/// report a device error at a given call index.
///
/// The call log is behind an `Arc` so tests keep a view of it after the
/// device has moved into a worker thread.
pub struct ScriptedSlm {
    log: Arc<Mutex<Vec<ShownFrame>>>,
    fail_at: Option<usize>,
    resolution: (u32, u32),
}

impl Default for ScriptedSlm {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedSlm {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            fail_at: None,
            resolution: (1080, 1920),
        }
    }

    /// Device that reports an error on the show call with this 0-based
    /// index. The call is still recorded as issued.
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new()
        }
    }

    /// Shared view of the call log.
    pub fn log(&self) -> Arc<Mutex<Vec<ShownFrame>>> {
        Arc::clone(&self.log)
    }

    fn record(&mut self, shown: ShownFrame) -> Result<(), SlmError> {
        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        let index = log.len();
        log.push(shown);
        if self.fail_at == Some(index) {
            return Err(SlmError::Device {
                code: -1,
                message: format!("injected failure at show {index}"),
            });
        }
        Ok(())
    }
}

impl SlmDevice for ScriptedSlm {
    fn show_from_file(&mut self, path: &Path, _flags: ShowFlags) -> Result<(), SlmError> {
        self.record(ShownFrame::File(path.to_path_buf()))
    }

    fn show_mask(&mut self, mask: &PhaseMask, _flags: ShowFlags) -> Result<(), SlmError> {
        let (height, width) = mask.shape();
        self.record(ShownFrame::Mask { height, width })
    }

    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }
}
