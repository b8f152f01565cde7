//! Dedicated-thread entry points for the presentation loop.
//!
//! The device handle moves into the worker thread and stays exclusively
//! owned there; the caller keeps only gates and the handoff slot.

use std::thread::{self, JoinHandle};

use tracing::warn;

use super::{AckHarness, PresentOptions, PresentReport, SyncHarness, run, run_acknowledged};
use crate::device::SlmDevice;
use crate::error::SlmError;
use crate::frame::Frame;

/// Handle to a running presentation worker.
///
/// Dropping the handle joins the thread. There is no cancellation path: the
/// worker finishes when its frame sequence is exhausted (or a device error
/// aborts it), so dropping while the consumer has stopped draining the
/// handoff slot will block.
pub struct PresentWorker {
    handle: Option<JoinHandle<Result<PresentReport, SlmError>>>,
}

impl PresentWorker {
    /// Run the gated loop on a dedicated thread.
    pub fn spawn<D, I>(
        mut device: D,
        frames: I,
        harness: SyncHarness,
        options: PresentOptions,
    ) -> Self
    where
        D: SlmDevice + Send + 'static,
        I: IntoIterator<Item = Frame> + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name("slm-present".into())
            .spawn(move || run(&mut device, frames, &harness, options))
            .expect("failed to spawn presentation thread");
        Self {
            handle: Some(handle),
        }
    }

    /// Run the acknowledgment-mode loop on a dedicated thread.
    pub fn spawn_acknowledged<D, I>(
        mut device: D,
        frames: I,
        harness: AckHarness,
        options: PresentOptions,
    ) -> Self
    where
        D: SlmDevice + Send + 'static,
        I: IntoIterator<Item = Frame> + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name("slm-present".into())
            .spawn(move || run_acknowledged(&mut device, frames, &harness, options))
            .expect("failed to spawn presentation thread");
        Self {
            handle: Some(handle),
        }
    }

    /// Whether the worker thread is still running.
    pub fn is_alive(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Wait for the run to finish and surface its result.
    pub fn join(mut self) -> Result<PresentReport, SlmError> {
        let handle = self
            .handle
            .take()
            .expect("presentation worker already joined");
        match handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

impl Drop for PresentWorker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(_panic) = handle.join() {
                warn!("presentation thread panicked");
            }
        }
    }
}
