//! The presentation loop.
//!
//! Pushes a sequence of frames to the SLM one at a time, pacing itself
//! according to device and consumer readiness:
//!
//! ```text
//! Idle -> WaitingForStart -> {ShowingFrame -> WaitingForConsumer}* -> Done
//! ```
//!
//! Two acquisition modes share the same per-frame body and differ only in
//! how "ready for the next frame" is detected:
//!
//! - [`run`]: blocks on a start gate, then uses the handoff slot's
//!   back-pressure (never publish while the previous entry is unconsumed).
//! - [`run_acknowledged`]: opens the gates itself and instead waits on an
//!   explicit per-frame acknowledgment gate before each show.
//!
//! There is no cancellation and no partial-completion: the only way out is
//! exhausting the frame sequence or a fatal device error. Whatever is on the
//! panel disappears when the controlling process exits; that is a property
//! of the hardware, not of this loop.

mod options;
mod worker;

pub use options::{PresentOptions, default_path_name};
pub use worker::PresentWorker;

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::device::SlmDevice;
use crate::error::SlmError;
use crate::frame::Frame;
use crate::sync::{Gate, HandoffSlot, SlotFull};

/// Gates and the optional handoff slot for one presentation run.
///
/// Clones share state with the original, so the consumer side keeps a clone
/// while the worker owns another.
#[derive(Debug, Clone, Default)]
pub struct SyncHarness {
    /// Consumer opens this when every collaborator is armed.
    pub start: Gate,
    /// The loop opens this after the last frame.
    pub done: Gate,
    /// Per-frame destination-path handoff. `None` runs the loop
    /// unthrottled, paced only by the settle delay and pacing interval.
    pub handoff: Option<HandoffSlot<PathBuf>>,
}

impl SyncHarness {
    /// Harness without a handoff slot (free-running mode).
    pub fn new() -> Self {
        Self::default()
    }

    /// Harness with a capacity-1 handoff slot for an external consumer.
    pub fn with_handoff() -> Self {
        Self {
            handoff: Some(HandoffSlot::new()),
            ..Self::default()
        }
    }
}

/// Gates for the acknowledgment-driven mode.
#[derive(Debug, Clone, Default)]
pub struct AckHarness {
    /// Opened by the loop itself on entry.
    pub start: Gate,
    /// Opened by the loop after the last frame.
    pub done: Gate,
    /// Consumer opens this once it has finished with the previous frame;
    /// the loop closes it again after every show.
    pub frame_ack: Gate,
    /// Per-frame destination-path handoff.
    pub handoff: HandoffSlot<PathBuf>,
}

impl AckHarness {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Summary of a completed presentation run.
#[derive(Debug, Clone, Copy)]
pub struct PresentReport {
    /// Frames actually shown.
    pub frames_shown: usize,
    /// Wall time from the start signal to the done signal.
    pub elapsed: Duration,
}

impl PresentReport {
    /// Mean wall time per frame, if any frames were shown.
    pub fn mean_frame_time(&self) -> Option<Duration> {
        if self.frames_shown == 0 {
            None
        } else {
            Some(self.elapsed / self.frames_shown as u32)
        }
    }
}

/// Present `frames` in order, coordinating through `harness`.
///
/// Blocks on the start gate, then for each frame: preprocess, wait for the
/// handoff slot to drain (when present), show, settle, pace, publish the
/// frame's destination path. Opens the done gate after the last frame.
///
/// A device error aborts the run; the done gate stays closed and the error
/// surfaces to the caller.
pub fn run<D, I>(
    device: &mut D,
    frames: I,
    harness: &SyncHarness,
    mut options: PresentOptions,
) -> Result<PresentReport, SlmError>
where
    D: SlmDevice,
    I: IntoIterator<Item = Frame>,
{
    debug!("presentation loop waiting for start gate");
    harness.start.wait();

    let started = Instant::now();
    let mut shown = 0usize;

    for (index, frame) in frames.into_iter().enumerate() {
        if let Some(slot) = &harness.handoff {
            trace!(index, "waiting for consumer to drain previous entry");
            slot.wait_drained();
        }

        show_frame(device, index, frame, &mut options)?;
        shown += 1;

        if let Some(slot) = &harness.handoff {
            publish_path(slot, index, &mut options)?;
        }
    }

    harness.done.open();

    let report = PresentReport {
        frames_shown: shown,
        elapsed: started.elapsed(),
    };
    info!(
        frames = report.frames_shown,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "presentation complete"
    );
    Ok(report)
}

/// Present `frames` in acknowledgment mode.
///
/// No external start coordination: the loop opens the start gate (and arms
/// the acknowledgment gate) itself, then waits on the acknowledgment gate
/// before every show and closes it again afterwards. The consumer re-opens
/// the gate once it has processed the published path.
pub fn run_acknowledged<D, I>(
    device: &mut D,
    frames: I,
    harness: &AckHarness,
    mut options: PresentOptions,
) -> Result<PresentReport, SlmError>
where
    D: SlmDevice,
    I: IntoIterator<Item = Frame>,
{
    // The first frame has no prior capture to wait for.
    harness.frame_ack.open();
    harness.start.open();
    debug!("presentation loop running in acknowledgment mode");

    let started = Instant::now();
    let mut shown = 0usize;

    for (index, frame) in frames.into_iter().enumerate() {
        trace!(index, "waiting for per-frame acknowledgment");
        harness.frame_ack.wait();

        show_frame(device, index, frame, &mut options)?;
        shown += 1;

        harness.frame_ack.close();
        publish_path(&harness.handoff, index, &mut options)?;
    }

    harness.done.open();

    let report = PresentReport {
        frames_shown: shown,
        elapsed: started.elapsed(),
    };
    info!(
        frames = report.frames_shown,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "presentation complete"
    );
    Ok(report)
}

/// Shared per-frame body: preprocess, show, settle, pace.
fn show_frame<D: SlmDevice>(
    device: &mut D,
    index: usize,
    frame: Frame,
    options: &mut PresentOptions,
) -> Result<(), SlmError> {
    let frame = match options.transform.as_mut() {
        Some(transform) => transform(frame),
        None => frame,
    };
    frame.validate()?;

    debug!(index, kind = frame.kind(), "presenting frame");
    let outcome = device.show(&frame, options.flags);

    // Let the panel finish its rise before anything else talks to the
    // device, even when the show call failed.
    thread::sleep(options.settle);
    outcome?;

    if let Some(pacing) = options.pacing {
        thread::sleep(pacing);
    }
    Ok(())
}

fn publish_path(
    slot: &HandoffSlot<PathBuf>,
    index: usize,
    options: &mut PresentOptions,
) -> Result<(), SlmError> {
    let path = match options.namer.as_mut() {
        Some(namer) => namer(index),
        None => default_path_name(index),
    };
    trace!(index, path = %path.display(), "publishing handoff entry");
    slot.publish(path)
        .map_err(|SlotFull(path)| SlmError::HandoffOccupied(path.display().to_string()))
}

#[cfg(test)]
mod tests;
