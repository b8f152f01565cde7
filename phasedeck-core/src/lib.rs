//! Core framework for driving a spatial light modulator (SLM).
//!
//! A presentation loop pushes frames to the display one at a time and keeps
//! an external consumer (typically a camera capturing each displayed frame)
//! in lockstep through two gates and a single-slot handoff queue:
//!
//! ```text
//! Main/Consumer Thread           Presentation Thread            SLM panel
//!     │                                │                           │
//! [arm camera]                         │                           │
//! [open start gate]───────────────►[wait start]                    │
//!     │                            [show frame i]────(SDK)──────►[display]
//!     │                            [settle, pace]                  │
//! [take "i.jpg"]◄───(handoff)──────[publish "i.jpg"]               │
//! [capture to "i.jpg"]             [wait for drain]                │
//!     │                                ...                         │
//! [wait done gate]◄────────────────[open done gate]                │
//! ```
//!
//! The vendor SDK stays behind the [`device::SlmDevice`] trait; this crate
//! never inspects device state beyond the success or failure of the trait's
//! calls. See the `phasedeck-holoeye` crate for the vendor binding.

pub mod config;
pub mod device;
pub mod error;
pub mod frame;
pub mod present;
pub mod sync;
pub mod test_utils;

pub use config::SlmConfig;
pub use device::{ShowFlags, SlmDevice};
pub use error::SlmError;
pub use frame::{Frame, PhaseMask};
pub use present::{
    AckHarness, PresentOptions, PresentReport, PresentWorker, SyncHarness, run, run_acknowledged,
};
pub use sync::{Gate, HandoffSlot};
