//! Synchronization primitives between the presentation worker and its
//! consumer.
//!
//! ```text
//! Consumer Thread                Presentation Thread           SLM
//!     │                                │                        │
//! [open start gate]───(Gate)────────►[wait]                     │
//!     │                              [show frame i]───(SDK)───►[display]
//!     │                              [settle delay]             │
//! [take "i.jpg"]◄──(HandoffSlot)────[publish "i.jpg"]           │
//! [capture frame]                    [wait drained]             │
//!     │                                ...                      │
//! [wait done]◄────────(Gate)────────[open done gate]            │
//! ```
//!
//! Only the handoff slot crosses the worker boundary as mutable state; its
//! capacity of exactly one entry is what enforces the "one frame in flight"
//! invariant.

mod gate;
mod slot;

pub mod process;

pub use gate::Gate;
pub use slot::{HandoffSlot, SlotFull};
