//! Error types shared across the workspace.

use thiserror::Error;

/// Errors surfaced by the presentation loop and the device boundary.
///
/// There is no retry path anywhere: the loop cannot distinguish transient
/// from permanent hardware faults, and silently retrying would desynchronize
/// the external consumer.
#[derive(Debug, Clone, Error)]
pub enum SlmError {
    /// Frame payload cannot be displayed. Raised before any device
    /// interaction takes place.
    #[error("unsupported frame payload: {0}")]
    UnsupportedFrame(String),

    /// The device or vendor SDK reported a failure during open or show.
    /// Fatal for the whole run.
    #[error("SLM device error {code}: {message}")]
    Device {
        /// Raw SDK error code.
        code: i32,
        /// Human-readable translation from the SDK, if available.
        message: String,
    },

    /// The producer published a handoff entry while the previous one was
    /// still unconsumed. Indicates a broken coordination protocol.
    #[error("handoff slot still occupied by {0}")]
    HandoffOccupied(String),

    /// Cross-process coordination was requested. The vendor SDK binds the
    /// open device to a single process, so this transport is refused.
    #[error("cross-process synchronization is not supported by the vendor SDK")]
    CrossProcessUnsupported,
}
