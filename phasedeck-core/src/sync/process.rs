//! Cross-process coordination endpoint.
//!
//! The vendor display SDK binds an open device to the process that opened
//! it; driving the SLM from a second process does not work and fails in
//! ways the SDK cannot report cleanly. This module keeps the process-style
//! entry point in the API so callers get a decisive error instead of a
//! silently broken run. Use the in-memory [`Gate`](super::Gate) and
//! [`HandoffSlot`](super::HandoffSlot) from a dedicated thread instead.

use tracing::warn;

use crate::error::SlmError;

/// Serialization-based gate/slot transport for coordinating with another
/// process. Construction always refuses; see the module docs.
#[derive(Debug)]
pub struct ProcessHarness {
    _private: (),
}

impl ProcessHarness {
    /// Refuses with [`SlmError::CrossProcessUnsupported`].
    pub fn connect(endpoint: &str) -> Result<Self, SlmError> {
        warn!(
            endpoint,
            "cross-process SLM coordination requested; the vendor SDK only \
             supports a single controlling process"
        );
        Err(SlmError::CrossProcessUnsupported)
    }
}
