//! Serializable run configuration.
//!
//! Lives in app-level config files (TOML) and converts into
//! [`PresentOptions`] for a run. Closure-valued knobs (preprocessing,
//! path naming) are code, not config, and stay on `PresentOptions`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::device::ShowFlags;
use crate::present::PresentOptions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlmConfig {
    /// Settle delay after each show, in milliseconds (panel rise time).
    pub settle_ms: u64,
    /// Fixed cadence between frames in milliseconds; absent means "as fast
    /// as readiness allows".
    pub pacing_ms: Option<u64>,
    /// Raw SDK display-mode flag word; unknown bits are dropped.
    pub show_flags: u32,
}

impl Default for SlmConfig {
    fn default() -> Self {
        Self {
            settle_ms: 10,
            pacing_ms: None,
            show_flags: 0,
        }
    }
}

impl SlmConfig {
    /// Build run options from this configuration.
    pub fn options(&self) -> PresentOptions {
        let mut options = PresentOptions::new()
            .settle(Duration::from_millis(self.settle_ms))
            .flags(ShowFlags::from_bits_truncate(self.show_flags));
        if let Some(pacing_ms) = self.pacing_ms {
            options = options.pacing(Duration::from_millis(pacing_ms));
        }
        options
    }
}
