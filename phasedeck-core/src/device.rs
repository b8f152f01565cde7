//! The device boundary.
//!
//! Everything behind [`SlmDevice`] is vendor territory: discovery, version
//! negotiation and frame upload all live inside the SDK. The core only ever
//! observes success or failure of the calls below.

use std::path::Path;

use bitflags::bitflags;

use crate::error::SlmError;
use crate::frame::{Frame, PhaseMask};

bitflags! {
    /// Display-mode word passed through to the SDK's show calls.
    ///
    /// The empty value is "present automatic": the SDK picks the placement
    /// for the given data size.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ShowFlags: u32 {
        /// Scale to fit, preserving aspect ratio, bars on the remainder.
        const PRESENT_FIT_WITH_BARS = 1;
        /// Scale to fit, preserving aspect ratio, no bars.
        const PRESENT_FIT_NO_BARS = 2;
        /// Stretch to the full panel, ignoring aspect ratio.
        const PRESENT_FIT_SCREEN = 4;
        /// Tile the data centered on the panel.
        const PRESENT_TILED_CENTERED = 8;
        /// Transpose the data before upload.
        const TRANSPOSE_DATA = 16;
    }
}

/// Handle to an open SLM.
///
/// The handle is exclusively owned by the presentation worker; it must never
/// be shared between threads. Implementors release the device in `Drop`, so
/// the connection is closed on every exit path, including errors.
pub trait SlmDevice {
    /// Display an image file. Decoding happens inside the SDK.
    fn show_from_file(&mut self, path: &Path, flags: ShowFlags) -> Result<(), SlmError>;

    /// Display an in-memory phase mask.
    fn show_mask(&mut self, mask: &PhaseMask, flags: ShowFlags) -> Result<(), SlmError>;

    /// Native panel resolution as (height, width) in pixels.
    fn resolution(&self) -> (u32, u32);

    /// Validate and display one frame.
    fn show(&mut self, frame: &Frame, flags: ShowFlags) -> Result<(), SlmError> {
        frame.validate()?;
        match frame {
            Frame::File(path) => self.show_from_file(path, flags),
            Frame::Mask(mask) => self.show_mask(mask, flags),
        }
    }
}
