//! HOLOEYE SLM Display SDK binding.
//!
//! Implements [`SlmDevice`] on top of the vendor SDK, which is discovered
//! and loaded at runtime. Opening the device checks the SDK version, and
//! dropping the handle closes the device on every exit path.
//!
//! The SDK only supports a single controlling process; keep the handle on
//! one dedicated thread and coordinate through `phasedeck_core::sync`. Note
//! that the panel blanks when the controlling process exits: there is no
//! way to leave a frame displayed after shutdown.

mod ffi;

use std::ffi::{CStr, CString, c_int};
use std::path::Path;

use bitflags::bitflags;
use tracing::{debug, info};

use phasedeck_core::device::{ShowFlags, SlmDevice};
use phasedeck_core::error::SlmError;
use phasedeck_core::frame::PhaseMask;

/// Minimum SDK major version the wrapper is written against.
pub const REQUIRED_SDK_MAJOR: i32 = 5;

bitflags! {
    /// Options for the SDK's built-in preview window.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PreviewFlags: u32 {
        /// Borderless preview window.
        const NO_BORDER = 1;
        /// Keep the preview window on top.
        const ON_TOP = 2;
        /// Overlay the Zernike radius.
        const SHOW_ZERNIKE_RADIUS = 4;
        /// Overlay the wavefront compensation.
        const SHOW_WAVEFRONT_COMPENSATION = 8;
    }
}

/// Open connection to a HOLOEYE SLM.
///
/// Exclusively owns the device; the SDK connection is released in `Drop`.
pub struct HoloeyeSlm {
    api: ffi::SdkApi,
    height: u32,
    width: u32,
}

impl HoloeyeSlm {
    /// Load the SDK, check its version and open the device.
    ///
    /// Fails with [`SlmError::Device`] when the SDK library is not
    /// installed, too old, or cannot find a connected panel.
    pub fn open() -> Result<Self, SlmError> {
        let api = ffi::load()?;

        // SAFETY: the SDK is loaded and the call takes no arguments.
        let version = unsafe { (api.version_major)() };
        if version < REQUIRED_SDK_MAJOR as c_int {
            return Err(SlmError::Device {
                code: version,
                message: format!(
                    "SLM Display SDK major version {version} installed, \
                     {REQUIRED_SDK_MAJOR} or newer required"
                ),
            });
        }

        // SAFETY: as above.
        let code = unsafe { (api.open)() };
        check(&api, code)?;

        // SAFETY: the device is open, so the panel geometry is known.
        let height = unsafe { (api.height_px)() }.max(0) as u32;
        let width = unsafe { (api.width_px)() }.max(0) as u32;

        info!(version, height, width, "SLM device opened");
        Ok(Self { api, height, width })
    }

    /// Open the SDK's preview window.
    ///
    /// `scale` 0.0 fits the preview to the window; 1.0 maps one screen
    /// pixel to one SLM pixel (downsampling interpolation can make scaled
    /// previews look very different from the actual panel content).
    pub fn open_preview(&mut self, scale: f64, flags: PreviewFlags) -> Result<(), SlmError> {
        debug!(scale, ?flags, "opening SLM preview window");
        // SAFETY: the device is open for the lifetime of `self`.
        let code = unsafe { (self.api.preview_open)(scale, flags.bits()) };
        check(&self.api, code)
    }
}

/// Translate a nonzero SDK return code through the SDK's error strings.
fn check(api: &ffi::SdkApi, code: c_int) -> Result<(), SlmError> {
    if code == 0 {
        return Ok(());
    }
    // SAFETY: the SDK returns a pointer to a static NUL-terminated string
    // for every error code, or NULL for codes it does not know.
    let message = unsafe {
        let ptr = (api.error_string)(code);
        if ptr.is_null() {
            "unknown SDK error".to_string()
        } else {
            CStr::from_ptr(ptr).to_string_lossy().into_owned()
        }
    };
    Err(SlmError::Device { code, message })
}

impl SlmDevice for HoloeyeSlm {
    fn show_from_file(&mut self, path: &Path, flags: ShowFlags) -> Result<(), SlmError> {
        let utf8 = path.to_str().ok_or_else(|| {
            SlmError::UnsupportedFrame(format!("path is not valid UTF-8: {}", path.display()))
        })?;
        let c_path = CString::new(utf8).map_err(|_| {
            SlmError::UnsupportedFrame(format!("path contains a NUL byte: {utf8}"))
        })?;

        debug!(path = utf8, "showing data from file");
        // SAFETY: `c_path` outlives the call; the SDK decodes the file
        // before returning.
        let code = unsafe { (self.api.show_data_from_file)(c_path.as_ptr(), flags.bits()) };
        check(&self.api, code)
    }

    fn show_mask(&mut self, mask: &PhaseMask, flags: ShowFlags) -> Result<(), SlmError> {
        let (height, width) = mask.shape();
        debug!(height, width, "showing phase mask");
        // SAFETY: PhaseMask guarantees data().len() == height * width; the
        // SDK copies the buffer before returning.
        let code = unsafe {
            (self.api.show_data)(
                mask.data().as_ptr(),
                height as c_int,
                width as c_int,
                flags.bits(),
            )
        };
        check(&self.api, code)
    }

    fn resolution(&self) -> (u32, u32) {
        (self.height, self.width)
    }
}

impl Drop for HoloeyeSlm {
    fn drop(&mut self) {
        // SAFETY: open() succeeded exactly once for this handle.
        unsafe { (self.api.close)() };
        debug!("SLM device closed");
    }
}
