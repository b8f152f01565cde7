//! Runtime binding to the SLM Display SDK shared library.
//!
//! The SDK ships with the device software as a proprietary shared library;
//! it is discovered and loaded at runtime so builds and tests never need
//! the vendor toolchain. A missing library surfaces as a clean device
//! error at open time, not a link failure.

use std::env;
use std::ffi::{c_char, c_double, c_int, c_uint};

use libloading::Library;

use phasedeck_core::error::SlmError;

/// Error code used for failures that happen before the SDK can produce one
/// (library or symbol not found).
pub(crate) const LOAD_ERROR_CODE: i32 = -1;

/// Overrides library discovery with an explicit path.
pub(crate) const LIBRARY_ENV_OVERRIDE: &str = "HOLOEYE_SDK_LIBRARY";

#[cfg(target_os = "windows")]
const LIBRARY_CANDIDATES: &[&str] = &["holoeye_slmdisplaysdk.dll"];
#[cfg(target_os = "macos")]
const LIBRARY_CANDIDATES: &[&str] = &["libholoeye_slmdisplaysdk.dylib"];
#[cfg(all(unix, not(target_os = "macos")))]
const LIBRARY_CANDIDATES: &[&str] = &["libholoeye_slmdisplaysdk.so"];

/// Resolved SDK entry points.
///
/// The function pointers are only valid while `_lib` is alive, which the
/// struct guarantees by owning it.
pub(crate) struct SdkApi {
    pub version_major: unsafe extern "C" fn() -> c_int,
    pub open: unsafe extern "C" fn() -> c_int,
    pub close: unsafe extern "C" fn(),
    pub height_px: unsafe extern "C" fn() -> c_int,
    pub width_px: unsafe extern "C" fn() -> c_int,
    pub show_data_from_file: unsafe extern "C" fn(*const c_char, c_uint) -> c_int,
    pub show_data: unsafe extern "C" fn(*const u8, c_int, c_int, c_uint) -> c_int,
    pub preview_open: unsafe extern "C" fn(c_double, c_uint) -> c_int,
    pub error_string: unsafe extern "C" fn(c_int) -> *const c_char,
    _lib: Library,
}

fn open_library() -> Result<Library, libloading::Error> {
    if let Ok(path) = env::var(LIBRARY_ENV_OVERRIDE) {
        // SAFETY: loading the vendor SDK runs its library initializers,
        // which is the documented way to start it.
        return unsafe { Library::new(path) };
    }
    let mut result = unsafe { Library::new(LIBRARY_CANDIDATES[0]) };
    for name in &LIBRARY_CANDIDATES[1..] {
        if result.is_ok() {
            break;
        }
        result = unsafe { Library::new(name) };
    }
    result
}

fn missing_symbol(err: libloading::Error) -> SlmError {
    SlmError::Device {
        code: LOAD_ERROR_CODE,
        message: format!("SDK library is missing a required symbol: {err}"),
    }
}

/// Load the SDK library and resolve every entry point the wrapper needs.
pub(crate) fn load() -> Result<SdkApi, SlmError> {
    let lib = open_library().map_err(|err| SlmError::Device {
        code: LOAD_ERROR_CODE,
        message: format!("could not load the SLM Display SDK library: {err}"),
    })?;

    // SAFETY: signatures mirror the SDK's C API; the pointers are copied
    // out of the Symbol guards and stay valid for as long as the library,
    // which SdkApi owns.
    unsafe {
        let version_major = *lib
            .get::<unsafe extern "C" fn() -> c_int>(b"heds_info_version_major\0")
            .map_err(missing_symbol)?;
        let open = *lib
            .get::<unsafe extern "C" fn() -> c_int>(b"heds_slm_open\0")
            .map_err(missing_symbol)?;
        let close = *lib
            .get::<unsafe extern "C" fn()>(b"heds_slm_close\0")
            .map_err(missing_symbol)?;
        let height_px = *lib
            .get::<unsafe extern "C" fn() -> c_int>(b"heds_slm_height_px\0")
            .map_err(missing_symbol)?;
        let width_px = *lib
            .get::<unsafe extern "C" fn() -> c_int>(b"heds_slm_width_px\0")
            .map_err(missing_symbol)?;
        let show_data_from_file = *lib
            .get::<unsafe extern "C" fn(*const c_char, c_uint) -> c_int>(
                b"heds_slm_show_data_from_file\0",
            )
            .map_err(missing_symbol)?;
        let show_data = *lib
            .get::<unsafe extern "C" fn(*const u8, c_int, c_int, c_uint) -> c_int>(
                b"heds_slm_show_data\0",
            )
            .map_err(missing_symbol)?;
        let preview_open = *lib
            .get::<unsafe extern "C" fn(c_double, c_uint) -> c_int>(b"heds_slm_preview_open\0")
            .map_err(missing_symbol)?;
        let error_string = *lib
            .get::<unsafe extern "C" fn(c_int) -> *const c_char>(b"heds_error_string\0")
            .map_err(missing_symbol)?;

        Ok(SdkApi {
            version_major,
            open,
            close,
            height_px,
            width_px,
            show_data_from_file,
            show_data,
            preview_open,
            error_string,
            _lib: lib,
        })
    }
}
