//! Frame payloads accepted by the presentation loop.
//!
//! A frame is either a reference to image data on disk (decoded inside the
//! vendor SDK) or an in-memory 2-D pixel buffer. Frames are read-only once
//! handed to the loop.

use std::fmt;
use std::path::PathBuf;

use image::GrayImage;

use crate::error::SlmError;

/// In-memory 8-bit phase mask, row-major, `height * width` bytes.
///
/// Shape is validated on construction, so every existing mask is
/// displayable.
#[derive(Clone, PartialEq, Eq)]
pub struct PhaseMask {
    height: u32,
    width: u32,
    data: Vec<u8>,
}

impl PhaseMask {
    /// Create a mask from raw row-major bytes.
    ///
    /// Rejects empty buffers and shape/length mismatches with
    /// [`SlmError::UnsupportedFrame`].
    pub fn new(height: u32, width: u32, data: Vec<u8>) -> Result<Self, SlmError> {
        if height == 0 || width == 0 || data.is_empty() {
            return Err(SlmError::UnsupportedFrame(
                "empty phase mask".to_string(),
            ));
        }
        let expected = height as usize * width as usize;
        if data.len() != expected {
            return Err(SlmError::UnsupportedFrame(format!(
                "phase mask is {}x{} but carries {} bytes (expected {})",
                height,
                width,
                data.len(),
                expected
            )));
        }
        Ok(Self {
            height,
            width,
            data,
        })
    }

    /// Uniform mask, useful for blanking the display.
    pub fn filled(height: u32, width: u32, value: u8) -> Result<Self, SlmError> {
        Self::new(height, width, vec![value; height as usize * width as usize])
    }

    /// (height, width) in pixels.
    pub fn shape(&self) -> (u32, u32) {
        (self.height, self.width)
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raw row-major pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for PhaseMask {
    // Masks are megapixel-sized; don't dump pixels into logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseMask")
            .field("height", &self.height)
            .field("width", &self.width)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl TryFrom<GrayImage> for PhaseMask {
    type Error = SlmError;

    /// Fails on zero-sized images; `GrayImage` permits 0x0.
    fn try_from(img: GrayImage) -> Result<Self, SlmError> {
        let (width, height) = img.dimensions();
        Self::new(height, width, img.into_raw())
    }
}

/// A single displayable frame.
#[derive(Debug, Clone)]
pub enum Frame {
    /// Image file on persistent storage; decoding is delegated to the SDK.
    File(PathBuf),
    /// In-memory phase mask.
    Mask(PhaseMask),
}

impl Frame {
    /// Short label for log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Mask(_) => "mask",
        }
    }

    /// Check that the payload is displayable.
    ///
    /// Runs synchronously before any device call; a failure here means the
    /// device was never touched for this frame.
    pub fn validate(&self) -> Result<(), SlmError> {
        match self {
            Self::File(path) => {
                if path.as_os_str().is_empty() {
                    return Err(SlmError::UnsupportedFrame(
                        "empty file path".to_string(),
                    ));
                }
                Ok(())
            }
            // Shape invariants are enforced by the PhaseMask constructor.
            Self::Mask(_) => Ok(()),
        }
    }
}

impl From<PathBuf> for Frame {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<PhaseMask> for Frame {
    fn from(mask: PhaseMask) -> Self {
        Self::Mask(mask)
    }
}

impl TryFrom<GrayImage> for Frame {
    type Error = SlmError;

    fn try_from(img: GrayImage) -> Result<Self, SlmError> {
        PhaseMask::try_from(img).map(Self::Mask)
    }
}
