//! Core types for image encoding.

use std::path::Path;

use image::ImageFormat;
use thiserror::Error;

/// Errors that can occur while encoding or writing an image.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Extended-range samples must be normalized before encoding
    #[error("Buffer holds extended-range samples; normalize it before encoding")]
    NotDisplayable,

    /// The file extension doesn't map to a supported format
    #[error("Unsupported output format: .{0}")]
    UnsupportedFormat(String),

    /// The codec rejected the data
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// I/O error while writing the file
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Formats an image can be saved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
    Tiff,
}

impl OutputFormat {
    /// Pick a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Result<Self, EncodeError> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "bmp" => Ok(OutputFormat::Bmp),
            "tif" | "tiff" => Ok(OutputFormat::Tiff),
            _ => Err(EncodeError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Format implied by `path`; `None` when the path has no extension.
    pub fn from_path(path: &Path) -> Result<Option<Self>, EncodeError> {
        path.extension()
            .map(|ext| Self::from_extension(&ext.to_string_lossy()))
            .transpose()
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tiff => "tiff",
        }
    }

    pub(crate) fn to_image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Tiff => ImageFormat::Tiff,
        }
    }
}
