//! Decoding errors and preview resampling filters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// Bytes are empty or not a recognizable image.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// Recognized, but the decoder gave up partway.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    #[error("I/O error: {0}")]
    IoError(String),

    /// Zero target size, or samples that are not 8-bit.
    #[error("Cannot resize image: {0}")]
    ResizeFailed(String),
}

/// Resampling filter used when fitting a buffer into the preview pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Nearest,
    /// Triangle filter; a good default for downscaled previews.
    #[default]
    Bilinear,
    Lanczos3,
}

impl FilterType {
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        use image::imageops::FilterType as Image;
        match self {
            FilterType::Nearest => Image::Nearest,
            FilterType::Bilinear => Image::Triangle,
            FilterType::Lanczos3 => Image::Lanczos3,
        }
    }
}
