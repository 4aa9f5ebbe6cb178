//! Decoding of image files into [`ImageBuffer`]s.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::ImageReader;

use super::DecodeError;
use crate::buffer::ImageBuffer;

/// Decode an encoded image (PNG, JPEG, BMP, TIFF) from bytes.
///
/// The format is detected from the content. Gray inputs stay single-channel,
/// everything else becomes 8-bit RGB.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format can't be recognized,
/// `DecodeError::CorruptedFile` if decoding fails.
pub fn decode_image(bytes: &[u8]) -> Result<ImageBuffer, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    ImageBuffer::from_dynamic(img).map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// Read and decode an image file from disk.
pub fn open_image(path: &Path) -> Result<ImageBuffer, DecodeError> {
    let bytes = fs::read(path).map_err(|e| DecodeError::IoError(format!("{}: {}", path.display(), e)))?;
    decode_image(&bytes)
}
