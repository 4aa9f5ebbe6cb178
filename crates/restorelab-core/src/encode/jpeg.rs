//! JPEG encoding with configurable quality.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::EncodeError;
use crate::buffer::{Channels, ImageBuffer};

/// Encode a displayable buffer to JPEG bytes.
///
/// `quality` is clamped to 1-100.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 60-80: Medium quality, acceptable for sharing
/// * Below 60: Low quality, visible artifacts
///
/// # Errors
///
/// `EncodeError::NotDisplayable` for extended-range buffers.
pub fn encode_jpeg(buffer: &ImageBuffer, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let pixels = buffer.as_u8().ok_or(EncodeError::NotDisplayable)?;
    let color = match buffer.channels() {
        Channels::Gray => ExtendedColorType::L8,
        Channels::Rgb => ExtendedColorType::Rgb8,
    };

    let quality = quality.clamp(1, 100);
    let mut out = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut out, quality);

    encoder
        .write_image(pixels, buffer.width(), buffer.height(), color)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(out.into_inner())
}
