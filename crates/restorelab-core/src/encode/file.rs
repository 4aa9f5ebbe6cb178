//! Format dispatch and writing encoded images to disk.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use super::{encode_jpeg, EncodeError, OutputFormat};
use crate::buffer::ImageBuffer;

/// Encode a displayable buffer in `format`.
///
/// `jpeg_quality` is only used for [`OutputFormat::Jpeg`].
pub fn encode(
    buffer: &ImageBuffer,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if format == OutputFormat::Jpeg {
        return encode_jpeg(buffer, jpeg_quality);
    }

    let img = buffer.to_dynamic().ok_or(EncodeError::NotDisplayable)?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format.to_image_format())
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
    Ok(out.into_inner())
}

/// Encode a displayable buffer as PNG.
pub fn encode_png(buffer: &ImageBuffer) -> Result<Vec<u8>, EncodeError> {
    encode(buffer, OutputFormat::Png, 0)
}

/// Resolve the path an image is actually written to.
///
/// A path without an extension gets `.png` appended.
pub fn output_path(path: &Path) -> Result<(PathBuf, OutputFormat), EncodeError> {
    match OutputFormat::from_path(path)? {
        Some(format) => Ok((path.to_path_buf(), format)),
        None => Ok((path.with_extension(OutputFormat::Png.extension()), OutputFormat::Png)),
    }
}

/// Encode `buffer` according to `path`'s extension and write it.
///
/// Returns the path written, which differs from `path` when `.png` was
/// appended.
pub fn save_image(
    buffer: &ImageBuffer,
    path: &Path,
    jpeg_quality: u8,
) -> Result<PathBuf, EncodeError> {
    let (target, format) = output_path(path)?;
    let bytes = encode(buffer, format, jpeg_quality)?;
    fs::write(&target, bytes)
        .map_err(|e| EncodeError::IoError(format!("{}: {}", target.display(), e)))?;
    Ok(target)
}
