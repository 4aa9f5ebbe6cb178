//! Display-bounded resizing.
//!
//! The preview pane has a fixed box (400 x 400 by default). Images larger than
//! the box are shrunk preserving aspect ratio; smaller images are never
//! upscaled. All functions return new buffers without modifying the input.

use super::{DecodeError, FilterType};
use crate::buffer::ImageBuffer;

/// Compute the dimensions an image is shown at inside a `max_width x max_height` box.
///
/// The shrink is iterative and integer: while either side is too large, the
/// width is clamped first (scaling the height by `max_width / width` with
/// floor division), then the height (scaling the width the same way). For
/// images that exceed both bounds this can differ by a pixel from a single
/// uniform scale by the smaller ratio; the iterative order is kept so sizes
/// match the reference viewer exactly.
///
/// A side that floors to zero is raised to 1.
///
/// # Example
///
/// ```
/// use restorelab_core::decode::fit_dimensions;
///
/// assert_eq!(fit_dimensions(800, 400, 400, 400), (400, 200));
/// assert_eq!(fit_dimensions(300, 200, 400, 400), (300, 200));
/// ```
pub fn fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if max_width == 0 || max_height == 0 {
        return (width.min(max_width).max(1), height.min(max_height).max(1));
    }

    let (mut w, mut h) = (u64::from(width), u64::from(height));
    let (max_w, max_h) = (u64::from(max_width), u64::from(max_height));

    while w > max_w || h > max_h {
        if w > max_w {
            h = (h * max_w) / w;
            w = max_w;
        }
        if h > max_h {
            w = (w * max_h) / h;
            h = max_h;
        }
    }

    ((w as u32).max(1), (h as u32).max(1))
}

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::ResizeFailed` for zero target dimensions or for
/// extended-range buffers, which must be normalized first.
pub fn resize(
    image: &ImageBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<ImageBuffer, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::ResizeFailed(format!(
            "target dimensions {}x{} must be non-zero",
            width, height
        )));
    }

    // Fast path: if dimensions match, just clone
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }

    let dynamic = image.to_dynamic().ok_or_else(|| {
        DecodeError::ResizeFailed("extended-range buffer must be normalized first".to_string())
    })?;

    let resized = dynamic.resize_exact(width, height, filter.to_image_filter());

    ImageBuffer::from_dynamic(resized).map_err(|e| DecodeError::ResizeFailed(e.to_string()))
}

/// Resize an image to fit a `max_width x max_height` box.
///
/// Uses [`fit_dimensions`]; images already inside the box are returned
/// unchanged.
pub fn resize_to_fit(
    image: &ImageBuffer,
    max_width: u32,
    max_height: u32,
    filter: FilterType,
) -> Result<ImageBuffer, DecodeError> {
    if max_width == 0 || max_height == 0 {
        return Err(DecodeError::ResizeFailed(
            "bounding box must be non-zero".to_string(),
        ));
    }

    let (width, height) = fit_dimensions(image.width(), image.height(), max_width, max_height);
    resize(image, width, height, filter)
}
