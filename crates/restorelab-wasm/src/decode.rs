//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode a PNG, JPEG, BMP or TIFF file from bytes
//! - [`fit_dimensions`] - Compute the display-bounded size of an image
//! - [`resize_to_fit`] - Resize an image into a bounding box, preserving aspect ratio
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, resize_to_fit } from '@restorelab/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const shown = resize_to_fit(image, 400, 400, 1); // Bilinear
//! ```

use crate::types::{filter_from_u8, js_error, JsImage};
use restorelab_core::decode;
use wasm_bindgen::prelude::*;

/// Decode an image from bytes.
///
/// Gray inputs stay single-channel; everything else becomes 8-bit RGB.
///
/// # Errors
///
/// Returns an error if the format is unknown or the data is corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsImage, JsValue> {
    decode::decode_image(bytes)
        .map(|buffer| JsImage::from_buffer(&buffer))
        .map_err(js_error)
}

/// Size an image would be shown at inside a `max_width x max_height` box.
///
/// Returns `[width, height]`.
#[wasm_bindgen]
pub fn fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> Vec<u32> {
    let (w, h) = decode::fit_dimensions(width, height, max_width, max_height);
    vec![w, h]
}

/// Resize an image to fit a bounding box.
///
/// # Arguments
///
/// * `filter` - 0 = Nearest, 1 = Bilinear, 2 = Lanczos3
#[wasm_bindgen]
pub fn resize_to_fit(
    image: &JsImage,
    max_width: u32,
    max_height: u32,
    filter: u8,
) -> Result<JsImage, JsValue> {
    let buffer = image.to_buffer().map_err(js_error)?;
    decode::resize_to_fit(&buffer, max_width, max_height, filter_from_u8(filter))
        .map(|resized| JsImage::from_buffer(&resized))
        .map_err(js_error)
}
