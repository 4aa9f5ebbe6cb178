//! Image encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_png`] - Encode an image to PNG bytes
//! - [`encode_jpeg`] - Encode an image to JPEG bytes with a quality setting
//!
//! # Example
//!
//! ```typescript
//! import { encode_png } from '@restorelab/wasm';
//!
//! const png = encode_png(image);
//! const blob = new Blob([png], { type: 'image/png' });
//! ```

use crate::types::{js_error, JsImage};
use restorelab_core::encode;
use wasm_bindgen::prelude::*;

/// Encode an image to PNG bytes.
#[wasm_bindgen]
pub fn encode_png(image: &JsImage) -> Result<Vec<u8>, JsValue> {
    let buffer = image.to_buffer().map_err(js_error)?;
    encode::encode_png(&buffer).map_err(js_error)
}

/// Encode an image to JPEG bytes.
///
/// # Arguments
///
/// * `quality` - JPEG quality (1-100, recommended: 90)
#[wasm_bindgen]
pub fn encode_jpeg(image: &JsImage, quality: u8) -> Result<Vec<u8>, JsValue> {
    let buffer = image.to_buffer().map_err(js_error)?;
    encode::encode_jpeg(&buffer, quality).map_err(js_error)
}
