//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core RestoreLab
//! buffers, handling the conversion between Rust and JavaScript data
//! representations.

use restorelab_core::decode::FilterType;
use restorelab_core::{BufferError, Channels, ImageBuffer};
use wasm_bindgen::prelude::*;

/// An 8-bit image for JavaScript.
///
/// `channels` is 1 (gray) or 3 (RGB); pixels are interleaved row-major.
/// Extended-range results are normalized before they reach this type.
/// Pixels live in wasm memory; every accessor hands JS a copy.
#[wasm_bindgen]
#[derive(Clone)]
pub struct JsImage {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsImage {
    /// Create an image from dimensions, channel count and pixel data.
    ///
    /// The data is validated when the image is handed to the pipeline.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> JsImage {
        JsImage {
            width,
            height,
            channels,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// 1 for gray, 3 for RGB
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Expand to RGBA for `ImageData` / canvas drawing.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        match self.channels {
            1 => {
                for &v in &self.pixels {
                    out.extend_from_slice(&[v, v, v, 255]);
                }
            }
            _ => {
                for px in self.pixels.chunks_exact(3) {
                    out.extend_from_slice(&[px[0], px[1], px[2], 255]);
                }
            }
        }
        out
    }

    /// Release the pixel memory now instead of waiting for the finalizer.
    pub fn free(self) {}
}

impl JsImage {
    /// Wrap a core buffer, saturating extended-range samples.
    pub(crate) fn from_buffer(buffer: &ImageBuffer) -> Self {
        Self {
            width: buffer.width(),
            height: buffer.height(),
            channels: buffer.channels().count() as u8,
            pixels: buffer.to_u8_saturated(),
        }
    }

    /// Convert back to a validated core buffer. Copies the pixel data.
    pub(crate) fn to_buffer(&self) -> Result<ImageBuffer, BufferError> {
        let channels = Channels::try_from(self.channels)?;
        ImageBuffer::from_u8(self.width, self.height, channels, self.pixels.clone())
    }
}

/// Filter code from JS: 0 nearest, 2 lanczos3, anything else bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}

/// Map any displayable error onto the JS side.
pub(crate) fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
