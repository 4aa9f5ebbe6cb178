//! RestoreLab WASM - WebAssembly bindings for RestoreLab
//!
//! This crate exposes the restorelab-core pipeline to JavaScript/TypeScript
//! front ends.
//!
//! # Module Structure
//!
//! - `session` - The editing session: load, apply, preview, export
//! - `transform` - The operation catalog for building menus
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding and display resizing
//! - `encode` - PNG/JPEG encoding
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsSession, list_operations } from '@restorelab/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new JsSession(undefined);
//! const original = session.load(new Uint8Array(await file.arrayBuffer()));
//! const result = session.apply('canny', undefined);
//! draw(result.preview.image.to_rgba());
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod session;
mod transform;
mod types;

pub use decode::{decode_image, fit_dimensions, resize_to_fit};
pub use encode::{encode_jpeg, encode_png};
pub use session::{JsApplyResult, JsPreview, JsSession};
pub use transform::{list_operations, operation_ids};
pub use types::JsImage;

/// Runs once when the module is instantiated.
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&format!("restorelab-wasm {} ready", version()).into());
}

/// Crate version, shown in the front end's about box.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
