//! Image decoding and display resampling for RestoreLab.
//!
//! This module provides functionality for:
//! - Decoding PNG, JPEG, BMP and TIFF files into [`ImageBuffer`](crate::buffer::ImageBuffer)s
//! - Computing display-bounded sizes for the preview pane
//! - Resizing buffers for on-screen rendering
//!
//! All operations are synchronous and single-threaded.
//!
//! # Examples
//!
//! ```ignore
//! use restorelab_core::decode::{decode_image, resize_to_fit, FilterType};
//!
//! let bytes = std::fs::read("photo.png").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! let shown = resize_to_fit(&image, 400, 400, FilterType::Bilinear).unwrap();
//! ```

mod file;
mod resize;
mod types;

pub use file::{decode_image, open_image};
pub use resize::{fit_dimensions, resize, resize_to_fit};
pub use types::{DecodeError, FilterType};
