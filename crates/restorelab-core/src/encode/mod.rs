//! Image encoding for saving and preview persistence.
//!
//! This module provides functionality for:
//! - Encoding displayable buffers to PNG, JPEG, BMP or TIFF
//! - Choosing the output format from a file extension
//! - Writing encoded images to disk
//!
//! Only 8-bit buffers can be encoded; extended-range results go through
//! [`crate::normalize`] first.
//!
//! # Examples
//!
//! ```ignore
//! use restorelab_core::encode::save_image;
//!
//! let written = save_image(&buffer, Path::new("image"), 90)?;
//! assert!(written.ends_with("image.png"));
//! ```

mod file;
mod jpeg;
mod types;

pub use file::{encode, encode_png, output_path, save_image};
pub use jpeg::encode_jpeg;
pub use types::{EncodeError, OutputFormat};
