//! In-memory image buffers.
//!
//! An [`ImageBuffer`] is an interleaved, row-major grid of samples with either
//! one (gray) or three (RGB) channels. Samples are 8-bit while an image is
//! displayable; transforms whose results leave the [0, 255] range (noise
//! generators, derivative filters) produce `f64` samples instead, which must
//! go through [`crate::normalize`] before display or encoding.

use image::{ColorType, DynamicImage, GrayImage, RgbImage};
use thiserror::Error;

/// Errors raised when constructing a buffer from raw parts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Sample vector length doesn't match `width * height * channels`.
    #[error("Invalid sample data: expected {expected} samples, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Channel count other than 1 or 3.
    #[error("Unsupported channel count: {0} (expected 1 or 3)")]
    UnsupportedChannels(u8),
}

/// Number of interleaved channels per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channels {
    Gray,
    Rgb,
}

impl Channels {
    /// Channel count as a number.
    #[inline]
    pub fn count(self) -> usize {
        match self {
            Channels::Gray => 1,
            Channels::Rgb => 3,
        }
    }
}

impl TryFrom<u8> for Channels {
    type Error = BufferError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Channels::Gray),
            3 => Ok(Channels::Rgb),
            other => Err(BufferError::UnsupportedChannels(other)),
        }
    }
}

/// Sample storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// Displayable 8-bit samples.
    U8(Vec<u8>),
    /// Extended-range samples; may be negative or exceed 255.
    F64(Vec<f64>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::U8(v) => v.len(),
            Samples::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A validated image buffer.
///
/// Fields are private so the size invariant can't be broken after
/// construction. Transforms build new buffers instead of mutating.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    channels: Channels,
    samples: Samples,
}

impl ImageBuffer {
    /// Build a buffer from raw parts, checking dimensions and length.
    pub fn new(
        width: u32,
        height: u32,
        channels: Channels,
        samples: Samples,
    ) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * channels.count();
        if samples.len() != expected {
            return Err(BufferError::LengthMismatch {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Build an 8-bit buffer.
    pub fn from_u8(
        width: u32,
        height: u32,
        channels: Channels,
        samples: Vec<u8>,
    ) -> Result<Self, BufferError> {
        Self::new(width, height, channels, Samples::U8(samples))
    }

    /// Build an extended-range buffer.
    pub fn from_f64(
        width: u32,
        height: u32,
        channels: Channels,
        samples: Vec<f64>,
    ) -> Result<Self, BufferError> {
        Self::new(width, height, channels, Samples::F64(samples))
    }

    /// Internal constructor for transforms that already guarantee the
    /// invariants (same geometry as a validated input).
    pub(crate) fn with_geometry_of(other: &ImageBuffer, channels: Channels, samples: Samples) -> Self {
        debug_assert_eq!(
            samples.len(),
            other.pixel_count() * channels.count(),
            "Sample buffer size mismatch"
        );
        Self {
            width: other.width,
            height: other.height,
            channels,
            samples,
        }
    }

    /// Convert a decoded image into a buffer.
    ///
    /// Gray images (with or without alpha) become [`Channels::Gray`]; all
    /// others are converted to 8-bit RGB. Alpha is discarded and deeper
    /// bit depths are reduced to 8 bits.
    pub fn from_dynamic(img: DynamicImage) -> Result<Self, BufferError> {
        let (width, height) = (img.width(), img.height());
        if width == 0 || height == 0 {
            return Err(BufferError::InvalidDimensions { width, height });
        }
        let is_gray = matches!(
            img.color(),
            ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16
        );
        if is_gray {
            Ok(Self::from_gray_image(img.into_luma8()))
        } else {
            Ok(Self::from_rgb_image(img.into_rgb8()))
        }
    }

    /// Wrap an `image::RgbImage` without copying.
    pub fn from_rgb_image(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            channels: Channels::Rgb,
            samples: Samples::U8(img.into_raw()),
        }
    }

    /// Wrap an `image::GrayImage` without copying.
    pub fn from_gray_image(img: GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            channels: Channels::Gray,
            samples: Samples::U8(img.into_raw()),
        }
    }

    /// Convert to a `DynamicImage` for resampling or encoding.
    ///
    /// Returns `None` for extended-range buffers; normalize them first.
    pub fn to_dynamic(&self) -> Option<DynamicImage> {
        let data = self.as_u8()?.to_vec();
        match self.channels {
            Channels::Gray => {
                GrayImage::from_raw(self.width, self.height, data).map(DynamicImage::ImageLuma8)
            }
            Channels::Rgb => {
                RgbImage::from_raw(self.width, self.height, data).map(DynamicImage::ImageRgb8)
            }
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Total number of samples (`pixels * channels`).
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Whether samples are already 8-bit.
    pub fn is_displayable(&self) -> bool {
        matches!(self.samples, Samples::U8(_))
    }

    /// Borrow 8-bit samples, if this buffer is displayable.
    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.samples {
            Samples::U8(v) => Some(v),
            Samples::F64(_) => None,
        }
    }

    /// Borrow extended-range samples, if present.
    pub fn as_f64(&self) -> Option<&[f64]> {
        match &self.samples {
            Samples::U8(_) => None,
            Samples::F64(v) => Some(v),
        }
    }

    /// Copy all samples out as `f64`.
    pub fn to_f64_samples(&self) -> Vec<f64> {
        match &self.samples {
            Samples::U8(v) => v.iter().map(|&s| s as f64).collect(),
            Samples::F64(v) => v.clone(),
        }
    }

    /// Copy all samples out as `u8`, rounding and saturating.
    pub fn to_u8_saturated(&self) -> Vec<u8> {
        match &self.samples {
            Samples::U8(v) => v.clone(),
            Samples::F64(v) => v.iter().map(|&s| saturate_u8(s)).collect(),
        }
    }
}

/// Round to nearest and clamp into `u8` range. NaN maps to 0.
#[inline]
pub fn saturate_u8(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}
