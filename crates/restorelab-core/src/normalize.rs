//! Conversion of extended-range buffers to displayable 8-bit buffers.
//!
//! Transforms never clip their own output; this is the single place where
//! samples are brought into [0, 255], right before persisting, encoding or
//! displaying.

use serde::{Deserialize, Serialize};

use crate::buffer::{saturate_u8, ImageBuffer, Samples};

/// How extended-range samples are mapped to 8 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// Round and saturate each sample to [0, 255].
    ///
    /// Keeps noise outputs visually faithful to the source, and shows
    /// derivative filters the way 8-bit viewers usually do (negative
    /// responses black).
    #[default]
    Clamp,
    /// Linearly map the buffer's min..max onto 0..255.
    ///
    /// Reveals the full response of derivative filters, at the cost of
    /// shifting the overall brightness of noise outputs.
    Stretch,
}

/// Produce a displayable copy of `buffer`.
///
/// Buffers that are already 8-bit are returned as a clone regardless of the
/// mode. Non-finite samples map to 0.
pub fn to_displayable(buffer: &ImageBuffer, mode: Normalization) -> ImageBuffer {
    let samples = match buffer.samples() {
        Samples::U8(v) => v.clone(),
        Samples::F64(v) => match mode {
            Normalization::Clamp => v.iter().map(|&s| saturate_u8(finite_or_zero(s))).collect(),
            Normalization::Stretch => stretch(v),
        },
    };
    ImageBuffer::with_geometry_of(buffer, buffer.channels(), Samples::U8(samples))
}

#[inline]
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn stretch(samples: &[f64]) -> Vec<u8> {
    let (min, max) = samples
        .iter()
        .copied()
        .filter(|s| s.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s), hi.max(s))
        });

    if !min.is_finite() || !max.is_finite() {
        return vec![0; samples.len()];
    }

    let range = max - min;
    if range <= f64::EPSILON {
        // Flat image: nothing to stretch
        let flat = saturate_u8(min);
        return vec![flat; samples.len()];
    }

    samples
        .iter()
        .map(|&s| {
            if s.is_finite() {
                saturate_u8((s - min) * 255.0 / range)
            } else {
                0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::test_support::gradient_rgb;
    use crate::buffer::Channels;

    fn f64_gray(values: Vec<f64>) -> ImageBuffer {
        let n = values.len() as u32;
        ImageBuffer::from_f64(n, 1, Channels::Gray, values).unwrap()
    }

    #[test]
    fn test_u8_passthrough() {
        let img = gradient_rgb(6, 3);
        assert_eq!(to_displayable(&img, Normalization::Clamp), img);
        assert_eq!(to_displayable(&img, Normalization::Stretch), img);
    }

    #[test]
    fn test_clamp_saturates() {
        let img = f64_gray(vec![-20.0, 0.4, 127.5, 300.0]);
        let out = to_displayable(&img, Normalization::Clamp);
        assert_eq!(out.as_u8().unwrap(), &[0, 0, 128, 255]);
    }

    #[test]
    fn test_stretch_maps_min_max() {
        let img = f64_gray(vec![-100.0, 0.0, 100.0]);
        let out = to_displayable(&img, Normalization::Stretch);
        assert_eq!(out.as_u8().unwrap(), &[0, 128, 255]);
    }

    #[test]
    fn test_stretch_flat_image() {
        let img = f64_gray(vec![12.0, 12.0]);
        let out = to_displayable(&img, Normalization::Stretch);
        assert_eq!(out.as_u8().unwrap(), &[12, 12]);
    }

    #[test]
    fn test_non_finite_samples_map_to_zero() {
        let img = f64_gray(vec![f64::NAN, f64::INFINITY, 10.0, 20.0]);
        assert_eq!(
            to_displayable(&img, Normalization::Clamp).as_u8().unwrap(),
            &[0, 0, 10, 20]
        );
        assert_eq!(
            to_displayable(&img, Normalization::Stretch).as_u8().unwrap(),
            &[0, 0, 0, 255]
        );
    }

    #[test]
    fn test_preserves_geometry() {
        let img = ImageBuffer::from_f64(2, 3, Channels::Rgb, vec![1.0; 18]).unwrap();
        let out = to_displayable(&img, Normalization::Clamp);
        assert_eq!(out.dimensions(), (2, 3));
        assert_eq!(out.channels(), Channels::Rgb);
        assert!(out.is_displayable());
    }
}
