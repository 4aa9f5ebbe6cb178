//! Per-pixel color transforms: grayscale conversion and negative.

use crate::buffer::{Channels, ImageBuffer, Samples};
use crate::luminance::{luma, luma_u8};

/// Convert to a single-channel luma image.
///
/// Gray input is copied as is. 8-bit RGB is converted with rounding;
/// extended-range RGB keeps full precision.
pub fn grayscale(image: &ImageBuffer) -> ImageBuffer {
    if image.channels() == Channels::Gray {
        return image.clone();
    }

    let samples = match image.samples() {
        Samples::U8(v) => Samples::U8(
            v.chunks_exact(3)
                .map(|px| luma_u8(px[0], px[1], px[2]))
                .collect(),
        ),
        Samples::F64(v) => Samples::F64(
            v.chunks_exact(3)
                .map(|px| luma(px[0], px[1], px[2]))
                .collect(),
        ),
    };

    ImageBuffer::with_geometry_of(image, Channels::Gray, samples)
}

/// Invert every sample: `255 - x`.
///
/// On 8-bit data this is the bitwise complement, so applying it twice
/// restores the input exactly.
pub fn negative(image: &ImageBuffer) -> ImageBuffer {
    let samples = match image.samples() {
        Samples::U8(v) => Samples::U8(v.iter().map(|&s| !s).collect()),
        Samples::F64(v) => Samples::F64(v.iter().map(|&s| 255.0 - s).collect()),
    };
    ImageBuffer::with_geometry_of(image, image.channels(), samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::test_support::{gradient_rgb, solid_gray};

    #[test]
    fn test_grayscale_rgb_to_one_channel() {
        let img = gradient_rgb(8, 4);
        let gray = grayscale(&img);
        assert_eq!(gray.channels(), Channels::Gray);
        assert_eq!(gray.dimensions(), (8, 4));
        assert_eq!(gray.sample_count(), 32);
    }

    #[test]
    fn test_grayscale_gray_input_unchanged() {
        let img = solid_gray(3, 3, 99);
        assert_eq!(grayscale(&img), img);
    }

    #[test]
    fn test_grayscale_values() {
        let img =
            ImageBuffer::from_u8(3, 1, Channels::Rgb, vec![255, 0, 0, 0, 255, 0, 0, 0, 255])
                .unwrap();
        assert_eq!(grayscale(&img).as_u8().unwrap(), &[76, 150, 29]);
    }

    #[test]
    fn test_grayscale_extended_range() {
        let img = ImageBuffer::from_f64(1, 1, Channels::Rgb, vec![-10.0, -10.0, -10.0]).unwrap();
        let out = grayscale(&img);
        assert!((out.as_f64().unwrap()[0] + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_values() {
        let img = ImageBuffer::from_u8(3, 1, Channels::Gray, vec![0, 100, 255]).unwrap();
        assert_eq!(negative(&img).as_u8().unwrap(), &[255, 155, 0]);
    }

    #[test]
    fn test_negative_is_involutive() {
        let img = gradient_rgb(17, 5);
        assert_eq!(negative(&negative(&img)), img);
    }
}
