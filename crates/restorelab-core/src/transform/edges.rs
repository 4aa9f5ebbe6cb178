//! Derivative filters and edge detection.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::buffer::{ImageBuffer, Samples};

use super::border::{correlate, correlate_separable, Border};
use super::color::grayscale;

/// Aperture of the Sobel derivative.
pub const SOBEL_KERNEL_SIZE: usize = 5;

/// Lower hysteresis threshold for Canny.
pub const CANNY_LOW_THRESHOLD: f64 = 100.0;

/// Upper hysteresis threshold for Canny.
pub const CANNY_HIGH_THRESHOLD: f64 = 200.0;

const SOBEL5_DERIVATIVE: [f64; SOBEL_KERNEL_SIZE] = [-1.0, -2.0, 0.0, 2.0, 1.0];
const SOBEL5_SMOOTHING: [f64; SOBEL_KERNEL_SIZE] = [1.0, 4.0, 6.0, 4.0, 1.0];

#[rustfmt::skip]
const LAPLACIAN_3X3: [f64; 9] = [
    0.0,  1.0, 0.0,
    1.0, -4.0, 1.0,
    0.0,  1.0, 0.0,
];

/// Direction of the first derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SobelAxis {
    /// Horizontal gradient (responds to vertical edges).
    X,
    /// Vertical gradient (responds to horizontal edges).
    Y,
}

/// Second-derivative response with the 4-neighbour Laplacian.
///
/// Output is unclipped `f64`, same channels as the input.
pub fn laplacian(image: &ImageBuffer) -> ImageBuffer {
    let out = correlate(
        &image.to_f64_samples(),
        image.width() as usize,
        image.height() as usize,
        image.channels().count(),
        &LAPLACIAN_3X3,
        3,
        Border::Reflect101,
    );
    ImageBuffer::with_geometry_of(image, image.channels(), Samples::F64(out))
}

/// First derivative along `axis` with a 5-tap Sobel operator.
///
/// The derivative runs along `axis` and binomial smoothing across it.
/// Output is unclipped `f64`, same channels as the input.
pub fn sobel(image: &ImageBuffer, axis: SobelAxis) -> ImageBuffer {
    let (kx, ky) = match axis {
        SobelAxis::X => (&SOBEL5_DERIVATIVE, &SOBEL5_SMOOTHING),
        SobelAxis::Y => (&SOBEL5_SMOOTHING, &SOBEL5_DERIVATIVE),
    };
    let out = correlate_separable(
        &image.to_f64_samples(),
        image.width() as usize,
        image.height() as usize,
        image.channels().count(),
        kx,
        ky,
        Border::Reflect101,
    );
    ImageBuffer::with_geometry_of(image, image.channels(), Samples::F64(out))
}

/// Binary edge map: 255 on edges, 0 elsewhere.
///
/// Color input is reduced to luma first. Gradients below `low` are
/// discarded, above `high` kept, and in between kept only when connected
/// to a strong edge. Thresholds apply to imageproc's gradient magnitude,
/// which is taken after a Gaussian blur with sigma 1.4.
pub fn canny(image: &ImageBuffer, low: f64, high: f64) -> ImageBuffer {
    let gray = grayscale(image);
    let (width, height) = gray.dimensions();
    let luma = gray.to_u8_saturated();

    let edges = match GrayImage::from_raw(width, height, luma) {
        Some(input) => imageproc::edges::canny(&input, low as f32, high as f32).into_raw(),
        // Length is guaranteed by the buffer invariants
        None => vec![0; gray.pixel_count()],
    };

    ImageBuffer::with_geometry_of(&gray, gray.channels(), Samples::U8(edges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::test_support::{gradient_rgb, solid_gray};
    use crate::buffer::Channels;

    fn ramp(width: u32, height: u32, step: u8) -> ImageBuffer {
        let data = (0..height)
            .flat_map(|_| (0..width).map(move |x| x as u8 * step))
            .collect();
        ImageBuffer::from_u8(width, height, Channels::Gray, data).unwrap()
    }

    #[test]
    fn test_flat_image_has_no_derivative() {
        let img = solid_gray(7, 7, 90);
        for out in [laplacian(&img), sobel(&img, SobelAxis::X), sobel(&img, SobelAxis::Y)] {
            assert!(out.as_f64().unwrap().iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_sobel_x_on_horizontal_ramp() {
        let out = sobel(&ramp(10, 6, 10), SobelAxis::X);
        let px = out.as_f64().unwrap();
        // Unit slope gives 8 * 16 = 128 away from the borders
        for y in 0..6 {
            for x in 2..8 {
                assert!((px[y * 10 + x] - 1280.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_sobel_y_ignores_horizontal_ramp() {
        let out = sobel(&ramp(10, 6, 10), SobelAxis::Y);
        assert!(out.as_f64().unwrap().iter().all(|&v| v.abs() < 1e-9));
    }

    #[test]
    fn test_sobel_can_go_negative() {
        let data = (0..6)
            .flat_map(|_| (0..10u8).map(|x| 250 - x * 10))
            .collect();
        let img = ImageBuffer::from_u8(10, 6, Channels::Gray, data).unwrap();
        let out = sobel(&img, SobelAxis::X);
        assert!((out.as_f64().unwrap()[4] + 1280.0).abs() < 1e-9);
    }

    #[test]
    fn test_laplacian_impulse_response() {
        let mut data = vec![0u8; 25];
        data[12] = 100;
        let img = ImageBuffer::from_u8(5, 5, Channels::Gray, data).unwrap();
        let px = laplacian(&img);
        let px = px.as_f64().unwrap();
        assert_eq!(px[12], -400.0);
        assert_eq!(px[7], 100.0);
        assert_eq!(px[11], 100.0);
        assert_eq!(px[6], 0.0);
    }

    #[test]
    fn test_derivatives_keep_channels() {
        let img = gradient_rgb(8, 8);
        assert_eq!(laplacian(&img).channels(), Channels::Rgb);
        assert_eq!(sobel(&img, SobelAxis::Y).sample_count(), img.sample_count());
    }

    #[test]
    fn test_canny_binary_output() {
        // Vertical step edge between dark and bright halves
        let data: Vec<u8> = (0..400)
            .map(|i| if i % 20 < 10 { 10 } else { 240 })
            .collect();
        let img = ImageBuffer::from_u8(20, 20, Channels::Gray, data).unwrap();
        let out = canny(&img, CANNY_LOW_THRESHOLD, CANNY_HIGH_THRESHOLD);
        let px = out.as_u8().unwrap();

        assert_eq!(out.channels(), Channels::Gray);
        assert!(px.iter().all(|&v| v == 0 || v == 255));
        assert!(px.iter().any(|&v| v == 255), "step edge not detected");
        // Nothing far from the step
        for y in 0..20 {
            assert_eq!(px[y * 20 + 2], 0);
            assert_eq!(px[y * 20 + 17], 0);
        }
    }

    #[test]
    fn test_canny_flat_image_has_no_edges() {
        let out = canny(&solid_gray(12, 12, 200), 100.0, 200.0);
        assert!(out.as_u8().unwrap().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_canny_color_input_is_single_channel() {
        let out = canny(&gradient_rgb(16, 16), 100.0, 200.0);
        assert_eq!(out.channels(), Channels::Gray);
        assert_eq!(out.dimensions(), (16, 16));
    }
}
