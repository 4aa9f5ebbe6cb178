//! Smoothing filters: median, box mean and bilateral.

use crate::buffer::{saturate_u8, ImageBuffer, Samples};

use super::border::{correlate_separable, Border};

/// Side of the box used by [`average_blur`].
pub const AVERAGE_KERNEL_SIZE: usize = 5;

/// Neighbourhood diameter of the bilateral filter.
pub const BILATERAL_DIAMETER: u32 = 9;

/// Range (intensity) sigma of the bilateral filter.
pub const BILATERAL_SIGMA_COLOR: f64 = 75.0;

/// Spatial sigma of the bilateral filter.
pub const BILATERAL_SIGMA_SPACE: f64 = 75.0;

/// Replace every sample by the median of its `kernel x kernel` neighbourhood,
/// channel by channel.
///
/// Edges replicate the border sample. Output is always 8-bit; an
/// extended-range input is saturated first.
///
/// Uses a per-row sliding 256-bin histogram, so the cost per pixel is
/// `O(kernel)` rather than `O(kernel^2)`.
pub fn median_filter(image: &ImageBuffer, kernel: u32) -> ImageBuffer {
    let src = image.to_u8_saturated();
    let k = kernel.max(1) as usize;
    if k == 1 {
        return ImageBuffer::with_geometry_of(image, image.channels(), Samples::U8(src));
    }

    let width = image.width() as usize;
    let height = image.height() as usize;
    let channels = image.channels().count();
    let r = (k / 2) as i64;
    let half = (k * k / 2) as u32;
    let border = Border::Replicate;

    let at = |x: i64, y: i64, c: usize| -> u8 {
        let sx = border.index(x, width);
        let sy = border.index(y, height);
        src[(sy * width + sx) * channels + c]
    };

    let mut out = vec![0u8; src.len()];
    let mut hist = [0u32; 256];

    for c in 0..channels {
        for y in 0..height {
            let yi = y as i64;
            hist.fill(0);
            for dy in -r..=r {
                for dx in -r..=r {
                    hist[at(dx, yi + dy, c) as usize] += 1;
                }
            }
            out[(y * width) * channels + c] = histogram_median(&hist, half);

            for x in 1..width {
                let xi = x as i64;
                for dy in -r..=r {
                    hist[at(xi - 1 - r, yi + dy, c) as usize] -= 1;
                    hist[at(xi + r, yi + dy, c) as usize] += 1;
                }
                out[(y * width + x) * channels + c] = histogram_median(&hist, half);
            }
        }
    }

    ImageBuffer::with_geometry_of(image, image.channels(), Samples::U8(out))
}

/// First value whose cumulative count exceeds `half`.
#[inline]
fn histogram_median(hist: &[u32; 256], half: u32) -> u8 {
    let mut seen = 0u32;
    for (value, &count) in hist.iter().enumerate() {
        seen += count;
        if seen > half {
            return value as u8;
        }
    }
    255
}

/// Mean over a `size x size` box, edges mirrored without repeating the
/// border sample.
///
/// 8-bit input gives rounded 8-bit output; extended-range input stays `f64`.
pub fn average_blur(image: &ImageBuffer, size: usize) -> ImageBuffer {
    let size = size.max(1) | 1;
    let taps = vec![1.0 / size as f64; size];
    let blurred = correlate_separable(
        &image.to_f64_samples(),
        image.width() as usize,
        image.height() as usize,
        image.channels().count(),
        &taps,
        &taps,
        Border::Reflect101,
    );
    ImageBuffer::with_geometry_of(image, image.channels(), rounded_like(image, blurred))
}

/// Edge-preserving smoothing.
///
/// Each output sample is a weighted mean over a disc of diameter
/// `diameter`. A neighbour's weight is the product of a spatial Gaussian
/// (`sigma_space`) and a range Gaussian (`sigma_color`) on the intensity
/// difference. For RGB the difference is the sum of absolute per-channel
/// differences, so all three channels share one weight.
pub fn bilateral_filter(
    image: &ImageBuffer,
    diameter: u32,
    sigma_color: f64,
    sigma_space: f64,
) -> ImageBuffer {
    let src = image.to_f64_samples();
    let width = image.width() as usize;
    let height = image.height() as usize;
    let channels = image.channels().count();
    let radius = (diameter.max(1) / 2) as i64;
    let color_coeff = -0.5 / (sigma_color * sigma_color);
    let space_coeff = -0.5 / (sigma_space * sigma_space);

    let mut window = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = (dx * dx + dy * dy) as f64;
            if r2 <= (radius * radius) as f64 {
                window.push((dx, dy, (r2 * space_coeff).exp()));
            }
        }
    }

    let border = Border::Reflect101;
    let mut out = vec![0.0; src.len()];
    let mut acc = [0.0f64; 3];

    for y in 0..height {
        for x in 0..width {
            let center = (y * width + x) * channels;
            let mut weight_sum = 0.0;
            acc.fill(0.0);

            for &(dx, dy, space_weight) in &window {
                let sx = border.index(x as i64 + dx, width);
                let sy = border.index(y as i64 + dy, height);
                let idx = (sy * width + sx) * channels;

                let diff: f64 = (0..channels)
                    .map(|c| (src[idx + c] - src[center + c]).abs())
                    .sum();
                let w = space_weight * (diff * diff * color_coeff).exp();

                weight_sum += w;
                for c in 0..channels {
                    acc[c] += w * src[idx + c];
                }
            }

            for c in 0..channels {
                out[center + c] = acc[c] / weight_sum;
            }
        }
    }

    ImageBuffer::with_geometry_of(image, image.channels(), rounded_like(image, out))
}

/// 8-bit sources produce rounded 8-bit samples; others keep `f64`.
fn rounded_like(source: &ImageBuffer, values: Vec<f64>) -> Samples {
    if source.is_displayable() {
        Samples::U8(values.into_iter().map(saturate_u8).collect())
    } else {
        Samples::F64(values)
    }
}
