//! Noise models used to simulate degraded images.
//!
//! All generators draw from the caller's RNG so results are reproducible
//! under a fixed seed. Additive and multiplicative models return unclipped
//! `f64` buffers; impulse noise keeps the input's sample type.

use rand::Rng;
use rand_distr::{Distribution, Poisson, StandardNormal};

use crate::buffer::{ImageBuffer, Samples};
use crate::histogram::distinct_sample_count;

/// Mean of the additive Gaussian noise.
pub const GAUSSIAN_MEAN: f64 = 0.0;

/// Variance of the additive Gaussian noise.
pub const GAUSSIAN_VARIANCE: f64 = 0.1;

/// Fraction of samples replaced by impulse noise.
pub const SALT_PEPPER_AMOUNT: f64 = 0.004;

/// Share of impulses that are salt (white) rather than pepper (black).
pub const SALT_VS_PEPPER: f64 = 0.5;

const SALT: u8 = 255;
const PEPPER: u8 = 0;

/// `x + N(mean, variance)` per sample.
pub fn gaussian_noise<R: Rng + ?Sized>(image: &ImageBuffer, rng: &mut R) -> ImageBuffer {
    let sigma = GAUSSIAN_VARIANCE.sqrt();
    let noisy = image
        .to_f64_samples()
        .into_iter()
        .map(|x| {
            let z: f64 = StandardNormal.sample(rng);
            x + GAUSSIAN_MEAN + sigma * z
        })
        .collect();
    ImageBuffer::with_geometry_of(image, image.channels(), Samples::F64(noisy))
}

/// `x + x * z` with `z ~ N(0, 1)` per sample.
pub fn speckle_noise<R: Rng + ?Sized>(image: &ImageBuffer, rng: &mut R) -> ImageBuffer {
    let noisy = image
        .to_f64_samples()
        .into_iter()
        .map(|x| {
            let z: f64 = StandardNormal.sample(rng);
            x + x * z
        })
        .collect();
    ImageBuffer::with_geometry_of(image, image.channels(), Samples::F64(noisy))
}

/// Quantization level for shot noise: the number of distinct sample
/// values rounded up to a power of two (at least 1).
pub fn poisson_quantization(distinct_values: usize) -> f64 {
    let n = distinct_values.max(1) as f64;
    n.log2().ceil().exp2()
}

/// Shot noise: each sample becomes `Poisson(x * q) / q`, where `q` comes
/// from [`poisson_quantization`] over the whole buffer.
///
/// Samples at or below zero map to zero.
pub fn poisson_noise<R: Rng + ?Sized>(image: &ImageBuffer, rng: &mut R) -> ImageBuffer {
    let q = poisson_quantization(distinct_sample_count(image));

    let noisy = match image.samples() {
        Samples::U8(v) => {
            // Only 256 possible rates; build each distribution once
            let table: Vec<Option<Poisson<f64>>> = (0..=255u8)
                .map(|s| Poisson::new(s as f64 * q).ok())
                .collect();
            v.iter()
                .map(|&s| match &table[s as usize] {
                    Some(dist) => dist.sample(rng) / q,
                    None => 0.0,
                })
                .collect()
        }
        Samples::F64(v) => v.iter().map(|&x| shot(x, q, rng)).collect(),
    };

    ImageBuffer::with_geometry_of(image, image.channels(), Samples::F64(noisy))
}

fn shot<R: Rng + ?Sized>(x: f64, q: f64, rng: &mut R) -> f64 {
    let lambda = x * q;
    if lambda <= 0.0 {
        return 0.0;
    }
    match Poisson::new(lambda) {
        Ok(dist) => dist.sample(rng) / q,
        Err(_) => x,
    }
}

/// Number of `(salt, pepper)` impulses for a buffer of `total_samples`.
pub fn salt_pepper_counts(total_samples: usize) -> (usize, usize) {
    let budget = SALT_PEPPER_AMOUNT * total_samples as f64;
    (
        ceil_count(budget * SALT_VS_PEPPER),
        ceil_count(budget * (1.0 - SALT_VS_PEPPER)),
    )
}

#[inline]
fn ceil_count(value: f64) -> usize {
    // 0.004 is not exact in binary; keep 120.00000000000001 from becoming 121
    (value - 1e-9).ceil().max(0.0) as usize
}

/// Impulse noise: a fixed number of randomly chosen samples are set to
/// white, then another batch to black.
///
/// Positions are drawn independently and uniformly over every
/// `(row, column, channel)` sample, so collisions are possible and a
/// pepper hit can overwrite an earlier salt hit.
pub fn salt_pepper_noise<R: Rng + ?Sized>(image: &ImageBuffer, rng: &mut R) -> ImageBuffer {
    let total = image.sample_count();
    let (salt, pepper) = salt_pepper_counts(total);

    let samples = match image.samples() {
        Samples::U8(v) => {
            let mut out = v.clone();
            scatter(&mut out, salt, SALT, rng);
            scatter(&mut out, pepper, PEPPER, rng);
            Samples::U8(out)
        }
        Samples::F64(v) => {
            let mut out = v.clone();
            scatter(&mut out, salt, SALT as f64, rng);
            scatter(&mut out, pepper, PEPPER as f64, rng);
            Samples::F64(out)
        }
    };

    ImageBuffer::with_geometry_of(image, image.channels(), samples)
}

fn scatter<T: Copy, R: Rng + ?Sized>(samples: &mut [T], count: usize, value: T, rng: &mut R) {
    if samples.is_empty() {
        return;
    }
    for _ in 0..count {
        let idx = rng.gen_range(0..samples.len());
        samples[idx] = value;
    }
}
