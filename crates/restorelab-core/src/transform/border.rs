//! Border extrapolation and planar convolution helpers.

/// How out-of-range coordinates are mapped back into the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Border {
    /// `gfedcb|abcdefgh|gfedcba`: mirror without repeating the edge sample.
    Reflect101,
    /// `aaaaaa|abcdefgh|hhhhhhh`: repeat the edge sample.
    Replicate,
}

impl Border {
    /// Map a possibly out-of-range coordinate onto `0..len`.
    #[inline]
    pub(crate) fn index(self, i: i64, len: usize) -> usize {
        let n = len as i64;
        if n <= 1 {
            return 0;
        }
        match self {
            Border::Replicate => i.clamp(0, n - 1) as usize,
            Border::Reflect101 => {
                let mut i = i;
                // Reflection can overshoot when the window is wider than the image
                loop {
                    if i < 0 {
                        i = -i;
                    } else if i >= n {
                        i = 2 * (n - 1) - i;
                    } else {
                        return i as usize;
                    }
                }
            }
        }
    }
}

/// Correlate every channel of an interleaved image with a separable kernel.
///
/// `kx` runs along rows, `ky` along columns; both must have odd length.
/// Computed in `f64` without rounding or clipping.
pub(crate) fn correlate_separable(
    samples: &[f64],
    width: usize,
    height: usize,
    channels: usize,
    kx: &[f64],
    ky: &[f64],
    border: Border,
) -> Vec<f64> {
    debug_assert!(kx.len() % 2 == 1 && ky.len() % 2 == 1);
    let rx = (kx.len() / 2) as i64;
    let ry = (ky.len() / 2) as i64;

    // Horizontal pass
    let mut tmp = vec![0.0; samples.len()];
    for y in 0..height {
        let row = y * width;
        for x in 0..width {
            for c in 0..channels {
                let mut acc = 0.0;
                for (k, &w) in kx.iter().enumerate() {
                    let sx = border.index(x as i64 + k as i64 - rx, width);
                    acc += w * samples[(row + sx) * channels + c];
                }
                tmp[(row + x) * channels + c] = acc;
            }
        }
    }

    // Vertical pass
    let mut out = vec![0.0; samples.len()];
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut acc = 0.0;
                for (k, &w) in ky.iter().enumerate() {
                    let sy = border.index(y as i64 + k as i64 - ry, height);
                    acc += w * tmp[(sy * width + x) * channels + c];
                }
                out[(y * width + x) * channels + c] = acc;
            }
        }
    }

    out
}

/// Correlate every channel with a dense square kernel of odd side `size`.
pub(crate) fn correlate(
    samples: &[f64],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f64],
    size: usize,
    border: Border,
) -> Vec<f64> {
    debug_assert_eq!(kernel.len(), size * size);
    let r = (size / 2) as i64;
    let mut out = vec![0.0; samples.len()];

    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut acc = 0.0;
                for ky in 0..size {
                    let sy = border.index(y as i64 + ky as i64 - r, height);
                    for kx in 0..size {
                        let w = kernel[ky * size + kx];
                        if w == 0.0 {
                            continue;
                        }
                        let sx = border.index(x as i64 + kx as i64 - r, width);
                        acc += w * samples[(sy * width + sx) * channels + c];
                    }
                }
                out[(y * width + x) * channels + c] = acc;
            }
        }
    }

    out
}
