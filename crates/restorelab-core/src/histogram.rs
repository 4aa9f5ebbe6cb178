//! Sample-value histograms.
//!
//! The Poisson noise generator derives its quantization step from the number
//! of distinct sample values in an image; this module provides that count.

use crate::buffer::{ImageBuffer, Samples};

/// Histogram of 8-bit sample values across all channels.
#[derive(Debug, Clone)]
pub struct SampleHistogram {
    /// Occurrences of each value 0..=255.
    pub bins: [u32; 256],
}

impl Default for SampleHistogram {
    fn default() -> Self {
        Self { bins: [0; 256] }
    }
}

impl SampleHistogram {
    /// Create a new empty histogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct values present.
    pub fn distinct_values(&self) -> usize {
        self.bins.iter().filter(|&&n| n > 0).count()
    }
}

/// Compute a histogram over raw 8-bit samples (any channel layout).
///
/// # Example
/// ```
/// use restorelab_core::histogram::compute_histogram;
///
/// let hist = compute_histogram(&[255, 0, 0, 7]);
/// assert_eq!(hist.bins[0], 2);
/// assert_eq!(hist.distinct_values(), 3);
/// ```
pub fn compute_histogram(samples: &[u8]) -> SampleHistogram {
    let mut hist = SampleHistogram::new();
    for &s in samples {
        hist.bins[s as usize] += 1;
    }
    hist
}

/// Count distinct sample values in a buffer of either sample type.
///
/// Extended-range samples are compared by exact value; `-0.0` and `0.0`
/// count as one value.
pub fn distinct_sample_count(buffer: &ImageBuffer) -> usize {
    match buffer.samples() {
        Samples::U8(v) => compute_histogram(v).distinct_values(),
        Samples::F64(v) => {
            let mut keys: Vec<u64> = v
                .iter()
                .map(|&s| if s == 0.0 { 0.0f64.to_bits() } else { s.to_bits() })
                .collect();
            keys.sort_unstable();
            keys.dedup();
            keys.len()
        }
    }
}
