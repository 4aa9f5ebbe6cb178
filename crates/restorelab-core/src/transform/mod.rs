//! The fixed catalog of enhancement and restoration transforms.
//!
//! Every transform is a pure function from a source buffer (always the
//! loaded original, never a previous result) to a new buffer. Transforms
//! whose mathematical result can leave the 8-bit range (noise generators,
//! Laplacian, Sobel) return extended-range `f64` buffers; clipping happens
//! only in [`crate::normalize`].
//!
//! # Catalog
//!
//! | Id | Category | Output |
//! |---|---|---|
//! | `grayscale` | Enhancement | 1-channel luma, 8-bit |
//! | `median` | Enhancement | K x K median, 8-bit |
//! | `laplacian` | Enhancement | second derivative, f64 |
//! | `sobel-x`, `sobel-y` | Enhancement | 5-tap first derivative, f64 |
//! | `canny` | Enhancement | binary edge map, 8-bit gray |
//! | `negative` | Enhancement | inverted, 8-bit |
//! | `average-blur` | Enhancement | 5 x 5 box mean, 8-bit |
//! | `bilateral` | Enhancement | edge-preserving smoothing, 8-bit |
//! | `gaussian-noise` | Restoration | additive N(0, 0.1), f64 |
//! | `salt-pepper` | Restoration | impulse noise, 8-bit |
//! | `poisson-noise` | Restoration | shot noise, f64 |
//! | `speckle-noise` | Restoration | multiplicative noise, f64 |

mod border;
mod color;
mod edges;
mod noise;
mod request;
mod smoothing;

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::ImageBuffer;

pub use color::{grayscale, negative};
pub use edges::{
    canny, laplacian, sobel, SobelAxis, CANNY_HIGH_THRESHOLD, CANNY_LOW_THRESHOLD,
    SOBEL_KERNEL_SIZE,
};
pub use noise::{
    gaussian_noise, poisson_noise, poisson_quantization, salt_pepper_counts, salt_pepper_noise,
    speckle_noise, GAUSSIAN_MEAN, GAUSSIAN_VARIANCE, SALT_PEPPER_AMOUNT, SALT_VS_PEPPER,
};
pub use request::{
    resolve, KernelInput, ParameterWarning, Resolution, TransformRequest, DEFAULT_MEDIAN_KERNEL,
    MAX_MEDIAN_KERNEL,
};
pub use smoothing::{
    average_blur, bilateral_filter, median_filter, AVERAGE_KERNEL_SIZE, BILATERAL_DIAMETER,
    BILATERAL_SIGMA_COLOR, BILATERAL_SIGMA_SPACE,
};

/// Menu grouping of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Filters that improve or analyse an image.
    Enhancement,
    /// Degradation models used to study restoration.
    Restoration,
}

/// Identifier of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Grayscale,
    Median,
    Laplacian,
    SobelX,
    SobelY,
    Canny,
    Negative,
    AverageBlur,
    Bilateral,
    GaussianNoise,
    SaltPepper,
    PoissonNoise,
    SpeckleNoise,
}

impl Operation {
    /// All operations in menu order.
    pub const ALL: [Operation; 13] = [
        Operation::Grayscale,
        Operation::Median,
        Operation::Laplacian,
        Operation::SobelX,
        Operation::SobelY,
        Operation::Canny,
        Operation::Negative,
        Operation::AverageBlur,
        Operation::Bilateral,
        Operation::GaussianNoise,
        Operation::SaltPepper,
        Operation::PoissonNoise,
        Operation::SpeckleNoise,
    ];

    /// Stable kebab-case identifier.
    pub fn id(self) -> &'static str {
        match self {
            Operation::Grayscale => "grayscale",
            Operation::Median => "median",
            Operation::Laplacian => "laplacian",
            Operation::SobelX => "sobel-x",
            Operation::SobelY => "sobel-y",
            Operation::Canny => "canny",
            Operation::Negative => "negative",
            Operation::AverageBlur => "average-blur",
            Operation::Bilateral => "bilateral",
            Operation::GaussianNoise => "gaussian-noise",
            Operation::SaltPepper => "salt-pepper",
            Operation::PoissonNoise => "poisson-noise",
            Operation::SpeckleNoise => "speckle-noise",
        }
    }

    /// Human-readable menu label.
    pub fn label(self) -> &'static str {
        match self {
            Operation::Grayscale => "Black and White",
            Operation::Median => "Median Filter",
            Operation::Laplacian => "Laplacian Filter",
            Operation::SobelX => "Sobel X",
            Operation::SobelY => "Sobel Y",
            Operation::Canny => "Canny Edges",
            Operation::Negative => "Negative Image",
            Operation::AverageBlur => "Average Blur",
            Operation::Bilateral => "Bilateral Filtering",
            Operation::GaussianNoise => "Gaussian Noise",
            Operation::SaltPepper => "Salt and Pepper Noise",
            Operation::PoissonNoise => "Poisson Noise",
            Operation::SpeckleNoise => "Speckle Noise",
        }
    }

    pub fn category(self) -> Category {
        match self {
            Operation::GaussianNoise
            | Operation::SaltPepper
            | Operation::PoissonNoise
            | Operation::SpeckleNoise => Category::Restoration,
            _ => Category::Enhancement,
        }
    }

    /// Whether the front end must prompt for a kernel size.
    pub fn takes_kernel(self) -> bool {
        matches!(self, Operation::Median)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error parsing an operation identifier.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown operation: {0}")]
pub struct ParseOperationError(pub String);

impl FromStr for Operation {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace('_', "-");
        Operation::ALL
            .into_iter()
            .find(|op| op.id() == needle)
            .ok_or_else(|| ParseOperationError(s.to_string()))
    }
}

/// A fully validated transform, ready to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Grayscale,
    Median { kernel: u32 },
    Laplacian,
    Sobel(SobelAxis),
    Canny,
    Negative,
    AverageBlur,
    Bilateral,
    GaussianNoise,
    SaltPepper,
    PoissonNoise,
    SpeckleNoise,
}

impl Transform {
    /// The catalog entry this transform was resolved from.
    pub fn operation(&self) -> Operation {
        match self {
            Transform::Grayscale => Operation::Grayscale,
            Transform::Median { .. } => Operation::Median,
            Transform::Laplacian => Operation::Laplacian,
            Transform::Sobel(SobelAxis::X) => Operation::SobelX,
            Transform::Sobel(SobelAxis::Y) => Operation::SobelY,
            Transform::Canny => Operation::Canny,
            Transform::Negative => Operation::Negative,
            Transform::AverageBlur => Operation::AverageBlur,
            Transform::Bilateral => Operation::Bilateral,
            Transform::GaussianNoise => Operation::GaussianNoise,
            Transform::SaltPepper => Operation::SaltPepper,
            Transform::PoissonNoise => Operation::PoissonNoise,
            Transform::SpeckleNoise => Operation::SpeckleNoise,
        }
    }

    /// Kernel size used, if the transform takes one.
    pub fn kernel(&self) -> Option<u32> {
        match self {
            Transform::Median { kernel } => Some(*kernel),
            _ => None,
        }
    }

    /// Run the transform. `rng` is only consulted by noise generators.
    pub fn apply<R: Rng + ?Sized>(&self, image: &ImageBuffer, rng: &mut R) -> ImageBuffer {
        match *self {
            Transform::Grayscale => grayscale(image),
            Transform::Median { kernel } => median_filter(image, kernel),
            Transform::Laplacian => laplacian(image),
            Transform::Sobel(axis) => sobel(image, axis),
            Transform::Canny => canny(image, CANNY_LOW_THRESHOLD, CANNY_HIGH_THRESHOLD),
            Transform::Negative => negative(image),
            Transform::AverageBlur => average_blur(image, AVERAGE_KERNEL_SIZE),
            Transform::Bilateral => bilateral_filter(
                image,
                BILATERAL_DIAMETER,
                BILATERAL_SIGMA_COLOR,
                BILATERAL_SIGMA_SPACE,
            ),
            Transform::GaussianNoise => gaussian_noise(image, rng),
            Transform::SaltPepper => salt_pepper_noise(image, rng),
            Transform::PoissonNoise => poisson_noise(image, rng),
            Transform::SpeckleNoise => speckle_noise(image, rng),
        }
    }
}
