//! Transform requests and parameter validation.
//!
//! A front end sends an [`Operation`] plus whatever the user typed into the
//! kernel prompt. Two outcomes must stay distinct: dismissing the prompt
//! aborts silently, while an unusable value is reported and replaced by the
//! default kernel.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Operation, SobelAxis, Transform};

/// Kernel used when the requested one is unusable.
pub const DEFAULT_MEDIAN_KERNEL: u32 = 5;

/// Largest accepted median kernel.
pub const MAX_MEDIAN_KERNEL: u32 = 255;

/// What the user supplied for the kernel prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "value")]
pub enum KernelInput {
    /// No prompt was shown.
    #[default]
    NotRequired,
    /// The prompt was dismissed without a value.
    Cancelled,
    /// A value was entered; not yet validated.
    Value(i64),
}

/// An operation plus its raw parameter input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRequest {
    pub operation: Operation,
    #[serde(default)]
    pub kernel: KernelInput,
}

impl TransformRequest {
    /// Request for an operation without parameter input.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            kernel: KernelInput::NotRequired,
        }
    }

    /// Request with a user-entered kernel value.
    pub fn with_kernel(operation: Operation, kernel: i64) -> Self {
        Self {
            operation,
            kernel: KernelInput::Value(kernel),
        }
    }

    /// Request whose parameter prompt was dismissed.
    pub fn cancelled(operation: Operation) -> Self {
        Self {
            operation,
            kernel: KernelInput::Cancelled,
        }
    }
}

/// A recoverable parameter problem; the transform still runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterWarning {
    /// Kernel not a positive odd integer within bounds.
    InvalidKernel { requested: i64, fallback: u32 },
}

impl fmt::Display for ParameterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterWarning::InvalidKernel { requested, fallback } => write!(
                f,
                "Kernel value can only be a positive odd integer (got {}). Using default kernel value: {}",
                requested, fallback
            ),
        }
    }
}

/// Result of validating a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Run `transform`; `warning` is set when a fallback was applied.
    Run {
        transform: Transform,
        warning: Option<ParameterWarning>,
    },
    /// The user cancelled parameter entry; do nothing.
    Cancelled,
}

/// Validate a request's parameters and turn it into a runnable [`Transform`].
///
/// Kernel input is ignored for operations that take no parameter.
pub fn resolve(request: &TransformRequest) -> Resolution {
    let transform = match request.operation {
        Operation::Median => {
            return match request.kernel {
                KernelInput::Cancelled => Resolution::Cancelled,
                KernelInput::NotRequired => Resolution::Run {
                    transform: Transform::Median {
                        kernel: DEFAULT_MEDIAN_KERNEL,
                    },
                    warning: None,
                },
                KernelInput::Value(k) => match valid_median_kernel(k) {
                    Some(kernel) => Resolution::Run {
                        transform: Transform::Median { kernel },
                        warning: None,
                    },
                    None => Resolution::Run {
                        transform: Transform::Median {
                            kernel: DEFAULT_MEDIAN_KERNEL,
                        },
                        warning: Some(ParameterWarning::InvalidKernel {
                            requested: k,
                            fallback: DEFAULT_MEDIAN_KERNEL,
                        }),
                    },
                },
            };
        }
        Operation::Grayscale => Transform::Grayscale,
        Operation::Laplacian => Transform::Laplacian,
        Operation::SobelX => Transform::Sobel(SobelAxis::X),
        Operation::SobelY => Transform::Sobel(SobelAxis::Y),
        Operation::Canny => Transform::Canny,
        Operation::Negative => Transform::Negative,
        Operation::AverageBlur => Transform::AverageBlur,
        Operation::Bilateral => Transform::Bilateral,
        Operation::GaussianNoise => Transform::GaussianNoise,
        Operation::SaltPepper => Transform::SaltPepper,
        Operation::PoissonNoise => Transform::PoissonNoise,
        Operation::SpeckleNoise => Transform::SpeckleNoise,
    };

    Resolution::Run {
        transform,
        warning: None,
    }
}

fn valid_median_kernel(k: i64) -> Option<u32> {
    if k > 0 && k % 2 == 1 && k <= MAX_MEDIAN_KERNEL as i64 {
        Some(k as u32)
    } else {
        None
    }
}
