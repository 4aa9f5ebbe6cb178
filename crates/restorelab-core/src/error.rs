//! Errors surfaced by the pipeline to its front ends.

use thiserror::Error;

use crate::buffer::BufferError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// An operation was requested before the state it needs exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("No image loaded")]
    NoImageLoaded,
    #[error("No modified image available")]
    NoModifiedImage,
}

/// Errors from [`crate::preview::PreviewSync`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// A parameter that has no fallback.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Decoding, encoding or writing failed.
    #[error("I/O failure: {0}")]
    Io(String),

    #[error("Invalid image buffer: {0}")]
    Buffer(#[from] BufferError),
}

impl From<DecodeError> for PipelineError {
    fn from(e: DecodeError) -> Self {
        PipelineError::Io(e.to_string())
    }
}

impl From<EncodeError> for PipelineError {
    fn from(e: EncodeError) -> Self {
        PipelineError::Io(e.to_string())
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        PipelineError::Io(e.to_string())
    }
}

impl From<crate::transform::ParseOperationError> for PipelineError {
    fn from(e: crate::transform::ParseOperationError) -> Self {
        PipelineError::InvalidParameter(e.to_string())
    }
}
