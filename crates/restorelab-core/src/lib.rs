//! RestoreLab Core - Image enhancement and restoration pipeline
//!
//! This crate provides the core functionality for RestoreLab: decoding an
//! image, applying one transform from a fixed catalog of enhancement filters
//! and noise models, and keeping the loaded original, the latest result and
//! the on-disk preview in sync.
//!
//! The usual entry point is [`PreviewSync`]:
//!
//! ```ignore
//! use restorelab_core::{Operation, PipelineConfig, PreviewSync, TransformRequest};
//!
//! let mut sync = PreviewSync::new(PipelineConfig::default());
//! sync.load_path(Path::new("photo.png"))?;
//! sync.apply(&TransformRequest::with_kernel(Operation::Median, 5))?;
//! sync.save_modified(Path::new("image.png"))?;
//! ```

pub mod buffer;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod histogram;
pub mod luminance;
pub mod normalize;
pub mod preview;
pub mod store;
pub mod transform;

pub use buffer::{BufferError, Channels, ImageBuffer, Samples};
pub use config::{ConfigError, PipelineConfig, PreviewConfig};
pub use error::{PipelineError, PreconditionError};
pub use normalize::Normalization;
pub use preview::{AppliedTransform, ApplyOutcome, DiskCache, PreviewArtifact, PreviewSync};
pub use store::ImageStore;
pub use transform::{
    Category, KernelInput, Operation, ParameterWarning, Transform, TransformRequest,
};
