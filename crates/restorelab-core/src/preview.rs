//! Preview and state synchronization.
//!
//! [`PreviewSync`] is the one entry point front ends talk to. It owns the
//! [`ImageStore`] and enforces the ordering load → transform → view/save:
//!
//! 1. validate the request (cancel aborts, bad kernels fall back with a warning)
//! 2. run the transform on the original
//! 3. normalize the result to 8 bits and render the display-bounded
//!    [`PreviewArtifact`]
//! 4. persist it to the preview cache, if one is configured
//! 5. commit the raw result as the new modified image and hand back the preview
//!
//! Nothing is committed unless persistence succeeded, so the cache file and
//! the in-memory state never disagree about which result is current.

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::buffer::ImageBuffer;
use crate::config::PipelineConfig;
use crate::decode::{decode_image, open_image, resize_to_fit};
use crate::encode::{encode, encode_png, save_image, OutputFormat};
use crate::error::{PipelineError, PreconditionError};
use crate::normalize::to_displayable;
use crate::store::ImageStore;
use crate::transform::{resolve, Operation, ParameterWarning, Resolution, TransformRequest};

/// Display rendering of a buffer, bounded by the preview size.
///
/// Always 8-bit. Disposable: it is never read back as a source image.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewArtifact {
    /// The fitted, displayable image.
    pub image: ImageBuffer,
    /// Dimensions of the buffer it was rendered from.
    pub source_dimensions: (u32, u32),
}

/// Details of a transform that ran.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedTransform {
    pub operation: Operation,
    /// Kernel actually used, for operations that take one.
    pub kernel: Option<u32>,
    /// Set when an unusable parameter was replaced by its default.
    pub warning: Option<ParameterWarning>,
    pub preview: PreviewArtifact,
}

/// Result of [`PreviewSync::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Applied(AppliedTransform),
    /// Parameter entry was cancelled; nothing changed.
    Cancelled,
}

/// Preview cache on disk, overwritten after every successful transform.
#[derive(Debug, Clone)]
pub struct DiskCache {
    path: PathBuf,
}

impl DiskCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `image` as PNG.
    ///
    /// The data goes to a sibling temp file first and is renamed over the
    /// cache path, so readers never see a half-written file. Missing parent
    /// directories are created.
    pub fn persist(&self, image: &ImageBuffer) -> Result<(), PipelineError> {
        let bytes = encode_png(image)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(parent, e))?;
        }

        let tmp = self.temp_path();
        fs::write(&tmp, bytes).map_err(|e| self.io_error(&tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(self.io_error(&self.path, e));
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, path: &Path, e: std::io::Error) -> PipelineError {
        PipelineError::Io(format!("{}: {}", path.display(), e))
    }
}

/// The pipeline session: image state, configuration, RNG and cache.
#[derive(Debug)]
pub struct PreviewSync {
    store: ImageStore,
    config: PipelineConfig,
    cache: Option<DiskCache>,
    rng: StdRng,
}

impl PreviewSync {
    /// Create a session. Noise generators use `config.seed` when set.
    pub fn new(config: PipelineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let cache = config.preview.cache_target().map(DiskCache::new);
        Self {
            store: ImageStore::new(),
            config,
            cache,
            rng,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    /// Path of the preview cache file, if caching is enabled.
    pub fn cache_path(&self) -> Option<&Path> {
        self.cache.as_ref().map(DiskCache::path)
    }

    /// Make `buffer` the new original and return its display rendering.
    ///
    /// Any previous result is discarded.
    pub fn load(&mut self, buffer: ImageBuffer) -> Result<PreviewArtifact, PipelineError> {
        let preview = self.render(&buffer)?;
        info!(
            "Loaded {}x{} {:?} image",
            buffer.width(),
            buffer.height(),
            buffer.channels()
        );
        self.store.load(buffer);
        Ok(preview)
    }

    /// Decode encoded bytes and load them.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<PreviewArtifact, PipelineError> {
        let buffer = decode_image(bytes)?;
        self.load(buffer)
    }

    /// Read and decode a file, then load it.
    pub fn load_path(&mut self, path: &Path) -> Result<PreviewArtifact, PipelineError> {
        let buffer = open_image(path)?;
        debug!("Decoded {}", path.display());
        self.load(buffer)
    }

    /// Run one transform on the original.
    ///
    /// On success the result becomes the modified image. On failure (or
    /// cancellation) the modified image is left as it was.
    pub fn apply(&mut self, request: &TransformRequest) -> Result<ApplyOutcome, PipelineError> {
        let original = self
            .store
            .original()
            .ok_or(PreconditionError::NoImageLoaded)?;

        let (transform, warning) = match resolve(request) {
            Resolution::Cancelled => {
                debug!("{} cancelled during parameter entry", request.operation);
                return Ok(ApplyOutcome::Cancelled);
            }
            Resolution::Run { transform, warning } => (transform, warning),
        };
        if let Some(w) = &warning {
            warn!("{}", w);
        }

        debug!(
            "Applying {} (kernel {:?}) to {}x{} image",
            transform.operation(),
            transform.kernel(),
            original.width(),
            original.height()
        );
        let (result, elapsed) = timed(|| transform.apply(original, &mut self.rng));
        if let Some(elapsed) = elapsed {
            debug!("{} took {:.1}ms", transform.operation(), elapsed * 1000.0);
        }

        let displayable = to_displayable(&result, self.config.normalization);
        let preview = self.render(&displayable)?;
        // Persisting is the last fallible step before the commit
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.persist(&displayable) {
                warn!("Failed to persist preview, keeping previous result: {}", e);
                return Err(e);
            }
        }

        self.store.commit_modified(result);
        info!("Applied {}", transform.operation());

        Ok(ApplyOutcome::Applied(AppliedTransform {
            operation: transform.operation(),
            kernel: transform.kernel(),
            warning,
            preview,
        }))
    }

    /// The loaded original.
    pub fn original(&self) -> Result<&ImageBuffer, PipelineError> {
        Ok(self
            .store
            .original()
            .ok_or(PreconditionError::NoImageLoaded)?)
    }

    /// The latest transform result, possibly extended-range.
    pub fn modified(&self) -> Result<&ImageBuffer, PipelineError> {
        Ok(self
            .store
            .modified()
            .ok_or(PreconditionError::NoModifiedImage)?)
    }

    /// Display rendering of the original.
    pub fn preview_original(&self) -> Result<PreviewArtifact, PipelineError> {
        self.render(self.original()?)
    }

    /// Display rendering of the latest result.
    pub fn preview_modified(&self) -> Result<PreviewArtifact, PipelineError> {
        self.render(self.modified()?)
    }

    /// Normalize and encode the latest result in `format`.
    pub fn encode_modified(&self, format: OutputFormat) -> Result<Vec<u8>, PipelineError> {
        let displayable = to_displayable(self.modified()?, self.config.normalization);
        Ok(encode(&displayable, format, self.config.jpeg_quality)?)
    }

    /// Normalize and write the latest result, picking the format from the
    /// extension (`.png` appended when there is none).
    ///
    /// Returns the path actually written.
    pub fn save_modified(&self, path: &Path) -> Result<PathBuf, PipelineError> {
        let modified = self.modified()?;
        let target = save_image(
            &to_displayable(modified, self.config.normalization),
            path,
            self.config.jpeg_quality,
        )?;
        info!("Saved {}", target.display());
        Ok(target)
    }

    fn render(&self, buffer: &ImageBuffer) -> Result<PreviewArtifact, PipelineError> {
        let preview = &self.config.preview;
        let displayable = to_displayable(buffer, self.config.normalization);
        let image = resize_to_fit(
            &displayable,
            preview.max_width,
            preview.max_height,
            preview.filter,
        )?;
        Ok(PreviewArtifact {
            image,
            source_dimensions: buffer.dimensions(),
        })
    }
}

/// Run `f`, returning its wall time in seconds where a clock is available.
#[cfg(not(target_arch = "wasm32"))]
fn timed<T>(f: impl FnOnce() -> T) -> (T, Option<f64>) {
    let start = std::time::Instant::now();
    let value = f();
    (value, Some(start.elapsed().as_secs_f64()))
}

#[cfg(target_arch = "wasm32")]
fn timed<T>(f: impl FnOnce() -> T) -> (T, Option<f64>) {
    (f(), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::test_support::gradient_rgb;
    use crate::buffer::Channels;
    use crate::normalize::Normalization;
    use tempfile::TempDir;

    fn config_without_cache(seed: u64) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.seed = Some(seed);
        config.preview.cache_path = None;
        config
    }

    fn config_with_cache(path: &Path) -> PipelineConfig {
        let mut config = config_without_cache(1);
        config.preview.cache_path = Some(path.to_path_buf());
        config
    }

    fn applied(outcome: ApplyOutcome) -> AppliedTransform {
        match outcome {
            ApplyOutcome::Applied(a) => a,
            ApplyOutcome::Cancelled => panic!("expected the transform to run"),
        }
    }

    #[test]
    fn test_apply_without_image_is_precondition_error() {
        let mut sync = PreviewSync::new(config_without_cache(0));
        for op in Operation::ALL {
            let err = sync.apply(&TransformRequest::new(op)).unwrap_err();
            assert!(matches!(
                err,
                PipelineError::Precondition(PreconditionError::NoImageLoaded)
            ));
        }
        assert!(!sync.store().has_modified());
    }

    #[test]
    fn test_show_before_load() {
        let sync = PreviewSync::new(config_without_cache(0));
        assert!(matches!(
            sync.original(),
            Err(PipelineError::Precondition(PreconditionError::NoImageLoaded))
        ));
        assert!(matches!(
            sync.modified(),
            Err(PipelineError::Precondition(PreconditionError::NoModifiedImage))
        ));
        assert!(sync.preview_modified().is_err());
    }

    #[test]
    fn test_load_returns_fitted_preview() {
        let mut sync = PreviewSync::new(config_without_cache(0));
        let preview = sync.load(gradient_rgb(800, 400)).unwrap();
        assert_eq!(preview.image.dimensions(), (400, 200));
        assert_eq!(preview.source_dimensions, (800, 400));
        assert_eq!(sync.original().unwrap().dimensions(), (800, 400));
    }

    #[test]
    fn test_apply_commits_modified() {
        let mut sync = PreviewSync::new(config_without_cache(0));
        sync.load(gradient_rgb(30, 20)).unwrap();
        let a = applied(sync.apply(&TransformRequest::new(Operation::Negative)).unwrap());
        assert_eq!(a.operation, Operation::Negative);
        assert_eq!(a.kernel, None);
        assert!(a.warning.is_none());
        assert_eq!(a.preview.image.dimensions(), (30, 20));

        let modified = sync.modified().unwrap();
        assert_eq!(modified, &crate::transform::negative(&gradient_rgb(30, 20)));
        // The original is never touched
        assert_eq!(sync.original().unwrap(), &gradient_rgb(30, 20));
    }

    #[test]
    fn test_transforms_read_the_original_not_the_last_result() {
        let mut sync = PreviewSync::new(config_without_cache(0));
        sync.load(gradient_rgb(10, 10)).unwrap();
        sync.apply(&TransformRequest::new(Operation::Negative)).unwrap();
        sync.apply(&TransformRequest::new(Operation::Negative)).unwrap();
        assert_eq!(
            sync.modified().unwrap(),
            &crate::transform::negative(&gradient_rgb(10, 10))
        );
    }

    #[test]
    fn test_even_kernel_matches_default_kernel() {
        let mut sync = PreviewSync::new(config_without_cache(0));
        sync.load(gradient_rgb(25, 15)).unwrap();

        let a = applied(
            sync.apply(&TransformRequest::with_kernel(Operation::Median, 4))
                .unwrap(),
        );
        assert_eq!(a.kernel, Some(5));
        assert_eq!(
            a.warning,
            Some(ParameterWarning::InvalidKernel {
                requested: 4,
                fallback: 5
            })
        );
        let with_four = sync.modified().unwrap().clone();

        let b = applied(
            sync.apply(&TransformRequest::with_kernel(Operation::Median, 5))
                .unwrap(),
        );
        assert!(b.warning.is_none());
        assert_eq!(sync.modified().unwrap(), &with_four);
    }

    #[test]
    fn test_cancel_leaves_state_unchanged() {
        let mut sync = PreviewSync::new(config_without_cache(0));
        sync.load(gradient_rgb(12, 12)).unwrap();
        sync.apply(&TransformRequest::with_kernel(Operation::Median, 3))
            .unwrap();
        let before = sync.modified().unwrap().clone();

        let outcome = sync
            .apply(&TransformRequest::cancelled(Operation::Median))
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Cancelled);
        assert_eq!(sync.modified().unwrap(), &before);
    }

    #[test]
    fn test_load_clears_modified() {
        let mut sync = PreviewSync::new(config_without_cache(0));
        sync.load(gradient_rgb(8, 8)).unwrap();
        sync.apply(&TransformRequest::new(Operation::Grayscale)).unwrap();
        assert!(sync.store().has_modified());

        sync.load(gradient_rgb(9, 9)).unwrap();
        assert!(!sync.store().has_modified());
        assert!(sync.modified().is_err());
    }

    #[test]
    fn test_cache_written_with_same_dimensions() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("runtime-images").join("cv2out.png");
        let mut sync = PreviewSync::new(config_with_cache(&cache));
        assert_eq!(sync.cache_path(), Some(cache.as_path()));

        sync.load(gradient_rgb(500, 260)).unwrap();
        for op in [Operation::Grayscale, Operation::GaussianNoise, Operation::SobelX] {
            sync.apply(&TransformRequest::new(op)).unwrap();
            let cached = open_image(&cache).unwrap();
            assert_eq!(cached.dimensions(), (500, 260), "{}", op);
        }
        // The temp file is renamed away
        assert!(!tmp.path().join("runtime-images").join("cv2out.png.tmp").exists());
    }

    #[test]
    fn test_cache_holds_normalized_result() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cv2out.png");
        let mut sync = PreviewSync::new(config_with_cache(&cache));
        sync.load(gradient_rgb(16, 16)).unwrap();
        sync.apply(&TransformRequest::new(Operation::Laplacian)).unwrap();

        let expected = to_displayable(sync.modified().unwrap(), Normalization::Clamp);
        assert_eq!(open_image(&cache).unwrap(), expected);
    }

    #[test]
    fn test_persist_failure_keeps_previous_result() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("out");
        let cache = dir.join("cv2out.png");
        let mut sync = PreviewSync::new(config_with_cache(&cache));
        sync.load(gradient_rgb(10, 10)).unwrap();
        sync.apply(&TransformRequest::new(Operation::Negative)).unwrap();
        let before = sync.modified().unwrap().clone();

        // Replace the cache directory with a plain file so the write fails
        fs::remove_dir_all(&dir).unwrap();
        fs::write(&dir, b"not a directory").unwrap();

        let err = sync
            .apply(&TransformRequest::new(Operation::Grayscale))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
        assert_eq!(sync.modified().unwrap(), &before);
    }

    #[test]
    fn test_render_failure_writes_no_cache() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cv2out.png");
        let mut sync = PreviewSync::new(config_with_cache(&cache));
        sync.load(gradient_rgb(10, 10)).unwrap();
        // Unreachable through a validated config; forces the preview fit to fail
        sync.config.preview.max_width = 0;

        let err = sync
            .apply(&TransformRequest::new(Operation::Negative))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
        assert!(!cache.exists());
        assert!(!sync.store().has_modified());
    }

    #[test]
    fn test_persist_failure_on_first_apply_commits_nothing() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let mut sync = PreviewSync::new(config_with_cache(&blocker.join("cv2out.png")));
        sync.load(gradient_rgb(10, 10)).unwrap();

        assert!(sync.apply(&TransformRequest::new(Operation::Canny)).is_err());
        assert!(!sync.store().has_modified());
    }

    #[test]
    fn test_seeded_sessions_reproduce_noise() {
        let run = |seed| {
            let mut sync = PreviewSync::new(config_without_cache(seed));
            sync.load(gradient_rgb(20, 20)).unwrap();
            sync.apply(&TransformRequest::new(Operation::SpeckleNoise))
                .unwrap();
            sync.modified().unwrap().clone()
        };
        assert_eq!(run(42), run(42));
        assert_ne!(run(42), run(43));
    }

    #[test]
    fn test_noise_keeps_extended_range_in_memory() {
        let mut sync = PreviewSync::new(config_without_cache(3));
        sync.load(gradient_rgb(10, 10)).unwrap();
        let a = applied(sync.apply(&TransformRequest::new(Operation::GaussianNoise)).unwrap());
        assert!(!sync.modified().unwrap().is_displayable());
        assert!(a.preview.image.is_displayable());
    }

    #[test]
    fn test_preview_modified_matches_apply_preview() {
        let mut sync = PreviewSync::new(config_without_cache(0));
        sync.load(gradient_rgb(640, 480)).unwrap();
        let a = applied(sync.apply(&TransformRequest::new(Operation::AverageBlur)).unwrap());
        let again = sync.preview_modified().unwrap();
        assert_eq!(again, a.preview);
        assert_eq!(again.image.dimensions(), (400, 300));
        assert_eq!(sync.preview_original().unwrap().source_dimensions, (640, 480));
    }

    #[test]
    fn test_save_modified() {
        let tmp = TempDir::new().unwrap();
        let mut sync = PreviewSync::new(config_without_cache(0));

        assert!(matches!(
            sync.save_modified(&tmp.path().join("image.png")),
            Err(PipelineError::Precondition(PreconditionError::NoModifiedImage))
        ));

        sync.load(gradient_rgb(12, 8)).unwrap();
        sync.apply(&TransformRequest::new(Operation::Grayscale)).unwrap();

        let written = sync.save_modified(&tmp.path().join("image")).unwrap();
        assert_eq!(written, tmp.path().join("image.png"));
        let saved = open_image(&written).unwrap();
        assert_eq!(saved.channels(), Channels::Gray);
        assert_eq!(&saved, sync.modified().unwrap());

        let jpeg = sync.save_modified(&tmp.path().join("image.jpeg")).unwrap();
        assert_eq!(open_image(&jpeg).unwrap().dimensions(), (12, 8));
    }

    #[test]
    fn test_encode_modified() {
        let mut sync = PreviewSync::new(config_without_cache(0));
        sync.load(gradient_rgb(6, 6)).unwrap();
        sync.apply(&TransformRequest::new(Operation::SobelY)).unwrap();
        let png = sync.encode_modified(OutputFormat::Png).unwrap();
        assert_eq!(decode_image(&png).unwrap().dimensions(), (6, 6));
    }

    #[test]
    fn test_load_bytes_rejects_garbage() {
        let mut sync = PreviewSync::new(config_without_cache(0));
        assert!(matches!(
            sync.load_bytes(b"definitely not an image"),
            Err(PipelineError::Io(_))
        ));
        assert!(!sync.store().has_original());
    }

    #[test]
    fn test_load_bytes_decodes() {
        let mut sync = PreviewSync::new(config_without_cache(0));
        let png = encode_png(&gradient_rgb(7, 3)).unwrap();
        let preview = sync.load_bytes(&png).unwrap();
        assert_eq!(preview.source_dimensions, (7, 3));
    }
}
