//! Pipeline configuration.
//!
//! Loaded from a TOML file by the CLI, or deserialized from a JS object by
//! the wasm session. Every field has a default, so a config only needs the
//! keys it wants to change:
//!
//! ```toml
//! normalization = "clamp"   # or "stretch"
//! jpeg_quality = 90         # 1-100, used when saving .jpg
//! seed = 42                 # optional: fixed RNG seed for noise generators
//!
//! [preview]
//! max_width = 400
//! max_height = 400
//! filter = "bilinear"       # nearest | bilinear | lanczos3
//! cache_path = "images/runtime-images/cv2out.png"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::FilterType;
use crate::normalize::Normalization;

/// Default location of the preview cache file.
pub const DEFAULT_CACHE_PATH: &str = "images/runtime-images/cv2out.png";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// How extended-range results are brought to 8 bits.
    pub normalization: Normalization,
    /// JPEG quality used when saving `.jpg`/`.jpeg`.
    pub jpeg_quality: u8,
    /// Fixed seed for the noise generators. Entropy-seeded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Preview rendering and caching.
    pub preview: PreviewConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            normalization: Normalization::default(),
            jpeg_quality: 90,
            seed: None,
            preview: PreviewConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Validation(
                "jpeg_quality must be 1-100".into(),
            ));
        }
        if self.preview.max_width == 0 || self.preview.max_height == 0 {
            return Err(ConfigError::Validation(
                "preview.max_width and preview.max_height must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Preview pane settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Largest preview width in pixels.
    pub max_width: u32,
    /// Largest preview height in pixels.
    pub max_height: u32,
    /// Resampling filter for the preview.
    pub filter: FilterType,
    /// Where the latest result is persisted. An empty path disables the cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_width: 400,
            max_height: 400,
            filter: FilterType::default(),
            cache_path: Some(PathBuf::from(DEFAULT_CACHE_PATH)),
        }
    }
}

impl PreviewConfig {
    /// The cache file to write, if caching is enabled.
    pub fn cache_target(&self) -> Option<&Path> {
        self.cache_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// Parse and validate a config from TOML text.
pub fn from_toml_str(content: &str) -> Result<PipelineConfig, ConfigError> {
    let config: PipelineConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    from_toml_str(&content)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# RestoreLab Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# How results outside 0-255 (noise, Laplacian, Sobel) are shown and saved:
#   "clamp"   - round and saturate each sample
#   "stretch" - map the image's min..max onto 0..255
normalization = "clamp"

# Quality used when saving .jpg / .jpeg files (1 = worst, 100 = best).
jpeg_quality = 90

# Fixed seed for the noise generators. Omit for a fresh seed per session.
# seed = 42

# ---------------------------------------------------------------------------
# Preview
# ---------------------------------------------------------------------------
[preview]
# Bounding box of the preview pane, in pixels. Aspect ratio is preserved.
max_width = 400
max_height = 400

# Resampling filter: "nearest", "bilinear" or "lanczos3".
filter = "bilinear"

# The latest result is written here as PNG after every transform.
# Set to "" to disable.
cache_path = "images/runtime-images/cv2out.png"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.normalization, Normalization::Clamp);
        assert_eq!(config.jpeg_quality, 90);
        assert_eq!(config.seed, None);
        assert_eq!(config.preview.max_width, 400);
        assert_eq!(config.preview.max_height, 400);
        assert_eq!(config.preview.filter, FilterType::Bilinear);
        assert_eq!(
            config.preview.cache_target(),
            Some(Path::new(DEFAULT_CACHE_PATH))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = from_toml_str("seed = 7\n[preview]\nmax_width = 640\n").unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.preview.max_width, 640);
        assert_eq!(config.preview.max_height, 400);
        assert_eq!(config.jpeg_quality, 90);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(matches!(
            from_toml_str("jpg_quality = 80"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            from_toml_str("[preview]\nwidth = 80"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            from_toml_str("jpeg_quality = 0"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            from_toml_str("jpeg_quality = 101"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            from_toml_str("[preview]\nmax_height = 0"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_cache_path_disables_cache() {
        let config = from_toml_str("[preview]\ncache_path = \"\"").unwrap();
        assert_eq!(config.preview.cache_target(), None);

        let mut preview = PreviewConfig::default();
        preview.cache_path = None;
        assert_eq!(preview.cache_target(), None);
    }

    #[test]
    fn test_stretch_and_filter_names() {
        let config =
            from_toml_str("normalization = \"stretch\"\n[preview]\nfilter = \"nearest\"").unwrap();
        assert_eq!(config.normalization, Normalization::Stretch);
        assert_eq!(config.preview.filter, FilterType::Nearest);
    }

    #[test]
    fn test_load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("restorelab.toml");
        fs::write(&path, "jpeg_quality = 75\n").unwrap();
        assert_eq!(load_config(&path).unwrap().jpeg_quality, 75);
    }

    #[test]
    fn test_load_config_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            load_config(&tmp.path().join("nope.toml")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_stock_config_toml_roundtrips_to_defaults() {
        let config = from_toml_str(stock_config_toml()).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_default_config_serializes() {
        let text = toml::to_string(&PipelineConfig::default()).unwrap();
        let back: PipelineConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, PipelineConfig::default());
    }
}
