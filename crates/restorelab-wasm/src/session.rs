//! Pipeline session bindings.
//!
//! A `JsSession` holds the loaded original and the latest result for one
//! browser tab. The preview is returned in memory; the browser build never
//! writes a cache file.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const session = new JsSession({ normalization: 'stretch', seed: 7 });
//! const shown = session.load(new Uint8Array(await file.arrayBuffer()));
//!
//! const input = prompt('Kernel size');
//! const result = input === null
//!   ? session.apply_request({ operation: 'median', kernel: { kind: 'cancelled' } })
//!   : session.apply('median', parseInt(input, 10));
//! if (result.warning) alert(result.warning);
//! ```

use crate::types::{js_error, JsImage};
use restorelab_core::encode::OutputFormat;
use restorelab_core::{
    ApplyOutcome, ConfigError, Operation, PipelineConfig, PipelineError, PreviewArtifact,
    PreviewSync, TransformRequest,
};
use wasm_bindgen::prelude::*;

/// A display rendering plus the size of the image it came from.
#[wasm_bindgen]
#[derive(Clone)]
pub struct JsPreview {
    image: JsImage,
    source_width: u32,
    source_height: u32,
}

#[wasm_bindgen]
impl JsPreview {
    #[wasm_bindgen(getter)]
    pub fn image(&self) -> JsImage {
        self.image.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn source_width(&self) -> u32 {
        self.source_width
    }

    #[wasm_bindgen(getter)]
    pub fn source_height(&self) -> u32 {
        self.source_height
    }
}

impl From<PreviewArtifact> for JsPreview {
    fn from(artifact: PreviewArtifact) -> Self {
        let (source_width, source_height) = artifact.source_dimensions;
        Self {
            image: JsImage::from_buffer(&artifact.image),
            source_width,
            source_height,
        }
    }
}

/// What happened when a transform was requested.
#[wasm_bindgen]
pub struct JsApplyResult {
    cancelled: bool,
    operation: String,
    kernel: Option<u32>,
    warning: Option<String>,
    preview: Option<JsPreview>,
}

#[wasm_bindgen]
impl JsApplyResult {
    /// True when the kernel prompt was dismissed and nothing ran.
    #[wasm_bindgen(getter)]
    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    #[wasm_bindgen(getter)]
    pub fn operation(&self) -> String {
        self.operation.clone()
    }

    /// Kernel actually used (median only).
    #[wasm_bindgen(getter)]
    pub fn kernel(&self) -> Option<u32> {
        self.kernel
    }

    /// Message to show when an invalid kernel was replaced by the default.
    #[wasm_bindgen(getter)]
    pub fn warning(&self) -> Option<String> {
        self.warning.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn preview(&self) -> Option<JsPreview> {
        self.preview.clone()
    }
}

impl JsApplyResult {
    pub(crate) fn from_outcome(request: &TransformRequest, outcome: ApplyOutcome) -> Self {
        match outcome {
            ApplyOutcome::Cancelled => Self {
                cancelled: true,
                operation: request.operation.id().to_string(),
                kernel: None,
                warning: None,
                preview: None,
            },
            ApplyOutcome::Applied(applied) => Self {
                cancelled: false,
                operation: applied.operation.id().to_string(),
                kernel: applied.kernel,
                warning: applied.warning.map(|w| w.to_string()),
                preview: Some(applied.preview.into()),
            },
        }
    }
}

/// One image editing session.
#[wasm_bindgen]
pub struct JsSession {
    inner: PreviewSync,
}

#[wasm_bindgen]
impl JsSession {
    /// Create a session from a config object (or `undefined` for defaults).
    ///
    /// Accepts the same keys as the TOML config file, e.g.
    /// `{ normalization: 'stretch', preview: { max_width: 640 } }`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsSession, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            PipelineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(js_error)?
        };
        Self::from_config(config).map_err(js_error)
    }

    /// Decode file bytes and make them the original.
    pub fn load(&mut self, bytes: &[u8]) -> Result<JsPreview, JsValue> {
        self.inner
            .load_bytes(bytes)
            .map(JsPreview::from)
            .map_err(js_error)
    }

    /// Make already-decoded pixels the original.
    pub fn load_image(&mut self, image: &JsImage) -> Result<JsPreview, JsValue> {
        let buffer = image.to_buffer().map_err(js_error)?;
        self.inner.load(buffer).map(JsPreview::from).map_err(js_error)
    }

    /// Run an operation by id. `kernel` is the value typed into the prompt.
    ///
    /// Use [`JsSession::apply_request`] to report a dismissed prompt.
    pub fn apply(&mut self, operation: &str, kernel: Option<i32>) -> Result<JsApplyResult, JsValue> {
        let request = Self::request(operation, kernel).map_err(js_error)?;
        self.run(&request)
    }

    /// Run a full request object:
    /// `{ operation: 'median', kernel: { kind: 'value', value: 5 } }`.
    pub fn apply_request(&mut self, request: JsValue) -> Result<JsApplyResult, JsValue> {
        let request: TransformRequest =
            serde_wasm_bindgen::from_value(request).map_err(js_error)?;
        self.run(&request)
    }

    #[wasm_bindgen(getter)]
    pub fn has_original(&self) -> bool {
        self.inner.store().has_original()
    }

    #[wasm_bindgen(getter)]
    pub fn has_modified(&self) -> bool {
        self.inner.store().has_modified()
    }

    /// Display rendering of the original.
    pub fn original_preview(&self) -> Result<JsPreview, JsValue> {
        self.inner
            .preview_original()
            .map(JsPreview::from)
            .map_err(js_error)
    }

    /// Display rendering of the latest result.
    pub fn modified_preview(&self) -> Result<JsPreview, JsValue> {
        self.inner
            .preview_modified()
            .map(JsPreview::from)
            .map_err(js_error)
    }

    /// Encode the latest result for download; `extension` picks the format
    /// (`png`, `jpg`, `jpeg`, `bmp`, `tiff`).
    pub fn encode_modified(&self, extension: &str) -> Result<Vec<u8>, JsValue> {
        let format = OutputFormat::from_extension(extension).map_err(js_error)?;
        self.inner.encode_modified(format).map_err(js_error)
    }
}

impl JsSession {
    /// Validate the config and disable the on-disk cache.
    pub(crate) fn from_config(mut config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        config.preview.cache_path = None;
        Ok(Self {
            inner: PreviewSync::new(config),
        })
    }

    pub(crate) fn request(
        operation: &str,
        kernel: Option<i32>,
    ) -> Result<TransformRequest, PipelineError> {
        let operation: Operation = operation.parse()?;
        Ok(match kernel {
            Some(k) => TransformRequest::with_kernel(operation, i64::from(k)),
            None => TransformRequest::new(operation),
        })
    }

    fn run(&mut self, request: &TransformRequest) -> Result<JsApplyResult, JsValue> {
        let outcome = self.inner.apply(request).map_err(js_error)?;
        let result = JsApplyResult::from_outcome(request, outcome);
        if let Some(warning) = &result.warning {
            web_sys::console::warn_1(&JsValue::from_str(warning));
        }
        Ok(result)
    }
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use serde::Serialize;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(Serialize)]
    struct TestConfig {
        seed: u64,
        normalization: &'static str,
    }

    fn loaded_session() -> JsSession {
        let config = serde_wasm_bindgen::to_value(&TestConfig {
            seed: 5,
            normalization: "stretch",
        })
        .unwrap();
        let mut session = JsSession::new(config).unwrap();
        session
            .load_image(&JsImage::new(20, 10, 1, (0..200).map(|v| v as u8).collect()))
            .unwrap();
        session
    }

    #[wasm_bindgen_test]
    fn test_new_with_undefined_uses_defaults() {
        assert!(JsSession::new(JsValue::UNDEFINED).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_new_rejects_unknown_keys() {
        #[derive(Serialize)]
        struct Bad {
            colour: &'static str,
        }
        let bad = serde_wasm_bindgen::to_value(&Bad { colour: "red" }).unwrap();
        assert!(JsSession::new(bad).is_err());
    }

    #[wasm_bindgen_test]
    fn test_apply_before_load_errors() {
        let mut session = JsSession::new(JsValue::UNDEFINED).unwrap();
        assert!(session.apply("negative", None).is_err());
        assert!(session.modified_preview().is_err());
    }

    #[wasm_bindgen_test]
    fn test_apply_and_encode() {
        let mut session = loaded_session();
        let result = session.apply("laplacian", None).unwrap();
        assert!(!result.cancelled());
        assert!(session.has_modified());

        let png = session.encode_modified("png").unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert!(session.encode_modified("gif").is_err());
    }

    #[wasm_bindgen_test]
    fn test_apply_request_cancelled() {
        #[derive(Serialize)]
        struct Kernel {
            kind: &'static str,
        }
        #[derive(Serialize)]
        struct Request {
            operation: &'static str,
            kernel: Kernel,
        }
        let mut session = loaded_session();
        let request = serde_wasm_bindgen::to_value(&Request {
            operation: "median",
            kernel: Kernel { kind: "cancelled" },
        })
        .unwrap();
        let result = session.apply_request(request).unwrap();
        assert!(result.cancelled());
        assert!(!session.has_modified());
    }
}
