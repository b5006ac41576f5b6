//! Configuration types for PDF image extraction and OCR.
//!
//! Every knob lives in [`ExtractionConfig`], built via its
//! [`ExtractionConfigBuilder`]. Paths that used to be embedded constants
//! (output folders, OCR executable) are plain fields here, so a run is fully
//! described by its config and nothing is read from process-wide state.

use crate::error::PdfOcrError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default folder for the grayscale JPEGs.
pub const DEFAULT_IMAGE_DIR: &str = "imagenes_extraidas";
/// Default folder for OCR text and INE markers.
pub const DEFAULT_TEXT_DIR: &str = "textos_extraidos";
/// Default folder for extracted names.
pub const DEFAULT_NAMES_DIR: &str = "nombres_extraidos";
/// Default OCR executable, resolved on `PATH`.
pub const DEFAULT_TESSERACT_CMD: &str = "tesseract";

/// Configuration for one extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_pdfocr::{ExtractionConfig, ImageErrorPolicy};
///
/// let config = ExtractionConfig::builder()
///     .image_dir("out/images")
///     .tesseract_cmd("/usr/bin/tesseract")
///     .ocr_language("spa")
///     .on_image_error(ImageErrorPolicy::Skip)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Folder receiving `page_{p}_image_{i}.jpeg`. Default: `imagenes_extraidas`.
    pub image_dir: PathBuf,

    /// Folder receiving OCR text and `_INE_detected` markers. Default: `textos_extraidos`.
    pub text_dir: PathBuf,

    /// Folder receiving appended `Nombre: …` lines. Default: `nombres_extraidos`.
    pub names_dir: PathBuf,

    /// Tesseract executable: a bare name looked up on `PATH`, or a path.
    /// Default: `tesseract`.
    pub tesseract_cmd: String,

    /// Tesseract language code passed as `-l`. `None` lets tesseract use
    /// its own default (`eng`).
    pub ocr_language: Option<String>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Explicit pdfium library file, or a directory holding it.
    /// `None` binds to the system library.
    pub pdfium_lib_path: Option<PathBuf>,

    /// What to do when a single image fails. Default: [`ImageErrorPolicy::Abort`].
    pub on_image_error: ImageErrorPolicy,

    /// Optional per-page / per-image progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            text_dir: PathBuf::from(DEFAULT_TEXT_DIR),
            names_dir: PathBuf::from(DEFAULT_NAMES_DIR),
            tesseract_cmd: DEFAULT_TESSERACT_CMD.to_string(),
            ocr_language: None,
            password: None,
            pdfium_lib_path: None,
            on_image_error: ImageErrorPolicy::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("image_dir", &self.image_dir)
            .field("text_dir", &self.text_dir)
            .field("names_dir", &self.names_dir)
            .field("tesseract_cmd", &self.tesseract_cmd)
            .field("ocr_language", &self.ocr_language)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field("on_image_error", &self.on_image_error)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.image_dir = dir.into();
        self
    }

    pub fn text_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.text_dir = dir.into();
        self
    }

    pub fn names_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.names_dir = dir.into();
        self
    }

    /// Set all three output folders at once.
    pub fn output_dirs(
        self,
        image_dir: impl Into<PathBuf>,
        text_dir: impl Into<PathBuf>,
        names_dir: impl Into<PathBuf>,
    ) -> Self {
        self.image_dir(image_dir)
            .text_dir(text_dir)
            .names_dir(names_dir)
    }

    pub fn tesseract_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.config.tesseract_cmd = cmd.into();
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = Some(lang.into());
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn on_image_error(mut self, policy: ImageErrorPolicy) -> Self {
        self.config.on_image_error = policy;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, PdfOcrError> {
        let c = &self.config;
        for (name, dir) in [
            ("image_dir", &c.image_dir),
            ("text_dir", &c.text_dir),
            ("names_dir", &c.names_dir),
        ] {
            if dir.as_os_str().is_empty() {
                return Err(PdfOcrError::InvalidConfig(format!(
                    "{name} must not be empty"
                )));
            }
        }
        if c.tesseract_cmd.trim().is_empty() {
            return Err(PdfOcrError::InvalidConfig(
                "tesseract_cmd must not be empty".into(),
            ));
        }
        if let Some(lang) = &c.ocr_language {
            if lang.trim().is_empty() {
                return Err(PdfOcrError::InvalidConfig(
                    "ocr_language must not be empty when set".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the pipeline reacts when one embedded image fails to decode, OCR, or
/// write.
///
/// | Policy | Behaviour |
/// |--------|-----------|
/// | `Abort` | stop the run and return the error; later images are not processed |
/// | `Skip`  | log a warning, record an [`crate::error::ImageError`], continue |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageErrorPolicy {
    /// First failure aborts the whole run. (default)
    #[default]
    Abort,
    /// Failures are isolated to the image that caused them.
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_historic_folder_names() {
        let c = ExtractionConfig::default();
        assert_eq!(c.image_dir, PathBuf::from("imagenes_extraidas"));
        assert_eq!(c.text_dir, PathBuf::from("textos_extraidos"));
        assert_eq!(c.names_dir, PathBuf::from("nombres_extraidos"));
        assert_eq!(c.tesseract_cmd, "tesseract");
        assert_eq!(c.on_image_error, ImageErrorPolicy::Abort);
    }

    #[test]
    fn builder_sets_fields() {
        let c = ExtractionConfig::builder()
            .output_dirs("a", "b", "c")
            .tesseract_cmd("/opt/tesseract/bin/tesseract")
            .ocr_language("spa")
            .password("secret")
            .on_image_error(ImageErrorPolicy::Skip)
            .build()
            .expect("valid config");
        assert_eq!(c.image_dir, PathBuf::from("a"));
        assert_eq!(c.text_dir, PathBuf::from("b"));
        assert_eq!(c.names_dir, PathBuf::from("c"));
        assert_eq!(c.ocr_language.as_deref(), Some("spa"));
        assert_eq!(c.on_image_error, ImageErrorPolicy::Skip);
    }

    #[test]
    fn empty_dir_rejected() {
        let err = ExtractionConfig::builder()
            .text_dir("")
            .build()
            .unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("text_dir"));
    }

    #[test]
    fn blank_tesseract_cmd_rejected() {
        let err = ExtractionConfig::builder()
            .tesseract_cmd("  ")
            .build()
            .unwrap_err();
        assert!(matches!(err, PdfOcrError::InvalidConfig(_)));
    }

    #[test]
    fn debug_redacts_password() {
        let c = ExtractionConfig::builder()
            .password("hunter2")
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }
}
