//! Error types for the edgequake-pdfocr library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PdfOcrError`] — **Fatal**: the run cannot proceed (document cannot be
//!   opened, OCR engine not installed, output directory not writable).
//!   Returned as `Err(PdfOcrError)` from [`crate::extract()`] and
//!   [`crate::ExtractionPipeline::run`].
//!
//! * [`ImageError`] — **Non-fatal**: a single embedded image failed while the
//!   pipeline runs with [`crate::config::ImageErrorPolicy::Skip`]. Collected
//!   in [`crate::output::ExtractionStats::failures`] so callers can inspect
//!   what was lost instead of losing the whole document to one bad image.
//!
//! With the default [`crate::config::ImageErrorPolicy::Abort`] every per-image
//! failure is fatal and surfaces as a [`PdfOcrError`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdfocr library.
#[derive(Debug, Error)]
pub enum PdfOcrError {
    // ── Open errors ───────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    // ── Configuration errors ──────────────────────────────────────────────
    /// The OCR executable could not be resolved on PATH or at the given path.
    #[error(
        "Tesseract executable '{command}' could not be resolved: {detail}\n\
Install tesseract-ocr or point --tesseract / TESSERACT_CMD at the binary."
    )]
    OcrEngineNotFound { command: String, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide."
    )]
    PdfiumBindingFailed(String),

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Per-image errors ──────────────────────────────────────────────────
    /// pdfium could not load a page or one of its objects.
    #[error("Failed to read page {page}: {detail}")]
    PageAccessFailed { page: usize, detail: String },

    /// Raw image samples could not be turned into a decodable image.
    #[error("Page {page}, image {image}: image decoding failed: {detail}")]
    ImageDecodeFailed {
        page: usize,
        image: usize,
        detail: String,
    },

    /// The OCR engine ran but reported failure.
    #[error("Page {page}, image {image}: OCR failed: {detail}")]
    OcrFailed {
        page: usize,
        image: usize,
        detail: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create an output directory or write a text artifact.
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not encode or write the prepared JPEG.
    #[error("Failed to write image '{path}': {source}")]
    ImageWriteFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl PdfOcrError {
    /// The document could not be opened; nothing was extracted.
    pub fn is_open_error(&self) -> bool {
        matches!(
            self,
            PdfOcrError::FileNotFound { .. }
                | PdfOcrError::PermissionDenied { .. }
                | PdfOcrError::NotAPdf { .. }
                | PdfOcrError::CorruptPdf { .. }
                | PdfOcrError::PasswordRequired { .. }
                | PdfOcrError::WrongPassword { .. }
        )
    }

    /// The run could not start because of the environment or settings.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            PdfOcrError::OcrEngineNotFound { .. }
                | PdfOcrError::PdfiumBindingFailed(_)
                | PdfOcrError::InvalidConfig(_)
        )
    }
}

/// A non-fatal error for a single embedded image.
///
/// Page and image numbers are 1-indexed, matching the output file names.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
#[error("Page {page}, image {image}: {detail}")]
pub struct ImageError {
    pub page: usize,
    pub image: usize,
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_errors_are_classified() {
        let e = PdfOcrError::FileNotFound {
            path: PathBuf::from("missing.pdf"),
        };
        assert!(e.is_open_error());
        assert!(!e.is_configuration_error());

        let e = PdfOcrError::NotAPdf {
            path: PathBuf::from("notes.txt"),
            magic: *b"hell",
        };
        assert!(e.is_open_error());
    }

    #[test]
    fn configuration_errors_are_classified() {
        let e = PdfOcrError::OcrEngineNotFound {
            command: "tesseract".into(),
            detail: "cannot find binary path".into(),
        };
        assert!(e.is_configuration_error());
        assert!(!e.is_open_error());
        assert!(e.to_string().contains("TESSERACT_CMD"));
    }

    #[test]
    fn ocr_failed_display() {
        let e = PdfOcrError::OcrFailed {
            page: 2,
            image: 3,
            detail: "exit status 1".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Page 2, image 3"), "got: {msg}");
        assert!(!e.is_open_error());
    }

    #[test]
    fn image_error_display() {
        let e = ImageError {
            page: 1,
            image: 4,
            detail: "unsupported layout".into(),
        };
        assert_eq!(e.to_string(), "Page 1, image 4: unsupported layout");
    }
}
