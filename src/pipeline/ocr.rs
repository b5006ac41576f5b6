//! OCR: grayscale image → text.
//!
//! [`OcrEngine`] is the seam between the pipeline and whatever recognises
//! text. [`TesseractEngine`] runs the `tesseract` command-line tool on a
//! temporary PNG and reads the recognised text from stdout. The executable is
//! resolved once, when the engine is constructed, so a missing install fails
//! the run before any document is touched.

use crate::error::PdfOcrError;
use crate::pipeline::reader::ImageId;
use image::{GrayImage, ImageFormat};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Recognises text in a prepared image.
pub trait OcrEngine {
    /// Return the recognised text verbatim (no trimming).
    fn recognize(&self, image: &GrayImage, id: ImageId) -> Result<String, PdfOcrError>;
}

/// [`OcrEngine`] that shells out to the `tesseract` executable.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    executable: PathBuf,
    language: Option<String>,
}

impl TesseractEngine {
    /// Resolve `command` (a bare name on `PATH` or a path) to an executable.
    ///
    /// # Errors
    /// [`PdfOcrError::OcrEngineNotFound`] when nothing executable is found.
    pub fn new(command: &str, language: Option<String>) -> Result<Self, PdfOcrError> {
        let executable = which::which(command).map_err(|e| PdfOcrError::OcrEngineNotFound {
            command: command.to_string(),
            detail: e.to_string(),
        })?;
        debug!("Using tesseract at {}", executable.display());
        Ok(Self {
            executable,
            language,
        })
    }

    fn command_for(&self, input: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(input).arg("stdout");
        if let Some(lang) = &self.language {
            cmd.arg("-l").arg(lang);
        }
        cmd
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &GrayImage, id: ImageId) -> Result<String, PdfOcrError> {
        let ocr_err = |detail: String| PdfOcrError::OcrFailed {
            page: id.page_num(),
            image: id.image_num(),
            detail,
        };

        // tesseract only reads from files; the temp file is removed on drop.
        let mut input = tempfile::Builder::new()
            .prefix("pdfocr-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| ocr_err(format!("temp file: {e}")))?;
        image
            .write_to(&mut input, ImageFormat::Png)
            .map_err(|e| ocr_err(format!("PNG encode: {e}")))?;
        input
            .flush()
            .map_err(|e| ocr_err(format!("temp file: {e}")))?;

        let output = self
            .command_for(input.path())
            .output()
            .map_err(|e| ocr_err(format!("failed to run {}: {e}", self.executable.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ocr_err(format!("{}: {}", output.status, stderr.trim())));
        }
        if !output.stderr.is_empty() {
            warn!(
                "tesseract on {}: {}",
                id.stem(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("OCR {} → {} chars", id.stem(), text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolvable_executable_is_configuration_error() {
        let err = TesseractEngine::new("/no/such/dir/tesseract-xyz", None).unwrap_err();
        assert!(matches!(err, PdfOcrError::OcrEngineNotFound { .. }));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn unknown_bare_name_is_configuration_error() {
        let err = TesseractEngine::new("pdfocr-no-such-ocr-binary", None).unwrap_err();
        assert!(err.to_string().contains("pdfocr-no-such-ocr-binary"));
    }

    #[cfg(unix)]
    #[test]
    fn command_line_includes_language() {
        let engine = TesseractEngine {
            executable: PathBuf::from("/usr/bin/tesseract"),
            language: Some("spa".into()),
        };
        let cmd = engine.command_for(Path::new("/tmp/in.png"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, ["/tmp/in.png", "stdout", "-l", "spa"]);
    }

    #[cfg(unix)]
    #[test]
    fn runs_executable_and_returns_stdout_verbatim() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-tesseract");
        std::fs::write(&script, "#!/bin/sh\nprintf 'Nombre: Pedro\\n'\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let engine = TesseractEngine::new(script.to_str().unwrap(), None).unwrap();
        let text = engine
            .recognize(&GrayImage::new(2, 2), ImageId::new(0, 0))
            .unwrap();
        assert_eq!(text, "Nombre: Pedro\n");
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_ocr_failure() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("broken-tesseract");
        std::fs::write(&script, "#!/bin/sh\necho 'bad input' >&2\nexit 1\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let engine = TesseractEngine::new(script.to_str().unwrap(), None).unwrap();
        let err = engine
            .recognize(&GrayImage::new(1, 1), ImageId::new(1, 2))
            .unwrap_err();
        assert!(matches!(err, PdfOcrError::OcrFailed { page: 2, image: 3, .. }));
        assert!(err.to_string().contains("bad input"));
    }
}
