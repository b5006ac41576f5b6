//! Output layout: where each artifact of an image lands on disk.
//!
//! ```text
//! {images}/page_{p}_image_{i}.jpeg
//! {text}/page_{p}_image_{i}.txt                 OCR text, overwritten
//! {text}/page_{p}_image_{i}_INE_detected.txt    only when the keyword is found
//! {names}/page_{p}_image_{i}.txt                appended, one line per name
//! ```
//!
//! `p` and `i` are 1-indexed. Names files are opened in append mode, so a
//! second run over the same document duplicates their lines while every other
//! artifact is simply rewritten.

use crate::config::ExtractionConfig;
use crate::error::PdfOcrError;
use crate::pipeline::reader::ImageId;
use crate::pipeline::scan::{format_name_line, INE_DETECTED_MESSAGE};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The three output folders of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub image_dir: PathBuf,
    pub text_dir: PathBuf,
    pub names_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(
        image_dir: impl Into<PathBuf>,
        text_dir: impl Into<PathBuf>,
        names_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            image_dir: image_dir.into(),
            text_dir: text_dir.into(),
            names_dir: names_dir.into(),
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(&config.image_dir, &config.text_dir, &config.names_dir)
    }

    /// Create all three folders (and parents). Existing folders are fine.
    pub fn ensure_dirs(&self) -> Result<(), PdfOcrError> {
        for dir in [&self.image_dir, &self.text_dir, &self.names_dir] {
            std::fs::create_dir_all(dir).map_err(|e| PdfOcrError::OutputWriteFailed {
                path: dir.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    pub fn text_path(&self, id: ImageId) -> PathBuf {
        self.text_dir.join(format!("{}.txt", id.stem()))
    }

    pub fn names_path(&self, id: ImageId) -> PathBuf {
        self.names_dir.join(format!("{}.txt", id.stem()))
    }

    pub fn ine_path(&self, id: ImageId) -> PathBuf {
        self.text_dir.join(format!("{}_INE_detected.txt", id.stem()))
    }

    /// Write OCR text verbatim, replacing any previous file.
    pub fn write_text(&self, id: ImageId, text: &str) -> Result<PathBuf, PdfOcrError> {
        let path = self.text_path(id);
        std::fs::write(&path, text).map_err(|e| write_error(&path, e))?;
        debug!("Wrote {} ({} bytes)", path.display(), text.len());
        Ok(path)
    }

    /// Append one `Nombre: …` line per name. Does nothing for an empty slice.
    pub fn append_names(&self, id: ImageId, names: &[&str]) -> Result<Option<PathBuf>, PdfOcrError> {
        if names.is_empty() {
            return Ok(None);
        }
        let path = self.names_path(id);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| write_error(&path, e))?;
        for name in names {
            file.write_all(format_name_line(name).as_bytes())
                .map_err(|e| write_error(&path, e))?;
        }
        debug!("Appended {} names to {}", names.len(), path.display());
        Ok(Some(path))
    }

    /// Write the fixed INE detection marker.
    pub fn write_ine_marker(&self, id: ImageId) -> Result<PathBuf, PdfOcrError> {
        let path = self.ine_path(id);
        std::fs::write(&path, INE_DETECTED_MESSAGE).map_err(|e| write_error(&path, e))?;
        Ok(path)
    }
}

fn write_error(path: &Path, source: std::io::Error) -> PdfOcrError {
    PdfOcrError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(root: &Path) -> OutputLayout {
        OutputLayout::new(root.join("img"), root.join("txt"), root.join("names"))
    }

    #[test]
    fn ensure_dirs_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputLayout::new(
            tmp.path().join("a/b/img"),
            tmp.path().join("txt"),
            tmp.path().join("names"),
        );
        out.ensure_dirs().unwrap();
        out.ensure_dirs().unwrap();
        assert!(out.image_dir.is_dir());
        assert!(out.text_dir.is_dir());
        assert!(out.names_dir.is_dir());
    }

    #[test]
    fn paths_follow_naming_scheme() {
        let out = OutputLayout::new("i", "t", "n");
        let id = ImageId::new(1, 0);
        assert_eq!(out.text_path(id), PathBuf::from("t/page_2_image_1.txt"));
        assert_eq!(out.names_path(id), PathBuf::from("n/page_2_image_1.txt"));
        assert_eq!(
            out.ine_path(id),
            PathBuf::from("t/page_2_image_1_INE_detected.txt")
        );
    }

    #[test]
    fn write_text_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let out = layout(tmp.path());
        out.ensure_dirs().unwrap();
        let id = ImageId::new(0, 0);
        out.write_text(id, "first version").unwrap();
        let path = out.write_text(id, "second").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn append_names_accumulates_across_calls() {
        let tmp = tempfile::tempdir().unwrap();
        let out = layout(tmp.path());
        out.ensure_dirs().unwrap();
        let id = ImageId::new(0, 0);
        out.append_names(id, &["Juan", "ana"]).unwrap();
        let path = out.append_names(id, &["Juan", "ana"]).unwrap().unwrap();
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "Nombre: Juan\nNombre: ana\nNombre: Juan\nNombre: ana\n"
        );
    }

    #[test]
    fn append_no_names_creates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let out = layout(tmp.path());
        out.ensure_dirs().unwrap();
        let id = ImageId::new(0, 3);
        assert!(out.append_names(id, &[]).unwrap().is_none());
        assert!(!out.names_path(id).exists());
    }

    #[test]
    fn ine_marker_content() {
        let tmp = tempfile::tempdir().unwrap();
        let out = layout(tmp.path());
        out.ensure_dirs().unwrap();
        let path = out.write_ine_marker(ImageId::new(0, 0)).unwrap();
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "INE (Credencial para Votar) detectada en esta imagen.\n"
        );
    }

    #[test]
    fn write_into_missing_dir_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let out = layout(tmp.path());
        let err = out.write_text(ImageId::new(0, 0), "x").unwrap_err();
        assert!(matches!(err, PdfOcrError::OutputWriteFailed { .. }));
    }
}
