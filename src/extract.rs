//! Extraction entry points and the orchestrating pipeline.
//!
//! [`extract`] is the one-call API: it resolves the tesseract executable,
//! binds pdfium, and runs an [`ExtractionPipeline`] over the document.
//! Callers that bring their own [`DocumentReader`] or [`OcrEngine`] build the
//! pipeline directly.
//!
//! The run is strictly sequential: one page, one image, one OCR call at a
//! time. Each image's buffers are dropped before the next image is decoded.

use crate::config::{ExtractionConfig, ImageErrorPolicy};
use crate::error::{ImageError, PdfOcrError};
use crate::output::ExtractionStats;
use crate::pipeline::ocr::{OcrEngine, TesseractEngine};
use crate::pipeline::reader::{Document, DocumentReader, ImageDescriptor, PdfiumReader};
use crate::pipeline::write::OutputLayout;
use crate::pipeline::{prepare, scan};
use crate::progress::ExtractionProgressCallback;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Extract, OCR, and scan every embedded image of a PDF.
///
/// # Arguments
/// * `pdf_path` — local PDF file
/// * `config`   — output folders, OCR engine, and error policy
///
/// # Errors
/// * configuration errors ([`PdfOcrError::OcrEngineNotFound`],
///   [`PdfOcrError::PdfiumBindingFailed`]) before anything is written;
/// * open errors after the output folders were created but before any file
///   is written into them;
/// * the first per-image error under [`ImageErrorPolicy::Abort`].
pub fn extract(
    pdf_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, PdfOcrError> {
    let pdf_path = pdf_path.as_ref();
    info!("Starting extraction: {}", pdf_path.display());

    let ocr = TesseractEngine::new(&config.tesseract_cmd, config.ocr_language.clone())?;
    let reader = PdfiumReader::bind(config.pdfium_lib_path.as_deref(), config.password.clone())?;

    ExtractionPipeline::new(config, &ocr).run(&reader, pdf_path)
}

/// What one successfully processed image produced.
struct ImageOutcome {
    /// In characters, not bytes.
    text_len: usize,
    names: usize,
    ine_detected: bool,
}

/// Drives a [`DocumentReader`] and an [`OcrEngine`] over one document and
/// writes every artifact into the configured [`OutputLayout`].
pub struct ExtractionPipeline<'a> {
    config: &'a ExtractionConfig,
    ocr: &'a dyn OcrEngine,
    layout: OutputLayout,
}

impl<'a> ExtractionPipeline<'a> {
    pub fn new(config: &'a ExtractionConfig, ocr: &'a dyn OcrEngine) -> Self {
        Self {
            config,
            ocr,
            layout: OutputLayout::from_config(config),
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Process `pdf_path` page by page.
    ///
    /// Pages without embedded images produce no files at all. The document
    /// is dropped, and therefore closed, on every return path.
    pub fn run(
        &self,
        reader: &dyn DocumentReader,
        pdf_path: &Path,
    ) -> Result<ExtractionStats, PdfOcrError> {
        let start = Instant::now();

        // ── Step 1: Output folders ───────────────────────────────────────
        self.layout.ensure_dirs()?;

        // ── Step 2: Open ─────────────────────────────────────────────────
        let document = reader.open(pdf_path).inspect_err(|e| {
            error!("Failed to open PDF '{}': {}", pdf_path.display(), e);
        })?;

        let total_pages = document.page_count();
        info!("PDF has {} pages", total_pages);
        if let Some(cb) = self.progress() {
            cb.on_extraction_start(total_pages);
        }

        let mut stats = ExtractionStats {
            total_pages,
            ..ExtractionStats::default()
        };

        // ── Step 3: Pages → images ───────────────────────────────────────
        for page_index in 0..total_pages {
            let images = document.list_images(page_index)?;
            if images.is_empty() {
                debug!("Page {}: no images, skipping", page_index + 1);
                continue;
            }
            stats.pages_with_images += 1;
            if let Some(cb) = self.progress() {
                cb.on_page_start(page_index + 1, images.len());
            }

            for descriptor in &images {
                let id = descriptor.id;
                match self.process_image(document.as_ref(), descriptor) {
                    Ok(outcome) => {
                        stats.images_processed += 1;
                        stats.names_found += outcome.names;
                        stats.ine_detections += usize::from(outcome.ine_detected);
                        if let Some(cb) = self.progress() {
                            cb.on_image_complete(id.page_num(), id.image_num(), outcome.text_len);
                        }
                    }
                    Err(e) => {
                        if let Some(cb) = self.progress() {
                            cb.on_image_error(id.page_num(), id.image_num(), &e.to_string());
                        }
                        match self.config.on_image_error {
                            ImageErrorPolicy::Abort => {
                                error!("Aborting at {}: {}", id.stem(), e);
                                return Err(e);
                            }
                            ImageErrorPolicy::Skip => {
                                warn!("Skipping {}: {}", id.stem(), e);
                                stats.images_failed += 1;
                                stats.failures.push(ImageError {
                                    page: id.page_num(),
                                    image: id.image_num(),
                                    detail: e.to_string(),
                                });
                            }
                        }
                    }
                }
            }
        }

        // ── Step 4: Close ────────────────────────────────────────────────
        drop(document);

        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Extraction complete: {} images from {}/{} pages ({} failed, {} names, {} INE) in {}ms",
            stats.images_processed,
            stats.pages_with_images,
            stats.total_pages,
            stats.images_failed,
            stats.names_found,
            stats.ine_detections,
            stats.duration_ms
        );
        if let Some(cb) = self.progress() {
            cb.on_extraction_complete(stats.images_processed, stats.images_failed);
        }

        Ok(stats)
    }

    /// normalise → grayscale → OCR → text, names, INE marker, JPEG.
    fn process_image(
        &self,
        document: &dyn Document,
        descriptor: &ImageDescriptor,
    ) -> Result<ImageOutcome, PdfOcrError> {
        let id = descriptor.id;

        let embedded = document.extract_image(descriptor)?;
        let rgb = prepare::normalize_color_space(&embedded)?;
        drop(embedded);
        let gray = prepare::to_grayscale(&rgb);
        drop(rgb);

        let text = self.ocr.recognize(&gray, id)?;
        self.layout.write_text(id, &text)?;

        let names = scan::extract_names(&text);
        self.layout.append_names(id, &names)?;

        let ine_detected = scan::contains_ine_keyword(&text);
        if ine_detected {
            info!("INE credential detected in {}", id.stem());
            self.layout.write_ine_marker(id)?;
        }

        prepare::save_image(&gray, &self.layout.image_dir, id)?;

        Ok(ImageOutcome {
            text_len: text.chars().count(),
            names: names.len(),
            ine_detected,
        })
    }

    fn progress(&self) -> Option<&dyn ExtractionProgressCallback> {
        self.config.progress_callback.as_deref()
    }
}
