//! # edgequake-pdfocr
//!
//! Pull the embedded images out of a PDF, OCR each one with Tesseract, and
//! harvest what scanned identity documents usually carry: the recognised
//! text, any `Nombre: …` names, and whether the page is an INE voter
//! credential ("INSTITUTO NACIONAL ELECTORAL").
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Open     pdfium, validate %PDF magic
//!  ├─ 2. Images   every image object, page by page, in document order
//!  ├─ 3. Prepare  colour space → RGB, then grayscale
//!  ├─ 4. OCR      tesseract on the grayscale image
//!  ├─ 5. Scan     `Nombre:` names, INE keyword
//!  └─ 6. Output   text / names / INE marker / JPEG per image
//! ```
//!
//! Pages without images produce no output. Everything runs on the calling
//! thread, one image at a time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdfocr::{extract, ExtractionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder()
//!         .output_dirs("out/imagenes", "out/textos", "out/nombres")
//!         .ocr_language("spa")
//!         .build()?;
//!     let stats = extract("credenciales.pdf", &config)?;
//!     eprintln!("{} images, {} names", stats.images_processed, stats.names_found);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfocr` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## External requirements
//!
//! * a pdfium shared library (system-wide, or `PDFIUM_LIB_PATH`)
//! * the `tesseract` executable (on `PATH`, or `TESSERACT_CMD`)

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, ImageErrorPolicy};
pub use error::{ImageError, PdfOcrError};
pub use extract::{extract, ExtractionPipeline};
pub use output::ExtractionStats;
pub use pipeline::ocr::{OcrEngine, TesseractEngine};
pub use pipeline::reader::{
    Document, DocumentReader, EmbeddedImage, ImageDescriptor, ImageId, PdfiumReader,
};
pub use pipeline::write::OutputLayout;
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
