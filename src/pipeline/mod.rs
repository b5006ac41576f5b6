//! Pipeline stages for PDF image extraction and OCR.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own and the PDF or OCR backend can be swapped without touching the rest.
//!
//! ## Data Flow
//!
//! ```text
//! reader ──▶ prepare ──▶ ocr ──▶ scan ──▶ write
//! (pdfium)   (RGB→L8)   (tesseract) (names, INE) (txt / jpeg)
//! ```
//!
//! 1. [`reader`]  — open the PDF, list and decode embedded images
//! 2. [`prepare`] — colour-space normalisation, grayscale, JPEG output
//! 3. [`ocr`]     — run the OCR engine on the grayscale image
//! 4. [`scan`]    — find `Nombre:` names and the INE keyword in the text
//! 5. [`write`]   — output folder layout and text artifacts

pub mod ocr;
pub mod prepare;
pub mod reader;
pub mod scan;
pub mod write;
