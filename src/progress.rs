//! Progress-callback trait for per-page and per-image extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the pipeline walks the document. The CLI uses it to drive its
//! progress bar; library callers can forward events wherever they like.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdfocr::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     images: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for CountingCallback {
//!     fn on_image_complete(&self, page_num: usize, image_num: usize, text_len: usize) {
//!         self.images.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("page {page_num} image {image_num}: {text_len} chars");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { images: AtomicUsize::new(0) });
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the extraction pipeline as it processes each page and image.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Page and image numbers are 1-indexed. The pipeline
/// is single-threaded, but the trait is `Send + Sync` so a config holding it
/// can be shared freely.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once after the document is opened.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called for every page that contains at least one image.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `image_count` — embedded images on this page
    fn on_page_start(&self, page_num: usize, image_count: usize) {
        let _ = (page_num, image_count);
    }

    /// Called when an image has been recognised and all its artifacts written.
    fn on_image_complete(&self, page_num: usize, image_num: usize, text_len: usize) {
        let _ = (page_num, image_num, text_len);
    }

    /// Called when an image fails, whether or not the run continues.
    fn on_image_error(&self, page_num: usize, image_num: usize, error: &str) {
        let _ = (page_num, image_num, error);
    }

    /// Called once after the last page, only when the run was not aborted.
    fn on_extraction_complete(&self, images_processed: usize, images_failed: usize) {
        let _ = (images_processed, images_failed);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        pages: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        processed: AtomicUsize,
    }

    impl ExtractionProgressCallback for TrackingCallback {
        fn on_page_start(&self, _page_num: usize, _image_count: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
        }

        fn on_image_complete(&self, _page_num: usize, _image_num: usize, _text_len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_image_error(&self, _page_num: usize, _image_num: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_extraction_complete(&self, images_processed: usize, _images_failed: usize) {
            self.processed.store(images_processed, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_extraction_start(5);
        cb.on_page_start(1, 2);
        cb.on_image_complete(1, 1, 42);
        cb.on_image_error(1, 2, "decode failed");
        cb.on_extraction_complete(1, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_page_start(1, 2);
        tracker.on_image_complete(1, 1, 10);
        tracker.on_image_error(1, 2, "ocr failed");
        tracker.on_extraction_complete(1, 1);

        assert_eq!(tracker.pages.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.processed.load(Ordering::SeqCst), 1);
    }
}
