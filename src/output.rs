//! Run summary returned by the extraction entry points.

use crate::error::ImageError;
use serde::{Deserialize, Serialize};

/// Counters for one extraction run.
///
/// Names and INE flags are written to disk as they are found; only their
/// counts are kept here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages that contained at least one embedded image.
    pub pages_with_images: usize,
    /// Images whose artifacts were all written.
    pub images_processed: usize,
    /// Images skipped after a failure (only under `ImageErrorPolicy::Skip`).
    pub images_failed: usize,
    /// Total `Nombre:` matches across all images.
    pub names_found: usize,
    /// Images whose text contained the INE keyword.
    pub ine_detections: usize,
    /// Wall-clock time of the run.
    pub duration_ms: u64,
    /// Per-image failures, in processing order.
    pub failures: Vec<ImageError>,
}

impl ExtractionStats {
    /// Images encountered, successful or not.
    pub fn images_seen(&self) -> usize {
        self.images_processed + self.images_failed
    }
}
