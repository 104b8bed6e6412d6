//! Layout collaborator seam and line normalization.
//!
//! Turning a document's pages into styled spans is the job of an external
//! layout extractor. This module defines the contract the pipeline consumes
//! ([`LayoutSource`]), a reader for JSON layout dumps, and the normalizer that
//! consolidates spans into [`Line`](crate::model::Line) records.

mod normalizer;

pub use normalizer::LayoutNormalizer;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::RawLayout;

/// Source of raw layout data for a document.
///
/// Implementations must be shareable across batch workers.
pub trait LayoutSource: Send + Sync {
    /// Get the name of this source.
    fn name(&self) -> &str;

    /// Extract spans, TOC and metadata for the document at `path`.
    ///
    /// Fails with [`Error::DocumentNotFound`] when the document does not exist
    /// and [`Error::LayoutParse`] when it cannot be read.
    fn extract_layout(&self, path: &Path) -> Result<RawLayout>;
}

/// Reads layout dumps stored as JSON files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLayoutReader;

impl JsonLayoutReader {
    pub fn new() -> Self {
        Self
    }
}

impl LayoutSource for JsonLayoutReader {
    fn name(&self) -> &str {
        "json"
    }

    fn extract_layout(&self, path: &Path) -> Result<RawLayout> {
        if !path.exists() {
            return Err(Error::DocumentNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let layout = RawLayout::from_reader(BufReader::new(file)).map_err(|e| match e {
            Error::LayoutParse(msg) => Error::LayoutParse(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        log::debug!(
            "Read layout for {}: {} pages, {} TOC entries",
            path.display(),
            layout.pages.len(),
            layout.toc.len()
        );
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_document() {
        let reader = JsonLayoutReader::new();
        let result = reader.extract_layout(&PathBuf::from("/nonexistent/layout.json"));
        assert!(matches!(result, Err(Error::DocumentNotFound(_))));
    }
}
