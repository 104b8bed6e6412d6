//! Outline extraction options and configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Thresholds and policy flags for outline extraction and semantic links.
///
/// Every heuristic threshold lives here so extraction is a single
/// deterministic function of configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineOptions {
    /// Lines shorter than this (in characters) are dropped during normalization
    pub min_line_chars: usize,

    /// Exclude the first page from heading search (reserving it for the title)
    pub skip_first_page: bool,

    /// A vertical offset may repeat this many times on a page before lines at it are rejected
    pub header_repeat_limit: usize,

    /// Lines with more words than this are treated as body text
    pub max_heading_words: usize,

    /// Lines with fewer characters than this are never headings
    pub min_heading_chars: usize,

    /// Maximum vertical gap between wrapped heading lines
    pub merge_gap: f32,

    /// Maximum font size difference between wrapped heading lines
    pub merge_font_delta: f32,

    /// An embedded TOC is used when it has more entries than this
    pub toc_min_entries: usize,

    /// Path used when the TOC is absent or sparse
    pub fallback: FallbackStrategy,

    /// Number of leading pages scanned for the title
    pub title_scan_pages: usize,

    /// Prefer the title stored in document metadata
    pub prefer_metadata_title: bool,

    /// Semantic links need a score strictly above this
    pub similarity_threshold: f32,

    /// Maximum links per source heading
    pub top_k: usize,

    /// Where semantic link headings come from
    pub link_source: LinkSource,

    /// Whether batch processing runs documents in parallel
    pub parallel: bool,
}

impl OutlineOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON file; missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let options: OutlineOptions = serde_json::from_str(&content)
            .map_err(|e| Error::InvalidConfig(format!("{}: {}", path.as_ref().display(), e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Set the minimum line length.
    pub fn with_min_line_chars(mut self, chars: usize) -> Self {
        self.min_line_chars = chars;
        self
    }

    /// Exclude or include the first page in heading search.
    pub fn with_skip_first_page(mut self, skip: bool) -> Self {
        self.skip_first_page = skip;
        self
    }

    /// Set the running header/footer repeat limit.
    pub fn with_header_repeat_limit(mut self, limit: usize) -> Self {
        self.header_repeat_limit = limit;
        self
    }

    /// Set the heading word-count ceiling.
    pub fn with_max_heading_words(mut self, words: usize) -> Self {
        self.max_heading_words = words;
        self
    }

    /// Set the multi-line merge thresholds.
    pub fn with_merge_thresholds(mut self, gap: f32, font_delta: f32) -> Self {
        self.merge_gap = gap;
        self.merge_font_delta = font_delta;
        self
    }

    /// Set the TOC entry threshold.
    pub fn with_toc_min_entries(mut self, entries: usize) -> Self {
        self.toc_min_entries = entries;
        self
    }

    /// Set the fallback strategy.
    pub fn with_fallback(mut self, fallback: FallbackStrategy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Use the trained classifier when the TOC is unusable.
    pub fn classifier_fallback(mut self) -> Self {
        self.fallback = FallbackStrategy::Classifier;
        self
    }

    /// Set the number of pages scanned for the title.
    pub fn with_title_scan_pages(mut self, pages: usize) -> Self {
        self.title_scan_pages = pages;
        self
    }

    /// Prefer or ignore the metadata title.
    pub fn with_metadata_title(mut self, prefer: bool) -> Self {
        self.prefer_metadata_title = prefer;
        self
    }

    /// Set the semantic link cutoff.
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the number of links kept per source heading.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the semantic link heading source.
    pub fn with_link_source(mut self, source: LinkSource) -> Self {
        self.link_source = source;
        self
    }

    /// Enable or disable parallel batch processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check that thresholds are usable.
    pub fn validate(&self) -> Result<()> {
        if !self.merge_gap.is_finite() || self.merge_gap < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "merge_gap must be a non-negative number, got {}",
                self.merge_gap
            )));
        }
        if !self.merge_font_delta.is_finite() || self.merge_font_delta < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "merge_font_delta must be a non-negative number, got {}",
                self.merge_font_delta
            )));
        }
        if !(-1.0..=1.0).contains(&self.similarity_threshold) {
            return Err(Error::InvalidConfig(format!(
                "similarity_threshold must be within [-1, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.max_heading_words == 0 {
            return Err(Error::InvalidConfig(
                "max_heading_words must be at least 1".to_string(),
            ));
        }
        if let LinkSource::LargeText { min_font_size, .. } = self.link_source {
            if !min_font_size.is_finite() {
                return Err(Error::InvalidConfig(
                    "link_source.min_font_size must be a number".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            min_line_chars: 3,
            skip_first_page: false,
            header_repeat_limit: 2,
            max_heading_words: 20,
            min_heading_chars: 3,
            merge_gap: 15.0,
            merge_font_delta: 1.5,
            toc_min_entries: 3,
            fallback: FallbackStrategy::Auto,
            title_scan_pages: 1,
            prefer_metadata_title: true,
            similarity_threshold: 0.5,
            top_k: 3,
            link_source: LinkSource::Outline,
            parallel: true,
        }
    }
}

/// Extraction path used when no usable TOC exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    /// Trained classifier when one is loaded; otherwise heuristics, reported
    /// with a missing-model warning
    #[default]
    Auto,
    /// Font-statistics heuristics plus multi-line merging
    Heuristic,
    /// Trained classifier; an empty outline is reported when no model is loaded
    Classifier,
}

/// Heading source for semantic links.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSource {
    /// Headings of the extracted outline
    #[default]
    Outline,
    /// Lines set in a large font, re-extracted independently of the outline
    LargeText {
        /// Lines must be set strictly larger than this
        min_font_size: f32,
        /// Lines must be strictly longer than this
        min_chars: usize,
    },
}

impl LinkSource {
    /// Large-text source with the stock thresholds (12pt, 5 characters).
    pub fn large_text() -> Self {
        LinkSource::LargeText {
            min_font_size: 12.0,
            min_chars: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = OutlineOptions::new()
            .with_skip_first_page(true)
            .with_merge_thresholds(20.0, 2.0)
            .classifier_fallback()
            .with_top_k(5)
            .sequential();

        assert!(options.skip_first_page);
        assert_eq!(options.merge_gap, 20.0);
        assert_eq!(options.merge_font_delta, 2.0);
        assert_eq!(options.fallback, FallbackStrategy::Classifier);
        assert_eq!(options.top_k, 5);
        assert!(!options.parallel);
    }

    #[test]
    fn test_default_options() {
        let options = OutlineOptions::default();
        assert!(!options.skip_first_page);
        assert_eq!(options.header_repeat_limit, 2);
        assert_eq!(options.toc_min_entries, 3);
        assert_eq!(options.similarity_threshold, 0.5);
        assert_eq!(options.top_k, 3);
        assert_eq!(options.fallback, FallbackStrategy::Auto);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options: OutlineOptions =
            serde_json::from_str(r#"{"skip_first_page": true, "fallback": "classifier"}"#)
                .unwrap();
        assert!(options.skip_first_page);
        assert_eq!(options.fallback, FallbackStrategy::Classifier);
        assert_eq!(options.max_heading_words, 20);
    }

    #[test]
    fn test_link_source_json() {
        let options: OutlineOptions = serde_json::from_str(
            r#"{"link_source": {"large_text": {"min_font_size": 14.0, "min_chars": 3}}}"#,
        )
        .unwrap();
        assert_eq!(
            options.link_source,
            LinkSource::LargeText {
                min_font_size: 14.0,
                min_chars: 3
            }
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(OutlineOptions::new()
            .with_similarity_threshold(1.5)
            .validate()
            .is_err());
        assert!(OutlineOptions::new()
            .with_merge_thresholds(-1.0, 1.0)
            .validate()
            .is_err());
        assert!(OutlineOptions::new()
            .with_max_heading_words(0)
            .validate()
            .is_err());
    }
}
