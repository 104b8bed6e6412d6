//! Document title resolution.

use crate::model::{LayoutMetadata, Line};

/// Title used when nothing better is found.
pub const DEFAULT_TITLE: &str = "Untitled Document";

/// Picks the document title from metadata or the leading pages.
#[derive(Debug, Clone, Copy)]
pub struct TitleResolver {
    scan_pages: usize,
    prefer_metadata: bool,
}

impl TitleResolver {
    pub fn new(scan_pages: usize, prefer_metadata: bool) -> Self {
        Self {
            scan_pages,
            prefer_metadata,
        }
    }

    /// Resolve the title of a document.
    ///
    /// A non-blank metadata title wins when preferred. Otherwise the line with
    /// the largest font in the first `scan_pages` pages is used, the earliest
    /// one on ties.
    pub fn resolve(&self, metadata: &LayoutMetadata, pages: &[Vec<Line>]) -> String {
        let from_metadata = metadata
            .title
            .as_deref()
            .map(collapse_whitespace)
            .filter(|t| !t.is_empty());

        if self.prefer_metadata {
            if let Some(title) = from_metadata {
                return title;
            }
        }

        self.largest_line(pages)
            .or(from_metadata)
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    fn largest_line(&self, pages: &[Vec<Line>]) -> Option<String> {
        let mut best: Option<&Line> = None;
        for line in pages.iter().take(self.scan_pages).flatten() {
            if !line.font_size.is_finite() {
                continue;
            }
            if best.map_or(true, |b| line.font_size > b.font_size) {
                best = Some(line);
            }
        }
        best.map(|line| collapse_whitespace(&line.text))
            .filter(|t| !t.is_empty())
    }
}

impl Default for TitleResolver {
    fn default() -> Self {
        Self::new(1, true)
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
