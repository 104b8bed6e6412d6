//! Document-wide font statistics.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{HeadingLevel, Line};

/// Size used when a document has no lines at all.
const DEFAULT_BODY_SIZE: f32 = 12.0;

/// Font statistics for heading detection.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// Body text font size (most common, smallest wins ties)
    pub body_size: f32,
    /// Most common font name
    pub body_font: Option<String>,
    /// Every font name seen
    pub unique_fonts: BTreeSet<String>,
    /// Distinct sizes larger than body, largest first
    pub heading_sizes: Vec<f32>,
    /// Observed sizes (tenths of a point) with frequency
    size_histogram: BTreeMap<i32, usize>,
    font_histogram: BTreeMap<String, usize>,
}

impl FontStatistics {
    /// Collect and analyze statistics over every line of a document.
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a Line>,
    {
        let mut stats = Self::default();
        for line in lines {
            stats.add_line(line);
        }
        stats.analyze();
        stats
    }

    /// Add a line observation.
    pub fn add_line(&mut self, line: &Line) {
        if line.font_size.is_finite() {
            self.add_size(line.font_size);
        }
        *self
            .font_histogram
            .entry(line.font_name.clone())
            .or_insert(0) += 1;
        self.unique_fonts.insert(line.font_name.clone());
    }

    /// Add a font size observation.
    pub fn add_size(&mut self, size: f32) {
        let key = size_key(size);
        *self.size_histogram.entry(key).or_insert(0) += 1;
    }

    /// Calculate body size, body font and heading sizes.
    pub fn analyze(&mut self) {
        self.body_font = mode_key(&self.font_histogram).cloned();

        // Ascending iteration with a strict comparison keeps the smallest
        // of several equally frequent sizes.
        let Some(body_key) = mode_key(&self.size_histogram).copied() else {
            self.body_size = DEFAULT_BODY_SIZE;
            self.heading_sizes.clear();
            return;
        };
        self.body_size = body_key as f32 / 10.0;

        self.heading_sizes = self
            .size_histogram
            .keys()
            .rev()
            .filter(|k| **k > body_key)
            .map(|k| *k as f32 / 10.0)
            .collect();

        log::debug!(
            "Font statistics: body {:.1}pt ({}), heading sizes {:?}",
            self.body_size,
            self.body_font.as_deref().unwrap_or("unknown"),
            self.heading_sizes
        );
    }

    /// Level derived from font size alone.
    ///
    /// The three largest sizes above body map to H1..H3; smaller heading sizes
    /// fall through to H3. Body-sized or smaller text gets `None`.
    pub fn level_for_size(&self, font_size: f32) -> Option<HeadingLevel> {
        if !self.is_larger_than_body(font_size) {
            return None;
        }
        let key = size_key(font_size);
        let rank = self
            .heading_sizes
            .iter()
            .position(|s| size_key(*s) == key)
            .unwrap_or(self.heading_sizes.len());
        Some(HeadingLevel::from_depth(rank))
    }

    /// Whether a size is strictly above body size.
    pub fn is_larger_than_body(&self, font_size: f32) -> bool {
        size_key(font_size) > size_key(self.body_size)
    }

    /// Whether `font_name` differs from the body font in a multi-font document.
    pub fn is_different_font(&self, font_name: &str) -> bool {
        self.unique_fonts.len() > 1 && self.body_font.as_deref() != Some(font_name)
    }

    /// Number of distinct sizes observed.
    pub fn distinct_sizes(&self) -> usize {
        self.size_histogram.len()
    }
}

/// Round to 0.1pt precision.
fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// Most frequent key; the first key in order wins ties.
fn mode_key<K: Ord>(histogram: &BTreeMap<K, usize>) -> Option<&K> {
    let mut best: Option<(&K, usize)> = None;
    for (key, count) in histogram {
        if best.map_or(true, |(_, c)| *count > c) {
            best = Some((key, *count));
        }
    }
    best.map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, PageDimensions};

    fn line(size: f32, font: &str) -> Line {
        Line {
            text: "sample".to_string(),
            font_size: size,
            font_name: font.to_string(),
            bold: false,
            italic: false,
            bbox: BoundingBox::new(0.0, 0.0, 100.0, size),
            page_number: 1,
            page: PageDimensions {
                width: 612.0,
                height: 792.0,
            },
        }
    }

    #[test]
    fn test_font_statistics() {
        let mut lines = Vec::new();
        lines.extend((0..100).map(|_| line(12.0, "Times")));
        lines.extend((0..5).map(|_| line(18.0, "Arial-Bold")));
        lines.extend((0..3).map(|_| line(24.0, "Arial-Bold")));
        lines.extend((0..2).map(|_| line(14.0, "Arial-Bold")));
        lines.push(line(13.0, "Arial"));

        let stats = FontStatistics::from_lines(&lines);

        assert!((stats.body_size - 12.0).abs() < 0.01);
        assert_eq!(stats.body_font.as_deref(), Some("Times"));
        assert_eq!(stats.heading_sizes, vec![24.0, 18.0, 14.0, 13.0]);
        assert_eq!(stats.level_for_size(12.0), None);
        assert_eq!(stats.level_for_size(10.0), None);
        assert_eq!(stats.level_for_size(24.0), Some(HeadingLevel::H1));
        assert_eq!(stats.level_for_size(18.0), Some(HeadingLevel::H2));
        assert_eq!(stats.level_for_size(14.0), Some(HeadingLevel::H3));
        // Beyond the third larger size
        assert_eq!(stats.level_for_size(13.0), Some(HeadingLevel::H3));
    }

    #[test]
    fn test_body_size_tie_prefers_smallest() {
        let mut lines = Vec::new();
        lines.extend((0..4).map(|_| line(11.0, "Times")));
        lines.extend((0..4).map(|_| line(10.0, "Times")));
        lines.push(line(16.0, "Times"));

        let stats = FontStatistics::from_lines(&lines);
        assert_eq!(stats.body_size, 10.0);
        assert_eq!(stats.heading_sizes, vec![16.0, 11.0]);
    }

    #[test]
    fn test_empty_document_defaults() {
        let stats = FontStatistics::from_lines(std::iter::empty());
        assert_eq!(stats.body_size, DEFAULT_BODY_SIZE);
        assert!(stats.heading_sizes.is_empty());
        assert!(stats.body_font.is_none());
    }

    #[test]
    fn test_different_font() {
        let lines = vec![line(10.0, "Times"), line(10.0, "Times"), line(14.0, "Arial")];
        let stats = FontStatistics::from_lines(&lines);
        assert!(stats.is_different_font("Arial"));
        assert!(!stats.is_different_font("Times"));

        let single = FontStatistics::from_lines(&[line(10.0, "Times")]);
        assert!(!single.is_different_font("Arial"));
    }
}
