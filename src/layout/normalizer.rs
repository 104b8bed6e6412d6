//! Consolidates raw spans into per-page lines.

use std::collections::HashMap;

use crate::model::{Line, PageDimensions, RawLayout, RawLine, RawPage, Span};

/// Groups collaborator rows into [`Line`] records.
///
/// Per line: text is the joined span text, font size the largest span size
/// rounded to a whole point, font name the most frequent span font (first seen
/// wins ties), bold/italic the OR across spans.
#[derive(Debug, Clone)]
pub struct LayoutNormalizer {
    min_line_chars: usize,
}

impl LayoutNormalizer {
    /// Create a normalizer dropping lines shorter than `min_line_chars`.
    pub fn new(min_line_chars: usize) -> Self {
        Self { min_line_chars }
    }

    /// Normalize every page, preserving page and reading order.
    pub fn normalize(&self, layout: &RawLayout) -> Vec<Vec<Line>> {
        layout
            .pages
            .iter()
            .map(|page| self.normalize_page(page))
            .collect()
    }

    /// Normalize a single page.
    pub fn normalize_page(&self, page: &RawPage) -> Vec<Line> {
        let dims = PageDimensions {
            width: page.width,
            height: page.height,
        };
        let lines: Vec<Line> = page
            .lines
            .iter()
            .filter_map(|raw| self.build_line(raw, page.number, dims))
            .collect();
        log::debug!(
            "Page {}: {} raw rows -> {} lines",
            page.number,
            page.lines.len(),
            lines.len()
        );
        lines
    }

    fn build_line(&self, raw: &RawLine, page_number: u32, page: PageDimensions) -> Option<Line> {
        let spans: Vec<&Span> = raw.spans.iter().filter(|s| !s.text.is_empty()).collect();
        if spans.is_empty() {
            return None;
        }

        let text = join_span_text(&spans);
        if text.is_empty() || text.chars().count() < self.min_line_chars {
            return None;
        }

        let font_size = spans
            .iter()
            .map(|s| s.font_size)
            .fold(f32::NEG_INFINITY, f32::max)
            .round();

        let bbox = raw.bbox.unwrap_or_else(|| {
            spans
                .iter()
                .skip(1)
                .fold(spans[0].bbox, |acc, s| acc.union(&s.bbox))
        });

        Some(Line {
            text,
            font_size,
            font_name: modal_font(&spans),
            bold: spans.iter().any(|s| s.is_bold()),
            italic: spans.iter().any(|s| s.is_italic()),
            bbox,
            page_number,
            page,
        })
    }
}

impl Default for LayoutNormalizer {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Join span texts, inserting a space only where neither side carries one.
///
/// No space is inserted between two CJK characters.
fn join_span_text(spans: &[&Span]) -> String {
    let mut result = String::new();

    for (i, span) in spans.iter().enumerate() {
        if i > 0 {
            let prev_last = spans[i - 1].text.chars().last();
            let curr_first = span.text.chars().next();

            let boundary_has_space = prev_last.map(char::is_whitespace).unwrap_or(true)
                || curr_first.map(char::is_whitespace).unwrap_or(true);
            let both_spaceless = prev_last.map(is_spaceless_script_char).unwrap_or(false)
                && curr_first.map(is_spaceless_script_char).unwrap_or(false);

            if !boundary_has_space && !both_spaceless {
                result.push(' ');
            }
        }
        result.push_str(&span.text);
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Most frequent font name; the earliest span wins ties.
fn modal_font(spans: &[&Span]) -> String {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, span) in spans.iter().enumerate() {
        let entry = counts.entry(span.font_name.as_str()).or_insert((0, idx));
        entry.0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(name, _)| name.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Characters of scripts written without spaces between words.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}' | // Hiragana
        '\u{30A0}'..='\u{30FF}' | // Katakana
        '\u{4E00}'..='\u{9FFF}' | // CJK Unified Ideographs
        '\u{3400}'..='\u{4DBF}' | // CJK Extension A
        '\u{F900}'..='\u{FAFF}' | // CJK Compatibility Ideographs
        '\u{0E00}'..='\u{0E7F}'   // Thai
    )
}

/// A raw line holding one span.
#[cfg(test)]
pub(crate) fn single_span_line(
    text: &str,
    font_size: f32,
    font_name: &str,
    bbox: crate::model::BoundingBox,
    page_number: u32,
) -> RawLine {
    RawLine::new(vec![Span::new(text, font_size, font_name, bbox, page_number)])
}
