//! Rule-based heading detection over font statistics.

use std::collections::HashMap;

use regex::Regex;

use super::fonts::FontStatistics;
use super::numbering::split_numbering;
use super::options::OutlineOptions;
use crate::model::{BoundingBox, HeadingLevel, Line, PositionedHeading};

/// A line accepted as a heading, level not yet assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    pub text: String,
    pub page_number: u32,
    pub font_size: f32,
    pub bbox: BoundingBox,
    pub bold: bool,
}

impl HeadingCandidate {
    pub fn from_line(line: &Line) -> Self {
        Self {
            text: line.text.clone(),
            page_number: line.page_number,
            font_size: line.font_size,
            bbox: line.bbox,
            bold: line.bold,
        }
    }

    /// Resolve the outline level and display text.
    ///
    /// A numeric dotted prefix decides the level and is stripped; otherwise the
    /// level comes from the font size rank, defaulting to H3.
    pub fn into_heading(self, stats: &FontStatistics) -> PositionedHeading {
        let (level, text) = match split_numbering(&self.text) {
            Some(numbered) => (numbered.level(), numbered.text.to_string()),
            None => (
                stats
                    .level_for_size(self.font_size)
                    .unwrap_or(HeadingLevel::H3),
                self.text,
            ),
        };
        PositionedHeading::new(level, text, self.page_number, self.bbox.y0)
    }
}

/// Why a line was not accepted as a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Not larger than body text and not bold
    BodySized,
    /// Sits at a vertical offset that repeats too often on its page
    RepeatedPosition,
    /// Names a calendar month
    DateLike,
    /// Looks like a version footer
    VersionString,
    /// Too few characters
    TooShort,
    /// Too many words for a heading
    TooLong,
    /// Fails every heading cue
    NotHeadingLike,
}

/// Heuristic heading classifier.
pub struct HeuristicClassifier<'a> {
    options: &'a OutlineOptions,
    stats: &'a FontStatistics,
    month_pattern: Regex,
    version_pattern: Regex,
}

impl<'a> HeuristicClassifier<'a> {
    /// Create a classifier for one document.
    pub fn new(options: &'a OutlineOptions, stats: &'a FontStatistics) -> Self {
        Self {
            options,
            stats,
            month_pattern: Regex::new(
                r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\b",
            )
            .unwrap(),
            version_pattern: Regex::new(r"(?i)version\s*\d+\.\d+").unwrap(),
        }
    }

    /// Collect heading candidates from every eligible page, in reading order.
    pub fn classify(&self, pages: &[Vec<Line>]) -> Vec<HeadingCandidate> {
        let mut candidates = Vec::new();

        for (idx, lines) in pages.iter().enumerate() {
            if idx == 0 && self.options.skip_first_page {
                continue;
            }

            let positions = position_counts(lines);
            for line in lines {
                let repeats = positions.get(&position_key(line)).copied().unwrap_or(0);
                match self.evaluate(line, repeats) {
                    None => candidates.push(HeadingCandidate::from_line(line)),
                    Some(reason) => {
                        log::trace!("Rejected {:?} on page {}: {:?}", line.text, line.page_number, reason)
                    }
                }
            }
        }

        log::debug!("Heuristic classifier accepted {} candidates", candidates.len());
        candidates
    }

    /// Apply the rejection rules in order; `None` means the line is a heading.
    pub fn evaluate(&self, line: &Line, position_repeats: usize) -> Option<Rejection> {
        let larger = self.stats.is_larger_than_body(line.font_size);
        if !larger && !line.bold {
            return Some(Rejection::BodySized);
        }

        if position_repeats > self.options.header_repeat_limit {
            return Some(Rejection::RepeatedPosition);
        }

        if let Some(reason) = self.noise(&line.text) {
            return Some(reason);
        }

        if line.bold || larger || looks_like_heading(&line.text) {
            None
        } else {
            Some(Rejection::NotHeadingLike)
        }
    }

    fn noise(&self, text: &str) -> Option<Rejection> {
        if text.chars().count() < self.options.min_heading_chars {
            return Some(Rejection::TooShort);
        }
        if self.month_pattern.is_match(text) {
            return Some(Rejection::DateLike);
        }
        if self.version_pattern.is_match(text) {
            return Some(Rejection::VersionString);
        }
        if text.split_whitespace().count() > self.options.max_heading_words {
            return Some(Rejection::TooLong);
        }
        None
    }
}

/// Title-cased, or ends with a colon.
pub fn looks_like_heading(text: &str) -> bool {
    let text = text.trim();
    if text.ends_with(':') {
        return true;
    }
    let mut words = text
        .split_whitespace()
        .filter_map(|w| w.chars().find(|c| c.is_alphabetic()))
        .peekable();
    words.peek().is_some() && words.all(char::is_uppercase)
}

fn position_key(line: &Line) -> i32 {
    line.bbox.y0.round() as i32
}

fn position_counts(lines: &[Line]) -> HashMap<i32, usize> {
    let mut counts = HashMap::new();
    for line in lines {
        *counts.entry(position_key(line)).or_insert(0) += 1;
    }
    counts
}
