//! Joins heading text that wraps over several lines.

use super::heuristic::HeadingCandidate;

/// A wrapped line may overlap the previous one by at most this share of its font size.
const MAX_OVERLAP_RATIO: f32 = 0.5;

/// Merges runs of vertically adjacent candidates into single headings.
#[derive(Debug, Clone, Copy)]
pub struct HeadingMerger {
    /// Maximum gap between one line's bottom and the next line's top
    max_gap: f32,
    /// Maximum font size difference
    max_font_delta: f32,
}

impl HeadingMerger {
    pub fn new(max_gap: f32, max_font_delta: f32) -> Self {
        Self {
            max_gap,
            max_font_delta,
        }
    }

    /// Merge candidates in a single left-to-right sweep.
    ///
    /// The accumulating heading absorbs the next candidate while they share a
    /// page, sit within the gap and have similar font sizes, so a run of any
    /// length collapses into one heading.
    pub fn merge(&self, candidates: Vec<HeadingCandidate>) -> Vec<HeadingCandidate> {
        let input_len = candidates.len();
        let mut merged = Vec::with_capacity(input_len);
        let mut current: Option<HeadingCandidate> = None;

        for candidate in candidates {
            current = match current.take() {
                Some(mut acc) if self.continues(&acc, &candidate) => {
                    acc.text.push(' ');
                    acc.text.push_str(&candidate.text);
                    acc.bbox = acc.bbox.union(&candidate.bbox);
                    acc.bold |= candidate.bold;
                    Some(acc)
                }
                Some(acc) => {
                    merged.push(acc);
                    Some(candidate)
                }
                None => Some(candidate),
            };
        }
        merged.extend(current);

        if merged.len() != input_len {
            log::debug!("Merged {} candidates into {} headings", input_len, merged.len());
        }
        merged
    }

    fn continues(&self, acc: &HeadingCandidate, next: &HeadingCandidate) -> bool {
        if acc.page_number != next.page_number {
            return false;
        }
        let gap = next.bbox.y0 - acc.bbox.y1;
        // Lines sharing a row (side-by-side columns) overlap by about a full line height
        gap > -next.font_size * MAX_OVERLAP_RATIO
            && gap < self.max_gap
            && (acc.font_size - next.font_size).abs() <= self.max_font_delta
    }
}
