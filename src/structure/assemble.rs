//! Final outline assembly: dedup, title removal and ordering.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

use crate::model::{DocumentStructure, OutlineEntry, PositionedHeading};

/// Comparison key for heading and title text.
///
/// NFKC-normalized, lowercased, whitespace collapsed.
pub fn normalize_text(text: &str) -> String {
    let folded: String = text.nfkc().collect::<String>().to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Apply the outline invariants and order headings for output.
///
/// Returns the positioned headings that survive, sorted by page then vertical
/// position. The sort is stable, so headings without a position keep their
/// production order within a page.
pub fn assemble_headings(title: &str, headings: Vec<PositionedHeading>) -> Vec<PositionedHeading> {
    let title_key = normalize_text(title);
    let mut seen: HashSet<(String, u32)> = HashSet::new();

    let mut kept: Vec<PositionedHeading> = headings
        .into_iter()
        .filter(|heading| {
            let key = normalize_text(&heading.text);
            !key.is_empty() && key != title_key && seen.insert((key, heading.page_number))
        })
        .collect();

    kept.sort_by(|a, b| {
        a.page_number
            .cmp(&b.page_number)
            .then_with(|| a.y0.total_cmp(&b.y0))
    });
    kept
}

/// Build the public structure, dropping vertical positions.
pub fn assemble(title: String, headings: Vec<PositionedHeading>) -> DocumentStructure {
    let outline: Vec<OutlineEntry> = assemble_headings(&title, headings)
        .into_iter()
        .map(OutlineEntry::from)
        .collect();
    DocumentStructure { title, outline }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    fn heading(level: HeadingLevel, text: &str, page: u32, y0: f32) -> PositionedHeading {
        PositionedHeading::new(level, text, page, y0)
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Project   OVERVIEW "), "project overview");
        // Fullwidth letters and ligatures fold under NFKC
        assert_eq!(normalize_text("Ｒｅｓｕｌｔｓ"), "results");
        assert_eq!(normalize_text("\u{FB01}nal notes"), "final notes");
    }

    #[test]
    fn test_dedup_by_text_and_page() {
        let structure = assemble(
            "Report".to_string(),
            vec![
                heading(HeadingLevel::H1, "Summary", 2, 100.0),
                heading(HeadingLevel::H2, "summary ", 2, 300.0),
                heading(HeadingLevel::H1, "Summary", 3, 100.0),
            ],
        );
        assert_eq!(structure.outline.len(), 2);
        assert_eq!(structure.outline[0].level, HeadingLevel::H1);
        assert_eq!(structure.outline[0].page_number, 2);
        assert_eq!(structure.outline[1].page_number, 3);
    }

    #[test]
    fn test_title_removed_from_outline() {
        let structure = assemble(
            "Annual  Report".to_string(),
            vec![
                heading(HeadingLevel::H1, "ANNUAL REPORT", 1, 50.0),
                heading(HeadingLevel::H1, "Financials", 2, 80.0),
            ],
        );
        assert_eq!(structure.title, "Annual  Report");
        assert_eq!(structure.outline.len(), 1);
        assert_eq!(structure.outline[0].text, "Financials");
    }

    #[test]
    fn test_ordered_by_page_then_position() {
        let headings = assemble_headings(
            "Title",
            vec![
                heading(HeadingLevel::H2, "Lower", 2, 500.0),
                heading(HeadingLevel::H1, "Later Page", 3, 10.0),
                heading(HeadingLevel::H1, "Upper", 2, 100.0),
                heading(HeadingLevel::H1, "First Page", 1, 700.0),
            ],
        );
        let order: Vec<&str> = headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(order, vec!["First Page", "Upper", "Lower", "Later Page"]);
    }

    #[test]
    fn test_stable_for_equal_positions() {
        let headings = assemble_headings(
            "Title",
            vec![
                heading(HeadingLevel::H1, "Part One", 4, 0.0),
                heading(HeadingLevel::H2, "Part One Detail", 4, 0.0),
                heading(HeadingLevel::H1, "Part Zero", 2, 0.0),
            ],
        );
        let order: Vec<&str> = headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(order, vec!["Part Zero", "Part One", "Part One Detail"]);
    }
}
