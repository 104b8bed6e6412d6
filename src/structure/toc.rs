//! Outline taken from the document's embedded table of contents.

use crate::model::{HeadingLevel, PositionedHeading, TocEntry};

/// Convert TOC entries with nesting level 1..=3 into headings.
///
/// TOC entries carry no vertical position; they keep their TOC order within
/// a page because the assembler sorts stably.
pub fn toc_headings(toc: &[TocEntry]) -> Vec<PositionedHeading> {
    let headings: Vec<PositionedHeading> = toc
        .iter()
        .filter_map(|entry| {
            let level = HeadingLevel::from_toc_level(entry.level)?;
            let text = entry.title.split_whitespace().collect::<Vec<_>>().join(" ");
            Some(PositionedHeading::new(level, text, entry.page, 0.0))
        })
        .collect();
    log::debug!("Using embedded TOC: {} of {} entries kept", headings.len(), toc.len());
    headings
}
