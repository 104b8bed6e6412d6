//! Plain text rendering for terminal output.

use crate::model::{DocumentStructure, HeadingLevel, SemanticLink};

/// Render a structure as an indented outline.
pub fn outline_to_text(structure: &DocumentStructure) -> String {
    let mut output = String::new();
    output.push_str(&structure.title);
    output.push('\n');

    for entry in &structure.outline {
        let indent = match entry.level {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        };
        output.push_str(&"  ".repeat(indent));
        output.push_str(&format!("{} {} (p. {})\n", entry.level, entry.text, entry.page_number));
    }

    output.trim_end().to_string()
}

/// Render links one per line.
pub fn links_to_text(links: &[SemanticLink]) -> String {
    links
        .iter()
        .map(|l| {
            format!(
                "{} (p. {}) -> {} (p. {}) [{:.2}]",
                l.source_heading, l.source_page, l.target_heading, l.target_page, l.score
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
