//! Section numbering prefixes ("1.2.3 Scope", "A. Appendix").

use std::sync::OnceLock;

use regex::Regex;

use crate::model::HeadingLevel;

fn dotted_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*(\d+(?:\.\d+)*)\.?\s+(\S.*)$").unwrap())
}

fn any_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*(?:\d+(?:\.\d+)*|[A-Z])\.?\s+(\S.*)$").unwrap())
}

/// A numeric dotted prefix split off a heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Numbered<'a> {
    /// Number of dots inside the prefix ("1" → 0, "1.2" → 1)
    pub depth: usize,
    /// Heading text after the prefix
    pub text: &'a str,
}

impl Numbered<'_> {
    /// Outline level implied by the prefix depth.
    pub fn level(&self) -> HeadingLevel {
        HeadingLevel::from_depth(self.depth)
    }
}

/// Split a leading "1.2.3 " style prefix off `text`.
pub fn split_numbering(text: &str) -> Option<Numbered<'_>> {
    let caps = dotted_prefix().captures(text)?;
    let prefix = caps.get(1)?.as_str();
    let rest = caps.get(2)?.as_str().trim_end();
    Some(Numbered {
        depth: prefix.matches('.').count(),
        text: rest,
    })
}

/// Whether the text opens with a section number or a single capital letter marker.
pub fn starts_with_marker(text: &str) -> bool {
    any_prefix().is_match(text)
}

/// Remove a numeric or letter section marker and collapse whitespace.
pub fn strip_marker(text: &str) -> String {
    let stripped = any_prefix()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text);
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_numbering_depth() {
        let n = split_numbering("1 Introduction").unwrap();
        assert_eq!((n.depth, n.text), (0, "Introduction"));
        assert_eq!(n.level(), HeadingLevel::H1);

        let n = split_numbering("1.1 Background").unwrap();
        assert_eq!((n.depth, n.text), (1, "Background"));
        assert_eq!(n.level(), HeadingLevel::H2);

        let n = split_numbering("2.3.1. Data Sources").unwrap();
        assert_eq!((n.depth, n.text), (2, "Data Sources"));
        assert_eq!(n.level(), HeadingLevel::H3);

        let n = split_numbering("4.1.2.7 Deep Nesting").unwrap();
        assert_eq!(n.level(), HeadingLevel::H3);
    }

    #[test]
    fn test_split_numbering_requires_text() {
        assert!(split_numbering("2024").is_none());
        assert!(split_numbering("3.14").is_none());
        assert!(split_numbering("Introduction").is_none());
        assert!(split_numbering("1.5x faster").is_none());
    }

    #[test]
    fn test_strip_marker() {
        assert_eq!(strip_marker("3.2  Results"), "Results");
        assert_eq!(strip_marker("A. Appendix"), "Appendix");
        assert_eq!(strip_marker("B Glossary"), "Glossary");
        assert_eq!(strip_marker("About this document"), "About this document");
        assert!(starts_with_marker("1.2 Scope"));
        assert!(starts_with_marker("C. Terms"));
        assert!(!starts_with_marker("Scope"));
    }
}
