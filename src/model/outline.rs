//! Outline output types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Outline nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Level for a 0-based depth, capped at H3.
    pub fn from_depth(depth: usize) -> Self {
        match depth {
            0 => HeadingLevel::H1,
            1 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    /// Level for a 1-based TOC nesting level; `None` beyond 3.
    pub fn from_toc_level(level: u32) -> Option<Self> {
        match level {
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeadingLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "H1" => Ok(HeadingLevel::H1),
            "H2" => Ok(HeadingLevel::H2),
            "H3" => Ok(HeadingLevel::H3),
            other => Err(Error::Other(format!("Unknown heading level: {}", other))),
        }
    }
}

/// A single outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// 1-based page number
    #[serde(rename = "page")]
    pub page_number: u32,
}

impl OutlineEntry {
    pub fn new(level: HeadingLevel, text: impl Into<String>, page_number: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page_number,
        }
    }
}

/// A heading with the vertical position used to order the outline.
///
/// The position never leaves the assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedHeading {
    pub level: HeadingLevel,
    pub text: String,
    pub page_number: u32,
    /// Top edge on the page
    pub y0: f32,
}

impl PositionedHeading {
    pub fn new(level: HeadingLevel, text: impl Into<String>, page_number: u32, y0: f32) -> Self {
        Self {
            level,
            text: text.into(),
            page_number,
            y0,
        }
    }
}

impl From<PositionedHeading> for OutlineEntry {
    fn from(heading: PositionedHeading) -> Self {
        OutlineEntry {
            level: heading.level,
            text: heading.text,
            page_number: heading.page_number,
        }
    }
}

/// Title plus ordered outline of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStructure {
    /// Resolved document title
    pub title: String,
    /// Headings ordered by page, then vertical position
    pub outline: Vec<OutlineEntry>,
}

impl DocumentStructure {
    /// A structure with a title and no headings.
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            outline: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Count headings at the given level.
    pub fn count_level(&self, level: HeadingLevel) -> usize {
        self.outline.iter().filter(|e| e.level == level).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_depth() {
        assert_eq!(HeadingLevel::from_depth(0), HeadingLevel::H1);
        assert_eq!(HeadingLevel::from_depth(1), HeadingLevel::H2);
        assert_eq!(HeadingLevel::from_depth(2), HeadingLevel::H3);
        assert_eq!(HeadingLevel::from_depth(7), HeadingLevel::H3);
    }

    #[test]
    fn test_level_from_toc() {
        assert_eq!(HeadingLevel::from_toc_level(1), Some(HeadingLevel::H1));
        assert_eq!(HeadingLevel::from_toc_level(3), Some(HeadingLevel::H3));
        assert_eq!(HeadingLevel::from_toc_level(4), None);
        assert_eq!(HeadingLevel::from_toc_level(0), None);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("h2".parse::<HeadingLevel>().unwrap(), HeadingLevel::H2);
        assert!("Body".parse::<HeadingLevel>().is_err());
    }

    #[test]
    fn test_structure_json_shape() {
        let structure = DocumentStructure {
            title: "Annual Report".to_string(),
            outline: vec![OutlineEntry::new(HeadingLevel::H1, "Overview", 2)],
        };
        let json = serde_json::to_string(&structure).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Annual Report","outline":[{"level":"H1","text":"Overview","page":2}]}"#
        );
    }
}
