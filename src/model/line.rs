//! Consolidated text lines.

use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// Page size in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageDimensions {
    pub width: f32,
    pub height: f32,
}

/// One visual row of text with unified font and position attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Joined span text, whitespace-collapsed
    pub text: String,
    /// Largest span size, rounded to a whole point
    pub font_size: f32,
    /// Most frequent span font
    pub font_name: String,
    /// Any span bold
    pub bold: bool,
    /// Any span italic
    pub italic: bool,
    /// Line-level box
    pub bbox: BoundingBox,
    /// 1-based page number
    pub page_number: u32,
    /// Size of the owning page
    pub page: PageDimensions,
}

impl Line {
    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the line is written in capitals only.
    pub fn is_all_caps(&self) -> bool {
        let mut letters = self.text.chars().filter(|c| c.is_alphabetic()).peekable();
        letters.peek().is_some() && self.char_count() > 1 && letters.all(|c| c.is_uppercase())
    }

    /// Whether the line carries everything classification needs.
    ///
    /// Lines failing this are skipped rather than classified.
    pub fn is_well_formed(&self) -> bool {
        self.font_size.is_finite()
            && self.font_size > 0.0
            && self.bbox.is_finite()
            && self.page.width.is_finite()
            && self.page.height.is_finite()
            && self.page.width > 0.0
            && self.page.height > 0.0
    }
}
