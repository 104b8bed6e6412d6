//! Raw layout types supplied by the layout collaborator.

use serde::{Deserialize, Serialize};

/// An axis-aligned box in page coordinates (y grows downwards).
///
/// Serialized as a `[x0, y0, x1, y1]` array, the shape layout dumps use.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Whether all four coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from(coords: [f32; 4]) -> Self {
        Self::new(coords[0], coords[1], coords[2], coords[3])
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.x0, bbox.y0, bbox.x1, bbox.y1]
    }
}

/// A styled text run as reported by the layout collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,
    /// Font size in points
    #[serde(alias = "size")]
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    #[serde(default, alias = "font")]
    pub font_name: String,
    /// Bold flag reported by the collaborator
    #[serde(default)]
    pub bold: bool,
    /// Italic flag reported by the collaborator
    #[serde(default)]
    pub italic: bool,
    /// Position on the page
    pub bbox: BoundingBox,
    /// 1-based page number (filled from the owning page when absent)
    #[serde(default)]
    pub page_number: u32,
}

impl Span {
    /// Create a new span, inferring bold/italic from the font name.
    pub fn new(
        text: impl Into<String>,
        font_size: f32,
        font_name: impl Into<String>,
        bbox: BoundingBox,
        page_number: u32,
    ) -> Self {
        let font_name = font_name.into();
        let (bold, italic) = infer_style(&font_name);
        Self {
            text: text.into(),
            font_size,
            font_name,
            bold,
            italic,
            bbox,
            page_number,
        }
    }

    /// Bold by flag or by font name.
    pub fn is_bold(&self) -> bool {
        self.bold || infer_style(&self.font_name).0
    }

    /// Italic by flag or by font name.
    pub fn is_italic(&self) -> bool {
        self.italic || infer_style(&self.font_name).1
    }
}

/// Infer (bold, italic) from a font name such as "Arial-BoldItalicMT".
pub fn infer_style(font_name: &str) -> (bool, bool) {
    let lower = font_name.to_lowercase();
    let bold = lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
    let italic = lower.contains("italic") || lower.contains("oblique");
    (bold, italic)
}

/// One visual row of spans, grouped by the collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    /// Spans in reading order
    #[serde(default)]
    pub spans: Vec<Span>,
    /// Line-level box, when the collaborator reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

impl RawLine {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans, bbox: None }
    }
}

/// A page of raw layout data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    /// 1-based page number (0 means "use the page's position")
    #[serde(default)]
    pub number: u32,
    /// Page width in layout units
    pub width: f32,
    /// Page height in layout units
    pub height: f32,
    /// Lines in top-to-bottom, left-to-right order
    #[serde(default)]
    pub lines: Vec<RawLine>,
}

impl RawPage {
    /// Create an empty US Letter page.
    pub fn letter(number: u32) -> Self {
        Self {
            number,
            width: 612.0,
            height: 792.0,
            lines: Vec::new(),
        }
    }

    pub fn push_line(&mut self, line: RawLine) {
        self.lines.push(line);
    }
}

/// An entry of the document's embedded navigation outline.
///
/// Accepts both `[level, title, page]` triples and objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TocRecord")]
pub struct TocEntry {
    /// 1-based nesting level
    pub level: u32,
    /// Entry title
    pub title: String,
    /// 1-based target page
    pub page: u32,
}

impl TocEntry {
    pub fn new(level: u32, title: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            title: title.into(),
            page,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TocRecord {
    Triple(u32, String, u32),
    Named { level: u32, title: String, page: u32 },
}

impl From<TocRecord> for TocEntry {
    fn from(record: TocRecord) -> Self {
        match record {
            TocRecord::Triple(level, title, page) => TocEntry { level, title, page },
            TocRecord::Named { level, title, page } => TocEntry { level, title, page },
        }
    }
}

/// Document-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetadata {
    /// Title recorded in the document properties
    #[serde(default)]
    pub title: Option<String>,
    /// Total number of pages
    #[serde(default)]
    pub page_count: u32,
}

/// Everything the layout collaborator reports for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLayout {
    /// Document metadata
    #[serde(default)]
    pub metadata: LayoutMetadata,
    /// Pages in document order
    #[serde(default)]
    pub pages: Vec<RawPage>,
    /// Embedded table of contents (may be empty)
    #[serde(default)]
    pub toc: Vec<TocEntry>,
}

impl RawLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a layout dump from JSON text.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let mut layout: RawLayout = serde_json::from_str(json)?;
        layout.fill_page_numbers();
        Ok(layout)
    }

    /// Parse a layout dump from a reader.
    pub fn from_reader<R: std::io::Read>(reader: R) -> crate::Result<Self> {
        let mut layout: RawLayout = serde_json::from_reader(reader)?;
        layout.fill_page_numbers();
        Ok(layout)
    }

    pub fn add_page(&mut self, page: RawPage) {
        self.pages.push(page);
        self.fill_page_numbers();
    }

    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Give every page and span a 1-based page number.
    fn fill_page_numbers(&mut self) {
        for (idx, page) in self.pages.iter_mut().enumerate() {
            if page.number == 0 {
                page.number = idx as u32 + 1;
            }
            for span in page.lines.iter_mut().flat_map(|l| l.spans.iter_mut()) {
                if span.page_number == 0 {
                    span.page_number = page.number;
                }
            }
        }
        if self.metadata.page_count == 0 {
            self.metadata.page_count = self.pages.len() as u32;
        }
    }
}
