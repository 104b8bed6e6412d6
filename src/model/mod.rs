//! Data model for layout input and outline output.
//!
//! Raw layout types mirror what the layout collaborator reports (spans on
//! pages, an optional table of contents, document metadata). Lines are the
//! consolidated per-row records the pipeline works on, and the outline types
//! are the public output.

mod layout;
mod line;
mod link;
mod outline;

pub use layout::{
    infer_style, BoundingBox, LayoutMetadata, RawLayout, RawLine, RawPage, Span, TocEntry,
};
pub use line::{Line, PageDimensions};
pub use link::{RankedSection, SemanticLink};
pub use outline::{DocumentStructure, HeadingLevel, OutlineEntry, PositionedHeading};
