//! Outline extraction.
//!
//! Lines from the [layout normalizer](crate::layout::LayoutNormalizer) flow
//! through font statistics into exactly one heading source per document:
//!
//! - the embedded table of contents, when it has enough entries;
//! - heuristic classification followed by multi-line merging;
//! - a trained [`HeadingClassifier`].
//!
//! The resolved title and the headings are then assembled into a
//! [`DocumentStructure`](crate::model::DocumentStructure) by
//! [`OutlineExtractor`].

pub mod assemble;
pub mod classifier;
mod fonts;
pub mod heuristic;
mod merge;
mod numbering;
mod options;
mod pipeline;
mod title;
mod toc;

pub use assemble::normalize_text;
pub use classifier::{
    FeatureExtractor, FeatureVector, HeadingClassifier, Label, LinearClassifier,
    LinearModelArtifact, Scaler, FEATURE_COLUMNS, FEATURE_COUNT,
};
pub use fonts::FontStatistics;
pub use heuristic::{HeadingCandidate, HeuristicClassifier, Rejection};
pub use merge::HeadingMerger;
pub use numbering::{split_numbering, strip_marker};
pub use options::{FallbackStrategy, LinkSource, OutlineOptions};
pub use pipeline::{Extraction, ExtractionPath, OutlineExtractor, Warning};
pub use title::{TitleResolver, DEFAULT_TITLE};
pub use toc::toc_headings;
