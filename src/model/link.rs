//! Semantic link and section ranking records.

use serde::{Deserialize, Serialize};

/// A ranked pair of headings with similar text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticLink {
    pub source_page: u32,
    pub source_heading: String,
    pub target_page: u32,
    pub target_heading: String,
    /// Cosine similarity rounded to two decimals
    pub score: f32,
}

/// A document section ranked against a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSection {
    /// Document identifier (file name)
    pub document_id: String,
    /// Heading that opens the section
    pub section_title: String,
    /// Page of the heading
    pub page_number: u32,
    /// 1-based rank within the document
    pub importance_rank: usize,
    /// Cosine similarity between section text and query
    pub relevance_score: f32,
}
