//! Semantic links between headings of one document.
//!
//! Every heading is embedded once; each heading links to the most similar
//! other headings whose rounded cosine score clears the threshold.

mod embed;
mod rank;

pub use embed::{cosine_similarity, Embedder, HashingEmbedder, DEFAULT_DIMENSION};
pub use rank::{build_sections, rank_sections, RankingReport, Section, DEFAULT_TOP_SECTIONS};

use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::layout::LayoutSource;
use crate::model::{Line, OutlineEntry, SemanticLink};
use crate::structure::{Extraction, LinkSource, OutlineExtractor, OutlineOptions};

/// A heading offered to the linker.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkCandidate {
    pub text: String,
    pub page: u32,
}

impl LinkCandidate {
    pub fn new(text: impl Into<String>, page: u32) -> Self {
        Self {
            text: text.into(),
            page,
        }
    }
}

impl From<&OutlineEntry> for LinkCandidate {
    fn from(entry: &OutlineEntry) -> Self {
        LinkCandidate::new(entry.text.clone(), entry.page_number)
    }
}

/// Lines set larger than `min_font_size` with more than `min_chars` characters.
pub fn large_text_headings(lines: &[Vec<Line>], min_font_size: f32, min_chars: usize) -> Vec<LinkCandidate> {
    lines
        .iter()
        .flatten()
        .filter(|line| line.font_size > min_font_size && line.char_count() > min_chars)
        .map(|line| LinkCandidate::new(line.text.clone(), line.page_number))
        .collect()
}

/// Headings of an extraction according to the configured source.
pub fn link_candidates(extraction: &Extraction, source: LinkSource) -> Vec<LinkCandidate> {
    match source {
        LinkSource::Outline => extraction
            .structure
            .outline
            .iter()
            .map(LinkCandidate::from)
            .collect(),
        LinkSource::LargeText {
            min_font_size,
            min_chars,
        } => large_text_headings(&extraction.lines, min_font_size, min_chars),
    }
}

/// Generates heading-to-heading links.
#[derive(Clone)]
pub struct SemanticLinker {
    embedder: Arc<dyn Embedder>,
    threshold: f32,
    top_k: usize,
}

impl SemanticLinker {
    pub fn new(embedder: Arc<dyn Embedder>, threshold: f32, top_k: usize) -> Self {
        Self {
            embedder,
            threshold,
            top_k,
        }
    }

    /// Linker using the threshold and top-K of `options`.
    pub fn from_options(embedder: Arc<dyn Embedder>, options: &OutlineOptions) -> Self {
        Self::new(embedder, options.similarity_threshold, options.top_k)
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Link every heading to its most similar peers.
    ///
    /// Scores are rounded to two decimals before thresholding. Links are
    /// grouped by source heading in input order; within a group scores are
    /// non-increasing and ties keep input order.
    pub fn generate(&self, headings: &[LinkCandidate]) -> Result<Vec<SemanticLink>> {
        if headings.len() < 2 || self.top_k == 0 {
            return Ok(Vec::new());
        }

        let texts: Vec<&str> = headings.iter().map(|h| h.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;
        if embeddings.len() != headings.len() {
            return Err(Error::Embedding(format!(
                "expected {} embeddings, got {}",
                headings.len(),
                embeddings.len()
            )));
        }

        let mut links = Vec::new();
        for (i, source) in headings.iter().enumerate() {
            let mut scored: Vec<(usize, f32)> = embeddings
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(j, emb)| (j, round_score(cosine_similarity(&embeddings[i], emb))))
                .filter(|(_, score)| *score > self.threshold)
                .collect();
            scored.sort_by(|a, b| b.1.total_cmp(&a.1));
            scored.truncate(self.top_k);

            links.extend(scored.into_iter().map(|(j, score)| SemanticLink {
                source_page: source.page,
                source_heading: source.text.clone(),
                target_page: headings[j].page,
                target_heading: headings[j].text.clone(),
                score,
            }));
        }

        log::debug!("Generated {} semantic links for {} headings", links.len(), headings.len());
        Ok(links)
    }
}

impl std::fmt::Debug for SemanticLinker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticLinker")
            .field("dimension", &self.embedder.dimension())
            .field("threshold", &self.threshold)
            .field("top_k", &self.top_k)
            .finish()
    }
}

fn round_score(score: f32) -> f32 {
    (score * 100.0).round() / 100.0
}

/// Extract a document and link its headings.
pub fn get_semantic_links(
    extractor: &OutlineExtractor,
    linker: &SemanticLinker,
    source: &dyn LayoutSource,
    path: &Path,
) -> Result<Vec<SemanticLink>> {
    let extraction = extractor.extract_file(source, path)?;
    let candidates = link_candidates(&extraction, extractor.options().link_source);
    linker.generate(&candidates)
}
