//! Query-driven ranking of outline sections.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::embed::{cosine_similarity, Embedder};
use crate::error::{Error, Result};
use crate::model::{Line, PositionedHeading, RankedSection};
use crate::structure::normalize_text;

/// Sections returned by [`rank_sections`] unless told otherwise.
pub const DEFAULT_TOP_SECTIONS: usize = 5;

/// A heading with the body text that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub page_number: u32,
    /// Heading text followed by body lines, space separated
    pub text: String,
}

/// Split a document into sections at its outline headings.
///
/// Each heading is anchored at the first line on its page, at or below its
/// recorded position, whose text matches the heading; headings without such
/// a line (merged or renamed ones) keep their recorded position. TOC headings
/// carry no position, so their anchor comes from the matching line alone.
///
/// A line belongs to the last anchor at or above it in reading order. Lines
/// before the first anchor are dropped, as are lines repeating a heading's
/// own text.
pub fn build_sections(lines: &[Vec<Line>], headings: &[PositionedHeading]) -> Vec<Section> {
    let mut sections: Vec<Section> = headings
        .iter()
        .map(|h| Section {
            title: h.text.clone(),
            page_number: h.page_number,
            text: h.text.clone(),
        })
        .collect();
    if sections.is_empty() {
        return sections;
    }

    let heading_keys: Vec<String> = headings.iter().map(|h| normalize_text(&h.text)).collect();
    let mut anchors: Vec<(usize, u32, f32)> = headings
        .iter()
        .zip(&heading_keys)
        .enumerate()
        .map(|(idx, (heading, key))| (idx, heading.page_number, anchor_y(lines, heading, key)))
        .collect();
    anchors.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.2.total_cmp(&b.2)));

    let mut current: Option<usize> = None;
    let mut next = 0;

    for line in lines.iter().flatten() {
        while next < anchors.len()
            && (anchors[next].1, anchors[next].2) <= (line.page_number, line.bbox.y0)
        {
            current = Some(anchors[next].0);
            next += 1;
        }

        let Some(idx) = current else { continue };
        let key = normalize_text(&line.text);
        if key.is_empty() || heading_keys.iter().any(|k| *k == key) {
            continue;
        }
        let section = &mut sections[idx];
        section.text.push(' ');
        section.text.push_str(&line.text);
    }

    sections
}

fn anchor_y(lines: &[Vec<Line>], heading: &PositionedHeading, key: &str) -> f32 {
    lines
        .iter()
        .flatten()
        .filter(|l| l.page_number == heading.page_number && l.bbox.y0 >= heading.y0)
        .find(|l| normalize_text(&l.text) == key)
        .map_or(heading.y0, |l| l.bbox.y0)
}

/// Sections ranked against a query, with request metadata.
#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub document_id: String,
    pub query: String,
    pub query_time: DateTime<Utc>,
    pub sections: Vec<RankedSection>,
}

/// Rank sections by cosine similarity between their text and `query`.
///
/// Ranks start at 1 and follow descending relevance; only the best `top_n`
/// are returned.
pub fn rank_sections(
    document_id: &str,
    sections: &[Section],
    query: &str,
    embedder: &dyn Embedder,
    top_n: usize,
) -> Result<RankingReport> {
    let query_time = Utc::now();
    let mut ranked = Vec::with_capacity(sections.len());

    if !sections.is_empty() {
        let query_vec = embedder.embed(query)?;
        let texts: Vec<&str> = sections.iter().map(|s| s.text.as_str()).collect();
        let embeddings = embedder.embed_batch(&texts)?;
        if embeddings.len() != sections.len() {
            return Err(Error::Embedding(format!(
                "expected {} embeddings, got {}",
                sections.len(),
                embeddings.len()
            )));
        }

        let mut scored: Vec<(&Section, f32)> = sections
            .iter()
            .zip(&embeddings)
            .map(|(section, emb)| (section, cosine_similarity(emb, &query_vec)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        ranked.extend(
            scored
                .into_iter()
                .take(top_n)
                .enumerate()
                .map(|(i, (section, score))| RankedSection {
                    document_id: document_id.to_string(),
                    section_title: section.title.clone(),
                    page_number: section.page_number,
                    importance_rank: i + 1,
                    relevance_score: score,
                }),
        );
    }

    Ok(RankingReport {
        document_id: document_id.to_string(),
        query: query.to_string(),
        query_time,
        sections: ranked,
    })
}
