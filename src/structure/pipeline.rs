//! Per-document extraction pipeline.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use super::assemble::assemble_headings;
use super::classifier::{classify_document, HeadingClassifier};
use super::fonts::FontStatistics;
use super::heuristic::HeuristicClassifier;
use super::merge::HeadingMerger;
use super::options::{FallbackStrategy, OutlineOptions};
use super::title::TitleResolver;
use super::toc::toc_headings;
use crate::error::Result;
use crate::layout::{LayoutNormalizer, LayoutSource};
use crate::model::{DocumentStructure, Line, OutlineEntry, PositionedHeading, RawLayout};

/// How the outline of a document was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPath {
    /// Embedded table of contents
    TocBased,
    /// Trained classifier over line features
    ClassifierBased,
    /// Font and text heuristics
    HeuristicBased,
    /// Classifier pinned but no model is loaded
    Unavailable,
}

impl ExtractionPath {
    /// Choose the path for one document.
    ///
    /// A TOC with more than `toc_min_entries` entries always wins; then a
    /// loaded classifier, unless the strategy pins heuristics.
    pub fn select(toc_len: usize, options: &OutlineOptions, classifier_available: bool) -> Self {
        if toc_len > options.toc_min_entries {
            return ExtractionPath::TocBased;
        }
        match options.fallback {
            FallbackStrategy::Heuristic => ExtractionPath::HeuristicBased,
            FallbackStrategy::Auto | FallbackStrategy::Classifier if classifier_available => {
                ExtractionPath::ClassifierBased
            }
            FallbackStrategy::Auto => ExtractionPath::HeuristicBased,
            FallbackStrategy::Classifier => ExtractionPath::Unavailable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionPath::TocBased => "toc",
            ExtractionPath::ClassifierBased => "classifier",
            ExtractionPath::HeuristicBased => "heuristic",
            ExtractionPath::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for ExtractionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal condition reported alongside a structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// No trained model is loaded for the fallback path
    ModelMissing,
    /// Lines skipped from classification for missing or invalid attributes
    MalformedLines { page: u32, count: usize },
    /// The classifier returned an error; no headings were produced
    ClassifierFailed { message: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ModelMissing => write!(f, "heading classifier model is missing"),
            Warning::MalformedLines { page, count } => {
                write!(f, "skipped {} malformed lines on page {}", count, page)
            }
            Warning::ClassifierFailed { message } => write!(f, "classifier failed: {}", message),
        }
    }
}

/// Result of running the pipeline on one document.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Title and ordered outline
    pub structure: DocumentStructure,
    /// Path that produced the outline
    pub path: ExtractionPath,
    /// Conditions worth reporting
    pub warnings: Vec<Warning>,
    /// Outline headings with vertical positions, in outline order
    pub headings: Vec<PositionedHeading>,
    /// Normalized lines per page
    pub lines: Vec<Vec<Line>>,
}

impl Extraction {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Extracts title and outline from raw layouts.
///
/// Holds the shared, read-only classifier used by the classifier fallback.
/// Cloning is cheap and clones share the classifier.
#[derive(Clone)]
pub struct OutlineExtractor {
    options: OutlineOptions,
    classifier: Option<Arc<dyn HeadingClassifier>>,
}

impl OutlineExtractor {
    /// Create an extractor without a classifier.
    pub fn new(options: OutlineOptions) -> Self {
        Self {
            options,
            classifier: None,
        }
    }

    /// Inject a trained classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn HeadingClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Read a document through `source` and return its structure.
    pub fn get_structure(&self, source: &dyn LayoutSource, path: &Path) -> Result<DocumentStructure> {
        Ok(self.extract_file(source, path)?.structure)
    }

    /// Read a document through `source` and run the full pipeline.
    pub fn extract_file(&self, source: &dyn LayoutSource, path: &Path) -> Result<Extraction> {
        let layout = source.extract_layout(path)?;
        Ok(self.extract(&layout))
    }

    /// Run the pipeline on an in-memory layout.
    ///
    /// Never fails: missing models and classifier errors become warnings and
    /// an empty outline.
    pub fn extract(&self, layout: &RawLayout) -> Extraction {
        let options = &self.options;
        let lines = LayoutNormalizer::new(options.min_line_chars).normalize(layout);
        let stats = FontStatistics::from_lines(lines.iter().flatten());

        let mut title = TitleResolver::new(options.title_scan_pages, options.prefer_metadata_title)
            .resolve(&layout.metadata, &lines);
        let mut warnings = Vec::new();

        let path = ExtractionPath::select(layout.toc.len(), options, self.classifier.is_some());
        log::debug!("Extracting outline via {} path", path);

        let headings = match path {
            ExtractionPath::TocBased => toc_headings(&layout.toc),
            ExtractionPath::HeuristicBased => {
                if options.fallback == FallbackStrategy::Auto {
                    warnings.push(Warning::ModelMissing);
                }
                self.heuristic_headings(&lines, &stats)
            }
            ExtractionPath::ClassifierBased => match &self.classifier {
                Some(classifier) => match classify_document(classifier.as_ref(), &lines, &stats) {
                    Ok(outcome) => {
                        warnings.extend(
                            outcome
                                .skipped
                                .iter()
                                .map(|(page, count)| Warning::MalformedLines {
                                    page: *page,
                                    count: *count,
                                }),
                        );
                        if let Some(classified_title) = outcome.title {
                            title = classified_title;
                        }
                        outcome.headings
                    }
                    Err(e) => {
                        warnings.push(Warning::ClassifierFailed {
                            message: e.to_string(),
                        });
                        Vec::new()
                    }
                },
                None => {
                    warnings.push(Warning::ModelMissing);
                    Vec::new()
                }
            },
            ExtractionPath::Unavailable => {
                warnings.push(Warning::ModelMissing);
                Vec::new()
            }
        };

        for warning in &warnings {
            log::warn!("{}", warning);
        }

        let headings = assemble_headings(&title, headings);
        let outline: Vec<OutlineEntry> = headings.iter().cloned().map(OutlineEntry::from).collect();
        log::debug!("Outline for {:?}: {} headings", title, outline.len());

        Extraction {
            structure: DocumentStructure { title, outline },
            path,
            warnings,
            headings,
            lines,
        }
    }

    fn heuristic_headings(&self, lines: &[Vec<Line>], stats: &FontStatistics) -> Vec<PositionedHeading> {
        let candidates = HeuristicClassifier::new(&self.options, stats).classify(lines);
        HeadingMerger::new(self.options.merge_gap, self.options.merge_font_delta)
            .merge(candidates)
            .into_iter()
            .map(|candidate| candidate.into_heading(stats))
            .collect()
    }
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self::new(OutlineOptions::default())
    }
}

impl fmt::Debug for OutlineExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutlineExtractor")
            .field("options", &self.options)
            .field("classifier", &self.classifier.as_ref().map(|c| c.name().to_string()))
            .finish()
    }
}
