//! # docoutline
//!
//! Document outline extraction for Rust.
//!
//! This library turns the raw layout of a paginated document (styled text
//! spans with positions, an optional embedded table of contents and metadata)
//! into a title plus an H1/H2/H3 outline, and links headings whose text is
//! semantically similar.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docoutline::{get_structure, render};
//!
//! fn main() -> docoutline::Result<()> {
//!     // Extract the outline of a JSON layout dump
//!     let structure = get_structure("report.layout.json")?;
//!
//!     // Serialize it
//!     let json = render::to_json(&structure, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Three heading sources**: embedded TOC, font heuristics with
//!   multi-line merging, or a trained classifier
//! - **Deterministic**: identical input and configuration give identical output
//! - **Semantic links**: heading-to-heading similarity with a pluggable embedder
//! - **Section ranking**: rank outline sections against a free-text query
//! - **Parallel batches**: uses Rayon across documents

pub mod batch;
pub mod error;
pub mod layout;
pub mod links;
pub mod model;
pub mod render;
pub mod structure;

// Re-export commonly used types
pub use batch::{BatchItem, BatchProcessor, BatchReport};
pub use error::{Error, Result};
pub use layout::{JsonLayoutReader, LayoutNormalizer, LayoutSource};
pub use links::{Embedder, HashingEmbedder, LinkCandidate, RankingReport, SemanticLinker};
pub use model::{
    BoundingBox, DocumentStructure, HeadingLevel, Line, OutlineEntry, RankedSection, RawLayout,
    SemanticLink, Span, TocEntry,
};
pub use render::JsonFormat;
pub use structure::{
    Extraction, ExtractionPath, FallbackStrategy, HeadingClassifier, LinearClassifier, LinkSource,
    OutlineExtractor, OutlineOptions, Warning,
};

use std::path::Path;
use std::sync::Arc;

/// Extract the title and outline of a layout dump.
///
/// # Arguments
///
/// * `path` - Path to the JSON layout file
///
/// # Example
///
/// ```no_run
/// use docoutline::get_structure;
///
/// let structure = get_structure("report.layout.json").unwrap();
/// println!("{}: {} headings", structure.title, structure.outline.len());
/// ```
pub fn get_structure<P: AsRef<Path>>(path: P) -> Result<DocumentStructure> {
    get_structure_with_options(path, OutlineOptions::default())
}

/// Extract the title and outline with custom options.
///
/// # Example
///
/// ```no_run
/// use docoutline::{get_structure_with_options, OutlineOptions};
///
/// let options = OutlineOptions::new()
///     .with_skip_first_page(true)
///     .with_merge_thresholds(20.0, 2.0);
/// let structure = get_structure_with_options("report.layout.json", options).unwrap();
/// ```
pub fn get_structure_with_options<P: AsRef<Path>>(
    path: P,
    options: OutlineOptions,
) -> Result<DocumentStructure> {
    OutlineExtractor::new(options).get_structure(&JsonLayoutReader::new(), path.as_ref())
}

/// Link similar headings of a layout dump using the hashing embedder.
///
/// # Example
///
/// ```no_run
/// use docoutline::get_semantic_links;
///
/// for link in get_semantic_links("manual.layout.json").unwrap() {
///     println!("{} -> {} ({:.2})", link.source_heading, link.target_heading, link.score);
/// }
/// ```
pub fn get_semantic_links<P: AsRef<Path>>(path: P) -> Result<Vec<SemanticLink>> {
    Docoutline::new().links(path)
}

/// Builder for extracting outlines, links and rankings.
///
/// # Example
///
/// ```no_run
/// use docoutline::Docoutline;
///
/// let links = Docoutline::new()
///     .with_top_k(5)
///     .with_threshold(0.6)
///     .large_text_links()
///     .links("manual.layout.json")?;
/// # Ok::<(), docoutline::Error>(())
/// ```
pub struct Docoutline {
    options: OutlineOptions,
    classifier: Option<Arc<dyn HeadingClassifier>>,
    embedder: Arc<dyn Embedder>,
    source: Arc<dyn LayoutSource>,
}

impl Docoutline {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: OutlineOptions::default(),
            classifier: None,
            embedder: Arc::new(HashingEmbedder::default()),
            source: Arc::new(JsonLayoutReader::new()),
        }
    }

    /// Replace all options.
    pub fn with_options(mut self, options: OutlineOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a trained classifier when no usable TOC exists.
    pub fn with_classifier(mut self, classifier: Arc<dyn HeadingClassifier>) -> Self {
        self.classifier = Some(classifier);
        self.options = self.options.classifier_fallback();
        self
    }

    /// Load a linear classifier artifact and use it as fallback.
    ///
    /// A missing file still switches to the classifier fallback, so documents
    /// without a usable TOC report a missing model instead of falling back
    /// to heuristics.
    pub fn with_model<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        match LinearClassifier::load(path) {
            Ok(classifier) => Ok(self.with_classifier(Arc::new(classifier))),
            Err(Error::ModelMissing(missing)) => {
                log::warn!("Classifier model not found: {}", missing.display());
                self.options = self.options.classifier_fallback();
                Ok(self)
            }
            Err(e) => Err(e),
        }
    }

    /// Use a different embedder for links and ranking.
    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = embedder;
        self
    }

    /// Use a different layout source.
    pub fn with_source(mut self, source: Arc<dyn LayoutSource>) -> Self {
        self.source = source;
        self
    }

    /// Exclude the first page from heading search.
    pub fn skip_first_page(mut self) -> Self {
        self.options = self.options.with_skip_first_page(true);
        self
    }

    /// Set the maximum links per source heading.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.options = self.options.with_top_k(top_k);
        self
    }

    /// Set the similarity threshold for links.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.options = self.options.with_similarity_threshold(threshold);
        self
    }

    /// Link large-text lines instead of outline headings.
    pub fn large_text_links(mut self) -> Self {
        self.options = self.options.with_link_source(LinkSource::large_text());
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Build the outline extractor.
    pub fn extractor(&self) -> OutlineExtractor {
        let extractor = OutlineExtractor::new(self.options.clone());
        match &self.classifier {
            Some(classifier) => extractor.with_classifier(Arc::clone(classifier)),
            None => extractor,
        }
    }

    /// Build the semantic linker.
    pub fn linker(&self) -> SemanticLinker {
        SemanticLinker::from_options(Arc::clone(&self.embedder), &self.options)
    }

    /// Run the full pipeline on one document.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<Extraction> {
        self.options.validate()?;
        self.extractor().extract_file(self.source.as_ref(), path.as_ref())
    }

    /// Extract the title and outline of one document.
    pub fn structure<P: AsRef<Path>>(&self, path: P) -> Result<DocumentStructure> {
        Ok(self.extract(path)?.structure)
    }

    /// Generate semantic links for one document.
    pub fn links<P: AsRef<Path>>(&self, path: P) -> Result<Vec<SemanticLink>> {
        self.options.validate()?;
        links::get_semantic_links(
            &self.extractor(),
            &self.linker(),
            self.source.as_ref(),
            path.as_ref(),
        )
    }

    /// Rank the outline sections of one document against `query`.
    pub fn rank<P: AsRef<Path>>(&self, path: P, query: &str, top_n: usize) -> Result<RankingReport> {
        let path = path.as_ref();
        let extraction = self.extract(path)?;
        let sections = links::build_sections(&extraction.lines, &extraction.headings);
        links::rank_sections(
            &batch::document_id(path),
            &sections,
            query,
            self.embedder.as_ref(),
            top_n,
        )
    }

    /// Build a batch processor sharing this builder's configuration.
    pub fn batch(&self) -> BatchProcessor {
        BatchProcessor::new(self.extractor(), Arc::clone(&self.source))
    }
}

impl Default for Docoutline {
    fn default() -> Self {
        Self::new()
    }
}
