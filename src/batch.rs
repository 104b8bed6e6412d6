//! Parallel processing of many documents.
//!
//! Documents are independent: each runs the full pipeline on a rayon worker,
//! sharing only the read-only extractor, classifier and embedder. A failing
//! document is recorded in the report and never stops the others.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::layout::LayoutSource;
use crate::links::{link_candidates, SemanticLinker};
use crate::model::{DocumentStructure, SemanticLink};
use crate::render::{links_to_json, to_json, JsonFormat};
use crate::structure::{ExtractionPath, OutlineExtractor, Warning};

/// Extension of layout dumps picked up from directories.
pub const LAYOUT_EXTENSION: &str = "json";

/// Output of one successfully processed document.
#[derive(Debug, Clone)]
pub struct DocumentOutput {
    pub structure: DocumentStructure,
    pub path: ExtractionPath,
    pub warnings: Vec<Warning>,
    /// Present when the processor has a linker
    pub links: Option<Vec<SemanticLink>>,
    /// Files written to the output directory
    pub written: Vec<PathBuf>,
}

/// Outcome for one input.
#[derive(Debug)]
pub struct BatchItem {
    pub input: PathBuf,
    pub result: Result<DocumentOutput>,
    pub elapsed: Duration,
}

impl BatchItem {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a batch run, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    /// Inputs that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.items
            .iter()
            .filter_map(|i| i.result.as_ref().err().map(|e| (i.input.as_path(), e)))
    }

    /// Number of documents that reported warnings.
    pub fn with_warnings(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(&i.result, Ok(out) if !out.warnings.is_empty()))
            .count()
    }
}

/// Runs the extraction pipeline over many documents.
pub struct BatchProcessor {
    extractor: OutlineExtractor,
    source: Arc<dyn LayoutSource>,
    linker: Option<SemanticLinker>,
    output_dir: Option<PathBuf>,
    format: JsonFormat,
}

impl BatchProcessor {
    pub fn new(extractor: OutlineExtractor, source: Arc<dyn LayoutSource>) -> Self {
        Self {
            extractor,
            source,
            linker: None,
            output_dir: None,
            format: JsonFormat::Pretty,
        }
    }

    /// Also generate semantic links for every document.
    pub fn with_linker(mut self, linker: SemanticLinker) -> Self {
        self.linker = Some(linker);
        self
    }

    /// Write `<stem>.json` (and `<stem>.links.json`) per document into `dir`.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Process every input.
    pub fn run(&self, inputs: &[PathBuf]) -> BatchReport {
        self.run_with_progress(inputs, |_| {})
    }

    /// Process every input, calling `on_done` as each document finishes.
    ///
    /// `on_done` may be called from several threads, in completion order.
    pub fn run_with_progress<F>(&self, inputs: &[PathBuf], on_done: F) -> BatchReport
    where
        F: Fn(&BatchItem) + Sync,
    {
        let start = Instant::now();
        if let Some(dir) = &self.output_dir {
            if let Err(e) = fs::create_dir_all(dir) {
                log::warn!("Cannot create output directory {}: {}", dir.display(), e);
            }
        }

        let process = |input: &PathBuf| {
            let item = self.process_one(input);
            on_done(&item);
            item
        };
        let items: Vec<BatchItem> = if self.extractor.options().parallel {
            inputs.par_iter().map(process).collect()
        } else {
            inputs.iter().map(process).collect()
        };

        let report = BatchReport {
            items,
            elapsed: start.elapsed(),
        };
        log::info!(
            "Processed {} documents in {:?}: {} ok, {} failed",
            report.items.len(),
            report.elapsed,
            report.succeeded(),
            report.failed()
        );
        report
    }

    fn process_one(&self, input: &Path) -> BatchItem {
        let start = Instant::now();
        let result = self.process_document(input);
        if let Err(e) = &result {
            log::warn!("Failed to process {}: {}", input.display(), e);
        }
        BatchItem {
            input: input.to_path_buf(),
            result,
            elapsed: start.elapsed(),
        }
    }

    fn process_document(&self, input: &Path) -> Result<DocumentOutput> {
        let extraction = self.extractor.extract_file(self.source.as_ref(), input)?;

        let links = match &self.linker {
            Some(linker) => {
                let candidates = link_candidates(&extraction, self.extractor.options().link_source);
                Some(linker.generate(&candidates)?)
            }
            None => None,
        };

        let mut written = Vec::new();
        if let Some(dir) = &self.output_dir {
            let stem = document_stem(input);
            let target = dir.join(format!("{}.json", stem));
            fs::write(&target, to_json(&extraction.structure, self.format)?)?;
            written.push(target);

            if let Some(links) = &links {
                let target = dir.join(format!("{}.links.json", stem));
                fs::write(&target, links_to_json(&document_id(input), links, self.format)?)?;
                written.push(target);
            }
        }

        Ok(DocumentOutput {
            structure: extraction.structure,
            path: extraction.path,
            warnings: extraction.warnings,
            links,
            written,
        })
    }
}

/// File name used to identify a document in outputs.
pub fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn document_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// Expand directories into their layout files; files pass through as given.
///
/// Directory entries are sorted by name so runs are reproducible.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| {
                    p.is_file() && p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(LAYOUT_EXTENSION))
                })
                .collect();
            found.sort();
            inputs.extend(found);
        } else {
            inputs.push(path.clone());
        }
    }
    Ok(inputs)
}
