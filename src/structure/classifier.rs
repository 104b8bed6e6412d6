//! Trained-classifier fallback: feature extraction and the predict contract.
//!
//! Each line becomes a fixed 15-column feature vector. A classifier trained
//! offline labels the vectors as Title, H1, H2, H3 or Body; the bundled
//! [`LinearClassifier`] evaluates an exported linear model.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::fonts::FontStatistics;
use super::numbering::{starts_with_marker, strip_marker};
use crate::error::{Error, Result};
use crate::model::{HeadingLevel, Line, PositionedHeading};

/// Number of features per line.
pub const FEATURE_COUNT: usize = 15;

/// Feature column names, in vector order.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "font_size",
    "is_bold",
    "is_italic",
    "x_pos_normalized",
    "y_pos_normalized",
    "line_height",
    "space_above",
    "space_below",
    "line_length_chars",
    "word_count",
    "is_all_caps",
    "starts_with_number",
    "is_centered",
    "font_size_ratio_to_avg",
    "is_different_font",
];

/// Fraction of the page height used as the gap at page boundaries.
const BOUNDARY_GAP_RATIO: f32 = 0.1;

/// Lines whose center is within this fraction of the page width from the midline count as centered.
const CENTER_TOLERANCE_RATIO: f32 = 0.1;

/// Feature vector for one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f32; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Look up a feature by column name.
    pub fn get(&self, column: &str) -> Option<f32> {
        FEATURE_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|idx| self.0[idx])
    }
}

/// Classifier output label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Title,
    H1,
    H2,
    H3,
    Body,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Title => "Title",
            Label::H1 => "H1",
            Label::H2 => "H2",
            Label::H3 => "H3",
            Label::Body => "Body",
        }
    }

    /// Outline level for heading labels.
    pub fn heading_level(&self) -> Option<HeadingLevel> {
        match self {
            Label::H1 => Some(HeadingLevel::H1),
            Label::H2 => Some(HeadingLevel::H2),
            Label::H3 => Some(HeadingLevel::H3),
            Label::Title | Label::Body => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Title" => Ok(Label::Title),
            "H1" => Ok(Label::H1),
            "H2" => Ok(Label::H2),
            "H3" => Ok(Label::H3),
            "Body" => Ok(Label::Body),
            other => Err(Error::InvalidModel(format!("Unknown label: {}", other))),
        }
    }
}

/// A trained heading classifier.
///
/// Loaded once and shared read-only by every document in a batch.
pub trait HeadingClassifier: Send + Sync {
    /// Get the name of this classifier.
    fn name(&self) -> &str;

    /// Predict one label per feature vector.
    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<Label>>;
}

/// Computes feature vectors for the lines of one page.
pub struct FeatureExtractor<'a> {
    stats: &'a FontStatistics,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(stats: &'a FontStatistics) -> Self {
        Self { stats }
    }

    /// Feature vectors for well-formed lines of a single page, in order.
    pub fn page_features(&self, lines: &[&Line]) -> Vec<FeatureVector> {
        if lines.is_empty() {
            return Vec::new();
        }
        let avg_font_size = lines.iter().map(|l| l.font_size).sum::<f32>() / lines.len() as f32;

        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let prev = i.checked_sub(1).map(|p| lines[p]);
                let next = lines.get(i + 1).copied();
                self.line_features(line, prev, next, avg_font_size)
            })
            .collect()
    }

    fn line_features(
        &self,
        line: &Line,
        prev: Option<&Line>,
        next: Option<&Line>,
        avg_font_size: f32,
    ) -> FeatureVector {
        let width = line.page.width;
        let height = line.page.height;
        let bbox = &line.bbox;
        let flag = |b: bool| if b { 1.0 } else { 0.0 };

        let space_above = prev
            .map(|p| bbox.y0 - p.bbox.y1)
            .unwrap_or(height * BOUNDARY_GAP_RATIO);
        let space_below = next
            .map(|n| n.bbox.y0 - bbox.y1)
            .unwrap_or(height * BOUNDARY_GAP_RATIO);
        let is_centered = (bbox.center_x() - width / 2.0).abs() < width * CENTER_TOLERANCE_RATIO;
        let size_ratio = if avg_font_size > 0.0 {
            line.font_size / avg_font_size
        } else {
            1.0
        };

        FeatureVector([
            line.font_size,
            flag(line.bold),
            flag(line.italic),
            bbox.x0 / width,
            bbox.y0 / height,
            bbox.height(),
            space_above,
            space_below,
            line.char_count() as f32,
            line.word_count() as f32,
            flag(line.is_all_caps()),
            flag(starts_with_marker(&line.text)),
            flag(is_centered),
            size_ratio,
            flag(self.stats.is_different_font(&line.font_name)),
        ])
    }
}

/// Headings and title found by a classifier.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedOutline {
    /// Text of the last line labeled Title
    pub title: Option<String>,
    /// Lines labeled H1/H2/H3, markers stripped
    pub headings: Vec<PositionedHeading>,
    /// (page, count) of lines skipped as malformed
    pub skipped: Vec<(u32, usize)>,
}

/// Run a classifier over every page of a document.
pub fn classify_document(
    classifier: &dyn HeadingClassifier,
    pages: &[Vec<Line>],
    stats: &FontStatistics,
) -> Result<ClassifiedOutline> {
    let extractor = FeatureExtractor::new(stats);
    let mut outcome = ClassifiedOutline::default();

    for lines in pages {
        let usable: Vec<&Line> = lines.iter().filter(|l| l.is_well_formed()).collect();
        let skipped = lines.len() - usable.len();
        if skipped > 0 {
            if let Some(first) = lines.first() {
                outcome.skipped.push((first.page_number, skipped));
            }
        }
        if usable.is_empty() {
            continue;
        }

        let features = extractor.page_features(&usable);
        let labels = classifier.predict(&features)?;
        if labels.len() != usable.len() {
            return Err(Error::Classifier(format!(
                "{} returned {} labels for {} lines",
                classifier.name(),
                labels.len(),
                usable.len()
            )));
        }

        for (line, label) in usable.iter().zip(labels) {
            if let Some(level) = label.heading_level() {
                let text = strip_marker(&line.text);
                if !text.is_empty() {
                    outcome.headings.push(PositionedHeading::new(
                        level,
                        text,
                        line.page_number,
                        line.bbox.y0,
                    ));
                }
            } else if label == Label::Title {
                outcome.title = Some(line.text.clone());
            }
        }
    }

    log::debug!(
        "{} labeled {} headings{}",
        classifier.name(),
        outcome.headings.len(),
        if outcome.title.is_some() { " and a title" } else { "" }
    );
    Ok(outcome)
}

/// Standardization applied before the linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f32>,
    pub scale: Vec<f32>,
}

/// Exported parameters of a linear classifier.
///
/// Binary models may carry a single coefficient row; a positive decision
/// selects the second label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    pub labels: Vec<Label>,
    pub coefficients: Vec<Vec<f32>>,
    pub intercepts: Vec<f32>,
    #[serde(default)]
    pub scaler: Option<Scaler>,
}

/// Linear (one-vs-rest) classifier evaluated by argmax of its decision function.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    artifact: LinearModelArtifact,
}

impl LinearClassifier {
    /// Load an exported model from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ModelMissing(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let artifact: LinearModelArtifact = serde_json::from_str(&content)
            .map_err(|e| Error::InvalidModel(format!("{}: {}", path.display(), e)))?;
        let classifier = Self::from_artifact(artifact)?;
        log::info!("Loaded heading classifier from {}", path.display());
        Ok(classifier)
    }

    /// Build a classifier from in-memory parameters.
    pub fn from_artifact(artifact: LinearModelArtifact) -> Result<Self> {
        let n_labels = artifact.labels.len();
        let binary = n_labels == 2 && artifact.coefficients.len() == 1;
        if n_labels < 2 {
            return Err(Error::InvalidModel("at least two labels required".into()));
        }
        if !binary && artifact.coefficients.len() != n_labels {
            return Err(Error::InvalidModel(format!(
                "{} coefficient rows for {} labels",
                artifact.coefficients.len(),
                n_labels
            )));
        }
        if artifact.intercepts.len() != artifact.coefficients.len() {
            return Err(Error::InvalidModel(format!(
                "{} intercepts for {} coefficient rows",
                artifact.intercepts.len(),
                artifact.coefficients.len()
            )));
        }
        if let Some(row) = artifact
            .coefficients
            .iter()
            .find(|row| row.len() != FEATURE_COUNT)
        {
            return Err(Error::InvalidModel(format!(
                "coefficient row has {} features, expected {}",
                row.len(),
                FEATURE_COUNT
            )));
        }
        if let Some(scaler) = &artifact.scaler {
            if scaler.mean.len() != FEATURE_COUNT || scaler.scale.len() != FEATURE_COUNT {
                return Err(Error::InvalidModel(format!(
                    "scaler must have {} columns",
                    FEATURE_COUNT
                )));
            }
        }
        Ok(Self { artifact })
    }

    fn decision(&self, features: &FeatureVector) -> Vec<f32> {
        let x: Vec<f32> = match &self.artifact.scaler {
            Some(scaler) => features
                .0
                .iter()
                .zip(scaler.mean.iter().zip(&scaler.scale))
                .map(|(v, (m, s))| if *s != 0.0 { (v - m) / s } else { v - m })
                .collect(),
            None => features.0.to_vec(),
        };
        self.artifact
            .coefficients
            .iter()
            .zip(&self.artifact.intercepts)
            .map(|(row, b)| row.iter().zip(&x).map(|(w, v)| w * v).sum::<f32>() + b)
            .collect()
    }
}

impl HeadingClassifier for LinearClassifier {
    fn name(&self) -> &str {
        "linear"
    }

    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<Label>> {
        let labels = &self.artifact.labels;
        Ok(features
            .iter()
            .map(|f| {
                let scores = self.decision(f);
                if scores.len() == 1 {
                    return if scores[0] > 0.0 { labels[1] } else { labels[0] };
                }
                let best = scores
                    .iter()
                    .enumerate()
                    .fold((0, f32::NEG_INFINITY), |(bi, bs), (i, s)| {
                        if *s > bs {
                            (i, *s)
                        } else {
                            (bi, bs)
                        }
                    })
                    .0;
                labels[best]
            })
            .collect())
    }
}
