//! Integration tests for outline extraction.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use docoutline::model::{BoundingBox, RawLine, RawPage, Span, TocEntry};
use docoutline::structure::{normalize_text, Label, LinearModelArtifact, FEATURE_COUNT};
use docoutline::{
    get_structure, Docoutline, Error, ExtractionPath, HeadingLevel, JsonLayoutReader,
    LayoutSource, OutlineEntry, OutlineExtractor, OutlineOptions, RawLayout, Warning,
};

fn row(text: &str, size: f32, font: &str, y0: f32) -> RawLine {
    let bbox = BoundingBox::new(72.0, y0, 72.0 + text.len() as f32 * size * 0.5, y0 + size);
    RawLine::new(vec![Span::new(text, size, font, bbox, 0)])
}

fn page(rows: Vec<RawLine>) -> RawPage {
    let mut page = RawPage::letter(0);
    for r in rows {
        page.push_line(r);
    }
    page
}

fn body(y0: f32) -> RawLine {
    row("The committee reviewed the figures in detail", 10.0, "Times-Roman", y0)
}

/// Title page plus two content pages with bold and numbered headings.
fn report_layout() -> RawLayout {
    let mut layout = RawLayout::new();
    layout.add_page(page(vec![
        row("Annual Report", 24.0, "Helvetica-Bold", 100.0),
        body(200.0),
        body(215.0),
    ]));
    layout.add_page(page(vec![
        row("1 Overview", 18.0, "Helvetica-Bold", 60.0),
        body(100.0),
        body(115.0),
        row("1.1 Scope", 14.0, "Helvetica-Bold", 160.0),
        body(200.0),
        body(215.0),
    ]));
    layout.add_page(page(vec![
        row("Strategic Plan for the", 18.0, "Helvetica-Bold", 60.0),
        row("Digital Library", 18.0, "Helvetica-Bold", 82.0),
        body(130.0),
        body(145.0),
        row("ANNUAL REPORT", 18.0, "Helvetica-Bold", 400.0),
        body(440.0),
    ]));
    layout
}

fn write_layout(dir: &Path, name: &str, layout: &RawLayout) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string(layout).unwrap()).unwrap();
    path
}

#[test]
fn test_heuristic_outline_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_layout(dir.path(), "report.json", &report_layout());

    let structure = get_structure(&path).unwrap();

    assert_eq!(structure.title, "Annual Report");
    assert_eq!(
        structure.outline,
        vec![
            OutlineEntry::new(HeadingLevel::H1, "Overview", 2),
            OutlineEntry::new(HeadingLevel::H2, "Scope", 2),
            OutlineEntry::new(HeadingLevel::H2, "Strategic Plan for the Digital Library", 3),
        ]
    );
}

#[test]
fn test_title_never_repeated_in_outline() {
    let extractor = OutlineExtractor::default();
    let layouts = vec![report_layout(), {
        let mut layout = report_layout();
        layout.metadata.title = Some("Strategic Plan for the Digital Library".to_string());
        layout
    }];

    for layout in layouts {
        let structure = extractor.extract(&layout).structure;
        let title_key = normalize_text(&structure.title);
        assert!(structure
            .outline
            .iter()
            .all(|entry| normalize_text(&entry.text) != title_key));
    }
}

#[test]
fn test_toc_outline_matches_entries() {
    let mut layout = report_layout();
    layout.toc = vec![
        TocEntry::new(1, "Introduction", 1),
        TocEntry::new(2, "Motivation", 1),
        TocEntry::new(3, "Prior Work", 2),
        TocEntry::new(4, "Footnote Anchor", 2),
        TocEntry::new(1, "Methods", 2),
        TocEntry::new(2, "Sampling", 3),
    ];
    let extraction = OutlineExtractor::default().extract(&layout);

    assert_eq!(extraction.path, ExtractionPath::TocBased);
    let expected: Vec<(HeadingLevel, &str)> = vec![
        (HeadingLevel::H1, "Introduction"),
        (HeadingLevel::H2, "Motivation"),
        (HeadingLevel::H3, "Prior Work"),
        (HeadingLevel::H1, "Methods"),
        (HeadingLevel::H2, "Sampling"),
    ];
    let actual: Vec<(HeadingLevel, &str)> = extraction
        .structure
        .outline
        .iter()
        .map(|e| (e.level, e.text.as_str()))
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_sparse_toc_is_ignored() {
    let mut layout = report_layout();
    layout.toc = vec![
        TocEntry::new(1, "Only", 1),
        TocEntry::new(1, "Three", 2),
        TocEntry::new(1, "Entries", 3),
    ];
    let extraction = OutlineExtractor::default().extract(&layout);
    assert_eq!(extraction.path, ExtractionPath::HeuristicBased);
}

#[test]
fn test_structure_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_layout(dir.path(), "report.json", &report_layout());

    let first = serde_json::to_string(&get_structure(&path).unwrap()).unwrap();
    let second = serde_json::to_string(&get_structure(&path).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_outline_ordered_by_position() {
    let mut layout = RawLayout::new();
    layout.add_page(page(vec![row("Cover Page Title", 26.0, "Helvetica-Bold", 80.0), body(200.0)]));
    // Collaborator reports the lower heading first
    layout.add_page(page(vec![
        row("Lower Heading", 16.0, "Helvetica-Bold", 500.0),
        body(530.0),
        row("Upper Heading", 16.0, "Helvetica-Bold", 100.0),
        body(130.0),
        body(145.0),
    ]));

    let structure = OutlineExtractor::default().extract(&layout).structure;
    let texts: Vec<&str> = structure.outline.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["Upper Heading", "Lower Heading"]);
}

#[test]
fn test_numbered_heading_scenario() {
    let mut layout = RawLayout::new();
    layout.add_page(page(vec![row("Intro", 18.0, "Times-Roman", 80.0)]));
    layout.add_page(page(vec![
        row("1.1 Background", 14.0, "Times-Bold", 80.0),
        row("body text continues here", 10.0, "Times-Roman", 110.0),
    ]));

    let structure = OutlineExtractor::default().extract(&layout).structure;
    assert_eq!(structure.title, "Intro");
    assert_eq!(structure.outline, vec![OutlineEntry::new(HeadingLevel::H2, "Background", 2)]);
}

#[test]
fn test_missing_model_yields_empty_outline_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let mut layout = RawLayout::new();
    layout.add_page(page(vec![body(100.0), body(115.0), body(130.0)]));
    let path = write_layout(dir.path(), "plain.json", &layout);

    let extraction = Docoutline::new()
        .with_model(dir.path().join("missing_model.json"))
        .unwrap()
        .extract(&path)
        .unwrap();

    assert_eq!(extraction.path, ExtractionPath::Unavailable);
    assert_eq!(extraction.structure.title, "The committee reviewed the figures in detail");
    assert!(extraction.structure.outline.is_empty());
    assert_eq!(extraction.warnings, vec![Warning::ModelMissing]);
}

#[test]
fn test_default_configuration_reports_missing_model() {
    let mut layout = RawLayout::new();
    layout.add_page(page(vec![body(100.0), body(115.0), body(130.0)]));

    let extraction = OutlineExtractor::default().extract(&layout);
    assert_eq!(extraction.structure.title, "The committee reviewed the figures in detail");
    assert!(extraction.structure.outline.is_empty());
    assert_eq!(extraction.warnings, vec![Warning::ModelMissing]);
}

#[test]
fn test_missing_model_still_uses_toc() {
    let mut layout = report_layout();
    layout.toc = (1..=4).map(|i| TocEntry::new(1, format!("Part {}", i), i)).collect();
    let extraction =
        OutlineExtractor::new(OutlineOptions::default().classifier_fallback()).extract(&layout);

    assert_eq!(extraction.path, ExtractionPath::TocBased);
    assert_eq!(extraction.structure.outline.len(), 4);
    assert!(extraction.warnings.is_empty());
}

#[test]
fn test_classifier_artifact_from_disk() {
    // Font size alone decides: Body below 12, H2 to 14.5, H1 to 20, Title above
    let mut coefficients = vec![vec![0.0; FEATURE_COUNT]; 4];
    coefficients[0][0] = 20.0;
    coefficients[1][0] = 16.0;
    coefficients[2][0] = 13.0;
    coefficients[3][0] = 10.0;
    let artifact = LinearModelArtifact {
        labels: vec![Label::Title, Label::H1, Label::H2, Label::Body],
        coefficients,
        intercepts: vec![-159.5, -79.5, -36.0, 0.0],
        scaler: None,
    };

    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("heading_classifier.json");
    fs::write(&model_path, serde_json::to_string(&artifact).unwrap()).unwrap();
    let layout_path = write_layout(dir.path(), "report.json", &report_layout());

    let extraction = Docoutline::new()
        .with_model(&model_path)
        .unwrap()
        .extract(&layout_path)
        .unwrap();

    assert_eq!(extraction.path, ExtractionPath::ClassifierBased);
    assert_eq!(extraction.structure.title, "Annual Report");
    let texts: Vec<&str> = extraction.structure.outline.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Overview", "Scope", "Strategic Plan for the", "Digital Library"]
    );
    assert_eq!(extraction.structure.outline[1].level, HeadingLevel::H2);
}

#[test]
fn test_invalid_model_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("broken.json");
    fs::write(&model_path, r#"{"labels": ["Body", "H1"], "coefficients": [[1.0]], "intercepts": [0.0]}"#)
        .unwrap();

    let result = Docoutline::new().with_model(&model_path);
    assert!(matches!(result, Err(Error::InvalidModel(_))));
}

#[test]
fn test_document_errors() {
    let dir = tempfile::tempdir().unwrap();
    let reader = JsonLayoutReader::new();

    let missing = reader.extract_layout(&dir.path().join("absent.json"));
    assert!(matches!(missing, Err(Error::DocumentNotFound(_))));

    let corrupt = dir.path().join("corrupt.json");
    fs::write(&corrupt, "{ not json").unwrap();
    let result = reader.extract_layout(&corrupt);
    assert!(matches!(result, Err(Error::LayoutParse(_))));
    assert!(result.unwrap_err().is_document_error());
}

#[test]
fn test_empty_document_gets_default_title() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_layout(dir.path(), "empty.json", &RawLayout::new());

    let structure = get_structure(&path).unwrap();
    assert_eq!(structure.title, "Untitled Document");
    assert!(structure.outline.is_empty());
}

#[test]
fn test_collaborator_json_shape() {
    let json = r#"{
        "metadata": {"title": "Field Manual"},
        "pages": [
            {"width": 612, "height": 792, "lines": [
                {"spans": [{"text": "Field Manual", "size": 22, "font": "Arial-Bold", "bbox": [72, 60, 300, 82]}]},
                {"spans": [{"text": "Safety First", "size": 16, "font": "Arial-Bold", "bbox": [72, 120, 220, 136]}]},
                {"spans": [
                    {"text": "Always wear", "size": 10, "font": "Arial", "bbox": [72, 150, 140, 160]},
                    {"text": "protective gear.", "size": 10, "font": "Arial", "bbox": [142, 150, 240, 160]}
                ]}
            ]}
        ],
        "toc": []
    }"#;
    let layout = RawLayout::from_json_str(json).unwrap();
    let extractor = OutlineExtractor::default().with_classifier(Arc::new(NeverCalled));
    let structure = extractor.extract(&layout).structure;

    assert_eq!(structure.title, "Field Manual");
    assert_eq!(structure.outline, vec![OutlineEntry::new(HeadingLevel::H2, "Safety First", 1)]);
}

/// Classifier that must not be consulted under the heuristic strategy.
struct NeverCalled;

impl docoutline::HeadingClassifier for NeverCalled {
    fn name(&self) -> &str {
        "never"
    }

    fn predict(
        &self,
        _features: &[docoutline::structure::FeatureVector],
    ) -> docoutline::Result<Vec<Label>> {
        panic!("classifier consulted under heuristic strategy");
    }
}
