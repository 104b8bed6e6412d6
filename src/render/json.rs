//! JSON rendering for extraction results.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::SemanticLink;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Semantic links of one document, as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinksDocument<'a> {
    pub document_id: &'a str,
    pub links: &'a [SemanticLink],
}

/// Serialize any output value to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Serialize the links of a document under its identifier.
pub fn links_to_json(document_id: &str, links: &[SemanticLink], format: JsonFormat) -> Result<String> {
    to_json(&LinksDocument { document_id, links }, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentStructure, HeadingLevel, OutlineEntry};

    fn structure() -> DocumentStructure {
        DocumentStructure {
            title: "Field Guide".to_string(),
            outline: vec![OutlineEntry::new(HeadingLevel::H1, "Birds", 2)],
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&structure(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"Field Guide\""));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&structure(), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Field Guide","outline":[{"level":"H1","text":"Birds","page":2}]}"#
        );
    }

    #[test]
    fn test_links_to_json() {
        let links = vec![SemanticLink {
            source_page: 1,
            source_heading: "Setup".to_string(),
            target_page: 4,
            target_heading: "Configuration".to_string(),
            score: 0.62,
        }];
        let json = links_to_json("manual.json", &links, JsonFormat::Compact).unwrap();
        assert!(json.starts_with(r#"{"document_id":"manual.json","links":[{"source_page":1"#));
        assert!(json.contains(r#""score":0.62"#));
    }
}
