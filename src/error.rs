//! Error types for docoutline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting a document outline.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document (or its layout dump) does not exist.
    #[error("Document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    /// The layout data is corrupt or unreadable.
    #[error("Layout parsing error: {0}")]
    LayoutParse(String),

    /// No trained classifier artifact exists at the given location.
    #[error("Classifier model not found: {}", .0.display())]
    ModelMissing(PathBuf),

    /// The classifier artifact exists but is inconsistent.
    #[error("Invalid classifier model: {0}")]
    InvalidModel(String),

    /// The classifier failed to produce predictions.
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// The embedding capability failed.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error during rendering (JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error is scoped to a single document.
    ///
    /// Batch drivers report these per document and keep going.
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::DocumentNotFound(_) | Error::LayoutParse(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.into())
        } else {
            Error::LayoutParse(err.to_string())
        }
    }
}
