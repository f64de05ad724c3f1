//! Error types for loading spec documents.

use argdecl_core::SpecificationError;
use thiserror::Error;

/// Errors raised while reading or converting a spec document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document converted, but the resulting specification is malformed.
    #[error("invalid specification: {0}")]
    Specification(#[from] SpecificationError),

    /// A field combination the converter cannot express.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

/// Convenience alias for results with [`DocumentError`].
pub type Result<T> = std::result::Result<T, DocumentError>;
