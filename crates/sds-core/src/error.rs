//! Error types for the sds-core library.

use thiserror::Error;

/// Main error type for the sds library.
#[derive(Error, Debug)]
pub enum SdsError {
    /// Document reading error.
    #[error("read error: {0}")]
    Read(#[from] DocumentReadError),

    /// Output persistence error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Field extraction setup error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning a source document into page text.
#[derive(Error, Debug)]
pub enum DocumentReadError {
    /// The file could not be opened or read.
    #[error("failed to open {path}: {reason}")]
    Open { path: String, reason: String },

    /// Failed to parse the document structure.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// Failed to extract text from the document.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The document content is not valid text.
    #[error("failed to decode text: {0}")]
    Decode(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The document has no pages.
    #[error("document has no pages")]
    NoPages,

    /// No reader handles this kind of file.
    #[error("unsupported document type: {0}")]
    Unsupported(String),
}

/// Errors raised while persisting intermediate or consolidated output.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Destination could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to building the field rule table.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A rule could not be compiled into a pattern.
    #[error("invalid rule for {field}: {reason}")]
    InvalidRule { field: String, reason: String },
}

/// Result type for the sds library.
pub type Result<T> = std::result::Result<T, SdsError>;
