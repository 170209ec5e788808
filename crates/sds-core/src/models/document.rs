//! Source documents and per-document processing outcomes.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::record::ExtractedRecord;

/// A source document on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// File name, used as the document identity.
    pub name: String,
    /// Full path to the file.
    pub path: PathBuf,
}

impl SourceDocument {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }

    /// File name without extension, used to name derived outputs.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }

    /// Lower-cased file extension.
    pub fn extension(&self) -> String {
        extension_of(&self.path)
    }
}

pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Outcome of processing one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    Success,
    Error { message: String },
}

impl DocumentStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, DocumentStatus::Success)
    }

    /// Error message, if the document failed.
    pub fn message(&self) -> Option<&str> {
        match self {
            DocumentStatus::Success => None,
            DocumentStatus::Error { message } => Some(message),
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentStatus::Success => f.write_str("success"),
            DocumentStatus::Error { .. } => f.write_str("error"),
        }
    }
}

/// Result of running one document through the processor.
#[derive(Debug, Clone)]
pub struct DocumentResult {
    /// Source file name.
    pub source: String,
    /// Source path.
    pub path: PathBuf,
    /// Processing status.
    pub status: DocumentStatus,
    /// Extracted fields; present only on success.
    pub record: Option<ExtractedRecord>,
    /// Number of pages read.
    pub page_count: usize,
    /// Where the intermediate structure was written, if it was.
    pub intermediate_path: Option<PathBuf>,
}

impl DocumentResult {
    pub fn success(
        document: &SourceDocument,
        record: ExtractedRecord,
        page_count: usize,
        intermediate_path: Option<PathBuf>,
    ) -> Self {
        Self {
            source: document.name.clone(),
            path: document.path.clone(),
            status: DocumentStatus::Success,
            record: Some(record),
            page_count,
            intermediate_path,
        }
    }

    pub fn error(document: &SourceDocument, message: impl Into<String>) -> Self {
        Self {
            source: document.name.clone(),
            path: document.path.clone(),
            status: DocumentStatus::Error {
                message: message.into(),
            },
            record: None,
            page_count: 0,
            intermediate_path: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
