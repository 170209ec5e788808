//! Document readers turning source files into page text.

mod pdf;
mod text;

pub use pdf::PdfReader;
pub use text::TextReader;

#[cfg(test)]
pub(crate) use pdf::tests::{make_pdf_without_font_subtype, make_test_pdf};

use std::path::Path;

use crate::error::DocumentReadError;
use crate::models::document::extension_of;
use crate::models::PageText;

/// Result type for reader operations.
pub type Result<T> = std::result::Result<T, DocumentReadError>;

/// Trait for document readers.
///
/// Implementations return pages in physical order, numbered from 1.
pub trait DocumentReader {
    /// Whether this reader handles files with the given lower-cased extension.
    fn supports(&self, extension: &str) -> bool;

    /// Read the text of every page.
    fn read_pages(&self, path: &Path) -> Result<Vec<PageText>>;
}

pub(crate) fn open_error(path: &Path, err: std::io::Error) -> DocumentReadError {
    DocumentReadError::Open {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Dispatches to the first reader that supports a file's extension.
pub struct ReaderSet {
    readers: Vec<Box<dyn DocumentReader>>,
}

impl ReaderSet {
    /// Set with no readers.
    pub fn empty() -> Self {
        Self {
            readers: Vec::new(),
        }
    }

    /// PDF and plain text readers.
    pub fn standard() -> Self {
        Self::empty()
            .with_reader(PdfReader::new())
            .with_reader(TextReader::new())
    }

    pub fn with_reader(mut self, reader: impl DocumentReader + 'static) -> Self {
        self.readers.push(Box::new(reader));
        self
    }
}

impl Default for ReaderSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl DocumentReader for ReaderSet {
    fn supports(&self, extension: &str) -> bool {
        self.readers.iter().any(|r| r.supports(extension))
    }

    fn read_pages(&self, path: &Path) -> Result<Vec<PageText>> {
        let extension = extension_of(path);
        let reader = self
            .readers
            .iter()
            .find(|r| r.supports(&extension))
            .ok_or_else(|| DocumentReadError::Unsupported(extension.clone()))?;
        reader.read_pages(path)
    }
}
