//! Pre-extracted plain text documents.
//!
//! Pages are separated by form feeds, as written by `pdftotext`.

use std::path::Path;

use tracing::debug;

use super::{open_error, DocumentReader, Result};
use crate::error::DocumentReadError;
use crate::models::PageText;

const PAGE_BREAK: char = '\u{c}';

/// Reads UTF-8 text files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReader;

impl TextReader {
    pub fn new() -> Self {
        Self
    }

    /// Split decoded text into pages.
    pub fn read_bytes(&self, data: &[u8]) -> Result<Vec<PageText>> {
        let text =
            std::str::from_utf8(data).map_err(|e| DocumentReadError::Decode(e.to_string()))?;

        // pdftotext ends the last page with a form feed too
        let text = text.strip_suffix(PAGE_BREAK).unwrap_or(text);

        let pages: Vec<PageText> = text
            .split(PAGE_BREAK)
            .enumerate()
            .map(|(i, page)| PageText::new(i as u32 + 1, page))
            .collect();

        debug!("Read {} text pages", pages.len());
        Ok(pages)
    }
}

impl DocumentReader for TextReader {
    fn supports(&self, extension: &str) -> bool {
        extension == "txt"
    }

    fn read_pages(&self, path: &Path) -> Result<Vec<PageText>> {
        let data = std::fs::read(path).map_err(|e| open_error(path, e))?;
        self.read_bytes(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_splits_on_form_feed() {
        let pages = TextReader::new()
            .read_bytes("page one\n\u{c}page two\n\u{c}".as_bytes())
            .unwrap();
        assert_eq!(
            pages,
            vec![PageText::new(1, "page one\n"), PageText::new(2, "page two\n")]
        );
    }

    #[test]
    fn test_single_page_without_breaks() {
        let pages = TextReader::new().read_bytes(b"Classe: 3").unwrap();
        assert_eq!(pages, vec![PageText::new(1, "Classe: 3")]);
    }

    #[test]
    fn test_empty_file_is_one_empty_page() {
        let pages = TextReader::new().read_bytes(b"").unwrap();
        assert_eq!(pages, vec![PageText::new(1, "")]);
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let result = TextReader::new().read_bytes(&[0xff, 0xfe, 0x00]);
        assert!(matches!(result, Err(DocumentReadError::Decode(_))));
    }
}
