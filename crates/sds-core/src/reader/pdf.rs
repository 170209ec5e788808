//! PDF page text extraction using lopdf and pdf-extract.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use lopdf::Document;
use tracing::{debug, trace, warn};

use super::{open_error, DocumentReader, Result};
use crate::error::DocumentReadError;
use crate::models::PageText;

/// Reads PDF documents page by page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReader;

/// A parsed PDF ready for text extraction.
struct LoadedPdf {
    document: Document,
    /// Bytes handed to pdf-extract; re-serialized when the source was encrypted.
    raw_data: Vec<u8>,
}

impl PdfReader {
    pub fn new() -> Self {
        Self
    }

    /// Read page text from PDF bytes.
    pub fn read_bytes(&self, data: &[u8]) -> Result<Vec<PageText>> {
        let pdf = Self::load(data)?;

        let page_numbers: Vec<u32> = pdf.document.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Err(DocumentReadError::NoPages);
        }

        let texts = match Self::extract_with_pdf_extract(&pdf.raw_data) {
            Ok(texts) if texts.len() == page_numbers.len() => texts,
            Ok(texts) => {
                warn!(
                    "pdf-extract returned {} pages for a {}-page document, using lopdf",
                    texts.len(),
                    page_numbers.len()
                );
                Self::extract_with_lopdf(&pdf.document, &page_numbers)?
            }
            Err(reason) => {
                debug!("pdf-extract failed ({}), using lopdf", reason);
                Self::extract_with_lopdf(&pdf.document, &page_numbers)?
            }
        };

        let pages: Vec<PageText> = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageText::new(i as u32 + 1, text))
            .collect();

        debug!(
            "Read {} pages, {} chars",
            pages.len(),
            pages.iter().map(|p| p.text.len()).sum::<usize>()
        );
        Ok(pages)
    }

    fn load(data: &[u8]) -> Result<LoadedPdf> {
        let mut document =
            Document::load_mem(data).map_err(|e| DocumentReadError::Parse(e.to_string()))?;

        // Empty-password encryption is common on SDS exports
        let raw_data = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(DocumentReadError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            document.save_to(&mut decrypted).map_err(|e| {
                DocumentReadError::Parse(format!("failed to save decrypted PDF: {}", e))
            })?;
            decrypted
        } else {
            data.to_vec()
        };

        Ok(LoadedPdf { document, raw_data })
    }

    /// Per-page extraction with pdf-extract. A panic inside pdf-extract
    /// (e.g. a font dictionary without `Subtype`) is reported as an error.
    fn extract_with_pdf_extract(data: &[u8]) -> std::result::Result<Vec<String>, String> {
        match panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(data)
        })) {
            Ok(Ok(texts)) => Ok(texts),
            Ok(Err(e)) => Err(e.to_string()),
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!("pdf-extract panicked: {}", reason);
                Err(format!("pdf-extract panicked: {}", reason))
            }
        }
    }

    /// Per-page extraction with lopdf. Pages that fail come back empty;
    /// if every page fails the document is unreadable.
    fn extract_with_lopdf(document: &Document, page_numbers: &[u32]) -> Result<Vec<String>> {
        let mut texts = Vec::with_capacity(page_numbers.len());
        let mut last_error = None;

        for &page in page_numbers {
            match document.extract_text(&[page]) {
                Ok(text) => {
                    trace!("Page {}: {} chars", page, text.len());
                    texts.push(text);
                }
                Err(e) => {
                    warn!("Failed to extract text from page {}: {}", page, e);
                    last_error = Some(e.to_string());
                    texts.push(String::new());
                }
            }
        }

        let failed = texts.iter().filter(|t| t.is_empty()).count();
        match last_error {
            Some(reason) if failed == page_numbers.len() => {
                Err(DocumentReadError::TextExtraction(reason))
            }
            _ => Ok(texts),
        }
    }
}

impl DocumentReader for PdfReader {
    fn supports(&self, extension: &str) -> bool {
        extension == "pdf"
    }

    fn read_pages(&self, path: &Path) -> Result<Vec<PageText>> {
        let data = std::fs::read(path).map_err(|e| open_error(path, e))?;
        self.read_bytes(&data)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::{dictionary, Object, Stream};

    /// Build a PDF with one page per entry, each showing one line of text.
    pub(crate) fn make_test_pdf(pages: &[&str]) -> Vec<u8> {
        build_pdf(
            pages,
            dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Helvetica",
            },
        )
    }

    /// Same as [`make_test_pdf`] but the font dictionary lacks `Subtype`.
    pub(crate) fn make_pdf_without_font_subtype(pages: &[&str]) -> Vec<u8> {
        build_pdf(
            pages,
            dictionary! {
                "Type" => "Font",
                "BaseFont" => "Helvetica",
            },
        )
    }

    fn build_pdf(pages: &[&str], font: lopdf::Dictionary) -> Vec<u8> {
        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(font);
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = format!("BT /F1 12 Tf 100 700 Td ({}) Tj ET", text);
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_reads_pages_in_order() {
        let data = make_test_pdf(&["Nome do produto: Acetona", "Classe: 3"]);
        let pages = PdfReader::new().read_bytes(&data).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[1].page_number, 2);
        assert!(pages[0].text.contains("Acetona"), "got {:?}", pages[0].text);
        assert!(pages[1].text.contains("Classe"), "got {:?}", pages[1].text);
    }

    #[test]
    fn test_font_without_subtype_does_not_panic() {
        let data = make_pdf_without_font_subtype(&["Classe: 3"]);
        let result = PdfReader::new().read_bytes(&data);

        match result {
            Ok(pages) => assert_eq!(pages.len(), 1),
            Err(e) => assert!(
                matches!(e, DocumentReadError::TextExtraction(_)),
                "unexpected error {:?}",
                e
            ),
        }
    }

    #[test]
    fn test_invalid_pdf_is_parse_error() {
        let result = PdfReader::new().read_bytes(b"not a pdf");
        assert!(matches!(result, Err(DocumentReadError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let result = PdfReader::new().read_pages(Path::new("/nonexistent/sheet.pdf"));
        assert!(matches!(result, Err(DocumentReadError::Open { .. })));
    }

    #[test]
    fn test_supports_pdf_only() {
        let reader = PdfReader::new();
        assert!(reader.supports("pdf"));
        assert!(!reader.supports("txt"));
    }
}
