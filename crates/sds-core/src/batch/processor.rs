//! Single-document processing: read, extract, persist.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{DocumentReadError, Result, SdsError};
use crate::export::IntermediateStore;
use crate::extraction::{RecordExtractor, SdsParser};
use crate::models::{
    DocumentRecord, DocumentResult, Field, PageText, SdsConfig, SourceDocument,
};
use crate::reader::{DocumentReader, ReaderSet};

/// Join page texts in page order, each followed by `separator`.
pub fn concatenate_pages(pages: &[PageText], separator: &str) -> String {
    let mut full_text = String::with_capacity(
        pages.iter().map(|p| p.text.len() + separator.len()).sum(),
    );
    for page in pages {
        full_text.push_str(&page.text);
        full_text.push_str(separator);
    }
    full_text
}

/// Turns one source document into a [`DocumentResult`].
///
/// Every failure while reading the document or writing its intermediate
/// file is reported as an error status; nothing escapes [`process`].
///
/// [`process`]: DocumentProcessor::process
pub struct DocumentProcessor {
    reader: Box<dyn DocumentReader>,
    extractor: Box<dyn RecordExtractor>,
    store: IntermediateStore,
    page_separator: String,
    write_intermediate: bool,
    intermediate_extension: String,
}

impl DocumentProcessor {
    /// Create a processor with default output settings.
    pub fn new(
        reader: impl DocumentReader + 'static,
        extractor: impl RecordExtractor + 'static,
    ) -> Self {
        Self {
            reader: Box::new(reader),
            extractor: Box::new(extractor),
            store: IntermediateStore::new(),
            page_separator: "\n".to_string(),
            write_intermediate: true,
            intermediate_extension: "json".to_string(),
        }
    }

    /// Standard readers and the SDS parser, configured from `config`.
    pub fn from_config(config: &SdsConfig) -> Result<Self> {
        let parser = SdsParser::from_config(&config.extraction)?;
        Ok(Self::new(ReaderSet::standard(), parser)
            .with_page_separator(config.reader.page_separator.clone())
            .with_intermediate(config.output.write_intermediate)
            .with_intermediate_extension(config.output.intermediate_extension.clone()))
    }

    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = separator.into();
        self
    }

    /// Enable or disable per-document intermediate files.
    pub fn with_intermediate(mut self, enabled: bool) -> Self {
        self.write_intermediate = enabled;
        self
    }

    pub fn with_intermediate_extension(mut self, extension: impl Into<String>) -> Self {
        self.intermediate_extension = extension.into();
        self
    }

    pub fn with_store(mut self, store: IntermediateStore) -> Self {
        self.store = store;
        self
    }

    /// Whether [`process`](Self::process) writes an intermediate file.
    pub fn writes_intermediate(&self) -> bool {
        self.write_intermediate
    }

    /// Where the intermediate file for `document` goes.
    pub fn intermediate_path(&self, document: &SourceDocument, output_dir: &Path) -> PathBuf {
        self.intermediate_path_variant(document, output_dir, 0)
    }

    /// Alternative intermediate locations, for when the usual one is taken.
    ///
    /// Variant 0 is `<stem>.<ext>`, variant 1 `<name>.<ext>` and variant
    /// `n > 1` is `<name>.<n>.<ext>`.
    pub fn intermediate_path_variant(
        &self,
        document: &SourceDocument,
        output_dir: &Path,
        variant: usize,
    ) -> PathBuf {
        let extension = self.intermediate_extension.trim_start_matches('.');
        let file_name = match variant {
            0 => format!("{}.{}", document.stem(), extension),
            1 => format!("{}.{}", document.name, extension),
            n => format!("{}.{}.{}", document.name, n, extension),
        };
        output_dir.join(file_name)
    }

    /// Process one document.
    pub fn process(&self, document: &SourceDocument, output_dir: &Path) -> DocumentResult {
        let intermediate_path = self
            .write_intermediate
            .then(|| self.intermediate_path(document, output_dir));
        self.process_into(document, intermediate_path)
    }

    /// Process one document, writing its intermediate file to
    /// `intermediate_path` when given.
    pub fn process_into(
        &self,
        document: &SourceDocument,
        intermediate_path: Option<PathBuf>,
    ) -> DocumentResult {
        info!("Processing {}", document.name);

        match self.try_process(document, intermediate_path) {
            Ok(result) => result,
            Err(e) => {
                warn!("Failed to process {}: {}", document.name, e);
                DocumentResult::error(document, e.to_string())
            }
        }
    }

    fn try_process(
        &self,
        document: &SourceDocument,
        intermediate_path: Option<PathBuf>,
    ) -> Result<DocumentResult> {
        let pages = self.reader.read_pages(&document.path)?;
        if pages.is_empty() {
            return Err(SdsError::Read(DocumentReadError::NoPages));
        }

        let full_text = concatenate_pages(&pages, &self.page_separator);
        let record = self.extractor.extract(&full_text);
        debug!(
            "{}: {} pages, {}/{} fields found",
            document.name,
            pages.len(),
            record.found_count(),
            Field::ALL.len()
        );

        if let Some(path) = &intermediate_path {
            let intermediate = DocumentRecord::new(&document.name, &pages, record.clone());
            self.store.write(&intermediate, path)?;
        }

        Ok(DocumentResult::success(
            document,
            record,
            pages.len(),
            intermediate_path,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentStatus, ExtractedRecord};
    use crate::reader::TextReader;
    use pretty_assertions::assert_eq;

    /// Reader returning fixed pages, or failing.
    struct FixedReader(Option<Vec<PageText>>);

    impl DocumentReader for FixedReader {
        fn supports(&self, _extension: &str) -> bool {
            true
        }

        fn read_pages(&self, _path: &Path) -> crate::reader::Result<Vec<PageText>> {
            self.0.clone().ok_or(DocumentReadError::Parse("corrupt xref".to_string()))
        }
    }

    #[test]
    fn test_concatenate_pages() {
        let pages = vec![PageText::new(1, "a"), PageText::new(2, ""), PageText::new(3, "c")];
        assert_eq!(concatenate_pages(&pages, "\n"), "a\n\nc\n");
    }

    #[test]
    fn test_section_spanning_pages() {
        let reader = FixedReader(Some(vec![
            PageText::new(1, "4. PRIMEIROS SOCORROS\nLavar os olhos."),
            PageText::new(2, "Procurar um médico.\n5. MEDIDAS DE COMBATE A INCÊNDIO"),
        ]));
        let processor = DocumentProcessor::new(reader, SdsParser::new()).with_intermediate(false);
        let doc = SourceDocument::from_path("x.pdf");

        let result = processor.process(&doc, Path::new("."));
        assert_eq!(
            result.record.unwrap().get(Field::FirstAid),
            Some("Lavar os olhos.\nProcurar um médico.")
        );
        assert_eq!(result.page_count, 2);
        assert_eq!(result.intermediate_path, None);
    }

    #[test]
    fn test_read_failure_becomes_error_status() {
        let processor = DocumentProcessor::new(FixedReader(None), SdsParser::new());
        let doc = SourceDocument::from_path("broken.pdf");

        let result = processor.process(&doc, Path::new("."));
        assert_eq!(
            result.status,
            DocumentStatus::Error {
                message: "read error: failed to parse document: corrupt xref".to_string()
            }
        );
        assert!(result.record.is_none());
    }

    #[test]
    fn test_no_pages_is_error() {
        let processor = DocumentProcessor::new(FixedReader(Some(vec![])), SdsParser::new());
        let result = processor.process(&SourceDocument::from_path("empty.pdf"), Path::new("."));
        assert!(!result.is_success());
        assert!(result.status.message().unwrap().contains("no pages"));
    }

    #[test]
    fn test_writes_intermediate_that_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("etanol.txt");
        std::fs::write(&source, "Nome do produto: Etanol\u{c}Número ONU: 1170\n").unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();

        let processor = DocumentProcessor::new(TextReader::new(), SdsParser::new());
        let result = processor.process(&SourceDocument::from_path(&source), &out);

        let path = result.intermediate_path.clone().unwrap();
        assert_eq!(path, out.join("etanol.json"));

        let stored = IntermediateStore::new().read(&path).unwrap();
        assert_eq!(stored.source, "etanol.txt");
        assert_eq!(stored.pages.len(), 2);
        assert_eq!(Some(stored.extracted_information), result.record);
    }

    #[test]
    fn test_intermediate_path_variants() {
        let processor = DocumentProcessor::new(TextReader::new(), SdsParser::new());
        let document = SourceDocument::from_path("in/x.PDF");
        let out = Path::new("out");

        assert_eq!(processor.intermediate_path(&document, out), out.join("x.json"));
        assert_eq!(
            processor.intermediate_path_variant(&document, out, 1),
            out.join("x.PDF.json")
        );
        assert_eq!(
            processor.intermediate_path_variant(&document, out, 3),
            out.join("x.PDF.3.json")
        );
    }

    #[test]
    fn test_intermediate_write_failure_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let reader = FixedReader(Some(vec![PageText::new(1, "Classe: 3")]));
        let processor = DocumentProcessor::new(reader, SdsParser::new());

        let missing = dir.path().join("does-not-exist");
        let result = processor.process(&SourceDocument::from_path("a.pdf"), &missing);
        assert!(!result.is_success());
        assert!(result.status.message().unwrap().starts_with("export error"));
    }

    #[test]
    fn test_custom_extractor() {
        struct Constant;
        impl RecordExtractor for Constant {
            fn extract(&self, _text: &str) -> ExtractedRecord {
                let mut record = ExtractedRecord::new();
                record.set(Field::Class, "9");
                record
            }
        }

        let reader = FixedReader(Some(vec![PageText::new(1, "")]));
        let processor = DocumentProcessor::new(reader, Constant).with_intermediate(false);
        let result = processor.process(&SourceDocument::from_path("a.pdf"), Path::new("."));
        assert_eq!(result.record.unwrap().get(Field::Class), Some("9"));
    }
}
