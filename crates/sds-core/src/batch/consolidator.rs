//! Batch processing of a directory into one consolidated table.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::processor::DocumentProcessor;
use super::report::BatchReport;
use crate::error::Result;
use crate::export::{CsvExporter, TableExporter};
use crate::models::config::{OutputConfig, ReaderConfig};
use crate::models::table::ConsolidatedTable;
use crate::models::{DocumentResult, SdsConfig, SourceDocument};

/// Receives progress notifications during a batch run.
pub trait BatchObserver {
    /// Called once the documents to process are known.
    fn on_start(&self, _total: usize) {}

    /// Called before a document is processed.
    fn on_document(&self, _index: usize, _document: &SourceDocument) {}

    /// Called after a document is processed.
    fn on_result(&self, _result: &DocumentResult) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// Runs the document processor over many documents and writes the
/// consolidated table once at the end.
pub struct BatchConsolidator {
    processor: DocumentProcessor,
    exporter: Box<dyn TableExporter>,
    reader_config: ReaderConfig,
    table_file_name: String,
}

impl BatchConsolidator {
    /// Create a consolidator with default discovery and output settings.
    pub fn new(processor: DocumentProcessor, exporter: impl TableExporter + 'static) -> Self {
        Self {
            processor,
            exporter: Box::new(exporter),
            reader_config: ReaderConfig::default(),
            table_file_name: OutputConfig::default().consolidated_file_name,
        }
    }

    /// Standard pipeline configured from `config`.
    pub fn from_config(config: &SdsConfig) -> Result<Self> {
        config.validate()?;
        let processor = DocumentProcessor::from_config(config)?;
        let exporter = CsvExporter::new().with_absent_marker(config.output.absent_marker.clone());
        Ok(Self::new(processor, exporter)
            .with_reader_config(config.reader.clone())
            .with_table_file_name(config.output.consolidated_file_name.clone()))
    }

    pub fn with_reader_config(mut self, reader_config: ReaderConfig) -> Self {
        self.reader_config = reader_config;
        self
    }

    pub fn with_table_file_name(mut self, name: impl Into<String>) -> Self {
        self.table_file_name = name.into();
        self
    }

    /// Documents in `source_dir` with an accepted extension, in directory
    /// listing order.
    pub fn discover(&self, source_dir: &Path) -> Result<Vec<SourceDocument>> {
        let mut documents = Vec::new();

        for entry in fs::read_dir(source_dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", source_dir.display(), e);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let document = SourceDocument::from_path(path);
            if self.reader_config.accepts(&document.extension()) {
                documents.push(document);
            } else {
                debug!("Skipping {}", document.name);
            }
        }

        Ok(documents)
    }

    /// Process every accepted document in `source_dir`.
    pub fn run(&self, source_dir: &Path, output_dir: &Path) -> Result<BatchReport> {
        self.run_with(source_dir, output_dir, &NoopObserver)
    }

    /// Like [`run`](Self::run), reporting progress to `observer`.
    pub fn run_with(
        &self,
        source_dir: &Path,
        output_dir: &Path,
        observer: &dyn BatchObserver,
    ) -> Result<BatchReport> {
        let documents = self.discover(source_dir)?;
        info!(
            "Found {} documents in {}",
            documents.len(),
            source_dir.display()
        );
        self.consolidate(documents, output_dir, observer)
    }

    /// Process an explicit list of files, without extension filtering.
    pub fn run_files(
        &self,
        files: &[PathBuf],
        output_dir: &Path,
        observer: &dyn BatchObserver,
    ) -> Result<BatchReport> {
        let documents = files.iter().map(SourceDocument::from_path).collect();
        self.consolidate(documents, output_dir, observer)
    }

    fn consolidate(
        &self,
        documents: Vec<SourceDocument>,
        output_dir: &Path,
        observer: &dyn BatchObserver,
    ) -> Result<BatchReport> {
        fs::create_dir_all(output_dir)?;
        observer.on_start(documents.len());

        let mut table = ConsolidatedTable::new();
        let mut results = Vec::with_capacity(documents.len());
        let mut claimed = HashSet::new();

        for (index, document) in documents.iter().enumerate() {
            observer.on_document(index, document);

            let intermediate_path = self
                .processor
                .writes_intermediate()
                .then(|| self.claim_intermediate_path(document, output_dir, &mut claimed));
            let result = self.processor.process_into(document, intermediate_path);
            if let Some(record) = &result.record {
                table.push(&result.source, record.clone());
            }

            observer.on_result(&result);
            results.push(result);
        }

        let table_path = output_dir.join(&self.table_file_name);
        self.exporter.export(&table, &table_path)?;
        info!(
            "Wrote {} of {} documents to {}",
            table.len(),
            results.len(),
            table_path.display()
        );

        Ok(BatchReport {
            table_path,
            table,
            results,
        })
    }

    /// First intermediate path for `document` not yet used in this run.
    ///
    /// Paths are compared case-insensitively so `x.pdf` and `X.PDF` do not
    /// share a file on case-insensitive filesystems either.
    fn claim_intermediate_path(
        &self,
        document: &SourceDocument,
        output_dir: &Path,
        claimed: &mut HashSet<String>,
    ) -> PathBuf {
        let mut variant = 0;
        loop {
            let path = self
                .processor
                .intermediate_path_variant(document, output_dir, variant);
            if claimed.insert(path.to_string_lossy().to_lowercase()) {
                if variant > 0 {
                    warn!(
                        "Intermediate name for {} already used in this batch, writing {}",
                        document.name,
                        path.display()
                    );
                }
                return path;
            }
            variant += 1;
        }
    }
}
