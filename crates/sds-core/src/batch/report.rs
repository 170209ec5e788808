//! Outcome of a batch run.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ExportError, Result};
use crate::export::io_error;
use crate::models::table::ConsolidatedTable;
use crate::models::{DocumentResult, DocumentStatus};

const STATUS_HEADERS: [&str; 5] = ["file", "status", "pages", "intermediate", "error"];

/// Everything a batch run produced.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Where the consolidated table was written.
    pub table_path: PathBuf,
    /// Rows for every successful document.
    pub table: ConsolidatedTable,
    /// Per-document results in processing order.
    pub results: Vec<DocumentResult>,
}

impl BatchReport {
    /// Status per source file name.
    ///
    /// Files with the same name from different directories share one key;
    /// the last one processed wins. Use [`statuses_by_path`] when the
    /// documents came from more than one directory.
    ///
    /// [`statuses_by_path`]: Self::statuses_by_path
    pub fn statuses(&self) -> BTreeMap<&str, &DocumentStatus> {
        self.results
            .iter()
            .map(|r| (r.source.as_str(), &r.status))
            .collect()
    }

    /// Status per source path, one entry per processed document.
    pub fn statuses_by_path(&self) -> BTreeMap<&Path, &DocumentStatus> {
        self.results
            .iter()
            .map(|r| (r.path.as_path(), &r.status))
            .collect()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.results.len() - self.success_count()
    }

    /// Results that ended in an error status.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    /// Write one CSV line per document with its status.
    pub fn write_status_report(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| io_error(path, e))?;
        let mut wtr = csv::Writer::from_writer(BufWriter::new(file));

        wtr.write_record(STATUS_HEADERS).map_err(ExportError::from)?;
        for result in &self.results {
            let status = result.status.to_string();
            let pages = result.page_count.to_string();
            let intermediate = result
                .intermediate_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();

            wtr.write_record([
                result.source.as_str(),
                status.as_str(),
                pages.as_str(),
                intermediate.as_str(),
                result.status.message().unwrap_or(""),
            ])
            .map_err(ExportError::from)?;
        }

        let mut writer = wtr
            .into_inner()
            .map_err(|e| ExportError::from(csv::Error::from(e.into_error())))?;
        writer.flush().map_err(|e| io_error(path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtractedRecord, Field, SourceDocument};
    use pretty_assertions::assert_eq;

    fn sample_report() -> BatchReport {
        let mut record = ExtractedRecord::new();
        record.set(Field::Substance, "Tolueno");

        let good = SourceDocument::from_path("/in/tolueno.pdf");
        let bad = SourceDocument::from_path("/in/broken.pdf");

        let mut table = ConsolidatedTable::new();
        table.push(&good.name, record.clone());

        BatchReport {
            table_path: PathBuf::from("/out/consolidated.csv"),
            table,
            results: vec![
                DocumentResult::success(&good, record, 3, Some(PathBuf::from("/out/tolueno.json"))),
                DocumentResult::error(&bad, "read error: document has no pages"),
            ],
        }
    }

    #[test]
    fn test_counts() {
        let report = sample_report();
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.failures().next().unwrap().source, "broken.pdf");
    }

    #[test]
    fn test_statuses_keyed_by_name() {
        let report = sample_report();
        let statuses = report.statuses();
        assert_eq!(statuses.keys().copied().collect::<Vec<_>>(), vec!["broken.pdf", "tolueno.pdf"]);
        assert!(statuses["tolueno.pdf"].is_success());
    }

    #[test]
    fn test_statuses_by_path_keeps_same_named_files() {
        let first = SourceDocument::from_path("/in/a/ficha.pdf");
        let second = SourceDocument::from_path("/in/b/ficha.pdf");
        let report = BatchReport {
            table_path: PathBuf::from("/out/consolidated.csv"),
            table: ConsolidatedTable::new(),
            results: vec![
                DocumentResult::success(&first, ExtractedRecord::new(), 1, None),
                DocumentResult::error(&second, "read error: document has no pages"),
            ],
        };

        assert_eq!(report.statuses().len(), 1);

        let by_path = report.statuses_by_path();
        assert_eq!(by_path.len(), 2);
        assert!(by_path[Path::new("/in/a/ficha.pdf")].is_success());
        assert!(!by_path[Path::new("/in/b/ficha.pdf")].is_success());
    }

    #[test]
    fn test_status_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.csv");
        sample_report().write_status_report(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "file,status,pages,intermediate,error",
                "tolueno.pdf,success,3,/out/tolueno.json,",
                "broken.pdf,error,0,,read error: document has no pages",
            ]
        );
    }
}
