//! Consolidated table built over a batch run.

use super::record::{ExtractedRecord, Field};

/// Header of the column holding the source document name.
pub const SOURCE_COLUMN: &str = "Arquivo";

/// One row: a successfully processed document and its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Source file name.
    pub source: String,
    /// Extracted fields.
    pub record: ExtractedRecord,
}

impl TableRow {
    /// Cell values in column order; absent fields are empty cells.
    pub fn cells(&self) -> Vec<&str> {
        self.cells_with("")
    }

    /// Cell values in column order, writing `absent` for fields that were
    /// not found. Fields found with an empty value stay empty.
    pub fn cells_with<'a>(&'a self, absent: &'a str) -> Vec<&'a str> {
        std::iter::once(self.source.as_str())
            .chain(self.record.iter().map(|(_, v)| v.unwrap_or(absent)))
            .collect()
    }
}

/// Rows in processing order. Rows are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidatedTable {
    rows: Vec<TableRow>,
}

impl ConsolidatedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column headers: the source column followed by every field label.
    pub fn headers() -> Vec<&'static str> {
        std::iter::once(SOURCE_COLUMN)
            .chain(Field::ALL.iter().map(|f| f.label()))
            .collect()
    }

    /// Append a row.
    pub fn push(&mut self, source: impl Into<String>, record: ExtractedRecord) {
        self.rows.push(TableRow {
            source: source.into(),
            record,
        });
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for a source document, if it was added.
    pub fn row(&self, source: &str) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.source == source)
    }
}
