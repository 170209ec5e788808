//! CSV export of the consolidated table.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use super::{io_error, Result, TableExporter};
use crate::models::table::ConsolidatedTable;

/// Writes the consolidated table as CSV with a header row.
///
/// By default a field that was not found and a field found with an empty
/// value both become empty cells. Set an absent marker with
/// [`with_absent_marker`](Self::with_absent_marker) to tell them apart.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    delimiter: u8,
    absent_marker: String,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            absent_marker: String::new(),
        }
    }

    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Cell text for fields that were not found.
    pub fn with_absent_marker(mut self, marker: impl Into<String>) -> Self {
        self.absent_marker = marker.into();
        self
    }

    /// Write the table to any writer.
    pub fn write_to<W: Write>(&self, table: &ConsolidatedTable, writer: W) -> Result<W> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        wtr.write_record(ConsolidatedTable::headers())?;
        for row in table.rows() {
            wtr.write_record(row.cells_with(&self.absent_marker))?;
        }

        wtr.into_inner()
            .map_err(|e| csv::Error::from(e.into_error()).into())
    }

    /// Render the table as a CSV string.
    pub fn to_string(&self, table: &ConsolidatedTable) -> Result<String> {
        let data = self.write_to(table, Vec::new())?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableExporter for CsvExporter {
    fn export(&self, table: &ConsolidatedTable, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| io_error(path, e))?;
        let mut writer = self.write_to(table, BufWriter::new(file))?;
        writer.flush().map_err(|e| io_error(path, e))?;

        debug!("Wrote {} rows to {}", table.len(), path.display());
        Ok(())
    }
}
