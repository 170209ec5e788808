//! Output writers: the consolidated table and per-document intermediate files.

mod csv_table;
mod intermediate;

pub use csv_table::CsvExporter;
pub use intermediate::IntermediateStore;

use std::path::Path;

use crate::error::ExportError;
use crate::models::table::ConsolidatedTable;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Trait for table exporters.
pub trait TableExporter {
    /// Write the whole table to `path`, replacing any existing file.
    fn export(&self, table: &ConsolidatedTable, path: &Path) -> Result<()>;
}

pub(crate) fn io_error(path: &Path, source: std::io::Error) -> ExportError {
    ExportError::Io {
        path: path.display().to_string(),
        source,
    }
}
