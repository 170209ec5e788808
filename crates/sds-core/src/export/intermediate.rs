//! Per-document intermediate JSON files.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use super::{io_error, Result};
use crate::models::DocumentRecord;

/// Reads and writes [`DocumentRecord`] JSON files.
#[derive(Debug, Clone, Copy)]
pub struct IntermediateStore {
    pretty: bool,
}

impl IntermediateStore {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Write compact rather than indented JSON.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// Write a record to `path`, replacing any existing file.
    pub fn write(&self, record: &DocumentRecord, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| io_error(path, e))?;
        let mut writer = BufWriter::new(file);

        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, record)?;
        } else {
            serde_json::to_writer(&mut writer, record)?;
        }
        writer.flush().map_err(|e| io_error(path, e))?;

        debug!("Wrote intermediate output to {}", path.display());
        Ok(())
    }

    /// Read a record back.
    pub fn read(&self, path: &Path) -> Result<DocumentRecord> {
        let file = File::open(path).map_err(|e| io_error(path, e))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

impl Default for IntermediateStore {
    fn default() -> Self {
        Self::new()
    }
}
