//! Data models.

pub mod config;
pub mod document;
pub mod record;
pub mod table;

pub use config::SdsConfig;
pub use document::{DocumentResult, DocumentStatus, SourceDocument};
pub use record::{DocumentRecord, ExtractedRecord, Field, PageText};
pub use table::{ConsolidatedTable, TableRow};
