//! Core library for Safety Data Sheet field extraction.
//!
//! This crate provides:
//! - Page text reading for PDF and plain-text documents
//! - Rule-based extraction of transport and safety fields from Brazilian SDS (FISPQ) text
//! - Per-document intermediate JSON files
//! - Batch consolidation of many documents into one table

pub mod batch;
pub mod error;
pub mod export;
pub mod extraction;
pub mod models;
pub mod reader;

pub use batch::{BatchConsolidator, BatchObserver, BatchReport, DocumentProcessor};
pub use error::{Result, SdsError};
pub use export::{CsvExporter, IntermediateStore, TableExporter};
pub use extraction::{ExtractionResult, RecordExtractor, SdsParser};
pub use models::{
    ConsolidatedTable, DocumentRecord, DocumentResult, DocumentStatus, ExtractedRecord, Field,
    PageText, SdsConfig, SourceDocument,
};
pub use reader::{DocumentReader, PdfReader, ReaderSet, TextReader};
