//! Document processing and batch consolidation.

mod consolidator;
mod processor;
mod report;

pub use consolidator::{BatchConsolidator, BatchObserver, NoopObserver};
pub use processor::{concatenate_pages, DocumentProcessor};
pub use report::BatchReport;
