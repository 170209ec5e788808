//! Safety data sheet field extraction.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, SdsParser};

use crate::models::ExtractedRecord;

/// Trait for record extractors.
///
/// Extraction never fails: a field that cannot be found is absent in the
/// returned record.
pub trait RecordExtractor {
    /// Extract all fields from the concatenated text of one document.
    fn extract(&self, text: &str) -> ExtractedRecord;
}
