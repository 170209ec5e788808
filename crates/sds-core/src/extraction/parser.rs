//! Safety data sheet parser applying the rule table to a document's text.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::rules::{ExtractionMatch, RuleTable};
use super::RecordExtractor;
use crate::error::Result;
use crate::models::config::ExtractionConfig;
use crate::models::{ExtractedRecord, Field};

/// Result of a detailed extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted fields.
    pub record: ExtractedRecord,
    /// Match that produced each found field.
    pub matches: BTreeMap<Field, ExtractionMatch<String>>,
}

/// Rule-based SDS parser.
#[derive(Debug, Clone, Default)]
pub struct SdsParser {
    rules: RuleTable,
}

impl SdsParser {
    /// Create a parser with the built-in rules.
    pub fn new() -> Self {
        Self {
            rules: RuleTable::builtin(),
        }
    }

    /// Create a parser from a custom rule table.
    pub fn with_rules(rules: RuleTable) -> Self {
        Self { rules }
    }

    /// Create a parser with the built-in rules plus configured synonyms.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        let mut rules = RuleTable::builtin();
        for (field, labels) in config.synonyms_by_field()? {
            rules = rules.with_synonyms(field, labels.as_slice())?;
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Extract every field, keeping the match behind each value.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        let mut record = ExtractedRecord::new();
        let mut matches = BTreeMap::new();

        for field in Field::ALL {
            match self.rules.find(field, text) {
                Some(m) => {
                    trace!("{} matched at {:?}", field.key(), m.position);
                    record.set(field, &m.value);
                    matches.insert(field, m);
                }
                None => debug!("{} not found", field.key()),
            }
        }

        debug!(
            "Extracted {}/{} fields from {} chars",
            record.found_count(),
            Field::ALL.len(),
            text.len()
        );

        ExtractionResult { record, matches }
    }
}

impl RecordExtractor for SdsParser {
    fn extract(&self, text: &str) -> ExtractedRecord {
        self.parse(text).record
    }
}
