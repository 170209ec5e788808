//! Safety data sheet field schema and extracted records.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A field extracted from a safety data sheet.
///
/// The set is closed and the declaration order is the column order of every
/// table this crate writes. Serialized names are the Portuguese labels used
/// as column headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Product or substance name.
    #[serde(rename = "Substância")]
    Substance,
    /// UN number (Número ONU).
    #[serde(rename = "Número ONU")]
    UnNumber,
    /// Hazard identification (Kemler) number.
    #[serde(rename = "Número de Risco")]
    RiskNumber,
    /// Transport hazard class.
    #[serde(rename = "Classe")]
    Class,
    /// Subsidiary hazard.
    #[serde(rename = "Risco Subsidiário")]
    SubsidiaryRisk,
    /// First-aid measures section.
    #[serde(rename = "Primeiros Socorros")]
    FirstAid,
    /// Fire-fighting measures section.
    #[serde(rename = "Medidas de Combate ao Incêndio")]
    FireFighting,
    /// Accidental release measures section.
    #[serde(rename = "Medidas a Tomar em Caso de Fugas Acidentais")]
    AccidentalRelease,
}

impl Field {
    /// All fields in column order.
    pub const ALL: [Field; 8] = [
        Field::Substance,
        Field::UnNumber,
        Field::RiskNumber,
        Field::Class,
        Field::SubsidiaryRisk,
        Field::FirstAid,
        Field::FireFighting,
        Field::AccidentalRelease,
    ];

    /// Column header and JSON key.
    pub fn label(self) -> &'static str {
        match self {
            Field::Substance => "Substância",
            Field::UnNumber => "Número ONU",
            Field::RiskNumber => "Número de Risco",
            Field::Class => "Classe",
            Field::SubsidiaryRisk => "Risco Subsidiário",
            Field::FirstAid => "Primeiros Socorros",
            Field::FireFighting => "Medidas de Combate ao Incêndio",
            Field::AccidentalRelease => "Medidas a Tomar em Caso de Fugas Acidentais",
        }
    }

    /// Stable ASCII key used in configuration files.
    pub fn key(self) -> &'static str {
        match self {
            Field::Substance => "substance",
            Field::UnNumber => "un_number",
            Field::RiskNumber => "risk_number",
            Field::Class => "class",
            Field::SubsidiaryRisk => "subsidiary_risk",
            Field::FirstAid => "first_aid",
            Field::FireFighting => "fire_fighting",
            Field::AccidentalRelease => "accidental_release",
        }
    }

    /// Look up a field by its configuration key.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Values extracted from one document.
///
/// Every [`Field`] is always present. `None` means the field was not found;
/// `Some` holds a trimmed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<Field, Option<String>>",
    into = "BTreeMap<Field, Option<String>>"
)]
pub struct ExtractedRecord {
    values: BTreeMap<Field, Option<String>>,
}

impl ExtractedRecord {
    /// Create a record with every field absent.
    pub fn new() -> Self {
        Self {
            values: Field::ALL.into_iter().map(|f| (f, None)).collect(),
        }
    }

    /// Value of a field, if found.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).and_then(|v| v.as_deref())
    }

    /// Whether a field was found.
    pub fn is_present(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Store a found value, trimming surrounding whitespace.
    pub fn set(&mut self, field: Field, value: impl AsRef<str>) {
        self.values
            .insert(field, Some(value.as_ref().trim().to_string()));
    }

    /// Mark a field as absent.
    pub fn clear(&mut self, field: Field) {
        self.values.insert(field, None);
    }

    /// Iterate over all fields in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, Option<&str>)> + '_ {
        self.values.iter().map(|(f, v)| (*f, v.as_deref()))
    }

    /// Number of fields that were found.
    pub fn found_count(&self) -> usize {
        self.values.values().filter(|v| v.is_some()).count()
    }

    /// Fields that were not found.
    pub fn missing_fields(&self) -> Vec<Field> {
        self.iter()
            .filter(|(_, v)| v.is_none())
            .map(|(f, _)| f)
            .collect()
    }
}

impl Default for ExtractedRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BTreeMap<Field, Option<String>>> for ExtractedRecord {
    fn from(map: BTreeMap<Field, Option<String>>) -> Self {
        let mut record = ExtractedRecord::new();
        for (field, value) in map {
            match value {
                Some(v) => record.set(field, v),
                None => record.clear(field),
            }
        }
        record
    }
}

impl From<ExtractedRecord> for BTreeMap<Field, Option<String>> {
    fn from(record: ExtractedRecord) -> Self {
        record.values
    }
}

/// Text of a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// Page number (1-indexed).
    pub page_number: u32,
    /// Extracted text, empty when the page yields nothing.
    pub text: String,
}

impl PageText {
    pub fn new(page_number: u32, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
        }
    }
}

/// Intermediate structure persisted for every processed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Source file name.
    pub source: String,
    /// When the document was processed.
    pub processed_at: DateTime<Utc>,
    /// Trimmed text of each page, in page order.
    pub pages: Vec<PageText>,
    /// Fields extracted from the concatenated text.
    pub extracted_information: ExtractedRecord,
}

impl DocumentRecord {
    /// Build the intermediate structure from raw page text.
    pub fn new(source: impl Into<String>, pages: &[PageText], record: ExtractedRecord) -> Self {
        Self {
            source: source.into(),
            processed_at: Utc::now(),
            pages: pages
                .iter()
                .map(|p| PageText::new(p.page_number, p.text.trim()))
                .collect(),
            extracted_information: record,
        }
    }
}
