//! Rule-based field extractors for safety data sheets.
//!
//! Each [`Field`] maps to an ordered list of rules. A rule is a set of label
//! synonyms plus a [`ValueShape`] describing what follows the label. The
//! built-in synonyms live in [`table`] as plain data; [`patterns`] turns a
//! rule into a regular expression.

pub mod patterns;
pub mod table;

pub use table::{FieldRule, RuleTable, BUILTIN_RULES};

use crate::models::Field;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all non-overlapping occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// What a rule captures after its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// `<label> : <rest of line>`.
    Line,
    /// `<label> : <digits>`, kept as the raw digit string.
    Digits,
    /// Optionally numbered heading at the start of a line, then everything
    /// up to the next `<digits>. ` heading or the end of the text.
    Section,
    /// Like `Section`, but the label may appear anywhere in a line.
    Keyword,
}

impl ValueShape {
    /// Shape used for a field's configured synonyms.
    pub fn for_field(field: Field) -> Self {
        match field {
            Field::Substance | Field::SubsidiaryRisk => ValueShape::Line,
            Field::UnNumber | Field::RiskNumber | Field::Class => ValueShape::Digits,
            Field::FirstAid | Field::FireFighting | Field::AccidentalRelease => {
                ValueShape::Section
            }
        }
    }
}

/// A declarative rule: accepted label synonyms and the value shape.
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub labels: &'static [&'static str],
    pub shape: ValueShape,
}

/// A value matched in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span of the whole match in the source text.
    pub position: (usize, usize),
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            value,
            position: (start, end),
            source: source.into(),
        }
    }
}
