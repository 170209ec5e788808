//! Built-in rule table and its compiled form.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use super::patterns::compile_rule;
use super::{ExtractionMatch, FieldExtractor, RuleSpec, ValueShape};
use crate::error::ExtractionError;
use crate::models::Field;

/// Built-in label synonyms, in the order rules are tried for each field.
pub const BUILTIN_RULES: &[(Field, &[RuleSpec])] = &[
    (
        Field::Substance,
        &[RuleSpec {
            labels: &[
                "Nome do produto",
                "Nome da substância",
                "Substância",
                "Nome comercial",
            ],
            shape: ValueShape::Line,
        }],
    ),
    (
        Field::UnNumber,
        &[RuleSpec {
            labels: &["Número ONU", "Número da ONU", "Nº ONU", "N° ONU", "UN Number"],
            shape: ValueShape::Digits,
        }],
    ),
    (
        Field::RiskNumber,
        &[RuleSpec {
            labels: &["Número de Risco", "Nº de Risco", "N° de Risco"],
            shape: ValueShape::Digits,
        }],
    ),
    (
        Field::Class,
        &[RuleSpec {
            labels: &["Classe de risco", "Classe"],
            shape: ValueShape::Digits,
        }],
    ),
    (
        Field::SubsidiaryRisk,
        &[RuleSpec {
            labels: &["Risco Subsidiário", "Risco secundário"],
            shape: ValueShape::Line,
        }],
    ),
    (
        Field::FirstAid,
        &[RuleSpec {
            labels: &["PRIMEIROS SOCORROS", "MEDIDAS DE PRIMEIROS SOCORROS"],
            shape: ValueShape::Section,
        }],
    ),
    (
        Field::FireFighting,
        &[RuleSpec {
            labels: &[
                "MEDIDAS DE COMBATE A INCÊNDIO",
                "MEDIDAS DE COMBATE A INCÊNDIOS",
                "MEDIDAS DE COMBATE AO INCÊNDIO",
                "MEDIDAS DE COMBATE A INCENDIO",
            ],
            shape: ValueShape::Section,
        }],
    ),
    (
        Field::AccidentalRelease,
        &[
            RuleSpec {
                labels: &[
                    "MEDIDAS A TOMAR EM CASO DE FUGAS ACIDENTAIS",
                    "MEDIDAS DE CONTROLE PARA DERRAMAMENTO OU VAZAMENTO",
                ],
                shape: ValueShape::Section,
            },
            // Bare keyword fallback; also matches mid-sentence mentions.
            RuleSpec {
                labels: &["FUGAS ACIDENTAIS"],
                shape: ValueShape::Keyword,
            },
        ],
    ),
];

lazy_static! {
    static ref BUILTIN_TABLE: RuleTable = {
        let mut table = RuleTable::empty();
        for (field, specs) in BUILTIN_RULES {
            for spec in specs.iter() {
                let rule = FieldRule::compile(*field, spec.labels, spec.shape)
                    .expect("built-in rule compiles");
                table.push(rule);
            }
        }
        table
    };
}

/// A compiled rule for one field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    field: Field,
    shape: ValueShape,
    regex: Regex,
}

impl FieldRule {
    /// Compile a rule from label synonyms.
    pub fn compile<S: AsRef<str>>(
        field: Field,
        labels: &[S],
        shape: ValueShape,
    ) -> Result<Self, ExtractionError> {
        if labels.iter().all(|l| l.as_ref().trim().is_empty()) {
            return Err(ExtractionError::InvalidRule {
                field: field.key().to_string(),
                reason: "no labels".to_string(),
            });
        }

        let regex = compile_rule(labels, shape).map_err(|e| ExtractionError::InvalidRule {
            field: field.key().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            field,
            shape,
            regex,
        })
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn shape(&self) -> ValueShape {
        self.shape
    }

    /// Regex source, for diagnostics.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    fn to_match(caps: &regex::Captures<'_>) -> Option<ExtractionMatch<String>> {
        let whole = caps.get(0)?;
        let value = caps.get(1)?;
        Some(ExtractionMatch::new(
            value.as_str().trim().to_string(),
            whole.as_str(),
            whole.start(),
            whole.end(),
        ))
    }
}

impl FieldExtractor for FieldRule {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.regex
            .captures(text)
            .as_ref()
            .and_then(Self::to_match)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| Self::to_match(&caps))
            .collect()
    }
}

/// Ordered rules for every field.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: BTreeMap<Field, Vec<FieldRule>>,
}

impl RuleTable {
    /// Table with no rules; every field extracts as absent.
    pub fn empty() -> Self {
        Self {
            rules: Field::ALL.into_iter().map(|f| (f, Vec::new())).collect(),
        }
    }

    /// The built-in table.
    pub fn builtin() -> Self {
        BUILTIN_TABLE.clone()
    }

    /// Append a rule after the existing rules of its field.
    pub fn push(&mut self, rule: FieldRule) {
        self.rules.entry(rule.field()).or_default().push(rule);
    }

    /// Append a rule built from extra synonyms, using the field's usual shape.
    pub fn with_synonyms<S: AsRef<str>>(
        mut self,
        field: Field,
        labels: &[S],
    ) -> Result<Self, ExtractionError> {
        let rule = FieldRule::compile(field, labels, ValueShape::for_field(field))?;
        self.push(rule);
        Ok(self)
    }

    /// Rules for a field, in the order they are tried.
    pub fn rules_for(&self, field: Field) -> &[FieldRule] {
        self.rules.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First match of the first rule that matches.
    pub fn find(&self, field: Field, text: &str) -> Option<ExtractionMatch<String>> {
        self.rules_for(field).iter().find_map(|rule| rule.extract(text))
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_covers_every_field() {
        let table = RuleTable::builtin();
        for field in Field::ALL {
            assert!(!table.rules_for(field).is_empty(), "no rule for {}", field);
        }
        assert_eq!(table.rules_for(Field::AccidentalRelease).len(), 2);
    }

    #[test]
    fn test_digits_rule_keeps_leading_zeros() {
        let table = RuleTable::builtin();
        let m = table.find(Field::Class, "Classe: 03").unwrap();
        assert_eq!(m.value, "03");
    }

    #[test]
    fn test_digits_rule_rejects_non_numeric_value() {
        let table = RuleTable::builtin();
        assert!(table.find(Field::RiskNumber, "Número de Risco: não aplicável").is_none());
    }

    #[test]
    fn test_class_label_needs_word_boundary() {
        let table = RuleTable::builtin();
        assert!(table.find(Field::Class, "Subclasse: 6").is_none());
    }

    #[test]
    fn test_extract_all_reports_positions() {
        let rule = FieldRule::compile(Field::UnNumber, &["Número ONU"], ValueShape::Digits).unwrap();
        let text = "Número ONU: 1090\nNúmero ONU: 1203";
        let matches = rule.extract_all(text);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].value, "1090");
        assert_eq!(matches[1].value, "1203");
        assert_eq!(matches[0].position.0, 0);
        assert_eq!(&text[matches[1].position.0..matches[1].position.1], "Número ONU: 1203");
    }

    #[test]
    fn test_fallback_rule_used_when_primary_misses() {
        let table = RuleTable::builtin();
        let text = "Em caso de FUGAS ACIDENTAIS: conter o vazamento.\n7. MANUSEIO";
        let m = table.find(Field::AccidentalRelease, text).unwrap();
        assert_eq!(m.value, ": conter o vazamento.");
    }

    #[test]
    fn test_with_synonyms_appends_rule() {
        let table = RuleTable::builtin()
            .with_synonyms(Field::UnNumber, &["Nr. ONU"])
            .unwrap();
        assert_eq!(table.rules_for(Field::UnNumber).len(), 2);
        let m = table.find(Field::UnNumber, "Nr. ONU: 1993").unwrap();
        assert_eq!(m.value, "1993");
    }

    #[test]
    fn test_blank_synonyms_are_rejected() {
        let result = RuleTable::builtin().with_synonyms(Field::Class, &[" "]);
        assert!(matches!(result, Err(ExtractionError::InvalidRule { .. })));
    }
}
