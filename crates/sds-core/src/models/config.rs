//! Configuration structures for the extraction pipeline.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SdsError};
use crate::models::record::Field;

/// Main configuration for a batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdsConfig {
    /// Document reading configuration.
    pub reader: ReaderConfig,

    /// Output configuration.
    pub output: OutputConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Document reading configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// File extensions treated as source documents (case-insensitive).
    pub extensions: Vec<String>,

    /// Separator appended after each page when building the full text.
    pub page_separator: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["pdf".to_string()],
            page_separator: "\n".to_string(),
        }
    }
}

impl ReaderConfig {
    /// Whether a lower-cased extension is accepted.
    pub fn accepts(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File name of the consolidated table inside the output directory.
    pub consolidated_file_name: String,

    /// Write one intermediate JSON file per document.
    pub write_intermediate: bool,

    /// Extension of intermediate files.
    pub intermediate_extension: String,

    /// Table cell text for fields that were not found. Empty by default,
    /// which makes them indistinguishable from fields found empty.
    pub absent_marker: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            consolidated_file_name: "consolidated.csv".to_string(),
            write_intermediate: true,
            intermediate_extension: "json".to_string(),
            absent_marker: String::new(),
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Additional label synonyms keyed by field key (e.g. "un_number").
    pub extra_synonyms: BTreeMap<String, Vec<String>>,
}

impl ExtractionConfig {
    /// Resolve configured synonyms to fields.
    pub fn synonyms_by_field(&self) -> Result<Vec<(Field, Vec<String>)>> {
        self.extra_synonyms
            .iter()
            .map(|(key, labels)| {
                Field::from_key(key)
                    .map(|f| (f, labels.clone()))
                    .ok_or_else(|| SdsError::Config(format!("unknown field key: {}", key)))
            })
            .collect()
    }
}

impl SdsConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SdsConfig = serde_json::from_str(&content)
            .map_err(|e| SdsError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| SdsError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.reader.extensions.is_empty() {
            return Err(SdsError::Config(
                "reader.extensions must not be empty".to_string(),
            ));
        }
        if self.output.consolidated_file_name.trim().is_empty() {
            return Err(SdsError::Config(
                "output.consolidated_file_name must not be empty".to_string(),
            ));
        }
        self.extraction.synonyms_by_field()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = SdsConfig::default();
        assert_eq!(config.reader.extensions, vec!["pdf"]);
        assert_eq!(config.reader.page_separator, "\n");
        assert_eq!(config.output.consolidated_file_name, "consolidated.csv");
        assert!(config.output.write_intermediate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_accepts_extension_case_insensitive() {
        let reader = ReaderConfig {
            extensions: vec!["PDF".to_string(), ".txt".to_string()],
            ..Default::default()
        };
        assert!(reader.accepts("pdf"));
        assert!(reader.accepts("txt"));
        assert!(!reader.accepts("docx"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"extraction": {"extra_synonyms": {"un_number": ["Nº da ONU"]}}}"#,
        )
        .unwrap();

        let config = SdsConfig::from_file(&path).unwrap();
        assert_eq!(config.reader, ReaderConfig::default());
        let synonyms = config.extraction.synonyms_by_field().unwrap();
        assert_eq!(synonyms, vec![(Field::UnNumber, vec!["Nº da ONU".to_string()])]);
    }

    #[test]
    fn test_unknown_field_key_is_rejected() {
        let mut config = SdsConfig::default();
        config
            .extraction
            .extra_synonyms
            .insert("cas".to_string(), vec!["CAS".to_string()]);
        assert!(matches!(config.validate(), Err(SdsError::Config(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = SdsConfig::default();
        config.output.write_intermediate = false;
        config.save(&path).unwrap();

        assert_eq!(SdsConfig::from_file(&path).unwrap(), config);
    }
}
