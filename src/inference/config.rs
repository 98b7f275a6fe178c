//! Configuration for schema extraction
//!
//! ```yaml
//! data_path: data/users.csv
//! format: csv
//! name: users
//! sample_size: 500
//! csv:
//!   header: true
//!   delimiter: ";"
//! type_overrides:
//!   decimal: number
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::extractor::ExtractRequest;
use super::formats::CsvOptions;
use super::source::{DEFAULT_SAMPLE_SIZE, Selection, SessionOptions, SourceFormat};
use crate::mapping::TypeMapping;
use crate::models::odcs::LogicalType;

/// Errors raised while loading an extraction config
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

/// Configuration for one extraction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractConfig {
    /// Single file to extract from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,

    /// Glob pattern selecting several files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default)]
    pub format: SourceFormat,

    /// Schema name override (single-file selections only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Maximum number of records to sample per file (0 = all)
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub csv: CsvOptions,

    /// Extra native type entries applied over the default mapping
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub type_overrides: BTreeMap<String, LogicalType>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            pattern: None,
            format: SourceFormat::default(),
            name: None,
            sample_size: DEFAULT_SAMPLE_SIZE,
            timeout_secs: None,
            csv: CsvOptions::default(),
            type_overrides: BTreeMap::new(),
        }
    }
}

impl ExtractConfig {
    /// Create a builder for custom configuration
    pub fn builder() -> ExtractConfigBuilder {
        ExtractConfigBuilder::default()
    }

    /// Parse and check a YAML config
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ExtractConfig = serde_yaml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Read, parse and check a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded extraction config");
        Self::from_yaml_str(&content)
    }

    /// Confirm exactly one selection and a usable delimiter
    pub fn check(&self) -> Result<(), ConfigError> {
        self.selection()?;
        if self.csv.delimiter_byte().is_none() {
            return Err(ConfigError::Invalid(format!(
                "csv.delimiter must be a single ASCII character, got '{}'",
                self.csv.delimiter
            )));
        }
        Ok(())
    }

    pub fn selection(&self) -> Result<Selection, ConfigError> {
        match (&self.data_path, &self.pattern) {
            (Some(path), None) => Ok(Selection::Path(path.clone())),
            (None, Some(pattern)) => Ok(Selection::Pattern(pattern.clone())),
            (Some(_), Some(_)) => Err(ConfigError::Invalid(
                "data_path and pattern are mutually exclusive".to_string(),
            )),
            (None, None) => Err(ConfigError::Invalid(
                "one of data_path or pattern is required".to_string(),
            )),
        }
    }

    pub fn request(&self) -> Result<ExtractRequest, ConfigError> {
        let request = ExtractRequest::new(self.selection()?, self.format);
        Ok(match &self.name {
            Some(name) => request.with_name(name.as_str()),
            None => request,
        })
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            timeout: self.timeout_secs.map(Duration::from_secs),
            sample_size: self.sample_size,
        }
    }

    /// Default mapping with `type_overrides` applied
    pub fn type_mapping(&self) -> TypeMapping {
        TypeMapping::default().with_entries(
            self.type_overrides
                .iter()
                .map(|(native, logical)| (native.as_str(), *logical)),
        )
    }
}

/// Builder for ExtractConfig
#[derive(Debug, Default)]
pub struct ExtractConfigBuilder {
    config: ExtractConfig,
}

impl ExtractConfigBuilder {
    /// Extract from a single file
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_path = Some(path.into());
        self.config.pattern = None;
        self
    }

    /// Extract from every file matching a glob pattern
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.pattern = Some(pattern.into());
        self.config.data_path = None;
        self
    }

    pub fn format(mut self, format: SourceFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    /// Set the sample size (0 = all records)
    pub fn sample_size(mut self, size: usize) -> Self {
        self.config.sample_size = size;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = Some(secs);
        self
    }

    pub fn csv(mut self, csv: CsvOptions) -> Self {
        self.config.csv = csv;
        self
    }

    pub fn type_override(mut self, native: impl Into<String>, logical_type: LogicalType) -> Self {
        self.config.type_overrides.insert(native.into(), logical_type);
        self
    }

    /// Build and check the configuration
    pub fn build(self) -> Result<ExtractConfig, ConfigError> {
        self.config.check()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_defaults() {
        let config = ExtractConfig::from_yaml_str("data_path: data/users.csv\n").unwrap();
        assert_eq!(config.format, SourceFormat::Csv);
        assert_eq!(config.sample_size, DEFAULT_SAMPLE_SIZE);
        assert!(config.csv.header);
        assert_eq!(config.csv.delimiter, ',');
        assert_eq!(
            config.selection().unwrap(),
            Selection::Path(PathBuf::from("data/users.csv"))
        );
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
pattern: "data/*.tsv"
format: CSV
sample_size: 0
timeout_secs: 30
csv:
  header: false
  delimiter: "\t"
type_overrides:
  DECIMAL: number
"#;
        let config = ExtractConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.csv.delimiter_byte(), Some(b'\t'));
        assert_eq!(
            config.session_options(),
            SessionOptions {
                timeout: Some(Duration::from_secs(30)),
                sample_size: 0,
            }
        );
        assert_eq!(
            config.type_mapping().map_type("decimal(12,4)"),
            LogicalType::Number
        );
        let request = config.request().unwrap();
        assert_eq!(request.selection, Selection::Pattern("data/*.tsv".into()));
        assert_eq!(request.name, None);
    }

    #[test]
    fn test_selection_must_be_exclusive() {
        let err = ExtractConfig::from_yaml_str("format: json\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ExtractConfig::from_yaml_str("data_path: a.csv\npattern: '*.csv'\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_errors() {
        let err = ExtractConfig::from_yaml_str("data_path: a.avro\nformat: avro\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = ExtractConfig::from_yaml_str("data_path: a.csv\nsampel_size: 10\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ExtractConfig::from_file("/nonexistent/config.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_builder() {
        let config = ExtractConfig::builder()
            .data_path("events.jsonl")
            .format(SourceFormat::Jsonl)
            .name("events")
            .sample_size(50)
            .type_override("int96", LogicalType::Date)
            .build()
            .unwrap();
        let request = config.request().unwrap();
        assert_eq!(request.name.as_deref(), Some("events"));
        assert_eq!(config.type_mapping().map_type("INT96"), LogicalType::Date);

        let err = ExtractConfig::builder().build().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
