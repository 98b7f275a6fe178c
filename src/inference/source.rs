//! Source capability traits and the values passed across them
//!
//! A [`SourceConnector`] opens a [`SourceSession`]; the session lists the
//! units a [`Selection`] matches and describes each unit's fields. The
//! extractor only ever talks to these traits, so a test double or a remote
//! connector can stand in for the local filesystem.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::ExtractError;

/// Default number of records sampled per unit
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// Opens sessions against a data source
pub trait SourceConnector {
    type Session: SourceSession;

    fn open(&self, options: &SessionOptions) -> Result<Self::Session, ExtractError>;
}

/// An open connection to a data source
///
/// Sessions are closed exactly once by the extractor, on success and on
/// failure alike.
pub trait SourceSession {
    /// Resolve a selection into concrete units
    fn list_units(&mut self, selection: &Selection) -> Result<Vec<SourceUnit>, ExtractError>;

    /// Describe the fields of one unit, in source order
    fn describe(
        &mut self,
        unit: &SourceUnit,
        format: SourceFormat,
    ) -> Result<Vec<FieldDescriptor>, ExtractError>;

    fn close(&mut self) -> Result<(), ExtractError>;
}

/// Options handed to a connector when a session is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Passed through to the connector; the extractor applies no timeout itself
    pub timeout: Option<Duration>,
    /// Maximum number of records to sample per unit (0 = all)
    pub sample_size: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl SessionOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }
}

/// What to extract: one path, or every file a glob pattern matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Path(PathBuf),
    Pattern(String),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Path(path) => write!(f, "{}", path.display()),
            Selection::Pattern(pattern) => write!(f, "{}", pattern),
        }
    }
}

/// One addressable unit of data (a file, a table, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Stable identifier; units are ordered by it
    pub id: String,
    /// Name given to the schema object extracted from this unit
    pub name: String,
}

impl SourceUnit {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Unknown source format name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown source format '{0}' (expected one of: csv, json, jsonl, yaml, parquet)")]
pub struct UnknownFormat(pub String);

/// Data formats a source can be read as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SourceFormat {
    #[default]
    Csv,
    Json,
    Jsonl,
    Yaml,
    Parquet,
}

impl SourceFormat {
    pub const ALL: [SourceFormat; 5] = [
        SourceFormat::Csv,
        SourceFormat::Json,
        SourceFormat::Jsonl,
        SourceFormat::Yaml,
        SourceFormat::Parquet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Json => "json",
            SourceFormat::Jsonl => "jsonl",
            SourceFormat::Yaml => "yaml",
            SourceFormat::Parquet => "parquet",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SourceFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        match lowered.as_str() {
            "yml" => Ok(SourceFormat::Yaml),
            "ndjson" => Ok(SourceFormat::Jsonl),
            other => SourceFormat::ALL
                .into_iter()
                .find(|f| f.as_str() == other)
                .ok_or_else(|| UnknownFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for SourceFormat {
    type Error = UnknownFormat;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A field as reported by a source, before type mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// Source-system type name fed to the type mapper
    pub native_type: String,
    /// Type name recorded as `physicalType`
    pub physical_type: String,
    pub nullable: bool,
    /// Array element (single entry) or struct/map members
    pub children: Vec<FieldDescriptor>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, native_type: impl Into<String>, nullable: bool) -> Self {
        let native_type = native_type.into();
        Self {
            name: name.into(),
            physical_type: native_type.clone(),
            native_type,
            nullable,
            children: Vec::new(),
        }
    }

    pub fn with_physical_type(mut self, physical_type: impl Into<String>) -> Self {
        self.physical_type = physical_type.into();
        self
    }

    pub fn with_children(mut self, children: Vec<FieldDescriptor>) -> Self {
        self.children = children;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse_case_insensitive() {
        assert_eq!("CSV".parse::<SourceFormat>().unwrap(), SourceFormat::Csv);
        assert_eq!("Parquet".parse::<SourceFormat>().unwrap(), SourceFormat::Parquet);
        assert_eq!("yml".parse::<SourceFormat>().unwrap(), SourceFormat::Yaml);
        assert_eq!(
            "avro".parse::<SourceFormat>().unwrap_err(),
            UnknownFormat("avro".to_string())
        );
    }

    #[test]
    fn test_format_deserialize() {
        let format: SourceFormat = serde_yaml::from_str("JSONL").unwrap();
        assert_eq!(format, SourceFormat::Jsonl);
        assert!(serde_yaml::from_str::<SourceFormat>("orc").is_err());
        assert_eq!(serde_json::to_string(&SourceFormat::Yaml).unwrap(), "\"yaml\"");
    }

    #[test]
    fn test_descriptor_defaults_physical_type() {
        let field = FieldDescriptor::new("age", "long", false);
        assert_eq!(field.physical_type, "long");
        assert!(field.children.is_empty());
    }

    #[test]
    fn test_selection_display() {
        assert_eq!(Selection::Pattern("data/*.csv".into()).to_string(), "data/*.csv");
        assert_eq!(Selection::Path(PathBuf::from("a/b.json")).to_string(), "a/b.json");
    }
}
