//! Native type to ODCS logical type lookup table

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::odcs::{LogicalType, Property};

/// Version of the built-in mapping table
pub const TYPE_MAPPING_VERSION: &str = "1";

/// Logical type used for native names the table does not know
pub const FALLBACK_LOGICAL_TYPE: LogicalType = LogicalType::String;

/// Versionable lookup from native (source-system) type names to logical types
///
/// Keys are stored lower-case. Lookup trims and lower-cases the native name
/// and drops any type parameters, so `DECIMAL(10,2)` is looked up as
/// `decimal` and `array<string>` as `array`.
///
/// # Example
///
/// ```rust
/// use datadoc::mapping::TypeMapping;
/// use datadoc::models::odcs::LogicalType;
///
/// let mapping = TypeMapping::default().with_entry("decimal", LogicalType::Number);
/// assert_eq!(mapping.map_type("DECIMAL(10,2)"), LogicalType::Number);
/// assert_eq!(mapping.map_type("binary"), LogicalType::String);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MappingDocument")]
pub struct TypeMapping {
    version: String,
    entries: BTreeMap<String, LogicalType>,
}

/// A mapping table as written in a document; keys are not yet normalized
#[derive(Deserialize)]
struct MappingDocument {
    version: String,
    entries: BTreeMap<String, LogicalType>,
}

impl From<MappingDocument> for TypeMapping {
    fn from(document: MappingDocument) -> Self {
        TypeMapping::empty(document.version).with_entries(
            document
                .entries
                .iter()
                .map(|(native, logical)| (native.as_str(), *logical)),
        )
    }
}

impl Default for TypeMapping {
    fn default() -> Self {
        let entries = [
            ("string", LogicalType::String),
            ("integer", LogicalType::Integer),
            ("long", LogicalType::Integer),
            ("double", LogicalType::Number),
            ("float", LogicalType::Number),
            ("boolean", LogicalType::Boolean),
            ("date", LogicalType::Date),
            ("timestamp", LogicalType::Date),
            ("array", LogicalType::Array),
            ("struct", LogicalType::Object),
            ("map", LogicalType::Object),
        ]
        .into_iter()
        .map(|(native, logical)| (native.to_string(), logical))
        .collect();

        Self {
            version: TYPE_MAPPING_VERSION.to_string(),
            entries,
        }
    }
}

/// Reduce a native type name to its lookup key
fn normalize(native: &str) -> String {
    let trimmed = native.trim();
    let base = trimmed
        .find(['(', '<'])
        .map_or(trimmed, |pos| &trimmed[..pos]);
    base.trim().to_lowercase()
}

impl TypeMapping {
    /// An empty table: every lookup falls back to string
    pub fn empty(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Add or replace an entry
    pub fn with_entry(mut self, native: &str, logical_type: LogicalType) -> Self {
        self.entries.insert(normalize(native), logical_type);
        self
    }

    /// Add or replace several entries
    pub fn with_entries<'a>(
        self,
        entries: impl IntoIterator<Item = (&'a str, LogicalType)>,
    ) -> Self {
        entries
            .into_iter()
            .fold(self, |mapping, (native, logical)| mapping.with_entry(native, logical))
    }

    /// Set the table version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// All entries, ordered by native name
    pub fn entries(&self) -> &BTreeMap<String, LogicalType> {
        &self.entries
    }

    /// Look up a native type without applying the fallback
    pub fn lookup(&self, native: &str) -> Option<LogicalType> {
        self.entries.get(&normalize(native)).copied()
    }

    /// Map a native type name to a logical type.
    ///
    /// Total: names missing from the table map to string.
    pub fn map_type(&self, native: &str) -> LogicalType {
        self.lookup(native).unwrap_or(FALLBACK_LOGICAL_TYPE)
    }

    /// Build a leaf property for one native field.
    ///
    /// The physical type keeps the native name for traceability and
    /// `required` is the inverse of `nullable`. Nested structure for
    /// OBJECT/ARRAY results is attached by the caller.
    pub fn map_field(&self, name: &str, native_type: &str, nullable: bool) -> Property {
        Property::new(name, self.map_type(native_type))
            .with_physical_type(native_type)
            .with_required(!nullable)
    }
}
