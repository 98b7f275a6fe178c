//! Logical type enumeration for ODCS properties
//!
//! ODCS classifies every property with a storage-independent logical type.
//! The set is closed: validation rejects anything outside of it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Abstract, storage-independent type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    String,
    Integer,
    Number,
    Boolean,
    Date,
    Array,
    Object,
}

impl LogicalType {
    /// Every member of the enumeration, in declaration order
    pub const ALL: [LogicalType; 7] = [
        LogicalType::String,
        LogicalType::Integer,
        LogicalType::Number,
        LogicalType::Boolean,
        LogicalType::Date,
        LogicalType::Array,
        LogicalType::Object,
    ];

    /// Parse a logical type name.
    ///
    /// Matching is exact: ODCS documents spell logical types in lower case,
    /// so `"String"` is not a member.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    /// Canonical ODCS spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalType::String => "string",
            LogicalType::Integer => "integer",
            LogicalType::Number => "number",
            LogicalType::Boolean => "boolean",
            LogicalType::Date => "date",
            LogicalType::Array => "array",
            LogicalType::Object => "object",
        }
    }

    /// Whether this type carries nested structure (`properties` or `items`)
    pub fn is_nested(&self) -> bool {
        matches!(self, LogicalType::Array | LogicalType::Object)
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_members() {
        for t in LogicalType::ALL {
            assert_eq!(LogicalType::parse(t.as_str()), Some(t));
        }
        assert_eq!(LogicalType::parse("timestamp"), None);
        assert_eq!(LogicalType::parse("Object"), None);
    }

    #[test]
    fn test_nested_types() {
        assert!(LogicalType::Array.is_nested());
        assert!(LogicalType::Object.is_nested());
        assert!(!LogicalType::Date.is_nested());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&LogicalType::Number).unwrap();
        assert_eq!(json, "\"number\"");
        let parsed: LogicalType = serde_json::from_str("\"object\"").unwrap();
        assert_eq!(parsed, LogicalType::Object);
    }
}
