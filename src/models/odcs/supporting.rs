//! Supporting types for ODCS contracts
//!
//! Contract status, descriptions, and the published API versions.

use serde::Serialize;
use std::fmt;

/// Kind identifier carried by every ODCS data contract
pub const CONTRACT_KIND: &str = "DataContract";

/// API version written by default on new contracts
pub const DEFAULT_API_VERSION: &str = "v3.1.0";

/// Published ODCS API versions, newest first
pub const API_VERSIONS: [&str; 7] = [
    "v3.1.0", "v3.0.2", "v3.0.1", "v3.0.0", "v2.2.2", "v2.2.1", "v2.2.0",
];

/// Lifecycle status of a contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Proposed,
    Draft,
    Active,
    Deprecated,
    Retired,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 5] = [
        ContractStatus::Proposed,
        ContractStatus::Draft,
        ContractStatus::Active,
        ContractStatus::Deprecated,
        ContractStatus::Retired,
    ];

    /// Parse a status name (exact, lower case)
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Proposed => "proposed",
            ContractStatus::Draft => "draft",
            ContractStatus::Active => "active",
            ContractStatus::Deprecated => "deprecated",
            ContractStatus::Retired => "retired",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contract description - either a plain string or a structured object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Description {
    /// Simple string description
    Simple(String),
    /// Structured description object
    Structured(StructuredDescription),
}

impl Description {
    /// Get the description as a simple string
    pub fn as_string(&self) -> String {
        match self {
            Description::Simple(s) => s.clone(),
            Description::Structured(d) => d.purpose.clone().unwrap_or_default(),
        }
    }
}

/// Structured description with purpose, usage and limitations
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDescription {
    /// Purpose of the data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Usage guidelines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    /// Limitations of the data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limitations: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(ContractStatus::parse("active"), Some(ContractStatus::Active));
        assert_eq!(ContractStatus::parse("ACTIVE"), None);
        assert_eq!(ContractStatus::parse("archived"), None);
    }

    #[test]
    fn test_description_as_string() {
        let simple = Description::Simple("Orders".to_string());
        assert_eq!(simple.as_string(), "Orders");

        let structured = Description::Structured(StructuredDescription {
            purpose: Some("Track orders".to_string()),
            ..Default::default()
        });
        assert_eq!(structured.as_string(), "Track orders");
    }

    #[test]
    fn test_structured_description_serialization() {
        let description = Description::Structured(StructuredDescription {
            purpose: Some("Analytics".to_string()),
            usage: None,
            limitations: Some("EU only".to_string()),
        });
        let json = serde_json::to_value(&description).unwrap();
        assert_eq!(json["purpose"], "Analytics");
        assert_eq!(json["limitations"], "EU only");
        assert!(json.get("usage").is_none());
    }
}
