//! Document decoding helpers
//!
//! Validation operates on already-decoded values. These helpers turn YAML
//! or JSON text into a [`serde_json::Value`] so callers can feed either
//! format to the same validator.

use serde_json::Value;
use thiserror::Error;

use super::contract::validate;
use super::report::ErrorReport;
use crate::models::odcs::Contract;

/// Errors raised while decoding document text
#[derive(Debug, Error)]
pub enum DocumentError {
    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the decode-then-validate helpers
#[derive(Debug, Error)]
pub enum ContractError {
    #[error(transparent)]
    Decode(#[from] DocumentError),

    #[error(transparent)]
    Invalid(#[from] ErrorReport),
}

/// Decode YAML text into a structured value
pub fn decode_yaml(content: &str) -> Result<Value, DocumentError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Decode JSON text into a structured value
pub fn decode_json(content: &str) -> Result<Value, DocumentError> {
    Ok(serde_json::from_str(content)?)
}

/// Decode YAML text and validate it as an ODCS contract
pub fn validate_yaml(content: &str) -> Result<Contract, ContractError> {
    let document = decode_yaml(content)?;
    Ok(validate(&document)?)
}

/// Decode JSON text and validate it as an ODCS contract
pub fn validate_json(content: &str) -> Result<Contract, ContractError> {
    let document = decode_json(content)?;
    Ok(validate(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_yaml_preserves_key_order() {
        let value = decode_yaml("zeta: 1\nalpha: 2\n").unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_invalid_yaml_is_decode_error() {
        let err = validate_yaml("invalid: yaml: content: {").unwrap_err();
        assert!(matches!(err, ContractError::Decode(DocumentError::Yaml(_))));
    }

    #[test]
    fn test_validate_json_reports_issues() {
        let err = validate_json(r#"{"apiVersion": "v3.1.0"}"#).unwrap_err();
        match err {
            ContractError::Invalid(report) => assert!(report.contains_path("version")),
            other => panic!("expected validation issues, got {other}"),
        }
    }
}
