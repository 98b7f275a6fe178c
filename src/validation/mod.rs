//! Validation functionality
//!
//! Checks decoded documents against the ODCS structural and semantic rules:
//! - Required fields and value shapes at every level
//! - Closed enumerations (logical types, status, API version, kind)
//! - Nested structure for OBJECT and ARRAY properties
//! - Sibling name uniqueness
//!
//! Validation is exhaustive: one pass reports every issue it finds.

pub mod contract;
pub mod document;
pub mod report;

pub use contract::{ContractValidator, DEFAULT_ELEMENT_NAME, ROOT_PATH, validate};
pub use document::{
    ContractError, DocumentError, decode_json, decode_yaml, validate_json, validate_yaml,
};
pub use report::{ErrorReport, IssueKind, ValidationIssue};
