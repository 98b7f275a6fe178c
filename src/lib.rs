//! datadoc - Open Data Contract Standard (ODCS) tooling
//!
//! Provides:
//! - ODCS document model (contracts, schema objects, nested properties)
//! - Exhaustive contract validation with path-addressed error reports
//! - Native type to logical type mapping
//! - Schema extraction from data sources (local files built in)

pub mod inference;
pub mod mapping;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use inference::{
    ConfigError, ExtractConfig, ExtractError, ExtractRequest, LocalFileSource, SchemaDocument,
    SchemaExtractor, Selection, SourceConnector, SourceFormat, SourceSession,
};
pub use mapping::{TypeMapping, map_field, map_type};
pub use validation::{
    ContractError, ContractValidator, ErrorReport, IssueKind, ValidationIssue, validate,
    validate_json, validate_yaml,
};

// Re-export models
pub use models::odcs::{
    Contract, ContractStatus, Description, LogicalType, Nested, Property, SchemaObject,
};
