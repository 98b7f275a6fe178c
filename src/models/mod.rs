//! Models module
//!
//! Defines the ODCS document model shared by validation and extraction.

pub mod odcs;

pub use odcs::{Contract, LogicalType, Property, SchemaObject};
