//! ODCS Native Data Structures
//!
//! Native Rust types for the ODCS (Open Data Contract Standard) document
//! model. The hierarchy has three levels with strict ownership:
//!
//! 1. **Contract Level** ([`Contract`]) - root document with identity metadata
//! 2. **Schema Level** ([`SchemaObject`]) - tables/entities within a contract
//! 3. **Property Level** ([`Property`]) - columns/fields, recursively nested for
//!    OBJECT and ARRAY types
//!
//! The types serialize to ODCS camelCase with declaration order preserved,
//! but deliberately do not deserialize: raw documents become contracts
//! only through [`crate::validation::validate`].

pub mod contract;
pub mod logical_type;
pub mod property;
pub mod schema;
pub mod supporting;

pub use contract::Contract;
pub use logical_type::LogicalType;
pub use property::{Nested, Property};
pub use schema::SchemaObject;
pub use supporting::{
    API_VERSIONS, CONTRACT_KIND, ContractStatus, DEFAULT_API_VERSION, Description,
    StructuredDescription,
};
