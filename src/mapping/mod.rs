//! Type mapping from source-system types to ODCS logical types
//!
//! The mapping table is plain data ([`TypeMapping`]) so it can be versioned,
//! extended with extra entries, and loaded from YAML or JSON.
//!
//! ## Example
//!
//! ```rust
//! use datadoc::mapping::map_type;
//! use datadoc::models::odcs::LogicalType;
//!
//! assert_eq!(map_type("LONG"), LogicalType::Integer);
//! assert_eq!(map_type("timestamp"), LogicalType::Date);
//! assert_eq!(map_type("binary"), LogicalType::String);
//! ```

mod table;

use once_cell::sync::Lazy;

use crate::models::odcs::{LogicalType, Property};

pub use table::{FALLBACK_LOGICAL_TYPE, TYPE_MAPPING_VERSION, TypeMapping};

static DEFAULT_MAPPING: Lazy<TypeMapping> = Lazy::new(TypeMapping::default);

/// The built-in mapping table
pub fn default_mapping() -> &'static TypeMapping {
    &DEFAULT_MAPPING
}

/// Map a native type name through the built-in table
pub fn map_type(native: &str) -> LogicalType {
    DEFAULT_MAPPING.map_type(native)
}

/// Build a leaf property for one native field through the built-in table
pub fn map_field(name: &str, native_type: &str, nullable: bool) -> Property {
    DEFAULT_MAPPING.map_field(name, native_type, nullable)
}
