//! Property type for ODCS native data structures
//!
//! Represents a column/field in an ODCS schema object. Nested structure is
//! a tagged variant: OBJECT properties own an ordered list of child
//! properties, ARRAY properties own exactly one element property.

use super::logical_type::LogicalType;
use serde::Serialize;

/// Helper function to skip serializing false boolean values
fn is_false(b: &bool) -> bool {
    !*b
}

/// Nested structure carried by OBJECT and ARRAY properties
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Nested {
    /// Child properties of an OBJECT, in declaration order
    Properties(Vec<Property>),
    /// Element type of an ARRAY
    Items(Box<Property>),
}

/// Property - one column in a schema object (ODCS v3)
///
/// Instances are built once, either by the validator or by schema
/// extraction, and are never mutated afterwards. The `with_*` builders
/// consume the value and return a new one.
///
/// # Example
///
/// ```rust
/// use datadoc::models::odcs::{LogicalType, Property};
///
/// let address = Property::object(
///     "address",
///     vec![
///         Property::new("street", LogicalType::String),
///         Property::new("city", LogicalType::String).with_required(true),
///     ],
/// );
/// assert_eq!(address.nested_properties().map(|p| p.len()), Some(2));
///
/// let tags = Property::array("tags", Property::new("element", LogicalType::String));
/// assert_eq!(tags.items().map(|p| p.logical_type()), Some(LogicalType::String));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    name: String,
    logical_type: LogicalType,
    #[serde(skip_serializing_if = "Option::is_none")]
    physical_type: Option<String>,
    required: bool,
    #[serde(skip_serializing_if = "is_false")]
    primary_key: bool,
    #[serde(skip_serializing_if = "is_false")]
    unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(flatten)]
    nested: Option<Nested>,
}

impl Property {
    /// Create a property of the given logical type with no nested structure
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            logical_type,
            physical_type: None,
            required: false,
            primary_key: false,
            unique: false,
            description: None,
            default_value: None,
            tags: Vec::new(),
            nested: None,
        }
    }

    /// Create an OBJECT property with the given children
    pub fn object(name: impl Into<String>, properties: Vec<Property>) -> Self {
        Self {
            nested: Some(Nested::Properties(properties)),
            ..Self::new(name, LogicalType::Object)
        }
    }

    /// Create an ARRAY property with the given element type
    pub fn array(name: impl Into<String>, items: Property) -> Self {
        Self {
            nested: Some(Nested::Items(Box::new(items))),
            ..Self::new(name, LogicalType::Array)
        }
    }

    /// Set the physical (source-specific) type
    pub fn with_physical_type(mut self, physical_type: impl Into<String>) -> Self {
        self.physical_type = Some(physical_type.into());
        self
    }

    /// Set the required flag
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Mark the property as part of the primary key
    pub fn with_primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    /// Mark the property as holding unique values
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the default value
    pub fn with_default_value(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Set the tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn logical_type(&self) -> LogicalType {
        self.logical_type
    }

    pub fn physical_type(&self) -> Option<&str> {
        self.physical_type.as_deref()
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn unique(&self) -> bool {
        self.unique
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn default_value(&self) -> Option<&serde_json::Value> {
        self.default_value.as_ref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn nested(&self) -> Option<&Nested> {
        self.nested.as_ref()
    }

    /// Child properties, for OBJECT properties
    pub fn nested_properties(&self) -> Option<&[Property]> {
        match &self.nested {
            Some(Nested::Properties(props)) => Some(props),
            _ => None,
        }
    }

    /// Element property, for ARRAY properties
    pub fn items(&self) -> Option<&Property> {
        match &self.nested {
            Some(Nested::Items(items)) => Some(items),
            _ => None,
        }
    }

    /// Check whether this property carries nested structure
    pub fn has_nested_structure(&self) -> bool {
        self.nested.is_some()
    }

    /// Whether the nested structure agrees with the logical type.
    ///
    /// Leaf types must not carry nested structure. OBJECT and ARRAY must
    /// carry the matching variant unless a default value stands in for it.
    pub fn is_structurally_consistent(&self) -> bool {
        match (&self.logical_type, &self.nested) {
            (LogicalType::Object, Some(Nested::Properties(props))) => {
                props.iter().all(Property::is_structurally_consistent)
            }
            (LogicalType::Array, Some(Nested::Items(items))) => items.is_structurally_consistent(),
            (LogicalType::Object | LogicalType::Array, None) => self.default_value.is_some(),
            (_, None) => true,
            _ => false,
        }
    }
}
