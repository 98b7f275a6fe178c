//! SchemaObject type for ODCS native data structures
//!
//! Represents a table/view/file in an ODCS contract. Top-level schema
//! objects are always of logical type OBJECT.

use super::logical_type::LogicalType;
use super::property::Property;
use serde::Serialize;

/// SchemaObject - one table/entity in a contract
///
/// # Example
///
/// ```rust
/// use datadoc::models::odcs::{LogicalType, Property, SchemaObject};
///
/// let users = SchemaObject::new("users")
///     .with_physical_type("table")
///     .with_properties(vec![
///         Property::new("id", LogicalType::Integer).with_required(true),
///         Property::new("email", LogicalType::String),
///     ]);
/// assert_eq!(users.property_names(), vec!["id", "email"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaObject {
    name: String,
    logical_type: LogicalType,
    #[serde(skip_serializing_if = "Option::is_none")]
    physical_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    physical_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    properties: Vec<Property>,
}

impl SchemaObject {
    /// Create a new schema object with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logical_type: LogicalType::Object,
            physical_name: None,
            physical_type: None,
            description: None,
            tags: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Set the physical name
    pub fn with_physical_name(mut self, physical_name: impl Into<String>) -> Self {
        self.physical_name = Some(physical_name.into());
        self
    }

    /// Set the physical type ("table", "view", "file", ...)
    pub fn with_physical_type(mut self, physical_type: impl Into<String>) -> Self {
        self.physical_type = Some(physical_type.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the properties (columns)
    pub fn with_properties(mut self, properties: Vec<Property>) -> Self {
        self.properties = properties;
        self
    }

    /// Add a property
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn logical_type(&self) -> LogicalType {
        self.logical_type
    }

    pub fn physical_name(&self) -> Option<&str> {
        self.physical_name.as_deref()
    }

    pub fn physical_type(&self) -> Option<&str> {
        self.physical_type.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Get the required properties
    pub fn required_properties(&self) -> Vec<&Property> {
        self.properties.iter().filter(|p| p.required()).collect()
    }

    /// Get a property by name
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Property names in declaration order
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name()).collect()
    }

    /// Count of properties
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Check if this schema has any nested/complex properties
    pub fn has_nested_properties(&self) -> bool {
        self.properties.iter().any(|p| p.has_nested_structure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_object_creation() {
        let schema = SchemaObject::new("users")
            .with_physical_name("tbl_users")
            .with_physical_type("table")
            .with_description("Contains user data");

        assert_eq!(schema.name(), "users");
        assert_eq!(schema.logical_type(), LogicalType::Object);
        assert_eq!(schema.physical_name(), Some("tbl_users"));
        assert_eq!(schema.physical_type(), Some("table"));
        assert_eq!(schema.description(), Some("Contains user data"));
    }

    #[test]
    fn test_schema_with_properties() {
        let schema = SchemaObject::new("orders").with_properties(vec![
            Property::new("id", LogicalType::Integer).with_primary_key(true),
            Property::new("customer_id", LogicalType::Integer).with_required(true),
            Property::new("total", LogicalType::Number),
        ]);

        assert_eq!(schema.property_count(), 3);
        let required = schema.required_properties();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0].name(), "customer_id");
        assert!(schema.get_property("total").is_some());
        assert!(schema.get_property("missing").is_none());
    }

    #[test]
    fn test_has_nested_properties() {
        let simple = SchemaObject::new("simple").with_property(Property::new("id", LogicalType::Integer));
        assert!(!simple.has_nested_properties());

        let nested = simple.with_property(Property::object(
            "address",
            vec![Property::new("city", LogicalType::String)],
        ));
        assert!(nested.has_nested_properties());
    }

    #[test]
    fn test_serialization_keeps_declaration_order() {
        let schema = SchemaObject::new("events")
            .with_physical_type("topic")
            .with_properties(vec![
                Property::new("z_last", LogicalType::String),
                Property::new("a_first", LogicalType::Date),
            ]);

        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.starts_with(r#"{"name":"events","logicalType":"object","physicalType":"topic""#));
        assert!(json.find("z_last").unwrap() < json.find("a_first").unwrap());
    }
}
