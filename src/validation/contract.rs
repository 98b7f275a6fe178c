//! ODCS contract validation
//!
//! Walks a decoded document top-down (contract, schema objects, properties)
//! and collects every violation into one [`ErrorReport`] instead of
//! stopping at the first one.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::report::{ErrorReport, IssueKind, ValidationIssue};
use crate::models::odcs::{
    API_VERSIONS, CONTRACT_KIND, Contract, ContractStatus, Description, LogicalType, Nested,
    Property, SchemaObject, StructuredDescription,
};

/// Path reported for faults that concern the whole document
pub const ROOT_PATH: &str = "root";

/// Name given to an array element property that declares none
pub const DEFAULT_ELEMENT_NAME: &str = "element";

static SEMVER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^v?(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(-[0-9A-Za-z-]+(\.[0-9A-Za-z-]+)*)?(\+[0-9A-Za-z-]+(\.[0-9A-Za-z-]+)*)?$").unwrap()
});

/// Validate a decoded document against the ODCS contract rules
///
/// # Example
///
/// ```rust
/// use datadoc::validation::validate;
/// use serde_json::json;
///
/// let report = validate(&json!({"apiVersion": "v3.1.0", "kind": "DataContract"})).unwrap_err();
/// assert!(report.contains_path("version"));
/// assert!(report.contains_path("id"));
/// ```
pub fn validate(document: &Value) -> Result<Contract, ErrorReport> {
    ContractValidator::new().validate(document)
}

/// Contract validator
///
/// Stateless and reentrant: every call to [`ContractValidator::validate`]
/// threads its own accumulator through the descent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractValidator;

impl ContractValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a document, returning the contract or every issue found
    pub fn validate(&self, document: &Value) -> Result<Contract, ErrorReport> {
        let mut walk = Walk::default();
        let contract = walk.contract(document);

        match contract {
            Some(contract) if walk.report.is_empty() => {
                tracing::debug!(
                    id = contract.id(),
                    schema_objects = contract.schema_count(),
                    "data contract is valid"
                );
                Ok(contract)
            }
            _ => {
                tracing::debug!(issues = walk.report.len(), "data contract is invalid");
                Err(walk.report)
            }
        }
    }
}

fn field_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Accumulator threaded through one validation pass
#[derive(Debug, Default)]
struct Walk {
    report: ErrorReport,
}

impl Walk {
    fn structural(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.report
            .push(ValidationIssue::new(path, IssueKind::Structural, message));
    }

    fn unknown_value(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.report
            .push(ValidationIssue::new(path, IssueKind::UnknownEnumValue, message));
    }

    fn duplicate(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.report
            .push(ValidationIssue::new(path, IssueKind::DuplicateName, message));
    }

    fn contract(&mut self, document: &Value) -> Option<Contract> {
        let Some(obj) = document.as_object() else {
            self.structural(
                ROOT_PATH,
                format!(
                    "expected a mapping at the document root, found {}",
                    value_type_name(document)
                ),
            );
            return None;
        };

        let api_version = self.required_str(obj, "", "apiVersion").and_then(|v| {
            if API_VERSIONS.contains(&v) {
                Some(v)
            } else {
                self.unknown_value("apiVersion", format!("unknown apiVersion: {}", v));
                None
            }
        });
        let kind = self.required_str(obj, "", "kind").and_then(|v| {
            if v == CONTRACT_KIND {
                Some(v)
            } else {
                self.unknown_value("kind", format!("unknown kind: {}", v));
                None
            }
        });
        let id = self.required_non_empty_str(obj, "", "id");
        let version = self.required_non_empty_str(obj, "", "version").and_then(|v| {
            if SEMVER_REGEX.is_match(v) {
                Some(v)
            } else {
                self.structural(
                    "version",
                    format!(
                        "version must be semantic-version shaped (MAJOR.MINOR.PATCH), found '{}'",
                        v
                    ),
                );
                None
            }
        });
        let status = self.required_str(obj, "", "status").and_then(|v| {
            let status = ContractStatus::parse(v);
            if status.is_none() {
                self.unknown_value("status", format!("unknown status: {}", v));
            }
            status
        });

        let name = self.optional_str(obj, "", "name");
        let domain = self.optional_str(obj, "", "domain");
        let data_product = self.optional_str(obj, "", "dataProduct");
        let tenant = self.optional_str(obj, "", "tenant");
        let description = self.description(obj.get("description"));
        let tags = self.tags(obj, "");
        let schema = self.schema_objects(obj.get("schema"));

        let (Some(api_version), Some(_), Some(id), Some(version), Some(status)) =
            (api_version, kind, id, version, status)
        else {
            return None;
        };

        let mut contract = Contract::with_identity(id, version)
            .with_api_version(api_version)
            .with_status(status)
            .with_schemas(schema)
            .with_tags(tags);
        if let Some(name) = name {
            contract = contract.with_name(name);
        }
        if let Some(domain) = domain {
            contract = contract.with_domain(domain);
        }
        if let Some(data_product) = data_product {
            contract = contract.with_data_product(data_product);
        }
        if let Some(tenant) = tenant {
            contract = contract.with_tenant(tenant);
        }
        if let Some(description) = description {
            contract = contract.with_structured_description(description);
        }
        Some(contract)
    }

    fn description(&mut self, value: Option<&Value>) -> Option<Description> {
        match value? {
            Value::String(s) => Some(Description::Simple(s.clone())),
            Value::Object(obj) => Some(Description::Structured(StructuredDescription {
                purpose: self.optional_str(obj, "description", "purpose").map(str::to_string),
                usage: self.optional_str(obj, "description", "usage").map(str::to_string),
                limitations: self
                    .optional_str(obj, "description", "limitations")
                    .map(str::to_string),
            })),
            other => {
                self.structural(
                    "description",
                    format!("expected string or mapping, found {}", value_type_name(other)),
                );
                None
            }
        }
    }

    fn schema_objects(&mut self, value: Option<&Value>) -> Vec<SchemaObject> {
        let items = match value {
            None => return Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                self.structural(
                    "schema",
                    format!("expected a sequence, found {}", value_type_name(other)),
                );
                return Vec::new();
            }
        };

        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut schema = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let path = index_path("schema", index);
            self.check_unique_name(item, index, "schema", "schema", &mut seen);
            if let Some(object) = self.schema_object(item, &path) {
                schema.push(object);
            }
        }
        schema
    }

    fn schema_object(&mut self, value: &Value, path: &str) -> Option<SchemaObject> {
        let Some(obj) = value.as_object() else {
            self.structural(
                path,
                format!("expected a mapping, found {}", value_type_name(value)),
            );
            return None;
        };

        let name = self.required_non_empty_str(obj, path, "name");

        if let Some(raw) = self.optional_str(obj, path, "logicalType") {
            let logical_path = field_path(path, "logicalType");
            match LogicalType::parse(raw) {
                None => self.unknown_value(logical_path, format!("unknown logical type: {}", raw)),
                Some(LogicalType::Object) => {}
                Some(other) => self.structural(
                    logical_path,
                    format!("schema objects must have logicalType object, found {}", other),
                ),
            }
        }

        let physical_name = self.optional_str(obj, path, "physicalName");
        let physical_type = self.optional_str(obj, path, "physicalType");
        let description = self.optional_str(obj, path, "description");
        let tags = self.tags(obj, path);

        let properties_path = field_path(path, "properties");
        let properties = match obj.get("properties") {
            Some(Value::Array(items)) => self.properties(items, &properties_path),
            Some(other) => {
                self.structural(
                    properties_path,
                    format!("expected a sequence, found {}", value_type_name(other)),
                );
                Vec::new()
            }
            None => {
                self.structural(properties_path, "missing required field");
                Vec::new()
            }
        };

        let mut object = SchemaObject::new(name?)
            .with_properties(properties)
            .with_tags(tags);
        if let Some(physical_name) = physical_name {
            object = object.with_physical_name(physical_name);
        }
        if let Some(physical_type) = physical_type {
            object = object.with_physical_type(physical_type);
        }
        if let Some(description) = description {
            object = object.with_description(description);
        }
        Some(object)
    }

    fn properties(&mut self, items: &[Value], path: &str) -> Vec<Property> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut properties = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            self.check_unique_name(item, index, path, "property", &mut seen);
            if let Some(property) = self.property(item, &index_path(path, index), false) {
                properties.push(property);
            }
        }
        properties
    }

    fn property(&mut self, value: &Value, path: &str, element: bool) -> Option<Property> {
        let Some(obj) = value.as_object() else {
            self.structural(
                path,
                format!("expected a mapping, found {}", value_type_name(value)),
            );
            return None;
        };

        let name = if element {
            Some(
                self.optional_str(obj, path, "name")
                    .filter(|n| !n.is_empty())
                    .unwrap_or(DEFAULT_ELEMENT_NAME),
            )
        } else {
            self.required_non_empty_str(obj, path, "name")
        };

        let logical_path = field_path(path, "logicalType");
        let logical_type = self.required_str(obj, path, "logicalType").and_then(|raw| {
            let parsed = LogicalType::parse(raw);
            if parsed.is_none() {
                self.unknown_value(logical_path, format!("unknown logical type: {}", raw));
            }
            parsed
        });

        let physical_type = self.optional_str(obj, path, "physicalType");
        let description = self.optional_str(obj, path, "description");
        let required = self.optional_bool(obj, path, "required");
        let primary_key = self.optional_bool(obj, path, "primaryKey");
        let unique = self.optional_bool(obj, path, "unique");
        let default_value = obj.get("defaultValue").filter(|v| !v.is_null()).cloned();
        let tags = self.tags(obj, path);

        let nested = self.nested(obj, path, logical_type?, default_value.is_some())?;
        let name = name?;
        let base = match nested {
            Some(Nested::Properties(children)) => Property::object(name, children),
            Some(Nested::Items(element)) => Property::array(name, *element),
            None => Property::new(name, logical_type?),
        };
        let mut property = base
            .with_required(required)
            .with_primary_key(primary_key)
            .with_unique(unique)
            .with_tags(tags);
        if let Some(physical_type) = physical_type {
            property = property.with_physical_type(physical_type);
        }
        if let Some(description) = description {
            property = property.with_description(description);
        }
        if let Some(default_value) = default_value {
            property = property.with_default_value(default_value);
        }
        Some(property)
    }

    /// Check and build the nested structure for one property.
    ///
    /// `None` means the structure is invalid (already reported);
    /// `Some(None)` means the property carries no nested structure.
    fn nested(
        &mut self,
        obj: &Map<String, Value>,
        path: &str,
        logical_type: LogicalType,
        has_default: bool,
    ) -> Option<Option<Nested>> {
        let properties_path = field_path(path, "properties");
        let items_path = field_path(path, "items");

        match logical_type {
            LogicalType::Object => {
                if obj.contains_key("items") {
                    self.structural(items_path, "items is only allowed on array properties");
                }
                match obj.get("properties") {
                    Some(Value::Array(items)) => Some(Some(Nested::Properties(
                        self.properties(items, &properties_path),
                    ))),
                    Some(other) => {
                        self.structural(
                            properties_path,
                            format!("expected a sequence, found {}", value_type_name(other)),
                        );
                        None
                    }
                    None if has_default => Some(None),
                    None => {
                        self.structural(
                            properties_path,
                            "object property requires nested properties",
                        );
                        None
                    }
                }
            }
            LogicalType::Array => {
                match (obj.get("properties"), obj.contains_key("items")) {
                    (None, _) => {}
                    // element given as a one-item property list
                    (Some(Value::Array(list)), false) if list.len() == 1 => {
                        let element_path = index_path(&properties_path, 0);
                        let element = self.property(&list[0], &element_path, true)?;
                        return Some(Some(Nested::Items(Box::new(element))));
                    }
                    (Some(_), _) => {
                        self.structural(
                            properties_path,
                            "array element type must be declared under items",
                        );
                    }
                }
                match obj.get("items") {
                    Some(items @ Value::Object(_)) => {
                        let element = self.property(items, &items_path, true)?;
                        Some(Some(Nested::Items(Box::new(element))))
                    }
                    Some(other) => {
                        self.structural(
                            items_path,
                            format!("expected a mapping, found {}", value_type_name(other)),
                        );
                        None
                    }
                    None if has_default => Some(None),
                    None => {
                        self.structural(items_path, "array property requires items");
                        None
                    }
                }
            }
            leaf => {
                for (key, key_path) in [("properties", properties_path), ("items", items_path)] {
                    if obj.contains_key(key) {
                        self.structural(
                            key_path,
                            format!("leaf logical type {} must not carry nested {}", leaf, key),
                        );
                    }
                }
                Some(None)
            }
        }
    }

    /// Report the second and later occurrences of a sibling name
    fn check_unique_name<'a>(
        &mut self,
        item: &'a Value,
        index: usize,
        parent: &str,
        what: &str,
        seen: &mut HashMap<&'a str, usize>,
    ) {
        let Some(name) = item.get("name").and_then(Value::as_str) else {
            return;
        };
        if name.is_empty() {
            return;
        }
        match seen.get(name) {
            Some(first) => self.duplicate(
                field_path(&index_path(parent, index), "name"),
                format!(
                    "duplicate {} name '{}' (first declared at {})",
                    what,
                    name,
                    index_path(parent, *first)
                ),
            ),
            None => {
                seen.insert(name, index);
            }
        }
    }

    fn required_str<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<&'a str> {
        match obj.get(key) {
            None => {
                self.structural(field_path(parent, key), "missing required field");
                None
            }
            Some(Value::String(s)) => Some(s.as_str()),
            Some(other) => {
                self.structural(
                    field_path(parent, key),
                    format!("expected string, found {}", value_type_name(other)),
                );
                None
            }
        }
    }

    fn required_non_empty_str<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<&'a str> {
        let value = self.required_str(obj, parent, key)?;
        if value.trim().is_empty() {
            self.structural(field_path(parent, key), "must not be empty");
            return None;
        }
        Some(value)
    }

    fn optional_str<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<&'a str> {
        match obj.get(key)? {
            Value::String(s) => Some(s.as_str()),
            other => {
                self.structural(
                    field_path(parent, key),
                    format!("expected string, found {}", value_type_name(other)),
                );
                None
            }
        }
    }

    fn optional_bool(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) -> bool {
        match obj.get(key) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                self.structural(
                    field_path(parent, key),
                    format!("expected boolean, found {}", value_type_name(other)),
                );
                false
            }
        }
    }

    fn tags(&mut self, obj: &Map<String, Value>, parent: &str) -> Vec<String> {
        let path = field_path(parent, "tags");
        match obj.get("tags") {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| match item {
                    Value::String(s) => Some(s.clone()),
                    other => {
                        self.structural(
                            index_path(&path, index),
                            format!("expected string, found {}", value_type_name(other)),
                        );
                        None
                    }
                })
                .collect(),
            Some(other) => {
                self.structural(
                    path,
                    format!("expected a sequence, found {}", value_type_name(other)),
                );
                Vec::new()
            }
        }
    }
}
