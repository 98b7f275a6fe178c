//! Observed types for sampled records
//!
//! Record-oriented formats carry no schema, so each sampled value is
//! classified and the classifications are merged per field:
//! - `long` and `double` merge to `double`
//! - nulls and missing keys make a field nullable
//! - any other conflict widens to `string`
//!
//! Fields keep the order in which they were first seen.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::source::FieldDescriptor;
use crate::validation::DEFAULT_ELEMENT_NAME;

static DATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid date regex"));

static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?$")
        .expect("Invalid timestamp regex")
});

/// Type observed for one field across the sampled records
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedType {
    /// Only nulls (or nothing) seen so far
    Unknown,
    Boolean,
    Long,
    Double,
    Date,
    Timestamp,
    String,
    Array(Box<ObservedField>),
    Struct(FieldSet),
}

impl ObservedType {
    /// Classify a structured value. `None` for null.
    pub fn of_value(value: &Value) -> Option<ObservedType> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(ObservedType::Boolean),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(ObservedType::Long),
            Value::Number(_) => Some(ObservedType::Double),
            Value::String(s) => Some(ObservedType::of_string(s)),
            Value::Array(items) => {
                let mut element = ObservedField::new(DEFAULT_ELEMENT_NAME);
                for item in items {
                    element.observe(item);
                }
                Some(ObservedType::Array(Box::new(element)))
            }
            Value::Object(map) => {
                let mut fields = FieldSet::new();
                fields.observe_record(map);
                Some(ObservedType::Struct(fields))
            }
        }
    }

    /// Classify a delimited-text cell. `None` for an empty cell.
    pub fn of_text(cell: &str) -> Option<ObservedType> {
        let cell = cell.trim();
        if cell.is_empty() {
            return None;
        }
        if cell.eq_ignore_ascii_case("true") || cell.eq_ignore_ascii_case("false") {
            return Some(ObservedType::Boolean);
        }
        if cell.parse::<i64>().is_ok() {
            return Some(ObservedType::Long);
        }
        if cell.parse::<f64>().is_ok_and(f64::is_finite) {
            return Some(ObservedType::Double);
        }
        Some(ObservedType::of_string(cell))
    }

    fn of_string(s: &str) -> ObservedType {
        if DATE_REGEX.is_match(s) {
            ObservedType::Date
        } else if TIMESTAMP_REGEX.is_match(s) {
            ObservedType::Timestamp
        } else {
            ObservedType::String
        }
    }

    /// Least upper bound of two observations
    pub fn merge(self, other: ObservedType) -> ObservedType {
        match (self, other) {
            (ObservedType::Unknown, other) | (other, ObservedType::Unknown) => other,
            (ObservedType::Long, ObservedType::Double)
            | (ObservedType::Double, ObservedType::Long) => ObservedType::Double,
            (ObservedType::Array(a), ObservedType::Array(b)) => {
                ObservedType::Array(Box::new(a.merge(*b)))
            }
            (ObservedType::Struct(a), ObservedType::Struct(b)) => ObservedType::Struct(a.merge(b)),
            (a, b) if a == b => a,
            _ => ObservedType::String,
        }
    }

    /// Native type name reported to the type mapper
    pub fn native_name(&self) -> &'static str {
        match self {
            ObservedType::Unknown | ObservedType::String => "string",
            ObservedType::Boolean => "boolean",
            ObservedType::Long => "long",
            ObservedType::Double => "double",
            ObservedType::Date => "date",
            ObservedType::Timestamp => "timestamp",
            ObservedType::Array(_) => "array",
            ObservedType::Struct(_) => "struct",
        }
    }
}

/// One field and what has been observed about it
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedField {
    pub name: String,
    pub observed: ObservedType,
    pub nullable: bool,
}

impl ObservedField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            observed: ObservedType::Unknown,
            nullable: false,
        }
    }

    /// Fold one structured value into this field
    pub fn observe(&mut self, value: &Value) {
        self.record(ObservedType::of_value(value));
    }

    /// Fold one classification into this field; `None` marks a null
    pub fn record(&mut self, observed: Option<ObservedType>) {
        match observed {
            Some(observed) => {
                let current = std::mem::replace(&mut self.observed, ObservedType::Unknown);
                self.observed = current.merge(observed);
            }
            None => self.nullable = true,
        }
    }

    fn merge(mut self, other: ObservedField) -> ObservedField {
        self.nullable |= other.nullable;
        self.observed = self.observed.merge(other.observed);
        self
    }

    pub fn into_descriptor(self) -> FieldDescriptor {
        let nullable = self.nullable || self.observed == ObservedType::Unknown;
        let native = self.observed.native_name();
        match self.observed {
            ObservedType::Array(element) => {
                let element = element.into_descriptor();
                let physical = format!("array<{}>", element.physical_type);
                FieldDescriptor::new(self.name, native, nullable)
                    .with_physical_type(physical)
                    .with_children(vec![element])
            }
            ObservedType::Struct(fields) => {
                FieldDescriptor::new(self.name, native, nullable).with_children(fields.into_descriptors())
            }
            _ => FieldDescriptor::new(self.name, native, nullable),
        }
    }
}

/// Ordered set of fields observed across a run of records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    fields: Vec<ObservedField>,
    records: usize,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the set
    pub fn observe_record(&mut self, record: &Map<String, Value>) {
        for (key, value) in record {
            match self.fields.iter_mut().find(|f| f.name == *key) {
                Some(field) => field.observe(value),
                None => {
                    let mut field = ObservedField::new(key.as_str());
                    // absent from every earlier record
                    field.nullable = self.records > 0;
                    field.observe(value);
                    self.fields.push(field);
                }
            }
        }
        for field in &mut self.fields {
            if !record.contains_key(&field.name) {
                field.nullable = true;
            }
        }
        self.records += 1;
    }

    /// Union of two sets; fields missing on either side become nullable
    pub fn merge(mut self, other: FieldSet) -> FieldSet {
        let mut other_fields = other.fields;
        for field in &mut self.fields {
            match other_fields.iter().position(|f| f.name == field.name) {
                Some(pos) => {
                    let theirs = other_fields.remove(pos);
                    let mine = std::mem::replace(field, ObservedField::new(""));
                    *field = mine.merge(theirs);
                }
                None if other.records > 0 => field.nullable = true,
                None => {}
            }
        }
        for mut field in other_fields {
            if self.records > 0 {
                field.nullable = true;
            }
            self.fields.push(field);
        }
        self.records += other.records;
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of records folded in
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn into_descriptors(self) -> Vec<FieldDescriptor> {
        self.fields
            .into_iter()
            .map(ObservedField::into_descriptor)
            .collect()
    }
}
