//! Schema extraction orchestration

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use super::error::ExtractError;
use super::source::{
    FieldDescriptor, Selection, SessionOptions, SourceConnector, SourceFormat, SourceSession,
};
use crate::mapping::TypeMapping;
use crate::models::odcs::{Contract, LogicalType, Property, SchemaObject};
use crate::validation::DEFAULT_ELEMENT_NAME;

/// What to extract and how to read it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    pub selection: Selection,
    pub format: SourceFormat,
    /// Schema name override, applied when exactly one unit matches
    pub name: Option<String>,
}

impl ExtractRequest {
    pub fn new(selection: Selection, format: SourceFormat) -> Self {
        Self {
            selection,
            format,
            name: None,
        }
    }

    pub fn path(path: impl Into<PathBuf>, format: SourceFormat) -> Self {
        Self::new(Selection::Path(path.into()), format)
    }

    pub fn pattern(pattern: impl Into<String>, format: SourceFormat) -> Self {
        Self::new(Selection::Pattern(pattern.into()), format)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Extracted schema objects under a top-level `schema` key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDocument {
    pub schema: Vec<SchemaObject>,
}

impl SchemaDocument {
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Wrap the extracted schema in a draft contract
    pub fn into_contract(self, id: impl Into<String>, version: impl Into<String>) -> Contract {
        Contract::with_identity(id, version).with_schemas(self.schema)
    }
}

/// Closes the wrapped session when dropped unless closed explicitly
struct SessionGuard<S: SourceSession> {
    session: Option<S>,
}

impl<S: SourceSession> SessionGuard<S> {
    fn new(session: S) -> Self {
        Self {
            session: Some(session),
        }
    }

    fn session(&mut self) -> Result<&mut S, ExtractError> {
        self.session
            .as_mut()
            .ok_or_else(|| ExtractError::access("", "session already closed"))
    }

    fn close(mut self) -> Result<(), ExtractError> {
        match self.session.take() {
            Some(mut session) => session.close(),
            None => Ok(()),
        }
    }
}

impl<S: SourceSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.close() {
                tracing::warn!("Failed to close source session: {}", e);
            }
        }
    }
}

/// Extracts ODCS schema objects from a source
///
/// ## Example
///
/// ```rust,no_run
/// use datadoc::inference::{ExtractRequest, LocalFileSource, SchemaExtractor, SourceFormat};
///
/// let extractor = SchemaExtractor::new(LocalFileSource::new());
/// let request = ExtractRequest::pattern("data/*.csv", SourceFormat::Csv);
/// let document = extractor.extract_document(&request)?;
/// println!("{}", document.to_yaml()?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct SchemaExtractor<C> {
    connector: C,
    mapping: TypeMapping,
    options: SessionOptions,
}

impl<C: SourceConnector> SchemaExtractor<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            mapping: TypeMapping::default(),
            options: SessionOptions::default(),
        }
    }

    pub fn with_mapping(mut self, mapping: TypeMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn mapping(&self) -> &TypeMapping {
        &self.mapping
    }

    /// Extract one schema object per unit the request selects.
    ///
    /// Opens a single session and closes it on every exit path. The first
    /// failing unit aborts the batch.
    pub fn extract(&self, request: &ExtractRequest) -> Result<Vec<SchemaObject>, ExtractError> {
        let mut guard = SessionGuard::new(self.connector.open(&self.options)?);
        let schemas = self.extract_units(guard.session()?, request)?;
        guard.close()?;

        tracing::info!(
            selection = %request.selection,
            format = %request.format,
            schemas = schemas.len(),
            "Extracted schema"
        );
        Ok(schemas)
    }

    /// Like [`extract`](Self::extract), wrapped for serialization
    pub fn extract_document(&self, request: &ExtractRequest) -> Result<SchemaDocument, ExtractError> {
        Ok(SchemaDocument {
            schema: self.extract(request)?,
        })
    }

    fn extract_units(
        &self,
        session: &mut C::Session,
        request: &ExtractRequest,
    ) -> Result<Vec<SchemaObject>, ExtractError> {
        let mut units = session.list_units(&request.selection)?;
        if units.is_empty() {
            return Err(ExtractError::no_match(request.selection.to_string()));
        }
        units.sort_by(|a, b| a.id.cmp(&b.id));

        let name_override = match (&request.name, units.len()) {
            (Some(name), 1) => Some(name.as_str()),
            (Some(name), count) => {
                tracing::warn!(
                    "Ignoring schema name '{}': selection matched {} units",
                    name,
                    count
                );
                None
            }
            (None, _) => None,
        };

        let mut derived: HashMap<&str, &str> = HashMap::new();
        for unit in &units {
            if let Some(first) = derived.insert(unit.name.as_str(), unit.id.as_str()) {
                return Err(ExtractError::access(
                    &unit.id,
                    format!("schema name '{}' is also derived from '{}'", unit.name, first),
                ));
            }
        }

        let mut schemas = Vec::with_capacity(units.len());
        for unit in &units {
            let fields = session.describe(unit, request.format)?;
            tracing::debug!(unit = %unit.id, fields = fields.len(), "Described source unit");

            let properties = fields.iter().map(|field| self.property(field)).collect();
            let name = name_override.unwrap_or(unit.name.as_str());
            schemas.push(
                SchemaObject::new(name)
                    .with_physical_type(request.format.as_str())
                    .with_properties(properties),
            );
        }
        Ok(schemas)
    }

    /// Map one descriptor, recursing into nested structure
    fn property(&self, field: &FieldDescriptor) -> Property {
        let mapped = self
            .mapping
            .map_field(&field.name, &field.native_type, field.nullable);

        let property = match mapped.logical_type() {
            LogicalType::Object => Property::object(
                field.name.as_str(),
                field.children.iter().map(|child| self.property(child)).collect(),
            ),
            LogicalType::Array => {
                let element = match field.children.first() {
                    Some(child) => self.property(child),
                    None => Property::new(DEFAULT_ELEMENT_NAME, LogicalType::String),
                };
                Property::array(field.name.as_str(), element)
            }
            _ => mapped,
        };

        property
            .with_physical_type(field.physical_type.as_str())
            .with_required(!field.nullable)
    }
}
