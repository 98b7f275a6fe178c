//! Contract type for ODCS native data structures
//!
//! Represents the root data contract document.

use super::schema::SchemaObject;
use super::supporting::{CONTRACT_KIND, ContractStatus, DEFAULT_API_VERSION, Description};
use serde::Serialize;

/// Contract - the root data contract document
///
/// A contract is immutable once built. Validating a document again yields
/// a fresh instance instead of updating an existing one.
///
/// # Example
///
/// ```rust
/// use datadoc::models::odcs::{Contract, ContractStatus, LogicalType, Property, SchemaObject};
///
/// let contract = Contract::new("customer-contract", "1.0.0")
///     .with_status(ContractStatus::Active)
///     .with_schema(
///         SchemaObject::new("customers")
///             .with_property(Property::new("id", LogicalType::Integer).with_required(true)),
///     );
///
/// assert_eq!(contract.schema_names(), vec!["customers"]);
/// assert!(!contract.id().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    api_version: String,
    kind: String,
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    version: String,
    status: ContractStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tenant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<Description>,
    schema: Vec<SchemaObject>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
}

impl Contract {
    /// Create a new draft contract with a generated ID
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::with_identity(uuid::Uuid::new_v4().to_string(), version).with_name(name)
    }

    /// Create a new draft contract from its identity fields
    pub fn with_identity(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            kind: CONTRACT_KIND.to_string(),
            id: id.into(),
            name: None,
            version: version.into(),
            status: ContractStatus::Draft,
            domain: None,
            data_product: None,
            tenant: None,
            description: None,
            schema: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Set the API version
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: ContractStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the domain
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the data product
    pub fn with_data_product(mut self, data_product: impl Into<String>) -> Self {
        self.data_product = Some(data_product.into());
        self
    }

    /// Set the tenant
    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    /// Set the description (simple string)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Description::Simple(description.into()));
        self
    }

    /// Set a structured description
    pub fn with_structured_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    /// Add a schema object
    pub fn with_schema(mut self, schema: SchemaObject) -> Self {
        self.schema.push(schema);
        self
    }

    /// Set all schema objects
    pub fn with_schemas(mut self, schemas: Vec<SchemaObject>) -> Self {
        self.schema = schemas;
        self
    }

    /// Set all tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn status(&self) -> ContractStatus {
        self.status
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn data_product(&self) -> Option<&str> {
        self.data_product.as_deref()
    }

    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    pub fn schema(&self) -> &[SchemaObject] {
        &self.schema
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Get the number of schema objects
    pub fn schema_count(&self) -> usize {
        self.schema.len()
    }

    /// Get a schema object by name
    pub fn get_schema(&self, name: &str) -> Option<&SchemaObject> {
        self.schema.iter().find(|s| s.name() == name)
    }

    /// Get all schema names
    pub fn schema_names(&self) -> Vec<&str> {
        self.schema.iter().map(|s| s.name()).collect()
    }

    /// Get the description as a simple string
    pub fn description_string(&self) -> Option<String> {
        self.description.as_ref().map(|d| d.as_string())
    }
}
