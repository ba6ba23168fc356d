//! Resource schema document model.
//!
//! [`ResourceSchema`] is the emitted document: immutable once built, with
//! insertion-ordered definitions, properties, and handlers. Serialization
//! omits empty collections and default flags; `typeName` and `description`
//! are always present.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::ConvertError;

/// A single resource property: its JSON schema plus document-level flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub schema: Value,
    #[serde(skip_serializing_if = "is_false")]
    pub insertion_order: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl Property {
    pub fn new(schema: Value) -> Self {
        Property {
            schema,
            insertion_order: false,
            dependencies: Vec::new(),
        }
    }
}

/// A lifecycle handler declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Handler {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
}

impl Handler {
    pub const CREATE: &'static str = "create";
    pub const READ: &'static str = "read";
    pub const UPDATE: &'static str = "update";
    pub const DELETE: &'static str = "delete";
    pub const LIST: &'static str = "list";

    pub fn new(permissions: Vec<String>) -> Self {
        Handler { permissions }
    }
}

/// An emitted resource schema document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSchema {
    type_name: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    documentation_url: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    definitions: IndexMap<String, Value>,
    properties: IndexMap<String, Property>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    read_only_properties: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    write_only_properties: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    create_only_properties: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    deprecated_properties: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    primary_identifier: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    additional_identifiers: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    handlers: IndexMap<String, Handler>,
}

impl ResourceSchema {
    /// Start building a schema. Type name and description are required up
    /// front; `build` fails if no properties are added.
    pub fn builder(
        type_name: impl Into<String>,
        description: impl Into<String>,
    ) -> ResourceSchemaBuilder {
        ResourceSchemaBuilder {
            type_name: type_name.into(),
            description: description.into(),
            source_url: None,
            documentation_url: None,
            definitions: IndexMap::new(),
            properties: IndexMap::new(),
            read_only_properties: Vec::new(),
            write_only_properties: Vec::new(),
            create_only_properties: Vec::new(),
            deprecated_properties: Vec::new(),
            primary_identifier: Vec::new(),
            additional_identifiers: Vec::new(),
            handlers: IndexMap::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    pub fn documentation_url(&self) -> Option<&str> {
        self.documentation_url.as_deref()
    }

    pub fn definitions(&self) -> &IndexMap<String, Value> {
        &self.definitions
    }

    pub fn properties(&self) -> &IndexMap<String, Property> {
        &self.properties
    }

    pub fn read_only_properties(&self) -> &[String] {
        &self.read_only_properties
    }

    pub fn write_only_properties(&self) -> &[String] {
        &self.write_only_properties
    }

    pub fn create_only_properties(&self) -> &[String] {
        &self.create_only_properties
    }

    pub fn deprecated_properties(&self) -> &[String] {
        &self.deprecated_properties
    }

    pub fn primary_identifier(&self) -> &[String] {
        &self.primary_identifier
    }

    pub fn additional_identifiers(&self) -> &[Vec<String>] {
        &self.additional_identifiers
    }

    pub fn handlers(&self) -> &IndexMap<String, Handler> {
        &self.handlers
    }

    /// Serialize to a JSON tree with the document's canonical key order.
    pub fn to_node(&self) -> Result<Value, ConvertError> {
        serde_json::to_value(self).map_err(|source| ConvertError::InvalidJson { source })
    }

    /// Reopen the schema for modification by a pipeline stage.
    pub fn to_builder(self) -> ResourceSchemaBuilder {
        ResourceSchemaBuilder {
            type_name: self.type_name,
            description: self.description,
            source_url: self.source_url,
            documentation_url: self.documentation_url,
            definitions: self.definitions,
            properties: self.properties,
            read_only_properties: self.read_only_properties,
            write_only_properties: self.write_only_properties,
            create_only_properties: self.create_only_properties,
            deprecated_properties: self.deprecated_properties,
            primary_identifier: self.primary_identifier,
            additional_identifiers: self.additional_identifiers,
            handlers: self.handlers,
        }
    }
}

/// Builder for [`ResourceSchema`].
#[derive(Debug, Clone)]
pub struct ResourceSchemaBuilder {
    type_name: String,
    description: String,
    source_url: Option<String>,
    documentation_url: Option<String>,
    definitions: IndexMap<String, Value>,
    properties: IndexMap<String, Property>,
    read_only_properties: Vec<String>,
    write_only_properties: Vec<String>,
    create_only_properties: Vec<String>,
    deprecated_properties: Vec<String>,
    primary_identifier: Vec<String>,
    additional_identifiers: Vec<Vec<String>>,
    handlers: IndexMap<String, Handler>,
}

impl ResourceSchemaBuilder {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn source_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn documentation_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.documentation_url = Some(url.into());
        self
    }

    pub fn add_definition(&mut self, name: impl Into<String>, schema: Value) -> &mut Self {
        self.definitions.insert(name.into(), schema);
        self
    }

    pub fn add_property(&mut self, name: impl Into<String>, property: Property) -> &mut Self {
        self.properties.insert(name.into(), property);
        self
    }

    pub fn add_read_only_property(&mut self, pointer: impl Into<String>) -> &mut Self {
        self.read_only_properties.push(pointer.into());
        self
    }

    pub fn add_write_only_property(&mut self, pointer: impl Into<String>) -> &mut Self {
        self.write_only_properties.push(pointer.into());
        self
    }

    pub fn add_create_only_property(&mut self, pointer: impl Into<String>) -> &mut Self {
        self.create_only_properties.push(pointer.into());
        self
    }

    pub fn add_deprecated_property(&mut self, pointer: impl Into<String>) -> &mut Self {
        self.deprecated_properties.push(pointer.into());
        self
    }

    pub fn primary_identifier(&mut self, pointers: Vec<String>) -> &mut Self {
        self.primary_identifier = pointers;
        self
    }

    pub fn add_additional_identifier(&mut self, pointers: Vec<String>) -> &mut Self {
        self.additional_identifiers.push(pointers);
        self
    }

    pub fn add_handler(&mut self, lifecycle: impl Into<String>, handler: Handler) -> &mut Self {
        self.handlers.insert(lifecycle.into(), handler);
        self
    }

    /// Finish the document.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::EmptyProperties` when no properties were added.
    pub fn build(self) -> Result<ResourceSchema, ConvertError> {
        if self.properties.is_empty() {
            return Err(ConvertError::EmptyProperties {
                type_name: self.type_name,
            });
        }

        Ok(ResourceSchema {
            type_name: self.type_name,
            description: self.description,
            source_url: self.source_url,
            documentation_url: self.documentation_url,
            definitions: self.definitions,
            properties: self.properties,
            read_only_properties: self.read_only_properties,
            write_only_properties: self.write_only_properties,
            create_only_properties: self.create_only_properties,
            deprecated_properties: self.deprecated_properties,
            primary_identifier: self.primary_identifier,
            additional_identifiers: self.additional_identifiers,
            handlers: self.handlers,
        })
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
