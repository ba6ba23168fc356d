//! Trait keys and typed trait views.
//!
//! Traits are tagged values keyed by shape-id strings. The provisioning
//! traits live in the `provision#` namespace; the base IR traits the engine
//! reads (documentation, deprecation, sensitivity) live in `api#`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConvertError;
use crate::model::ShapeId;

/// Marks a resource for schema conversion; value may carry `name` and
/// `additionalSchemas`.
pub const RESOURCE: &str = "provision#resource";
/// Marks a read-input member as an alternate lookup key.
pub const ADDITIONAL_IDENTIFIER: &str = "provision#additionalIdentifier";
/// Removes a member (and anything it nests) from the generated schema.
pub const EXCLUDE_PROPERTY: &str = "provision#excludeProperty";
pub const CREATE_ONLY_PROPERTY: &str = "provision#createOnlyProperty";
pub const READ_ONLY_PROPERTY: &str = "provision#readOnlyProperty";
pub const WRITE_ONLY_PROPERTY: &str = "provision#writeOnlyProperty";
pub const MUTABLE_PROPERTY: &str = "provision#mutableProperty";
/// Overrides the external name of a member's property.
pub const PROPERTY_NAME: &str = "provision#propertyName";

/// Binds an operation input member to a resource identifier by name.
pub const RESOURCE_IDENTIFIER: &str = "api#resourceIdentifier";
pub const DOCUMENTATION: &str = "api#documentation";
pub const EXTERNAL_DOCUMENTATION: &str = "api#externalDocumentation";
pub const DEPRECATED: &str = "api#deprecated";
pub const SENSITIVE: &str = "api#sensitive";

/// Traits applied to a shape or member, keyed by trait shape id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Traits(IndexMap<String, Value>);

impl Traits {
    pub fn new() -> Self {
        Traits::default()
    }

    /// Adds a trait; chainable for programmatic model construction.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The `documentation` trait's string value.
    pub fn documentation(&self) -> Option<&str> {
        self.get(DOCUMENTATION)?.as_str()
    }

    /// The `externalDocumentation` trait: link name to URL, in trait order.
    pub fn external_documentation(&self) -> IndexMap<String, String> {
        let Some(Value::Object(urls)) = self.get(EXTERNAL_DOCUMENTATION) else {
            return IndexMap::new();
        };
        urls.iter()
            .filter_map(|(name, url)| Some((name.clone(), url.as_str()?.to_string())))
            .collect()
    }

    /// The external property name override, if the member carries one.
    pub fn property_name(&self) -> Option<&str> {
        self.get(PROPERTY_NAME)?.as_str()
    }

    /// The identifier name bound by a `resourceIdentifier` trait.
    pub fn resource_identifier(&self) -> Option<&str> {
        self.get(RESOURCE_IDENTIFIER)?.as_str()
    }

    pub fn is_deprecated(&self) -> bool {
        self.has(DEPRECATED)
    }

    pub fn is_sensitive(&self) -> bool {
        self.has(SENSITIVE)
    }
}

/// Parsed value of the `resource` trait.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceTrait {
    /// Resource name override used in the emitted type name.
    pub name: Option<String>,
    /// Extra property-containing structures folded into the resource.
    pub additional_schemas: Vec<ShapeId>,
}

impl ResourceTrait {
    /// Parse the `resource` trait from a trait map, if present.
    pub fn from_traits(traits: &Traits) -> Result<Option<Self>, ConvertError> {
        match traits.get(RESOURCE) {
            None => Ok(None),
            Some(value) => {
                serde_json::from_value(value.clone())
                    .map(Some)
                    .map_err(|source| ConvertError::InvalidModel {
                        message: format!("invalid `{}` trait: {}", RESOURCE, source),
                    })
            }
        }
    }
}
