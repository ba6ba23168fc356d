//! Conversion configuration.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::model::ShapeId;

/// The JSON pointer under which shared schema definitions are written.
pub const DEFINITIONS_POINTER: &str = "#/definitions";

/// Settings controlling resource schema conversion.
///
/// Deserializable from JSON with camelCase keys; every field is optional in
/// the document. `organization_name` and `service` are required for a
/// conversion to run and are checked when it starts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConverterConfig {
    /// First segment of emitted type names.
    pub organization_name: Option<String>,
    /// The service shape whose resources are converted.
    pub service: Option<ShapeId>,
    /// Overrides the service shape name in emitted type names.
    pub service_name: Option<String>,
    /// When true, property names are emitted as modeled, without
    /// capitalization.
    pub disable_capitalized_properties: bool,
    /// Format string applied to blob schemas.
    pub default_blob_format: String,
    /// Ordered candidate link names for `documentationUrl`.
    pub external_doc_keys: Vec<String>,
    /// Ordered candidate link names for `sourceUrl`.
    pub source_doc_keys: Vec<String>,
    /// JSON values patched into each emitted document, keyed by JSON
    /// pointer. Missing intermediate objects are created; existing leaf
    /// values are overwritten.
    pub json_add: IndexMap<String, Value>,
    /// Suppresses population of `deprecatedProperties`.
    pub disable_deprecated_property_generation: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            organization_name: None,
            service: None,
            service_name: None,
            disable_capitalized_properties: false,
            default_blob_format: "byte".to_string(),
            external_doc_keys: [
                "Documentation Url",
                "DocumentationUrl",
                "API Reference",
                "User Guide",
                "Developer Guide",
                "Reference",
                "Guide",
            ]
            .map(String::from)
            .to_vec(),
            source_doc_keys: ["Source Url", "SourceUrl", "Source", "Source Code"]
                .map(String::from)
                .to_vec(),
            json_add: IndexMap::new(),
            disable_deprecated_property_generation: false,
        }
    }
}
