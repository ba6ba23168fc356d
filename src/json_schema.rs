//! Shape-to-JSON-schema conversion.
//!
//! Converts a structure shape and the data shapes reachable from it into a
//! JSON schema document: scalars inline, structures as `#/definitions`
//! references with one definition per structure.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::config::{ConverterConfig, DEFINITIONS_POINTER};
use crate::error::ConvertError;
use crate::model::{MemberShape, Model, Shape, ShapeId};

/// The output of a conversion: the root schema plus every structure
/// definition it references, keyed by definition pointer.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    pub root: Value,
    pub definitions: IndexMap<String, Value>,
}

impl SchemaDocument {
    /// The root schema's properties, in member order.
    pub fn root_properties(&self) -> Vec<(String, Value)> {
        match self.root.get("properties").and_then(Value::as_object) {
            Some(properties) => properties
                .iter()
                .map(|(name, schema)| (name.clone(), schema.clone()))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Converts shapes rooted at a structure into JSON schemas.
pub struct JsonSchemaConverter<'a> {
    model: &'a Model,
    config: &'a ConverterConfig,
}

impl<'a> JsonSchemaConverter<'a> {
    pub fn new(model: &'a Model, config: &'a ConverterConfig) -> Self {
        JsonSchemaConverter { model, config }
    }

    /// Convert the structure at `root_id` into a schema document.
    pub fn convert(&self, root_id: &ShapeId) -> Result<SchemaDocument, ConvertError> {
        let structure = self.model.expect_structure(root_id)?;

        let mut definitions = IndexMap::new();
        let mut properties = Map::new();
        for (name, member) in &structure.members {
            properties.insert(name.clone(), self.member_schema(member, &mut definitions)?);
        }

        let root = json!({
            "type": "object",
            "properties": properties,
        });

        Ok(SchemaDocument { root, definitions })
    }

    fn member_schema(
        &self,
        member: &MemberShape,
        definitions: &mut IndexMap<String, Value>,
    ) -> Result<Value, ConvertError> {
        let mut schema = self.shape_schema(&member.target, definitions)?;

        // Member traits decorate the target's schema.
        if let Some(documentation) = member.traits.documentation() {
            insert_if_absent(&mut schema, "description", json!(documentation));
        }
        if member.traits.is_sensitive() {
            insert_if_absent(&mut schema, "format", json!("password"));
        }

        Ok(schema)
    }

    fn shape_schema(
        &self,
        id: &ShapeId,
        definitions: &mut IndexMap<String, Value>,
    ) -> Result<Value, ConvertError> {
        let shape = self.model.expect(id)?;

        let mut schema = match shape {
            Shape::String(_) => json!({ "type": "string" }),
            Shape::Boolean(_) => json!({ "type": "boolean" }),
            Shape::Integer(_) => json!({ "type": "integer", "format": "int32" }),
            Shape::Long(_) => json!({ "type": "integer", "format": "int64" }),
            Shape::Float(_) => json!({ "type": "number", "format": "float" }),
            Shape::Double(_) => json!({ "type": "number", "format": "double" }),
            Shape::Blob(_) => json!({
                "type": "string",
                "format": self.config.default_blob_format,
            }),
            Shape::Timestamp(_) => json!({ "type": "string", "format": "date-time" }),
            Shape::List(list) => json!({
                "type": "array",
                "items": self.member_schema(&list.member, definitions)?,
            }),
            Shape::Map(map) => json!({
                "type": "object",
                "additionalProperties": self.member_schema(&map.value, definitions)?,
            }),
            Shape::Structure(_) => self.definition_ref(id, definitions)?,
            Shape::Service(_) | Shape::Resource(_) | Shape::Operation(_) => {
                return Err(ConvertError::ShapeTypeMismatch {
                    id: id.clone(),
                    expected: "data shape",
                    actual: shape.type_name(),
                });
            }
        };

        if shape.traits().is_sensitive() {
            insert_if_absent(&mut schema, "format", json!("password"));
        }
        if let Some(documentation) = shape.traits().documentation() {
            insert_if_absent(&mut schema, "description", json!(documentation));
        }

        Ok(schema)
    }

    fn definition_ref(
        &self,
        id: &ShapeId,
        definitions: &mut IndexMap<String, Value>,
    ) -> Result<Value, ConvertError> {
        let pointer = format!("{}/{}", DEFINITIONS_POINTER, id.name());

        if !definitions.contains_key(&pointer) {
            // Reserve the slot first so recursive structures terminate.
            definitions.insert(pointer.clone(), Value::Null);

            let structure = self.model.expect_structure(id)?;
            let mut properties = Map::new();
            for (name, member) in &structure.members {
                properties.insert(name.clone(), self.member_schema(member, definitions)?);
            }
            definitions.insert(
                pointer.clone(),
                json!({ "type": "object", "properties": properties }),
            );
        }

        Ok(json!({ "$ref": pointer }))
    }
}

fn insert_if_absent(schema: &mut Value, key: &str, value: Value) {
    if let Some(object) = schema.as_object_mut() {
        if !object.contains_key(key) {
            object.insert(key.to_string(), value);
        }
    }
}
