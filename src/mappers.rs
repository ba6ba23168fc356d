//! Mapper pipeline stages.
//!
//! A [`SchemaMapper`] decorates the resource schema as it is assembled:
//! `before` runs against the builder prior to property population, `after`
//! transforms the built document, and `update_node` post-processes the
//! serialized tree. Stages run in ascending `order`, ties broken by the
//! order mappers were registered.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::converter::Context;
use crate::error::ConvertError;
use crate::schema::{ResourceSchema, ResourceSchemaBuilder};

/// A pipeline stage over the schema under construction.
pub trait SchemaMapper {
    /// Pipeline position; lower orders run first.
    fn order(&self) -> i8 {
        0
    }

    /// Update the builder before properties are populated.
    fn before(
        &self,
        _context: &Context<'_>,
        _builder: &mut ResourceSchemaBuilder,
    ) -> Result<(), ConvertError> {
        Ok(())
    }

    /// Transform the built schema.
    fn after(
        &self,
        _context: &Context<'_>,
        schema: ResourceSchema,
    ) -> Result<ResourceSchema, ConvertError> {
        Ok(schema)
    }

    /// Transform the serialized document tree.
    fn update_node(
        &self,
        _context: &Context<'_>,
        _schema: &ResourceSchema,
        node: Value,
    ) -> Result<Value, ConvertError> {
        Ok(node)
    }
}

/// The built-in pipeline stages, in registration order.
pub fn core_mappers() -> Vec<Box<dyn SchemaMapper>> {
    vec![
        Box::new(DeprecatedMapper),
        Box::new(DocumentationMapper),
        Box::new(IdentifierMapper),
        Box::new(JsonAddMapper),
        Box::new(MutabilityMapper),
    ]
}

/// Writes the resource's primary identifier and any additional identifiers
/// as property pointers.
pub struct IdentifierMapper;

impl SchemaMapper for IdentifierMapper {
    fn before(
        &self,
        context: &Context<'_>,
        builder: &mut ResourceSchemaBuilder,
    ) -> Result<(), ConvertError> {
        let index = context.index();
        let resource_id = context.resource_id();

        builder.primary_identifier(
            index
                .primary_identifiers(resource_id)
                .iter()
                .map(|name| context.property_pointer(name))
                .collect(),
        );

        for identifier in index.additional_identifiers(resource_id) {
            builder.add_additional_identifier(
                identifier
                    .iter()
                    .map(|name| context.property_pointer(name))
                    .collect(),
            );
        }

        Ok(())
    }
}

/// Writes property mutability restrictions to their document lists.
pub struct MutabilityMapper;

impl SchemaMapper for MutabilityMapper {
    fn before(
        &self,
        context: &Context<'_>,
        builder: &mut ResourceSchemaBuilder,
    ) -> Result<(), ConvertError> {
        let index = context.index();
        let resource_id = context.resource_id();

        for name in index.create_only_properties(resource_id) {
            builder.add_create_only_property(context.property_pointer(&name));
        }
        for name in index.read_only_properties(resource_id) {
            builder.add_read_only_property(context.property_pointer(&name));
        }
        for name in index.write_only_properties(resource_id) {
            builder.add_write_only_property(context.property_pointer(&name));
        }

        Ok(())
    }
}

/// Fills `sourceUrl` and `documentationUrl` from the resource's external
/// documentation links, matching the configured key lists case-insensitively.
pub struct DocumentationMapper;

impl SchemaMapper for DocumentationMapper {
    fn before(
        &self,
        context: &Context<'_>,
        builder: &mut ResourceSchemaBuilder,
    ) -> Result<(), ConvertError> {
        let urls = context.resource().traits.external_documentation();
        if urls.is_empty() {
            return Ok(());
        }

        let config = context.config();
        if let Some(url) = resolve_external_docs(&urls, &config.source_doc_keys) {
            builder.source_url(url);
        }
        if let Some(url) = resolve_external_docs(&urls, &config.external_doc_keys) {
            builder.documentation_url(url);
        }

        Ok(())
    }
}

fn resolve_external_docs(
    urls: &IndexMap<String, String>,
    enabled_keys: &[String],
) -> Option<String> {
    let lowercase: IndexMap<String, &String> = urls
        .iter()
        .map(|(name, url)| (name.to_lowercase(), url))
        .collect();

    enabled_keys
        .iter()
        .find_map(|key| lowercase.get(&key.to_lowercase()))
        .map(|url| (*url).clone())
}

/// Adds deprecated members to `deprecatedProperties`.
pub struct DeprecatedMapper;

impl SchemaMapper for DeprecatedMapper {
    fn before(
        &self,
        context: &Context<'_>,
        builder: &mut ResourceSchemaBuilder,
    ) -> Result<(), ConvertError> {
        if context.config().disable_deprecated_property_generation {
            return Ok(());
        }

        let model = context.model();
        for (name, definition) in context.index().properties(context.resource_id()) {
            let deprecated = match model.member(definition.shape_id()) {
                Some(member) => {
                    member.traits.is_deprecated()
                        || model
                            .get(&member.target)
                            .is_some_and(|target| target.traits().is_deprecated())
                }
                None => model
                    .get(definition.shape_id())
                    .is_some_and(|shape| shape.traits().is_deprecated()),
            };
            if deprecated {
                builder.add_deprecated_property(context.property_pointer(&name));
            }
        }

        Ok(())
    }
}

/// Patches configured JSON values into the serialized document, creating
/// intermediate objects as needed. Runs late so patches see a stabilized
/// document.
pub struct JsonAddMapper;

impl SchemaMapper for JsonAddMapper {
    fn order(&self) -> i8 {
        96
    }

    fn update_node(
        &self,
        context: &Context<'_>,
        _schema: &ResourceSchema,
        node: Value,
    ) -> Result<Value, ConvertError> {
        let additions = &context.config().json_add;
        if additions.is_empty() {
            return Ok(node);
        }

        let mut result = node;
        for (pointer, value) in additions {
            debug!(pointer = %pointer, "applying jsonAdd patch");
            result = add_at_pointer(result, pointer, value)?;
        }
        Ok(result)
    }
}

/// RFC 6902 "add" with intermediate object creation: missing objects along
/// the pointer are created, and an existing value at the target is replaced.
pub fn add_at_pointer(
    mut root: Value,
    pointer: &str,
    value: &Value,
) -> Result<Value, ConvertError> {
    if pointer.is_empty() {
        return Ok(value.clone());
    }
    let Some(path) = pointer.strip_prefix('/') else {
        return Err(ConvertError::InvalidJsonPointer {
            pointer: pointer.to_string(),
            message: "must be empty or start with '/'".to_string(),
        });
    };

    let segments: Vec<String> = path.split('/').map(unescape_segment).collect();

    fn insert_at(
        current: &mut Value,
        segments: &[String],
        depth: usize,
        pointer: &str,
        value: &Value,
    ) -> Result<(), ConvertError> {
        let object = current
            .as_object_mut()
            .ok_or_else(|| ConvertError::InvalidJsonPointer {
                pointer: pointer.to_string(),
                message: format!(
                    "cannot traverse non-object at `/{}`",
                    segments[..depth].join("/")
                ),
            })?;

        let segment = &segments[depth];
        if depth == segments.len() - 1 {
            object.insert(segment.clone(), value.clone());
            Ok(())
        } else {
            let next = object
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            insert_at(next, segments, depth + 1, pointer, value)
        }
    }

    insert_at(&mut root, &segments, 0, pointer, value)?;

    Ok(root)
}

fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
