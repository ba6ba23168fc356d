//! Resource schema conversion.
//!
//! [`ResourceSchemaConverter`] drives the pipeline: discover the service's
//! resources, derive their property tables, synthesize a structure per
//! resource, convert it to JSON schema, and assemble the final document
//! through the registered mappers.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::config::{ConverterConfig, DEFINITIONS_POINTER};
use crate::error::ConvertError;
use crate::index::ResourceIndex;
use crate::json_schema::JsonSchemaConverter;
use crate::mappers::{core_mappers, SchemaMapper};
use crate::model::{
    MemberShape, Model, ResourceShape, ServiceShape, Shape, ShapeId, StructureShape,
};
use crate::schema::{Property, ResourceSchema};
use crate::traits::ResourceTrait;

/// Per-resource conversion state handed to every mapper hook.
pub struct Context<'a> {
    model: &'a Model,
    service_id: &'a ShapeId,
    service: &'a ServiceShape,
    resource_id: &'a ShapeId,
    resource: &'a ResourceShape,
    structure_id: &'a ShapeId,
    config: &'a ConverterConfig,
    index: &'a ResourceIndex,
}

impl<'a> Context<'a> {
    /// The model being converted, including the synthetic structure.
    pub fn model(&self) -> &'a Model {
        self.model
    }

    pub fn service_id(&self) -> &'a ShapeId {
        self.service_id
    }

    pub fn service(&self) -> &'a ServiceShape {
        self.service
    }

    pub fn resource_id(&self) -> &'a ShapeId {
        self.resource_id
    }

    pub fn resource(&self) -> &'a ResourceShape {
        self.resource
    }

    /// The synthetic structure aggregating the resource's properties.
    pub fn structure_id(&self) -> &'a ShapeId {
        self.structure_id
    }

    pub fn config(&self) -> &'a ConverterConfig {
        self.config
    }

    pub fn index(&self) -> &'a ResourceIndex {
        self.index
    }

    /// The property name as emitted, honoring the capitalization setting.
    pub fn resolved_property_name(&self, name: &str) -> String {
        if self.config.disable_capitalized_properties {
            name.to_string()
        } else {
            capitalize(name)
        }
    }

    /// The JSON pointer to a property in the emitted document.
    pub fn property_pointer(&self, name: &str) -> String {
        format!("/properties/{}", self.resolved_property_name(name))
    }
}

/// Converts the annotated resources of a service into resource schemas.
pub struct ResourceSchemaConverter {
    config: ConverterConfig,
    mappers: Vec<Box<dyn SchemaMapper>>,
}

impl ResourceSchemaConverter {
    /// A converter with the built-in mapper pipeline.
    pub fn new(config: ConverterConfig) -> Self {
        ResourceSchemaConverter {
            config,
            mappers: core_mappers(),
        }
    }

    /// Register an additional pipeline stage.
    pub fn with_mapper(mut self, mapper: Box<dyn SchemaMapper>) -> Self {
        self.mappers.push(mapper);
        self
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert every annotated resource, in service traversal order.
    pub fn convert(&self, model: &Model) -> Result<Vec<ResourceSchema>, ConvertError> {
        let run = self.prepare(model)?;
        run.environments
            .iter()
            .map(|environment| self.convert_resource(&run, environment))
            .collect()
    }

    /// Convert every annotated resource to its serialized document, keyed by
    /// type name, with `update_node` stages applied.
    pub fn convert_to_nodes(
        &self,
        model: &Model,
    ) -> Result<IndexMap<String, Value>, ConvertError> {
        let run = self.prepare(model)?;

        let mut nodes = IndexMap::new();
        for environment in &run.environments {
            let schema = self.convert_resource(&run, environment)?;
            let context = self.context(&run, environment)?;

            let mut node = schema.to_node()?;
            for mapper in self.ordered_mappers() {
                node = mapper.update_node(&context, &schema, node)?;
            }
            nodes.insert(schema.type_name().to_string(), node);
        }
        Ok(nodes)
    }

    fn prepare(&self, model: &Model) -> Result<ConversionRun, ConvertError> {
        let service_id = self
            .config
            .service
            .clone()
            .ok_or(ConvertError::MissingConfiguration { name: "service" })?;
        model.expect_service(&service_id)?;

        let index = ResourceIndex::new(model)?;

        let mut environments = Vec::new();
        for resource_id in model.transitive_resources(&service_id)? {
            let resource = model.expect_resource(&resource_id)?;
            let Some(resource_trait) = ResourceTrait::from_traits(&resource.traits)? else {
                continue;
            };

            let (structure_id, structure) = synthesize_structure(model, &index, &resource_id)?;
            let mut updated = model.clone();
            updated.insert(structure_id.clone(), Shape::Structure(structure));

            environments.push(ConversionEnvironment {
                resource_id,
                resource_trait,
                model: updated,
                structure_id,
            });
        }

        Ok(ConversionRun {
            service_id,
            index,
            environments,
        })
    }

    fn convert_resource(
        &self,
        run: &ConversionRun,
        environment: &ConversionEnvironment,
    ) -> Result<ResourceSchema, ConvertError> {
        let context = self.context(run, environment)?;

        let document = JsonSchemaConverter::new(&environment.model, &self.config)
            .convert(&environment.structure_id)?;

        let type_name = self.resolve_type_name(
            &run.service_id,
            &environment.resource_id,
            &environment.resource_trait,
        )?;
        let description = context.resource().traits.documentation().ok_or_else(|| {
            ConvertError::MissingDescription {
                id: environment.resource_id.clone(),
            }
        })?;
        debug!(resource = %environment.resource_id, %type_name, "converting resource");

        let mut builder = ResourceSchema::builder(type_name, description);

        for mapper in self.ordered_mappers() {
            mapper.before(&context, &mut builder)?;
        }

        for (name, schema) in document.root_properties() {
            builder.add_property(context.resolved_property_name(&name), Property::new(schema));
        }
        for (pointer, schema) in &document.definitions {
            builder.add_definition(definition_name(pointer), schema.clone());
        }

        let mut schema = builder.build()?;
        for mapper in self.ordered_mappers() {
            schema = mapper.after(&context, schema)?;
        }

        Ok(schema)
    }

    fn context<'a>(
        &'a self,
        run: &'a ConversionRun,
        environment: &'a ConversionEnvironment,
    ) -> Result<Context<'a>, ConvertError> {
        Ok(Context {
            model: &environment.model,
            service_id: &run.service_id,
            service: environment.model.expect_service(&run.service_id)?,
            resource_id: &environment.resource_id,
            resource: environment.model.expect_resource(&environment.resource_id)?,
            structure_id: &environment.structure_id,
            config: &self.config,
            index: &run.index,
        })
    }

    /// Mappers in pipeline order: ascending `order`, registration order on
    /// ties.
    fn ordered_mappers(&self) -> Vec<&dyn SchemaMapper> {
        let mut ordered: Vec<&dyn SchemaMapper> =
            self.mappers.iter().map(|mapper| mapper.as_ref()).collect();
        ordered.sort_by_key(|mapper| mapper.order());
        ordered
    }

    fn resolve_type_name(
        &self,
        service_id: &ShapeId,
        resource_id: &ShapeId,
        resource_trait: &ResourceTrait,
    ) -> Result<String, ConvertError> {
        let organization = self.config.organization_name.as_deref().ok_or(
            ConvertError::MissingConfiguration {
                name: "organizationName",
            },
        )?;
        let service_name = self
            .config
            .service_name
            .as_deref()
            .unwrap_or_else(|| service_id.name());
        let resource_name = resource_trait
            .name
            .as_deref()
            .unwrap_or_else(|| resource_id.name());

        Ok(format!("{}::{}::{}", organization, service_name, resource_name))
    }
}

struct ConversionRun {
    service_id: ShapeId,
    index: ResourceIndex,
    environments: Vec<ConversionEnvironment>,
}

struct ConversionEnvironment {
    resource_id: ShapeId,
    resource_trait: ResourceTrait,
    /// The input model plus this resource's synthetic structure.
    model: Model,
    structure_id: ShapeId,
}

/// Build the structure aggregating a resource's derived properties.
///
/// Members pulled from the model keep their target and traits under the
/// derived property name; identifier targets get a fresh member.
fn synthesize_structure(
    model: &Model,
    index: &ResourceIndex,
    resource_id: &ShapeId,
) -> Result<(ShapeId, StructureShape), ConvertError> {
    let structure_id = ShapeId::from_parts(
        resource_id.namespace(),
        format!("{}__SYNTHETIC__", resource_id.name()),
    );

    let mut members = IndexMap::new();
    for (name, definition) in index.properties(resource_id) {
        let member = if definition.shape_id().is_member() {
            model
                .member(definition.shape_id())
                .ok_or_else(|| ConvertError::ShapeNotFound {
                    id: definition.shape_id().clone(),
                })?
                .clone()
        } else {
            model.expect(definition.shape_id())?;
            MemberShape::new(definition.shape_id().clone())
        };
        members.insert(name, member);
    }

    Ok((
        structure_id,
        StructureShape {
            members,
            traits: Default::default(),
        },
    ))
}

fn definition_name(pointer: &str) -> String {
    pointer
        .strip_prefix(DEFINITIONS_POINTER)
        .map(|rest| rest.trim_start_matches('/'))
        .unwrap_or(pointer)
        .to_string()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// The conventional output file name for a resource type:
/// `Org::Service::Resource` becomes `org-service-resource.json`.
pub fn file_name_for_type(type_name: &str) -> String {
    format!("{}.json", type_name.to_lowercase().replace("::", "-"))
}
