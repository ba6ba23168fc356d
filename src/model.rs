//! In-memory service model.
//!
//! A [`Model`] is a graph of named shapes: services, resources, operations,
//! structures, collections, and scalars. Shapes carry [`Traits`] and refer to
//! each other by [`ShapeId`]. The conversion engine only reads models; the
//! JSON form accepted by [`crate::loader`] is
//! `{"shapes": {"ns#Name": {"type": "...", ...}}}` with plain shape-id
//! strings for all references.

use std::fmt;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;
use crate::traits::Traits;

/// A namespaced shape identifier: `namespace#name`, optionally suffixed with
/// `$member` for structure members.
///
/// Equality is structural. Shape ids serialize as their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ShapeId {
    namespace: String,
    name: String,
    member: Option<String>,
}

impl ShapeId {
    /// Build a shape id from a namespace and shape name.
    pub fn from_parts(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        ShapeId {
            namespace: namespace.into(),
            name: name.into(),
            member: None,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The member segment, if this id names a structure member.
    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    pub fn is_member(&self) -> bool {
        self.member.is_some()
    }

    /// Returns this id with the given member segment attached.
    pub fn with_member(&self, member: impl Into<String>) -> Self {
        ShapeId {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: Some(member.into()),
        }
    }

    /// Returns the containing shape's id, dropping any member segment.
    pub fn without_member(&self) -> Self {
        ShapeId {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: None,
        }
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.namespace, self.name)?;
        if let Some(member) = &self.member {
            write!(f, "${}", member)?;
        }
        Ok(())
    }
}

impl From<ShapeId> for String {
    fn from(id: ShapeId) -> String {
        id.to_string()
    }
}

impl FromStr for ShapeId {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConvertError::InvalidShapeId { value: s.to_string() };

        let (namespace, rest) = s.split_once('#').ok_or_else(invalid)?;
        let (name, member) = match rest.split_once('$') {
            Some((name, member)) => (name, Some(member)),
            None => (rest, None),
        };

        if namespace.is_empty() || name.is_empty() || member == Some("") {
            return Err(invalid());
        }

        Ok(ShapeId {
            namespace: namespace.to_string(),
            name: name.to_string(),
            member: member.map(String::from),
        })
    }
}

impl TryFrom<String> for ShapeId {
    type Error = ConvertError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A shape in the model, tagged by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Service(ServiceShape),
    Resource(ResourceShape),
    Operation(OperationShape),
    Structure(StructureShape),
    List(ListShape),
    Map(MapShape),
    String(SimpleShape),
    Boolean(SimpleShape),
    Integer(SimpleShape),
    Long(SimpleShape),
    Float(SimpleShape),
    Double(SimpleShape),
    Blob(SimpleShape),
    Timestamp(SimpleShape),
}

impl Shape {
    pub fn traits(&self) -> &Traits {
        match self {
            Shape::Service(s) => &s.traits,
            Shape::Resource(s) => &s.traits,
            Shape::Operation(s) => &s.traits,
            Shape::Structure(s) => &s.traits,
            Shape::List(s) => &s.traits,
            Shape::Map(s) => &s.traits,
            Shape::String(s)
            | Shape::Boolean(s)
            | Shape::Integer(s)
            | Shape::Long(s)
            | Shape::Float(s)
            | Shape::Double(s)
            | Shape::Blob(s)
            | Shape::Timestamp(s) => &s.traits,
        }
    }

    /// The shape kind as it appears in the JSON form, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Service(_) => "service",
            Shape::Resource(_) => "resource",
            Shape::Operation(_) => "operation",
            Shape::Structure(_) => "structure",
            Shape::List(_) => "list",
            Shape::Map(_) => "map",
            Shape::String(_) => "string",
            Shape::Boolean(_) => "boolean",
            Shape::Integer(_) => "integer",
            Shape::Long(_) => "long",
            Shape::Float(_) => "float",
            Shape::Double(_) => "double",
            Shape::Blob(_) => "blob",
            Shape::Timestamp(_) => "timestamp",
        }
    }

    pub fn as_structure(&self) -> Option<&StructureShape> {
        match self {
            Shape::Structure(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&ResourceShape> {
        match self {
            Shape::Resource(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<ShapeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ShapeId>,
    #[serde(default, skip_serializing_if = "Traits::is_empty")]
    pub traits: Traits,
}

/// A resource shape: identifiers plus optional lifecycle operation bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceShape {
    /// Ordered mapping of identifier name to target shape id.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub identifiers: IndexMap<String, ShapeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create: Option<ShapeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<ShapeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<ShapeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<ShapeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<ShapeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<ShapeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<ShapeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ShapeId>,
    #[serde(default, skip_serializing_if = "Traits::is_empty")]
    pub traits: Traits,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<ShapeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ShapeId>,
    #[serde(default, skip_serializing_if = "Traits::is_empty")]
    pub traits: Traits,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureShape {
    /// Ordered members, keyed by member name.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub members: IndexMap<String, MemberShape>,
    #[serde(default, skip_serializing_if = "Traits::is_empty")]
    pub traits: Traits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberShape {
    pub target: ShapeId,
    #[serde(default, skip_serializing_if = "Traits::is_empty")]
    pub traits: Traits,
}

impl MemberShape {
    pub fn new(target: ShapeId) -> Self {
        MemberShape {
            target,
            traits: Traits::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListShape {
    pub member: MemberShape,
    #[serde(default, skip_serializing_if = "Traits::is_empty")]
    pub traits: Traits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapShape {
    pub key: MemberShape,
    pub value: MemberShape,
    #[serde(default, skip_serializing_if = "Traits::is_empty")]
    pub traits: Traits,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleShape {
    #[serde(default, skip_serializing_if = "Traits::is_empty")]
    pub traits: Traits,
}

/// A loaded service model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    shapes: IndexMap<ShapeId, Shape>,
}

impl Model {
    pub fn new() -> Self {
        Model::default()
    }

    /// Add or replace a shape. Returns `self` for chained construction.
    pub fn with_shape(mut self, id: ShapeId, shape: Shape) -> Self {
        self.insert(id, shape);
        self
    }

    pub fn insert(&mut self, id: ShapeId, shape: Shape) {
        self.shapes.insert(id, shape);
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn shapes(&self) -> impl Iterator<Item = (&ShapeId, &Shape)> {
        self.shapes.iter()
    }

    /// All resource shapes, in model insertion order.
    pub fn resources(&self) -> impl Iterator<Item = (&ShapeId, &ResourceShape)> {
        self.shapes.iter().filter_map(|(id, shape)| match shape {
            Shape::Resource(resource) => Some((id, resource)),
            _ => None,
        })
    }

    pub fn expect(&self, id: &ShapeId) -> Result<&Shape, ConvertError> {
        self.get(id).ok_or_else(|| ConvertError::ShapeNotFound { id: id.clone() })
    }

    pub fn expect_structure(&self, id: &ShapeId) -> Result<&StructureShape, ConvertError> {
        match self.expect(id)? {
            Shape::Structure(structure) => Ok(structure),
            other => Err(ConvertError::ShapeTypeMismatch {
                id: id.clone(),
                expected: "structure",
                actual: other.type_name(),
            }),
        }
    }

    pub fn expect_resource(&self, id: &ShapeId) -> Result<&ResourceShape, ConvertError> {
        match self.expect(id)? {
            Shape::Resource(resource) => Ok(resource),
            other => Err(ConvertError::ShapeTypeMismatch {
                id: id.clone(),
                expected: "resource",
                actual: other.type_name(),
            }),
        }
    }

    pub fn expect_service(&self, id: &ShapeId) -> Result<&ServiceShape, ConvertError> {
        match self.expect(id)? {
            Shape::Service(service) => Ok(service),
            other => Err(ConvertError::ShapeTypeMismatch {
                id: id.clone(),
                expected: "service",
                actual: other.type_name(),
            }),
        }
    }

    pub fn expect_operation(&self, id: &ShapeId) -> Result<&OperationShape, ConvertError> {
        match self.expect(id)? {
            Shape::Operation(operation) => Ok(operation),
            other => Err(ConvertError::ShapeTypeMismatch {
                id: id.clone(),
                expected: "operation",
                actual: other.type_name(),
            }),
        }
    }

    /// Resolve a member id (`ns#Struct$name`) to its member shape.
    pub fn member(&self, id: &ShapeId) -> Option<&MemberShape> {
        let member_name = id.member()?;
        let structure = self.get(&id.without_member())?.as_structure()?;
        structure.members.get(member_name)
    }

    /// The input structure of an operation, with its shape id.
    pub fn operation_input(
        &self,
        op_id: &ShapeId,
    ) -> Result<Option<(&ShapeId, &StructureShape)>, ConvertError> {
        let operation = self.expect_operation(op_id)?;
        match &operation.input {
            Some(input_id) => {
                let structure = self.expect_structure(input_id)?;
                Ok(Some((input_id, structure)))
            }
            None => Ok(None),
        }
    }

    /// The output structure of an operation, with its shape id.
    pub fn operation_output(
        &self,
        op_id: &ShapeId,
    ) -> Result<Option<(&ShapeId, &StructureShape)>, ConvertError> {
        let operation = self.expect_operation(op_id)?;
        match &operation.output {
            Some(output_id) => {
                let structure = self.expect_structure(output_id)?;
                Ok(Some((output_id, structure)))
            }
            None => Ok(None),
        }
    }

    /// Identifier bindings of an operation bound to a resource: a mapping of
    /// identifier name to the input member name that carries it.
    ///
    /// A member binds an identifier when it carries a `resourceIdentifier`
    /// trait naming it, or when the member name matches the identifier name.
    pub fn identifier_bindings(
        &self,
        resource_id: &ShapeId,
        op_id: &ShapeId,
    ) -> IndexMap<String, String> {
        let mut bindings = IndexMap::new();

        let Some(resource) = self.get(resource_id).and_then(Shape::as_resource) else {
            return bindings;
        };
        let Ok(Some((_, input))) = self.operation_input(op_id) else {
            return bindings;
        };

        for identifier_name in resource.identifiers.keys() {
            let bound = input.members.iter().find(|(member_name, member)| {
                match member.traits.resource_identifier() {
                    Some(named) => named == identifier_name.as_str(),
                    None => *member_name == identifier_name,
                }
            });
            if let Some((member_name, _)) = bound {
                bindings.insert(identifier_name.clone(), member_name.clone());
            }
        }

        bindings
    }

    /// All resources contained in a service, directly or through nested
    /// resources, in traversal (insertion) order.
    pub fn transitive_resources(
        &self,
        service_id: &ShapeId,
    ) -> Result<Vec<ShapeId>, ConvertError> {
        let service = self.expect_service(service_id)?;

        let mut found: IndexSet<ShapeId> = IndexSet::new();
        let mut queue: Vec<ShapeId> = service.resources.clone();

        while !queue.is_empty() {
            let mut next = Vec::new();
            for id in queue {
                if !found.insert(id.clone()) {
                    continue;
                }
                let resource = self.expect_resource(&id)?;
                next.extend(resource.resources.iter().cloned());
            }
            queue = next;
        }

        Ok(found.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(s: &str) -> ShapeId {
        s.parse().unwrap()
    }

    #[test]
    fn shape_id_parse_and_display() {
        let parsed = id("smithy.example#FooResource");
        assert_eq!(parsed.namespace(), "smithy.example");
        assert_eq!(parsed.name(), "FooResource");
        assert_eq!(parsed.member(), None);
        assert_eq!(parsed.to_string(), "smithy.example#FooResource");
    }

    #[test]
    fn shape_id_member_suffix() {
        let parsed = id("smithy.example#CreateFooRequest$fooId");
        assert_eq!(parsed.member(), Some("fooId"));
        assert_eq!(parsed.without_member(), id("smithy.example#CreateFooRequest"));
        assert_eq!(
            id("smithy.example#CreateFooRequest").with_member("fooId"),
            parsed
        );
    }

    #[test]
    fn shape_id_rejects_malformed() {
        assert!("noNamespace".parse::<ShapeId>().is_err());
        assert!("#Name".parse::<ShapeId>().is_err());
        assert!("ns#".parse::<ShapeId>().is_err());
        assert!("ns#Name$".parse::<ShapeId>().is_err());
    }

    #[test]
    fn model_deserializes_from_json() {
        let model: Model = serde_json::from_value(json!({
            "shapes": {
                "smithy.example#Name": { "type": "string" },
                "smithy.example#GetThing": {
                    "type": "operation",
                    "input": "smithy.example#GetThingRequest"
                },
                "smithy.example#GetThingRequest": {
                    "type": "structure",
                    "members": {
                        "name": { "target": "smithy.example#Name" }
                    }
                }
            }
        }))
        .unwrap();

        let (input_id, input) = model
            .operation_input(&id("smithy.example#GetThing"))
            .unwrap()
            .unwrap();
        assert_eq!(*input_id, id("smithy.example#GetThingRequest"));
        assert_eq!(
            input.members["name"].target,
            id("smithy.example#Name")
        );
    }

    #[test]
    fn expect_structure_mismatch() {
        let model = Model::new().with_shape(
            id("ns#Str"),
            Shape::String(SimpleShape::default()),
        );

        let err = model.expect_structure(&id("ns#Str")).unwrap_err();
        assert!(matches!(err, ConvertError::ShapeTypeMismatch { .. }));

        let err = model.expect_structure(&id("ns#Missing")).unwrap_err();
        assert!(matches!(err, ConvertError::ShapeNotFound { .. }));
    }

    #[test]
    fn member_resolution() {
        let model: Model = serde_json::from_value(json!({
            "shapes": {
                "ns#Request": {
                    "type": "structure",
                    "members": {
                        "value": { "target": "ns#Value" }
                    }
                },
                "ns#Value": { "type": "string" }
            }
        }))
        .unwrap();

        let member = model.member(&id("ns#Request$value")).unwrap();
        assert_eq!(member.target, id("ns#Value"));
        assert!(model.member(&id("ns#Request$missing")).is_none());
        assert!(model.member(&id("ns#Request")).is_none());
    }

    #[test]
    fn identifier_bindings_by_name_and_trait() {
        let model: Model = serde_json::from_value(json!({
            "shapes": {
                "ns#Thing": {
                    "type": "resource",
                    "identifiers": { "thingId": "ns#Id" },
                    "read": "ns#GetThing"
                },
                "ns#GetThing": {
                    "type": "operation",
                    "input": "ns#GetThingRequest"
                },
                "ns#GetThingRequest": {
                    "type": "structure",
                    "members": {
                        "renamedId": {
                            "target": "ns#Id",
                            "traits": { "api#resourceIdentifier": "thingId" }
                        }
                    }
                },
                "ns#Id": { "type": "string" }
            }
        }))
        .unwrap();

        let bindings = model.identifier_bindings(&id("ns#Thing"), &id("ns#GetThing"));
        assert_eq!(bindings["thingId"], "renamedId");
    }

    #[test]
    fn transitive_resources_includes_nested() {
        let model: Model = serde_json::from_value(json!({
            "shapes": {
                "ns#Service": {
                    "type": "service",
                    "resources": ["ns#Parent"]
                },
                "ns#Parent": {
                    "type": "resource",
                    "resources": ["ns#Child"]
                },
                "ns#Child": { "type": "resource" }
            }
        }))
        .unwrap();

        let resources = model.transitive_resources(&id("ns#Service")).unwrap();
        assert_eq!(resources, vec![id("ns#Parent"), id("ns#Child")]);
    }
}
