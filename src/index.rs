//! Resource property derivation.
//!
//! [`ResourceIndex`] computes, for every resource carrying the `resource`
//! trait, the table of properties the generated schema will expose: their
//! mutability constraints, the primary and additional identifiers, and the
//! member ids excluded from the schema.
//!
//! Derivation runs once per resource when the index is built and the result
//! is immutable afterwards, so a warm index is safe to share read-only.

use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};

use crate::error::ConvertError;
use crate::model::{MemberShape, Model, ResourceShape, ShapeId, StructureShape};
use crate::traits::{self, ResourceTrait};

/// A single mutability constraint on a property.
///
/// The variant order is the collapse precedence: when a constraint set holds
/// more than one element, the smallest (most restrictive) wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstraintType {
    ReadOnly,
    CreateOnly,
    WriteOnly,
}

/// A property's constraint set; empty means fully mutable.
pub type ConstraintSet = BTreeSet<ConstraintType>;

/// A derived resource property: the member (or identifier target) it came
/// from, its constraints, and whether those constraints were set explicitly
/// by a trait (freezing them against implicit widening).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePropertyDefinition {
    shape_id: ShapeId,
    constraints: ConstraintSet,
    has_explicit_constraints: bool,
}

impl ResourcePropertyDefinition {
    pub fn shape_id(&self) -> &ShapeId {
        &self.shape_id
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn has_explicit_constraints(&self) -> bool {
        self.has_explicit_constraints
    }

    /// Collapse the constraint set to at most one constraint, preferring the
    /// most restrictive. `None` means fully mutable.
    pub fn collapsed(&self) -> Option<ConstraintType> {
        self.constraints.iter().next().copied()
    }
}

#[derive(Debug, Default)]
struct ResourceDerivation {
    properties: IndexMap<String, ResourcePropertyDefinition>,
    primary_identifiers: IndexSet<String>,
    additional_identifiers: Vec<IndexSet<String>>,
    excluded_properties: IndexSet<ShapeId>,
}

impl ResourceDerivation {
    fn is_excluded(&self, def: &ResourcePropertyDefinition) -> bool {
        self.excluded_properties.contains(&def.shape_id)
    }
}

/// Index of resources to their derived properties and identifiers.
///
/// The index performs no validation that trait-referenced members exist.
#[derive(Debug)]
pub struct ResourceIndex {
    derivations: IndexMap<ShapeId, ResourceDerivation>,
}

impl ResourceIndex {
    /// Derive the property table for every `resource`-annotated resource in
    /// the model.
    pub fn new(model: &Model) -> Result<Self, ConvertError> {
        let mut derivations = IndexMap::new();

        for (resource_id, resource) in model.resources() {
            let Some(resource_trait) = ResourceTrait::from_traits(&resource.traits)? else {
                continue;
            };
            let derivation = derive_resource(model, resource_id, resource, &resource_trait)?;
            derivations.insert(resource_id.clone(), derivation);
        }

        Ok(ResourceIndex { derivations })
    }

    /// All properties of the resource, in derivation order, with excluded
    /// members filtered out.
    pub fn properties(&self, resource: &ShapeId) -> IndexMap<String, ResourcePropertyDefinition> {
        let Some(derivation) = self.derivations.get(resource) else {
            return IndexMap::new();
        };
        derivation
            .properties
            .iter()
            .filter(|(_, def)| !derivation.is_excluded(def))
            .map(|(name, def)| (name.clone(), def.clone()))
            .collect()
    }

    /// A single property of the resource, unless excluded.
    pub fn property(
        &self,
        resource: &ShapeId,
        name: &str,
    ) -> Option<ResourcePropertyDefinition> {
        let derivation = self.derivations.get(resource)?;
        let def = derivation.properties.get(name)?;
        (!derivation.is_excluded(def)).then(|| def.clone())
    }

    /// Names of properties that may only be specified at creation.
    pub fn create_only_properties(&self, resource: &ShapeId) -> Vec<String> {
        self.constrained_properties(resource, ConstraintType::CreateOnly)
    }

    /// Names of properties that may only be read.
    pub fn read_only_properties(&self, resource: &ShapeId) -> Vec<String> {
        self.constrained_properties(resource, ConstraintType::ReadOnly)
    }

    /// Names of properties that may be specified but never read back.
    pub fn write_only_properties(&self, resource: &ShapeId) -> Vec<String> {
        self.constrained_properties(resource, ConstraintType::WriteOnly)
    }

    fn constrained_properties(
        &self,
        resource: &ShapeId,
        constraint: ConstraintType,
    ) -> Vec<String> {
        let Some(derivation) = self.derivations.get(resource) else {
            return Vec::new();
        };
        derivation
            .properties
            .iter()
            .filter(|(_, def)| !derivation.is_excluded(def))
            .filter(|(_, def)| def.collapsed() == Some(constraint))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Member ids explicitly excluded from the resource schema.
    pub fn excluded_properties(&self, resource: &ShapeId) -> IndexSet<ShapeId> {
        self.derivations
            .get(resource)
            .map(|derivation| derivation.excluded_properties.clone())
            .unwrap_or_default()
    }

    /// The identifier names primarily used to address the resource.
    pub fn primary_identifiers(&self, resource: &ShapeId) -> IndexSet<String> {
        self.derivations
            .get(resource)
            .map(|derivation| derivation.primary_identifiers.clone())
            .unwrap_or_default()
    }

    /// Alternate identifier sets, each usable to address the resource.
    pub fn additional_identifiers(&self, resource: &ShapeId) -> Vec<IndexSet<String>> {
        self.derivations
            .get(resource)
            .map(|derivation| derivation.additional_identifiers.clone())
            .unwrap_or_default()
    }
}

fn derive_resource(
    model: &Model,
    resource_id: &ShapeId,
    resource: &ResourceShape,
    resource_trait: &ResourceTrait,
) -> Result<ResourceDerivation, ConvertError> {
    let mut table = ResourceDerivation::default();

    // Explicit resource identifiers come first; their mutability depends on
    // whether the client can choose them (put lifecycle) or the service
    // assigns them.
    let identifier_mutability = default_identifier_mutability(resource);
    for (name, target) in &resource.identifiers {
        table.primary_identifiers.insert(name.clone());
        table.properties.insert(
            name.clone(),
            ResourcePropertyDefinition {
                shape_id: target.clone(),
                constraints: identifier_mutability.clone(),
                has_explicit_constraints: true,
            },
        );
    }

    // The read lifecycle's input carries additional identifiers; its output
    // carries readable properties.
    if let Some(read_id) = &resource.read {
        if let Some((input_id, input)) = model.operation_input(read_id)? {
            register_additional_identifiers(&mut table, input_id, input);
        }
        if let Some((output_id, output)) = model.operation_output(read_id)? {
            update_property_mutabilities(
                model,
                &mut table,
                resource_id,
                Some(read_id),
                output_id,
                output,
                BTreeSet::from([ConstraintType::ReadOnly]),
                add_read_only,
            )?;
        }
    }

    if let Some(put_id) = &resource.put {
        if let Some((input_id, input)) = model.operation_input(put_id)? {
            update_property_mutabilities(
                model,
                &mut table,
                resource_id,
                Some(put_id),
                input_id,
                input,
                BTreeSet::from([ConstraintType::WriteOnly]),
                add_write_only,
            )?;
        }
    }

    if let Some(create_id) = &resource.create {
        if let Some((input_id, input)) = model.operation_input(create_id)? {
            update_property_mutabilities(
                model,
                &mut table,
                resource_id,
                Some(create_id),
                input_id,
                input,
                BTreeSet::from([ConstraintType::CreateOnly]),
                add_create_only,
            )?;
        }
    }

    if let Some(update_id) = &resource.update {
        if let Some((input_id, input)) = model.operation_input(update_id)? {
            update_property_mutabilities(
                model,
                &mut table,
                resource_id,
                Some(update_id),
                input_id,
                input,
                BTreeSet::from([ConstraintType::WriteOnly]),
                add_write_only,
            )?;
        }
    }

    // Members found through the trait's additionalSchemas appear only with
    // whatever constraints they declare themselves.
    for schema_id in &resource_trait.additional_schemas {
        let structure = model.expect_structure(schema_id)?;
        update_property_mutabilities(
            model,
            &mut table,
            resource_id,
            None,
            schema_id,
            structure,
            ConstraintSet::new(),
            identity,
        )?;
    }

    Ok(table)
}

fn default_identifier_mutability(resource: &ResourceShape) -> ConstraintSet {
    // With a put lifecycle the client names the resource at creation;
    // otherwise identifiers are service-assigned.
    if resource.put.is_some() {
        BTreeSet::from([ConstraintType::CreateOnly])
    } else {
        BTreeSet::from([ConstraintType::ReadOnly])
    }
}

fn register_additional_identifiers(
    table: &mut ResourceDerivation,
    input_id: &ShapeId,
    input: &StructureShape,
) {
    for (member_name, member) in &input.members {
        if !member.traits.has(traits::ADDITIONAL_IDENTIFIER) {
            continue;
        }

        let property_name = external_property_name(member_name, member);
        let already_explicit = table
            .properties
            .get(&property_name)
            .is_some_and(|def| def.has_explicit_constraints);
        if !already_explicit {
            table.properties.insert(
                property_name.clone(),
                ResourcePropertyDefinition {
                    shape_id: input_id.with_member(member_name),
                    constraints: BTreeSet::from([ConstraintType::ReadOnly]),
                    has_explicit_constraints: false,
                },
            );
        }

        let mut names = IndexSet::new();
        names.insert(property_name);
        table.additional_identifiers.push(names);
    }
}

#[allow(clippy::too_many_arguments)]
fn update_property_mutabilities(
    model: &Model,
    table: &mut ResourceDerivation,
    resource_id: &ShapeId,
    operation_id: Option<&ShapeId>,
    container_id: &ShapeId,
    container: &StructureShape,
    default_constraints: ConstraintSet,
    updater: fn(&ConstraintSet) -> ConstraintSet,
) -> Result<(), ConvertError> {
    collect_excluded_properties(
        model,
        container_id,
        container,
        &mut table.excluded_properties,
        &mut IndexSet::new(),
    )?;

    // Identifier mutability was fixed up front, so members bound to the
    // operation's identifiers are skipped here. additionalSchemas containers
    // pass no operation and skip nothing.
    let bindings = operation_id
        .map(|op_id| model.identifier_bindings(resource_id, op_id))
        .unwrap_or_default();

    for (member_name, member) in &container.members {
        if bindings.values().any(|bound| bound == member_name) {
            continue;
        }

        let property_name = external_property_name(member_name, member);
        let explicit = explicit_constraints(member);

        let update_in_place = match table.properties.get_mut(&property_name) {
            Some(current) if explicit.is_empty() => {
                if !current.has_explicit_constraints {
                    current.constraints = updater(&current.constraints);
                }
                true
            }
            _ => false,
        };

        if !update_in_place {
            table.properties.insert(
                property_name,
                ResourcePropertyDefinition {
                    shape_id: container_id.with_member(member_name),
                    constraints: if explicit.is_empty() {
                        default_constraints.clone()
                    } else {
                        explicit.clone()
                    },
                    has_explicit_constraints: !explicit.is_empty(),
                },
            );
        }
    }

    Ok(())
}

/// Walk a container's member targets, collecting ids of members carrying the
/// `excludeProperty` trait. Recursion descends into structure targets only;
/// the visited set keeps shared targets from being rewalked.
fn collect_excluded_properties(
    model: &Model,
    container_id: &ShapeId,
    container: &StructureShape,
    excluded: &mut IndexSet<ShapeId>,
    visited: &mut IndexSet<ShapeId>,
) -> Result<(), ConvertError> {
    for (member_name, member) in &container.members {
        if member.traits.has(traits::EXCLUDE_PROPERTY) {
            excluded.insert(container_id.with_member(member_name));
        } else if let Some(target) = model.expect(&member.target)?.as_structure() {
            if visited.insert(member.target.clone()) {
                collect_excluded_properties(model, &member.target, target, excluded, visited)?;
            }
        }
    }
    Ok(())
}

/// The external name of a member's property: the `propertyName` trait value
/// when present, the member name otherwise.
fn external_property_name(member_name: &str, member: &MemberShape) -> String {
    member
        .traits
        .property_name()
        .unwrap_or(member_name)
        .to_string()
}

fn explicit_constraints(member: &MemberShape) -> ConstraintSet {
    if member.traits.has(traits::READ_ONLY_PROPERTY) {
        return BTreeSet::from([ConstraintType::ReadOnly]);
    }
    if member.traits.has(traits::CREATE_ONLY_PROPERTY) {
        return BTreeSet::from([ConstraintType::CreateOnly]);
    }
    if member.traits.has(traits::WRITE_ONLY_PROPERTY) {
        return BTreeSet::from([ConstraintType::WriteOnly]);
    }
    ConstraintSet::new()
}

fn add_read_only(constraints: &ConstraintSet) -> ConstraintSet {
    let mut updated = constraints.clone();
    updated.insert(ConstraintType::ReadOnly);
    updated
}

fn add_create_only(constraints: &ConstraintSet) -> ConstraintSet {
    let mut updated = constraints.clone();
    updated.remove(&ConstraintType::ReadOnly);
    updated.insert(ConstraintType::CreateOnly);
    updated
}

/// A member seen on both the read and a write path is fully mutable; one
/// seen only on a write path is write-only.
fn add_write_only(constraints: &ConstraintSet) -> ConstraintSet {
    let mut updated = constraints.clone();
    if updated.contains(&ConstraintType::ReadOnly) || updated.contains(&ConstraintType::CreateOnly)
    {
        updated.remove(&ConstraintType::ReadOnly);
        updated.remove(&ConstraintType::CreateOnly);
    } else {
        updated.insert(ConstraintType::WriteOnly);
    }
    updated
}

fn identity(constraints: &ConstraintSet) -> ConstraintSet {
    constraints.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[ConstraintType]) -> ConstraintSet {
        items.iter().copied().collect()
    }

    #[test]
    fn read_only_always_adds() {
        assert_eq!(
            add_read_only(&set(&[])),
            set(&[ConstraintType::ReadOnly])
        );
        assert_eq!(
            add_read_only(&set(&[ConstraintType::WriteOnly])),
            set(&[ConstraintType::ReadOnly, ConstraintType::WriteOnly])
        );
    }

    #[test]
    fn create_only_upgrades_read_only() {
        assert_eq!(
            add_create_only(&set(&[ConstraintType::ReadOnly])),
            set(&[ConstraintType::CreateOnly])
        );
        assert_eq!(
            add_create_only(&set(&[])),
            set(&[ConstraintType::CreateOnly])
        );
    }

    #[test]
    fn write_only_collapses_readable_members() {
        // Readable and writable means fully mutable.
        assert_eq!(add_write_only(&set(&[ConstraintType::ReadOnly])), set(&[]));
        assert_eq!(add_write_only(&set(&[ConstraintType::CreateOnly])), set(&[]));
        // Write-path only stays write-only.
        assert_eq!(
            add_write_only(&set(&[])),
            set(&[ConstraintType::WriteOnly])
        );
        assert_eq!(
            add_write_only(&set(&[ConstraintType::WriteOnly])),
            set(&[ConstraintType::WriteOnly])
        );
    }

    #[test]
    fn collapse_prefers_most_restrictive() {
        let def = ResourcePropertyDefinition {
            shape_id: "ns#S$m".parse().unwrap(),
            constraints: set(&[ConstraintType::WriteOnly, ConstraintType::CreateOnly]),
            has_explicit_constraints: false,
        };
        assert_eq!(def.collapsed(), Some(ConstraintType::CreateOnly));

        let mutable = ResourcePropertyDefinition {
            shape_id: "ns#S$m".parse().unwrap(),
            constraints: set(&[]),
            has_explicit_constraints: false,
        };
        assert_eq!(mutable.collapsed(), None);
    }
}
