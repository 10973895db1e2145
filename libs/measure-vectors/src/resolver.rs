//! Vector, group and member resolution
//!
//! Vectors carry the same collections as scalars plus a dimension. Groups are
//! families of same-kind vectors indexed by dimension; a group carries the
//! shared collections while its members carry dimensions and constants. The
//! population builder grounds specialization chains and registers members on
//! their group, so the resolvers here receive the owning unit and, for
//! specializations, the already-resolved original.

use crate::dimension::{resolve_dimension, trailing_dimension};
use mensura_diagnostics::{DiagnosticCode, Validated};
use mensura_models::{
    GroupMemberDeclaration, InheritFlags, QuantityBasis, TypeIdentity, VectorDeclaration,
    VectorGroupDeclaration,
};
use mensura_quantities::{resolve_constants, resolve_core, QuantityConstant, QuantityCore, RawCollections};
use mensura_units::UnitType;
use serde::{Deserialize, Serialize};

/// A fully resolved vector quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedVector {
    pub identity: TypeIdentity,

    /// The owning unit, inherited through the chain for specializations.
    pub unit: TypeIdentity,

    pub dimension: u32,

    #[serde(flatten)]
    pub core: QuantityCore,
}

/// A fully resolved vector group. Registered members live in the population,
/// keyed by the group's base identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedVectorGroup {
    pub identity: TypeIdentity,

    pub unit: TypeIdentity,

    #[serde(flatten)]
    pub core: QuantityCore,
}

/// A vector bound to a group at a specific dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedGroupMember {
    pub identity: TypeIdentity,

    /// The group the member registered with, as declared.
    pub group: TypeIdentity,

    pub dimension: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<QuantityConstant>,
}

/// Resolve one vector declaration. Nothing survives when the dimension
/// cannot be determined.
pub fn resolve_vector(
    declaration: &VectorDeclaration,
    unit: &UnitType,
    original: Option<&ResolvedVector>,
    quantity_check: impl FnMut(&TypeIdentity) -> Option<DiagnosticCode>,
    conversion_check: impl FnMut(&TypeIdentity) -> Option<DiagnosticCode>,
) -> Validated<Option<ResolvedVector>> {
    let mut result = Validated::empty(Vec::new());

    // A specialization without any dimension of its own keeps the original's.
    let inherited_dimension = original.map(|original| original.dimension).filter(|_| {
        declaration.dimension.is_none() && trailing_dimension(&declaration.identity).is_none()
    });

    let dimension = match inherited_dimension {
        Some(dimension) => dimension,
        None => match result.absorb(resolve_dimension(
            &declaration.identity,
            declaration.dimension,
            &declaration.location,
        )) {
            Some(dimension) => dimension,
            None => return result,
        },
    };

    let inherit = match &declaration.basis {
        QuantityBasis::Base { .. } => InheritFlags::default(),
        QuantityBasis::Specialization { inherit, .. } => *inherit,
    };

    let core = result.absorb(resolve_core(
        &declaration.identity,
        RawCollections {
            derivations: &declaration.derivations,
            constants: &declaration.constants,
            conversions: &declaration.conversions,
            unit_lists: &declaration.unit_lists,
        },
        inherit,
        unit,
        original.map(|original| &original.core),
        quantity_check,
        conversion_check,
    ));

    result.value = Some(ResolvedVector {
        identity: declaration.identity.clone(),
        unit: unit.identity.clone(),
        dimension,
        core,
    });
    result
}

/// Resolve one vector group declaration. Groups carry no constants of their
/// own.
pub fn resolve_group(
    declaration: &VectorGroupDeclaration,
    unit: &UnitType,
    original: Option<&ResolvedVectorGroup>,
    quantity_check: impl FnMut(&TypeIdentity) -> Option<DiagnosticCode>,
    conversion_check: impl FnMut(&TypeIdentity) -> Option<DiagnosticCode>,
) -> Validated<ResolvedVectorGroup> {
    let inherit = match &declaration.basis {
        QuantityBasis::Base { .. } => InheritFlags::default(),
        QuantityBasis::Specialization { inherit, .. } => *inherit,
    };

    resolve_core(
        &declaration.identity,
        RawCollections {
            derivations: &declaration.derivations,
            constants: &[],
            conversions: &declaration.conversions,
            unit_lists: &declaration.unit_lists,
        },
        inherit,
        unit,
        original.map(|original| &original.core),
        quantity_check,
        conversion_check,
    )
    .map(|core| ResolvedVectorGroup {
        identity: declaration.identity.clone(),
        unit: unit.identity.clone(),
        core,
    })
}

/// Resolve one group member against the group's owning unit. Registration
/// into the group's dimension table happens in the population builder.
pub fn resolve_group_member(
    declaration: &GroupMemberDeclaration,
    unit: &UnitType,
) -> Validated<Option<ResolvedGroupMember>> {
    let mut result = Validated::empty(Vec::new());

    let Some(dimension) = result.absorb(resolve_dimension(
        &declaration.identity,
        declaration.dimension,
        &declaration.location,
    )) else {
        return result;
    };

    let constants = result.absorb(resolve_constants(&declaration.constants, unit));

    result.value = Some(ResolvedGroupMember {
        identity: declaration.identity.clone(),
        group: declaration.group.clone(),
        dimension,
        constants,
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use mensura_models::{ConstantDeclaration, SourceRef, UnitListDeclaration};
    use mensura_units::{UnitInstance, UnitInstanceKind};
    use std::collections::{BTreeMap, BTreeSet};

    fn make_unit() -> UnitType {
        let instances: BTreeMap<String, UnitInstance> = ["Metre", "Kilometre"]
            .into_iter()
            .map(|name| {
                (
                    name.to_string(),
                    UnitInstance {
                        name: name.to_string(),
                        plural_form: format!("{name}s"),
                        definition: UnitInstanceKind::Fixed,
                        location: SourceRef::attribute("FixedUnitInstance"),
                    },
                )
            })
            .collect();

        UnitType {
            identity: TypeIdentity::new("UnitOfLength"),
            quantity: TypeIdentity::new("Length"),
            bias_term: false,
            instances,
            derivations: Vec::new(),
        }
    }

    fn base_vector(name: &str, dimension: Option<u32>) -> VectorDeclaration {
        VectorDeclaration {
            identity: TypeIdentity::new(name),
            basis: QuantityBasis::Base {
                unit: TypeIdentity::new("UnitOfLength"),
            },
            dimension,
            derivations: Vec::new(),
            constants: Vec::new(),
            conversions: Vec::new(),
            unit_lists: Vec::new(),
            location: SourceRef::attribute("VectorQuantity"),
        }
    }

    fn accept_all(_: &TypeIdentity) -> Option<DiagnosticCode> {
        None
    }

    #[test]
    fn resolves_vector_with_inferred_dimension() {
        let result = resolve_vector(
            &base_vector("Displacement3", None),
            &make_unit(),
            None,
            accept_all,
            accept_all,
        );

        assert!(result.diagnostics.is_empty());
        let vector = result.value.unwrap();
        assert_eq!(vector.dimension, 3);
        assert_eq!(
            vector.core.included_units,
            BTreeSet::from(["Metre".to_string(), "Kilometre".to_string()])
        );
    }

    #[test]
    fn vector_without_dimension_resolves_to_nothing() {
        let result = resolve_vector(
            &base_vector("Displacement", None),
            &make_unit(),
            None,
            accept_all,
            accept_all,
        );

        assert!(result.value.is_none());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::InvalidVectorDimension);
    }

    #[test]
    fn specialization_without_own_dimension_keeps_the_originals() {
        let unit = make_unit();
        let original = resolve_vector(
            &base_vector("Position3", None),
            &unit,
            None,
            accept_all,
            accept_all,
        )
        .value
        .unwrap();

        let specialization = VectorDeclaration {
            basis: QuantityBasis::Specialization {
                original: TypeIdentity::new("Position3"),
                inherit: InheritFlags::default(),
            },
            ..base_vector("Displacement", None)
        };

        let result = resolve_vector(&specialization, &unit, Some(&original), accept_all, accept_all);

        assert!(result.diagnostics.is_empty());
        assert_eq!(result.value.unwrap().dimension, 3);
    }

    #[test]
    fn group_resolves_unit_lists() {
        let declaration = VectorGroupDeclaration {
            identity: TypeIdentity::new("Position"),
            basis: QuantityBasis::Base {
                unit: TypeIdentity::new("UnitOfLength"),
            },
            derivations: Vec::new(),
            conversions: Vec::new(),
            unit_lists: vec![UnitListDeclaration::include(
                vec!["Metre".to_string()],
                SourceRef::attribute("IncludeUnits"),
            )],
            location: SourceRef::attribute("VectorGroup"),
        };

        let result = resolve_group(&declaration, &make_unit(), None, accept_all, accept_all);

        assert!(result.diagnostics.is_empty());
        assert_eq!(
            result.value.core.included_units,
            BTreeSet::from(["Metre".to_string()])
        );
    }

    #[test]
    fn member_resolves_dimension_and_constants() {
        let declaration = GroupMemberDeclaration {
            identity: TypeIdentity::new("Position3"),
            group: TypeIdentity::new("Position"),
            dimension: None,
            constants: vec![ConstantDeclaration {
                name: Some("Origin".to_string()),
                unit_instance: Some("Metre".to_string()),
                value: 0.0,
                location: SourceRef::attribute("VectorConstant"),
            }],
            location: SourceRef::attribute("VectorGroupMember"),
        };

        let result = resolve_group_member(&declaration, &make_unit());

        assert!(result.diagnostics.is_empty());
        let member = result.value.unwrap();
        assert_eq!(member.dimension, 3);
        assert_eq!(member.constants.len(), 1);
    }

    #[test]
    fn member_with_unknown_constant_instance_keeps_the_member() {
        let declaration = GroupMemberDeclaration {
            identity: TypeIdentity::new("Position2"),
            group: TypeIdentity::new("Position"),
            dimension: None,
            constants: vec![ConstantDeclaration {
                name: Some("Origin".to_string()),
                unit_instance: Some("Smoot".to_string()),
                value: 0.0,
                location: SourceRef::attribute("VectorConstant"),
            }],
            location: SourceRef::attribute("VectorGroupMember"),
        };

        let result = resolve_group_member(&declaration, &make_unit());

        let member = result.value.unwrap();
        assert!(member.constants.is_empty());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics[0].code,
            DiagnosticCode::UnrecognizedUnitInstanceName
        );
    }
}
