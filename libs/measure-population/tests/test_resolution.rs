//! End-to-end resolution from JSON declaration sets.

use mensura_diagnostics::DiagnosticCode;
use mensura_models::{DeclarationSet, TypeIdentity};
use mensura_population::{resolve, CancellationToken};
use std::collections::BTreeSet;

fn resolve_json(json: &str) -> mensura_population::Resolution {
    let declarations = DeclarationSet::from_json(json).expect("valid declaration set");
    resolve(&declarations, &CancellationToken::new())
}

fn id(name: &str) -> TypeIdentity {
    TypeIdentity::new(name)
}

#[test]
fn resolves_units_scalars_and_inheritance_from_json() {
    let resolution = resolve_json(
        r#"{
            "units": [{
                "identity": { "name": "UnitOfLength" },
                "quantity": { "name": "Length" },
                "instances": [
                    {
                        "name": "Metre",
                        "pluralForm": "Metres",
                        "definition": { "kind": "fixed" },
                        "location": { "attribute": "FixedUnitInstance" }
                    },
                    {
                        "name": "Kilometre",
                        "pluralForm": "Kilometres",
                        "definition": { "kind": "scaled", "original": "Metre", "factor": 1000.0 },
                        "location": { "attribute": "ScaledUnitInstance" }
                    },
                    {
                        "name": "Foot",
                        "pluralForm": "Feet",
                        "definition": { "kind": "scaled", "original": "Metre", "factor": 0.3048 },
                        "location": { "attribute": "ScaledUnitInstance" }
                    }
                ],
                "location": { "attribute": "Unit" }
            }],
            "scalars": [
                {
                    "identity": { "name": "Length" },
                    "basis": { "role": "base", "unit": { "name": "UnitOfLength" } },
                    "constants": [{
                        "name": "PlanckLength",
                        "unitInstance": "Metre",
                        "value": 1.616e-35,
                        "location": { "attribute": "ScalarConstant" }
                    }],
                    "baseLists": [{
                        "operation": { "kind": "exclude" },
                        "units": ["Kilometre"],
                        "location": { "attribute": "ExcludeBases" }
                    }],
                    "location": { "attribute": "ScalarQuantity" }
                },
                {
                    "identity": { "name": "Distance" },
                    "basis": { "role": "specialization", "original": { "name": "Length" } },
                    "unitLists": [{
                        "operation": { "kind": "exclude" },
                        "units": ["Foot"],
                        "location": { "attribute": "ExcludeUnits" }
                    }],
                    "location": { "attribute": "SpecializedScalarQuantity" }
                }
            ]
        }"#,
    );

    assert!(resolution.diagnostics.is_empty(), "{:?}", resolution.diagnostics);

    let length = &resolution.population.scalars[&id("Length")];
    assert_eq!(length.core.constants.len(), 1);
    assert_eq!(
        length.core.included_units,
        BTreeSet::from([
            "Metre".to_string(),
            "Kilometre".to_string(),
            "Foot".to_string()
        ])
    );
    assert_eq!(
        length.included_bases,
        BTreeSet::from(["Metre".to_string(), "Foot".to_string()]),
        "base lists filter independently of unit lists"
    );

    let distance = &resolution.population.scalars[&id("Distance")];
    assert_eq!(distance.unit, id("UnitOfLength"));
    assert_eq!(distance.core.constants.len(), 1, "constants are inherited");
    assert_eq!(
        distance.core.included_units,
        BTreeSet::from(["Metre".to_string(), "Kilometre".to_string()])
    );
    assert_eq!(
        distance.included_bases,
        BTreeSet::from(["Metre".to_string(), "Foot".to_string()]),
        "the base set is inherited"
    );
}

#[test]
fn equivalent_aliased_instances_resolve_without_diagnostics() {
    let resolution = resolve_json(
        r#"{
            "units": [{
                "identity": { "name": "UnitOfLength" },
                "quantity": { "name": "Length" },
                "instances": [
                    {
                        "name": "Metre",
                        "pluralForm": "Metres",
                        "definition": { "kind": "fixed" },
                        "location": { "attribute": "FixedUnitInstance" }
                    },
                    {
                        "name": "Meter",
                        "pluralForm": "Meters",
                        "definition": { "kind": "alias", "original": "Metre" },
                        "location": { "attribute": "UnitInstanceAlias" }
                    }
                ],
                "location": { "attribute": "Unit" }
            }],
            "scalars": [{
                "identity": { "name": "Length" },
                "basis": { "role": "base", "unit": { "name": "UnitOfLength" } },
                "location": { "attribute": "ScalarQuantity" }
            }]
        }"#,
    );

    assert!(resolution.diagnostics.is_empty());
    let unit = &resolution.population.units[&id("UnitOfLength")];
    assert_eq!(unit.instances.len(), 2);
}

#[test]
fn self_aliased_instance_is_reported_once_and_dropped() {
    let resolution = resolve_json(
        r#"{
            "units": [{
                "identity": { "name": "UnitOfLength" },
                "quantity": { "name": "Length" },
                "instances": [{
                    "name": "Metre",
                    "pluralForm": "Metres",
                    "definition": { "kind": "alias", "original": "Metre" },
                    "location": { "attribute": "UnitInstanceAlias" }
                }],
                "location": { "attribute": "Unit" }
            }],
            "scalars": [{
                "identity": { "name": "Length" },
                "basis": { "role": "base", "unit": { "name": "UnitOfLength" } },
                "location": { "attribute": "ScalarQuantity" }
            }]
        }"#,
    );

    let cyclic: Vec<_> = resolution
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.code == DiagnosticCode::CyclicallyModifiedUnitInstances)
        .collect();
    assert_eq!(cyclic.len(), 1);
    assert_eq!(cyclic[0].location.argument.as_deref(), Some("original"));

    let unit = &resolution.population.units[&id("UnitOfLength")];
    assert!(unit.instances.is_empty());
}

#[test]
fn vector_group_membership_resolves_from_json() {
    let resolution = resolve_json(
        r#"{
            "units": [{
                "identity": { "name": "UnitOfLength" },
                "quantity": { "name": "Length" },
                "instances": [{
                    "name": "Metre",
                    "pluralForm": "Metres",
                    "definition": { "kind": "fixed" },
                    "location": { "attribute": "FixedUnitInstance" }
                }],
                "location": { "attribute": "Unit" }
            }],
            "scalars": [{
                "identity": { "name": "Length" },
                "basis": { "role": "base", "unit": { "name": "UnitOfLength" } },
                "location": { "attribute": "ScalarQuantity" }
            }],
            "groups": [{
                "identity": { "name": "Position" },
                "basis": { "role": "base", "unit": { "name": "UnitOfLength" } },
                "location": { "attribute": "VectorGroup" }
            }],
            "groupMembers": [
                {
                    "identity": { "name": "Position2" },
                    "group": { "name": "Position" },
                    "location": { "attribute": "VectorGroupMember" }
                },
                {
                    "identity": { "name": "Position3" },
                    "group": { "name": "Position" },
                    "location": { "attribute": "VectorGroupMember" }
                }
            ]
        }"#,
    );

    assert!(resolution.diagnostics.is_empty(), "{:?}", resolution.diagnostics);

    let members = resolution.population.members_of(&id("Position")).unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[&2], id("Position2"));
    assert_eq!(members[&3], id("Position3"));
}

#[test]
fn diagnostics_follow_declaration_order() {
    let resolution = resolve_json(
        r#"{
            "units": [{
                "identity": { "name": "UnitOfLength" },
                "quantity": { "name": "Missing" },
                "location": { "attribute": "Unit" }
            }],
            "scalars": [{
                "identity": { "name": "Distance" },
                "basis": { "role": "specialization", "original": { "name": "Length" } },
                "location": { "attribute": "SpecializedScalarQuantity" }
            }],
            "vectors": [{
                "identity": { "name": "Displacement3" },
                "basis": { "role": "base", "unit": { "name": "UnitOfSpeed" } },
                "location": { "attribute": "VectorQuantity" }
            }]
        }"#,
    );

    let codes: Vec<_> = resolution
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.code)
        .collect();
    assert_eq!(
        codes,
        vec![
            DiagnosticCode::TypeNotScalar,
            DiagnosticCode::TypeNotScalar,
            DiagnosticCode::TypeNotUnit,
        ]
    );
}

#[test]
fn resolution_serializes_with_qualified_name_keys() {
    let resolution = resolve_json(
        r#"{
            "units": [{
                "identity": { "namespace": "Measures", "name": "UnitOfLength" },
                "quantity": { "namespace": "Measures", "name": "Length" },
                "instances": [{
                    "name": "Metre",
                    "pluralForm": "Metres",
                    "definition": { "kind": "fixed" },
                    "location": { "attribute": "FixedUnitInstance" }
                }],
                "location": { "attribute": "Unit" }
            }],
            "scalars": [{
                "identity": { "namespace": "Measures", "name": "Length" },
                "basis": {
                    "role": "base",
                    "unit": { "namespace": "Measures", "name": "UnitOfLength" }
                },
                "location": { "attribute": "ScalarQuantity" }
            }]
        }"#,
    );

    let json = serde_json::to_value(&resolution).expect("serializable resolution");

    assert!(json["population"]["units"]["Measures.UnitOfLength"].is_object());
    assert!(json["population"]["scalars"]["Measures.Length"].is_object());
    assert_eq!(json["diagnostics"], serde_json::json!([]));
}
