//! Quantity constants

use mensura_diagnostics::{Diagnostic, DiagnosticCode, Validated};
use mensura_models::{ConstantDeclaration, SourceRef};
use mensura_units::UnitType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A resolved constant: a named magnitude expressed in one instance of the
/// owning unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityConstant {
    pub name: String,
    pub unit_instance: String,
    pub value: f64,
    pub location: SourceRef,
}

/// Validate one type's own constants against the owning unit. Invalid
/// constants are dropped; the first of two same-named constants survives.
pub fn resolve_constants(
    declarations: &[ConstantDeclaration],
    unit: &UnitType,
) -> Validated<Vec<QuantityConstant>> {
    let mut result = Validated::ok(Vec::new());
    let mut reserved_names: HashSet<&str> = HashSet::new();

    for declaration in declarations {
        let name = match declaration.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => {
                result.push(Diagnostic::new(
                    DiagnosticCode::InvalidConstantName,
                    "the name of the constant must be defined and non-empty",
                    declaration.location.clone().argument("name"),
                ));
                continue;
            }
        };

        if !reserved_names.insert(name) {
            result.push(Diagnostic::new(
                DiagnosticCode::DuplicateConstantName,
                format!("a constant named \"{name}\" is already defined"),
                declaration.location.clone().argument("name"),
            ));
            continue;
        }

        let unit_instance = match declaration.unit_instance.as_deref() {
            Some(instance) if unit.instance(instance).is_some() => instance,
            Some(instance) => {
                result.push(Diagnostic::new(
                    DiagnosticCode::UnrecognizedUnitInstanceName,
                    format!(
                        "{} does not define an instance named \"{instance}\"",
                        unit.identity
                    ),
                    declaration.location.clone().argument("unitInstance"),
                ));
                continue;
            }
            None => {
                result.push(Diagnostic::new(
                    DiagnosticCode::UnrecognizedUnitInstanceName,
                    "the constant must name a unit instance",
                    declaration.location.clone().argument("unitInstance"),
                ));
                continue;
            }
        };

        result.value.push(QuantityConstant {
            name: name.to_string(),
            unit_instance: unit_instance.to_string(),
            value: declaration.value,
            location: declaration.location.clone(),
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use mensura_models::TypeIdentity;
    use mensura_units::{UnitInstance, UnitInstanceKind};
    use std::collections::BTreeMap;

    fn make_unit() -> UnitType {
        UnitType {
            identity: TypeIdentity::new("UnitOfLength"),
            quantity: TypeIdentity::new("Length"),
            bias_term: false,
            instances: BTreeMap::from([(
                "Metre".to_string(),
                UnitInstance {
                    name: "Metre".to_string(),
                    plural_form: "Metres".to_string(),
                    definition: UnitInstanceKind::Fixed,
                    location: SourceRef::attribute("FixedUnitInstance"),
                },
            )]),
            derivations: Vec::new(),
        }
    }

    fn constant(name: Option<&str>, instance: Option<&str>, value: f64) -> ConstantDeclaration {
        ConstantDeclaration {
            name: name.map(str::to_string),
            unit_instance: instance.map(str::to_string),
            value,
            location: SourceRef::attribute("ScalarConstant"),
        }
    }

    #[test]
    fn resolves_a_valid_constant() {
        let result = resolve_constants(
            &[constant(Some("PlanckLength"), Some("Metre"), 1.616e-35)],
            &make_unit(),
        );

        assert!(result.diagnostics.is_empty());
        assert_eq!(result.value.len(), 1);
        assert_eq!(result.value[0].name, "PlanckLength");
        assert_eq!(result.value[0].unit_instance, "Metre");
    }

    #[test]
    fn rejects_missing_or_empty_name() {
        for name in [None, Some("")] {
            let result = resolve_constants(&[constant(name, Some("Metre"), 1.0)], &make_unit());

            assert!(result.value.is_empty());
            assert_eq!(result.diagnostics.len(), 1);
            assert_eq!(result.diagnostics[0].code, DiagnosticCode::InvalidConstantName);
        }
    }

    #[test]
    fn first_of_two_same_named_constants_survives() {
        let result = resolve_constants(
            &[
                constant(Some("PlanckLength"), Some("Metre"), 1.0),
                constant(Some("PlanckLength"), Some("Metre"), 2.0),
            ],
            &make_unit(),
        );

        assert_eq!(result.value.len(), 1);
        assert_eq!(result.value[0].value, 1.0);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::DuplicateConstantName);
    }

    #[test]
    fn rejects_unknown_unit_instance() {
        let result = resolve_constants(
            &[constant(Some("PlanckLength"), Some("Smoot"), 1.0)],
            &make_unit(),
        );

        assert!(result.value.is_empty());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics[0].code,
            DiagnosticCode::UnrecognizedUnitInstanceName
        );
        assert_eq!(
            result.diagnostics[0].location.argument.as_deref(),
            Some("unitInstance")
        );
    }

    #[test]
    fn rejects_absent_unit_instance() {
        let result = resolve_constants(&[constant(Some("PlanckLength"), None, 1.0)], &make_unit());

        assert!(result.value.is_empty());
        assert_eq!(
            result.diagnostics[0].code,
            DiagnosticCode::UnrecognizedUnitInstanceName
        );
    }
}
