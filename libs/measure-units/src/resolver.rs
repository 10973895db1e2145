//! Unit resolution
//!
//! Resolves one raw unit declaration: validates instance names, binds every
//! "original" reference, detects dependency cycles, and checks bias and
//! derivability consistency. Invalid instances are dropped while the rest of
//! the unit survives; the unit itself resolves to nothing only when its
//! associated quantity is not a scalar.

use crate::cycles::cyclic_instances;
use crate::derivations::resolve_derivations;
use crate::model::{Bias, UnitInstance, UnitInstanceKind, UnitType};
use mensura_diagnostics::{Diagnostic, DiagnosticCode, Validated};
use mensura_models::{
    Prefix, TypeIdentity, UnitDeclaration, UnitInstanceDeclaration, UnitInstanceDefinition,
};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Resolve one unit declaration. `is_scalar` reports whether an identity is
/// declared as a scalar quantity; a unit whose associated quantity is not a
/// scalar yields an empty result.
pub fn resolve_unit(
    declaration: &UnitDeclaration,
    is_scalar: impl Fn(&TypeIdentity) -> bool,
) -> Validated<Option<UnitType>> {
    if !is_scalar(&declaration.quantity) {
        return Validated::empty(vec![Diagnostic::new(
            DiagnosticCode::TypeNotScalar,
            format!(
                "expected a scalar quantity, but {} is not declared as one",
                declaration.quantity
            ),
            declaration.location.clone().argument("quantity"),
        )]);
    }

    let mut result = Validated::ok(());

    let named = validate_instance_names(&declaration.instances, &mut result.diagnostics);

    let derivations = result.absorb(resolve_derivations(
        &declaration.identity,
        declaration.bias_term,
        &declaration.derivations,
    ));

    let declared_names: HashSet<&str> = named.iter().map(|instance| instance.name).collect();

    let bound = bind_references(named, &declared_names, &mut result.diagnostics);

    let surviving = drop_cyclic_instances(bound, &mut result.diagnostics);

    let mut instances = BTreeMap::new();

    for instance in surviving {
        let resolved = resolve_definition(
            declaration,
            &derivations,
            &instance,
            &mut result.diagnostics,
        );

        if let Some(definition) = resolved {
            instances.insert(
                instance.name.to_string(),
                UnitInstance {
                    name: instance.name.to_string(),
                    plural_form: instance.plural_form.to_string(),
                    definition,
                    location: instance.declaration.location.clone(),
                },
            );
        }
    }

    result.map(|()| {
        Some(UnitType {
            identity: declaration.identity.clone(),
            quantity: declaration.quantity.clone(),
            bias_term: declaration.bias_term,
            instances,
            derivations,
        })
    })
}

/// An instance declaration whose name and plural form passed validation.
struct NamedInstance<'a> {
    name: &'a str,
    plural_form: &'a str,
    declaration: &'a UnitInstanceDeclaration,
}

/// Names and plural forms must be non-empty and unique across the unit. The
/// first occurrence of a duplicate is never flagged; each later one is
/// flagged at its own declaration site and dropped.
fn validate_instance_names<'a>(
    declarations: &'a [UnitInstanceDeclaration],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<NamedInstance<'a>> {
    let mut named = Vec::with_capacity(declarations.len());
    let mut seen_names: HashSet<&str> = HashSet::new();
    let mut seen_plurals: HashSet<&str> = HashSet::new();

    for declaration in declarations {
        let name = match declaration.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticCode::InvalidUnitInstanceName,
                    "the name of the unit instance must be defined and non-empty",
                    declaration.location.clone().argument("name"),
                ));
                continue;
            }
        };

        let plural_form = match declaration.plural_form.as_deref() {
            Some(plural) if !plural.is_empty() => plural,
            _ => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticCode::InvalidUnitPluralForm,
                    format!("the plural form of the unit instance \"{name}\" must be defined and non-empty"),
                    declaration.location.clone().argument("pluralForm"),
                ));
                continue;
            }
        };

        if !seen_names.insert(name) {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::DuplicateUnitName,
                format!("the unit already defines an instance named \"{name}\""),
                declaration.location.clone().argument("name"),
            ));
            continue;
        }

        if !seen_plurals.insert(plural_form) {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::DuplicateUnitPluralForm,
                format!("the unit already defines an instance with plural form \"{plural_form}\""),
                declaration.location.clone().argument("pluralForm"),
            ));
            continue;
        }

        named.push(NamedInstance {
            name,
            plural_form,
            declaration,
        });
    }

    named
}

/// Every modified instance must reference a declared instance of the same
/// unit. Unresolvable references are diagnosed at the reference site and the
/// instance is dropped; other instances keep resolving.
fn bind_references<'a>(
    named: Vec<NamedInstance<'a>>,
    declared_names: &HashSet<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<NamedInstance<'a>> {
    named
        .into_iter()
        .filter(|instance| {
            if !instance.declaration.definition.is_modified() {
                return true;
            }

            match instance.declaration.definition.original() {
                Some(original) if declared_names.contains(original) => true,
                original => {
                    let name = original.unwrap_or("");
                    diagnostics.push(Diagnostic::new(
                        DiagnosticCode::UnrecognizedUnitInstanceName,
                        format!("the unit does not define an instance named \"{name}\""),
                        instance.declaration.location.clone().argument("original"),
                    ));
                    false
                }
            }
        })
        .collect()
}

/// Remove every instance lying on a dependency cycle, reporting one
/// diagnostic per participating instance at its own "original" argument.
fn drop_cyclic_instances<'a>(
    bound: Vec<NamedInstance<'a>>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<NamedInstance<'a>> {
    let edges: HashMap<String, String> = bound
        .iter()
        .filter_map(|instance| {
            instance
                .declaration
                .definition
                .original()
                .map(|original| (instance.name.to_string(), original.to_string()))
        })
        .collect();

    let cyclic: HashSet<String> = cyclic_instances(&edges).into_iter().collect();

    bound
        .into_iter()
        .filter(|instance| {
            if !cyclic.contains(instance.name) {
                return true;
            }

            diagnostics.push(Diagnostic::new(
                DiagnosticCode::CyclicallyModifiedUnitInstances,
                format!(
                    "the unit instance \"{}\" is cyclically defined in terms of itself",
                    instance.name
                ),
                instance.declaration.location.clone().argument("original"),
            ));
            false
        })
        .collect()
}

/// Validate the definition of one surviving instance against the unit's bias
/// capability and derivation signatures.
fn resolve_definition(
    unit: &UnitDeclaration,
    derivations: &[crate::model::DerivationSignature],
    instance: &NamedInstance<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<UnitInstanceKind> {
    let location = &instance.declaration.location;

    match &instance.declaration.definition {
        UnitInstanceDefinition::Fixed => {
            if !derivations.is_empty() {
                diagnostics.push(Diagnostic::new(
                    DiagnosticCode::DerivableUnitShouldNotUseFixed,
                    format!(
                        "{} is derivable, and should not define the fixed instance \"{}\"",
                        unit.identity, instance.name
                    ),
                    location.clone(),
                ));
                return None;
            }

            Some(UnitInstanceKind::Fixed)
        }

        UnitInstanceDefinition::Alias { original } => Some(UnitInstanceKind::Alias {
            original: original.clone().unwrap_or_default(),
        }),

        UnitInstanceDefinition::Scaled { original, factor } => Some(UnitInstanceKind::Scaled {
            original: original.clone().unwrap_or_default(),
            factor: *factor,
        }),

        UnitInstanceDefinition::Prefixed { original, prefix } => {
            let resolved = prefix.as_deref().and_then(Prefix::parse_name);

            match resolved {
                Some(prefix) => Some(UnitInstanceKind::Prefixed {
                    original: original.clone().unwrap_or_default(),
                    prefix,
                }),
                None => {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticCode::UnrecognizedEnumValue,
                        format!(
                            "\"{}\" is not a recognized metric or binary prefix",
                            prefix.as_deref().unwrap_or("")
                        ),
                        location.clone().argument("prefix"),
                    ));
                    None
                }
            }
        }

        UnitInstanceDefinition::Biased {
            original,
            value,
            expression,
        } => {
            if !unit.bias_term {
                diagnostics.push(Diagnostic::new(
                    DiagnosticCode::BiasedUnitDefinedButUnitNotBiased,
                    format!(
                        "the biased instance \"{}\" requires {} to include a bias term",
                        instance.name, unit.identity
                    ),
                    location.clone(),
                ));
                return None;
            }

            let bias = match (value, expression.as_deref()) {
                (Some(value), _) => Bias::Value(*value),
                (None, Some(expression)) if !expression.is_empty() => {
                    Bias::Expression(expression.to_string())
                }
                _ => {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticCode::InvalidBiasedUnitExpression,
                        "the bias expression must be defined and non-empty",
                        location.clone().argument("expression"),
                    ));
                    return None;
                }
            };

            Some(UnitInstanceKind::Biased {
                original: original.clone().unwrap_or_default(),
                bias,
            })
        }

        UnitInstanceDefinition::Derived {
            derivation_id,
            units,
        } => resolve_derived_definition(
            unit,
            derivations,
            instance,
            derivation_id.as_deref(),
            units,
            diagnostics,
        ),
    }
}

fn resolve_derived_definition(
    unit: &UnitDeclaration,
    derivations: &[crate::model::DerivationSignature],
    instance: &NamedInstance<'_>,
    derivation_id: Option<&str>,
    units: &[String],
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<UnitInstanceKind> {
    let location = &instance.declaration.location;

    if derivations.is_empty() {
        diagnostics.push(Diagnostic::new(
            DiagnosticCode::UnitNotDerivable,
            format!(
                "{} does not define any derivation signatures, so \"{}\" cannot be derived",
                unit.identity, instance.name
            ),
            location.clone(),
        ));
        return None;
    }

    let id = derivation_id.filter(|id| !id.is_empty());

    let signature = match id {
        Some(id) => match derivations
            .iter()
            .find(|derivation| derivation.derivation_id.as_deref() == Some(id))
        {
            Some(derivation) => derivation,
            None => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticCode::UnrecognizedUnitDerivationId,
                    format!("{} does not define a derivation with ID \"{id}\"", unit.identity),
                    location.clone().argument("derivationID"),
                ));
                return None;
            }
        },
        None => {
            if derivations.len() > 1 {
                diagnostics.push(Diagnostic::new(
                    DiagnosticCode::AmbiguousDerivationSignatureNotSpecified,
                    format!(
                        "{} defines multiple derivation signatures; \"{}\" must name the one it derives through",
                        unit.identity, instance.name
                    ),
                    location.clone(),
                ));
                return None;
            }

            &derivations[0]
        }
    };

    if units.len() != signature.signature.len() {
        diagnostics.push(Diagnostic::new(
            DiagnosticCode::IncompatibleDerivedUnitListSize,
            format!(
                "expected {} unit instances to match the derivation signature, but got {}",
                signature.signature.len(),
                units.len()
            ),
            location.clone().argument("units"),
        ));
        return None;
    }

    Some(UnitInstanceKind::Derived {
        derivation_id: signature.derivation_id.clone(),
        units: units.to_vec(),
    })
}
