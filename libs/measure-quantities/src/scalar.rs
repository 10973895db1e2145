//! Scalar quantity resolution
//!
//! A scalar is resolved against its owning unit, which the caller has already
//! grounded: directly for bases, through the specialization chain for
//! specializations. The bias flag is validated here; everything else is the
//! shared core.

use crate::core::{resolve_core, QuantityCore, RawCollections};
use crate::unit_lists::apply_unit_lists;
use mensura_diagnostics::{Diagnostic, DiagnosticCode, Validated};
use mensura_models::{InheritFlags, QuantityBasis, ScalarDeclaration, TypeIdentity};
use mensura_units::UnitType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A fully resolved scalar quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedScalar {
    pub identity: TypeIdentity,

    /// The owning unit, inherited through the chain for specializations.
    pub unit: TypeIdentity,

    /// Whether the scalar tracks the unit's bias term.
    pub use_unit_bias: bool,

    /// Unit instances exposed as the scalar's bases, filtered by the base
    /// lists independently of the unit set.
    pub included_bases: BTreeSet<String>,

    #[serde(flatten)]
    pub core: QuantityCore,
}

/// Resolve one scalar declaration. `original` must be the resolved scalar
/// the declaration specializes, and `unit` the owning unit of the chain.
pub fn resolve_scalar(
    declaration: &ScalarDeclaration,
    unit: &UnitType,
    original: Option<&ResolvedScalar>,
    quantity_check: impl FnMut(&TypeIdentity) -> Option<DiagnosticCode>,
    conversion_check: impl FnMut(&TypeIdentity) -> Option<DiagnosticCode>,
) -> Validated<ResolvedScalar> {
    let mut diagnostics = Vec::new();

    let use_unit_bias = match (&declaration.basis, original) {
        _ if !declaration.use_unit_bias => false,
        (QuantityBasis::Base { .. }, _) => {
            if unit.bias_term {
                true
            } else {
                diagnostics.push(Diagnostic::new(
                    DiagnosticCode::UnitNotIncludingBiasTerm,
                    format!("{} does not include a bias term", unit.identity),
                    declaration.location.clone().argument("useUnitBias"),
                ));
                false
            }
        }
        (QuantityBasis::Specialization { original: named, .. }, resolved) => {
            if resolved.is_some_and(|original| original.use_unit_bias) {
                true
            } else {
                diagnostics.push(Diagnostic::new(
                    DiagnosticCode::TypeNotBiasedScalar,
                    format!("{named} is not a biased scalar"),
                    declaration.location.clone().argument("useUnitBias"),
                ));
                false
            }
        }
    };

    let inherit = match &declaration.basis {
        QuantityBasis::Base { .. } => InheritFlags::default(),
        QuantityBasis::Specialization { inherit, .. } => *inherit,
    };

    let base_start = match original {
        Some(original) if inherit.bases => original.included_bases.clone(),
        _ => unit.instance_names().map(str::to_string).collect(),
    };
    let (included_bases, base_diagnostics) =
        apply_unit_lists(base_start, unit, &declaration.base_lists).into_parts();
    diagnostics.extend(base_diagnostics);

    let core = resolve_core(
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
    );

    let (core, core_diagnostics) = core.into_parts();
    diagnostics.extend(core_diagnostics);

    Validated::with(
        ResolvedScalar {
            identity: declaration.identity.clone(),
            unit: unit.identity.clone(),
            use_unit_bias,
            included_bases,
            core,
        },
        diagnostics,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mensura_models::{ConstantDeclaration, SourceRef, UnitListDeclaration};
    use mensura_units::{UnitInstance, UnitInstanceKind};
    use std::collections::{BTreeMap, BTreeSet};

    fn make_unit(bias_term: bool) -> UnitType {
        UnitType {
            identity: TypeIdentity::new("UnitOfTemperature"),
            quantity: TypeIdentity::new("Temperature"),
            bias_term,
            instances: BTreeMap::from([(
                "Kelvin".to_string(),
                UnitInstance {
                    name: "Kelvin".to_string(),
                    plural_form: "Kelvin".to_string(),
                    definition: UnitInstanceKind::Fixed,
                    location: SourceRef::attribute("FixedUnitInstance"),
                },
            )]),
            derivations: Vec::new(),
        }
    }

    fn base_scalar(name: &str, use_unit_bias: bool) -> ScalarDeclaration {
        ScalarDeclaration {
            identity: TypeIdentity::new(name),
            basis: QuantityBasis::Base {
                unit: TypeIdentity::new("UnitOfTemperature"),
            },
            use_unit_bias,
            derivations: Vec::new(),
            constants: Vec::new(),
            conversions: Vec::new(),
            unit_lists: Vec::new(),
            base_lists: Vec::new(),
            location: SourceRef::attribute("ScalarQuantity"),
        }
    }

    fn specialized_scalar(name: &str, original: &str, use_unit_bias: bool) -> ScalarDeclaration {
        ScalarDeclaration {
            basis: QuantityBasis::Specialization {
                original: TypeIdentity::new(original),
                inherit: InheritFlags::default(),
            },
            ..base_scalar(name, use_unit_bias)
        }
    }

    fn accept_all(_: &TypeIdentity) -> Option<DiagnosticCode> {
        None
    }

    #[test]
    fn base_scalar_resolves_against_its_unit() {
        let result = resolve_scalar(
            &base_scalar("Temperature", true),
            &make_unit(true),
            None,
            accept_all,
            accept_all,
        );

        assert!(result.diagnostics.is_empty());
        assert_eq!(result.value.unit, TypeIdentity::new("UnitOfTemperature"));
        assert!(result.value.use_unit_bias);
        assert_eq!(
            result.value.core.included_units,
            BTreeSet::from(["Kelvin".to_string()])
        );
        assert_eq!(
            result.value.included_bases,
            BTreeSet::from(["Kelvin".to_string()])
        );
    }

    #[test]
    fn base_lists_filter_bases_without_touching_the_unit_set() {
        let unit = make_unit(false);
        let mut declaration = base_scalar("Temperature", false);
        declaration.base_lists = vec![UnitListDeclaration::exclude(
            vec!["Kelvin".to_string()],
            SourceRef::attribute("ExcludeBases"),
        )];

        let result = resolve_scalar(&declaration, &unit, None, accept_all, accept_all);

        assert!(result.diagnostics.is_empty());
        assert!(result.value.included_bases.is_empty());
        assert_eq!(
            result.value.core.included_units,
            BTreeSet::from(["Kelvin".to_string()])
        );
    }

    #[test]
    fn empty_base_list_is_diagnosed() {
        let unit = make_unit(false);
        let mut declaration = base_scalar("Temperature", false);
        declaration.base_lists = vec![UnitListDeclaration::include(
            Vec::new(),
            SourceRef::attribute("IncludeBases"),
        )];

        let result = resolve_scalar(&declaration, &unit, None, accept_all, accept_all);

        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::EmptyList);
        assert_eq!(
            result.value.included_bases,
            BTreeSet::from(["Kelvin".to_string()])
        );
    }

    #[test]
    fn specialization_inherits_the_base_set() {
        let unit = make_unit(false);
        let mut base = base_scalar("Temperature", false);
        base.base_lists = vec![UnitListDeclaration::exclude(
            vec!["Kelvin".to_string()],
            SourceRef::attribute("ExcludeBases"),
        )];
        let original = resolve_scalar(&base, &unit, None, accept_all, accept_all).value;

        let inherited = resolve_scalar(
            &specialized_scalar("AbsoluteTemperature", "Temperature", false),
            &unit,
            Some(&original),
            accept_all,
            accept_all,
        );
        assert!(inherited.value.included_bases.is_empty());

        let mut standalone = specialized_scalar("Warmth", "Temperature", false);
        standalone.basis = QuantityBasis::Specialization {
            original: TypeIdentity::new("Temperature"),
            inherit: InheritFlags {
                bases: false,
                ..InheritFlags::default()
            },
        };
        let fresh = resolve_scalar(&standalone, &unit, Some(&original), accept_all, accept_all);
        assert_eq!(
            fresh.value.included_bases,
            BTreeSet::from(["Kelvin".to_string()])
        );
    }

    #[test]
    fn bias_flag_requires_a_biased_unit() {
        let result = resolve_scalar(
            &base_scalar("Temperature", true),
            &make_unit(false),
            None,
            accept_all,
            accept_all,
        );

        assert!(!result.value.use_unit_bias);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics[0].code,
            DiagnosticCode::UnitNotIncludingBiasTerm
        );
        assert_eq!(
            result.diagnostics[0].location.argument.as_deref(),
            Some("useUnitBias")
        );
    }

    #[test]
    fn specialization_bias_flag_requires_a_biased_original() {
        let unit = make_unit(true);
        let unbiased_original = resolve_scalar(
            &base_scalar("Temperature", false),
            &unit,
            None,
            accept_all,
            accept_all,
        )
        .value;

        let result = resolve_scalar(
            &specialized_scalar("AbsoluteTemperature", "Temperature", true),
            &unit,
            Some(&unbiased_original),
            accept_all,
            accept_all,
        );

        assert!(!result.value.use_unit_bias);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::TypeNotBiasedScalar);
    }

    #[test]
    fn specialization_inherits_constants() {
        let unit = make_unit(false);
        let mut base = base_scalar("Temperature", false);
        base.constants = vec![ConstantDeclaration {
            name: Some("AbsoluteZero".to_string()),
            unit_instance: Some("Kelvin".to_string()),
            value: 0.0,
            location: SourceRef::attribute("ScalarConstant"),
        }];
        let original =
            resolve_scalar(&base, &unit, None, accept_all, accept_all).value;

        let result = resolve_scalar(
            &specialized_scalar("AbsoluteTemperature", "Temperature", false),
            &unit,
            Some(&original),
            accept_all,
            accept_all,
        );

        assert!(result.diagnostics.is_empty());
        assert_eq!(result.value.core.constants.len(), 1);
        assert_eq!(result.value.core.constants[0].name, "AbsoluteZero");
    }
}
