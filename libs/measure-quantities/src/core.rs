//! The collections every quantity kind carries
//!
//! Scalars, vectors and vector groups all resolve the same four collections:
//! derivation signatures, constants, conversion targets and the effective
//! unit set. [`resolve_core`] handles all of them in one place; the
//! kind-specific resolvers wrap it with their own fields.

use crate::constants::{resolve_constants, QuantityConstant};
use crate::conversions::resolve_conversions;
use crate::inheritance::inherit_collection;
use crate::unit_lists::apply_unit_lists;
use mensura_diagnostics::{Diagnostic, DiagnosticCode, Validated};
use mensura_models::{
    ConstantDeclaration, ConversionDeclaration, DerivationDeclaration, InheritFlags, TypeIdentity,
    UnitListDeclaration,
};
use mensura_units::{resolve_derivations, DerivationSignature, UnitType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The resolved collections shared by every quantity kind, with inherited
/// items already folded in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityCore {
    /// Derivation signatures, own first, then inherited.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub derivations: Vec<DerivationSignature>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<QuantityConstant>,

    /// Quantities this type is convertible to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversions: Vec<TypeIdentity>,

    /// Names of the unit instances this type exposes.
    pub included_units: BTreeSet<String>,
}

/// Borrowed raw collections of one declaration.
#[derive(Clone, Copy)]
pub struct RawCollections<'a> {
    pub derivations: &'a [DerivationDeclaration],
    pub constants: &'a [ConstantDeclaration],
    pub conversions: &'a [ConversionDeclaration],
    pub unit_lists: &'a [UnitListDeclaration],
}

/// Resolve one type's collections against its owning unit.
///
/// `original` is the already-resolved core of the specialized type, `None`
/// for bases; `inherit` is ignored when it is absent. `quantity_check` and
/// `conversion_check` classify referenced identities, returning the
/// diagnostic code for an unacceptable one.
pub fn resolve_core(
    identity: &TypeIdentity,
    collections: RawCollections<'_>,
    inherit: InheritFlags,
    unit: &UnitType,
    original: Option<&QuantityCore>,
    mut quantity_check: impl FnMut(&TypeIdentity) -> Option<DiagnosticCode>,
    conversion_check: impl FnMut(&TypeIdentity) -> Option<DiagnosticCode>,
) -> Validated<QuantityCore> {
    let mut result = Validated::ok(QuantityCore::default());

    let mut derivations = result.absorb(resolve_derivations(identity, false, collections.derivations));
    derivations.retain(|signature| {
        let mut acceptable = true;
        for (index, element) in signature.signature.iter().enumerate() {
            if let Some(code) = quantity_check(element) {
                result.diagnostics.push(Diagnostic::new(
                    code,
                    format!("{element} is not a quantity"),
                    signature.location.clone().argument("signature").index(index),
                ));
                acceptable = false;
            }
        }
        acceptable
    });

    let constants = result.absorb(resolve_constants(collections.constants, unit));
    let conversions = result.absorb(resolve_conversions(collections.conversions, conversion_check));

    let start = match original {
        Some(original) if inherit.unit_lists => original.included_units.clone(),
        _ => unit.instance_names().map(str::to_string).collect(),
    };
    let included_units = result.absorb(apply_unit_lists(start, unit, collections.unit_lists));

    result.value = match original {
        Some(original) => QuantityCore {
            derivations: inherit_collection(derivations, inherit.derivations, &original.derivations),
            constants: inherit_collection(constants, inherit.constants, &original.constants),
            conversions: inherit_collection(conversions, inherit.conversions, &original.conversions),
            included_units,
        },
        None => QuantityCore {
            derivations,
            constants,
            conversions,
            included_units,
        },
    };

    result
}
