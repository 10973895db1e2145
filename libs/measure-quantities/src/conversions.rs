//! Convertibility listings
//!
//! A conversion declaration lists other quantities the declaring type is
//! convertible to. Each listed identity must be declared as a quantity of the
//! kind the caller expects; the caller supplies that check, since this crate
//! has no view of the full population.

use mensura_diagnostics::{Diagnostic, DiagnosticCode, Validated};
use mensura_models::{ConversionDeclaration, TypeIdentity};
use std::collections::HashSet;

/// Validate one type's own conversion declarations. `kind_check` returns the
/// diagnostic code to report for an unacceptable target, or `None` to accept
/// it. Targets listed more than once across all declarations are kept once.
pub fn resolve_conversions(
    declarations: &[ConversionDeclaration],
    mut kind_check: impl FnMut(&TypeIdentity) -> Option<DiagnosticCode>,
) -> Validated<Vec<TypeIdentity>> {
    let mut result = Validated::ok(Vec::new());
    let mut listed: HashSet<&TypeIdentity> = HashSet::new();

    for declaration in declarations {
        if declaration.quantities.is_empty() {
            result.push(Diagnostic::new(
                DiagnosticCode::EmptyList,
                "the list of quantities must be populated",
                declaration.location.clone().argument("quantities"),
            ));
            continue;
        }

        for (index, target) in declaration.quantities.iter().enumerate() {
            if listed.contains(target) {
                result.push(Diagnostic::new(
                    DiagnosticCode::DuplicateListing,
                    format!("{target} is already listed"),
                    declaration.location.clone().index(index),
                ));
                continue;
            }

            if let Some(code) = kind_check(target) {
                result.push(Diagnostic::new(
                    code,
                    format!("{target} is not an acceptable conversion target"),
                    declaration.location.clone().index(index),
                ));
                continue;
            }

            listed.insert(target);
            result.value.push(target.clone());
        }
    }

    result
}
