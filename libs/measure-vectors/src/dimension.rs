//! Vector dimensions
//!
//! A vector's dimension is either declared explicitly or inferred from
//! trailing digits of the type name (`Displacement3` is three-dimensional).
//! Supported dimensions are 2 through 4.

use mensura_diagnostics::{Diagnostic, DiagnosticCode, Validated};
use mensura_models::{SourceRef, TypeIdentity};

pub const MIN_DIMENSION: u32 = 2;
pub const MAX_DIMENSION: u32 = 4;

/// Dimension suggested by trailing digits of the type name, if any.
pub fn trailing_dimension(identity: &TypeIdentity) -> Option<u32> {
    let digits: String = identity
        .name
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    if digits.is_empty() || digits.len() == identity.name.len() {
        return None;
    }

    digits.parse().ok()
}

/// Determine the dimension of a vector type. An explicit dimension wins; a
/// name suffix disagreeing with it is worth a warning. `None` when no
/// dimension could be determined or the determined one is unsupported.
pub fn resolve_dimension(
    identity: &TypeIdentity,
    explicit: Option<u32>,
    location: &SourceRef,
) -> Validated<Option<u32>> {
    let mut result = Validated::ok(None);
    let inferred = trailing_dimension(identity);

    let dimension = match (explicit, inferred) {
        (Some(explicit), Some(inferred)) if explicit != inferred => {
            result.push(Diagnostic::new(
                DiagnosticCode::VectorUnexpectedDimension,
                format!(
                    "the name of {identity} suggests dimension {inferred}, but the declared dimension is {explicit}"
                ),
                location.clone().argument("dimension"),
            ));
            explicit
        }
        (Some(explicit), _) => explicit,
        (None, Some(inferred)) => inferred,
        (None, None) => {
            result.push(Diagnostic::new(
                DiagnosticCode::InvalidVectorDimension,
                format!("could not determine the dimension of {identity}"),
                location.clone().argument("dimension"),
            ));
            return result;
        }
    };

    if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&dimension) {
        result.push(Diagnostic::new(
            DiagnosticCode::InvalidVectorDimension,
            format!(
                "{dimension} is not a supported dimension; expected {MIN_DIMENSION} to {MAX_DIMENSION}"
            ),
            location.clone().argument("dimension"),
        ));
        return result;
    }

    result.value = Some(dimension);
    result
}
