//! Derivation-signature validation
//!
//! Validates the derivation signatures declared on a unit or quantity type:
//! expression templates, signature arity, permutability, and the uniqueness
//! of derivation IDs and signature contents. Shared by the unit resolver and
//! the quantity resolvers; only units can carry a bias term.

use crate::model::{signature_key, DerivationSignature};
use mensura_diagnostics::{Diagnostic, DiagnosticCode, Validated};
use mensura_models::{DerivationDeclaration, TypeIdentity};
use regex::Regex;
use std::collections::HashSet;

/// Validate all derivation signatures of one type. Invalid signatures are
/// dropped; valid ones are returned in declaration order.
///
/// `bias_term` rejects every signature outright: a unit with a bias term
/// cannot be derived.
pub fn resolve_derivations(
    owner: &TypeIdentity,
    bias_term: bool,
    declarations: &[DerivationDeclaration],
) -> Validated<Vec<DerivationSignature>> {
    let mut result = Validated::ok(Vec::new());

    let placeholder_pattern = Regex::new(r"\{(\d+)\}").expect("valid placeholder pattern");

    let multiple = declarations.len() > 1;
    let mut reserved_ids: HashSet<&str> = HashSet::new();
    let mut reserved_signatures: HashSet<Vec<TypeIdentity>> = HashSet::new();
    let mut reserved_permutations: HashSet<Vec<TypeIdentity>> = HashSet::new();

    for declaration in declarations {
        match resolve_declaration(
            owner,
            bias_term,
            multiple,
            declaration,
            &placeholder_pattern,
            &reserved_ids,
            &reserved_signatures,
            &reserved_permutations,
            &mut result.diagnostics,
        ) {
            Some(signature) => {
                if let Some(id) = &declaration.derivation_id {
                    if !id.is_empty() {
                        reserved_ids.insert(id);
                    }
                }
                reserved_signatures.insert(signature.signature.clone());
                if signature.permutations {
                    reserved_permutations.insert(signature.signature_key());
                }
                result.value.push(signature);
            }
            None => continue,
        }
    }

    result
}

#[allow(clippy::too_many_arguments)]
fn resolve_declaration(
    owner: &TypeIdentity,
    bias_term: bool,
    multiple: bool,
    declaration: &DerivationDeclaration,
    placeholder_pattern: &Regex,
    reserved_ids: &HashSet<&str>,
    reserved_signatures: &HashSet<Vec<TypeIdentity>>,
    reserved_permutations: &HashSet<Vec<TypeIdentity>>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<DerivationSignature> {
    if bias_term {
        diagnostics.push(Diagnostic::new(
            DiagnosticCode::UnitWithBiasTermCannotBeDerived,
            format!("{owner} includes a bias term, and cannot also be derivable"),
            declaration.location.clone(),
        ));
        return None;
    }

    let id = declaration.derivation_id.as_deref().filter(|id| !id.is_empty());

    if multiple && id.is_none() {
        diagnostics.push(Diagnostic::new(
            DiagnosticCode::MultipleDerivationSignaturesButNotNamed,
            format!("{owner} defines multiple derivation signatures, so each signature requires an ID"),
            declaration.location.clone(),
        ));
        return None;
    }

    if let Some(id) = id {
        if reserved_ids.contains(id) {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::DuplicateUnitDerivationId,
                format!("{owner} already defines a derivation signature with ID \"{id}\""),
                declaration.location.clone().argument("derivationID"),
            ));
            return None;
        }
    }

    let expression = match declaration.expression.as_deref() {
        Some(expression) if !expression.is_empty() => expression,
        _ => {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::InvalidDerivationExpression,
                "the derivation expression must be defined and non-empty",
                declaration.location.clone().argument("expression"),
            ));
            return None;
        }
    };

    let signature = match declaration.signature.as_deref() {
        Some(signature) if !signature.is_empty() => signature,
        _ => {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::InvalidDerivationSignature,
                "the derivation signature must be defined and non-empty",
                declaration.location.clone().argument("signature"),
            ));
            return None;
        }
    };

    if !validate_expression_placeholders(
        declaration,
        expression,
        signature.len(),
        placeholder_pattern,
        diagnostics,
    ) {
        return None;
    }

    let mut permutations = declaration.permutations;

    if permutations && !is_permutable(signature) {
        diagnostics.push(Diagnostic::new(
            DiagnosticCode::DerivationSignatureNotPermutable,
            "permutations have no effect on a signature with fewer than two distinct elements",
            declaration.location.clone().argument("permutations"),
        ));
        permutations = false;
    }

    // An exact-order duplicate of any earlier signature is always a
    // conflict; an earlier permutable signature additionally conflicts with
    // every reordering of its elements.
    if reserved_signatures.contains(signature)
        || reserved_permutations.contains(&signature_key(signature, true))
    {
        diagnostics.push(Diagnostic::new(
            DiagnosticCode::DuplicateUnitDerivationSignature,
            format!("{owner} already defines a derivation with this signature"),
            declaration.location.clone().argument("signature"),
        ));
        return None;
    }

    Some(DerivationSignature {
        derivation_id: id.map(str::to_string),
        expression: expression.to_string(),
        signature: signature.to_vec(),
        permutations,
        location: declaration.location.clone(),
    })
}

/// Every signature element must be referenced by a placeholder, and no
/// placeholder may reference an index beyond the signature.
fn validate_expression_placeholders(
    declaration: &DerivationDeclaration,
    expression: &str,
    signature_len: usize,
    placeholder_pattern: &Regex,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    let mut unreferenced: HashSet<usize> = (0..signature_len).collect();

    for capture in placeholder_pattern.captures_iter(expression) {
        let requested: usize = match capture[1].parse() {
            Ok(index) => index,
            Err(_) => continue,
        };

        if requested >= signature_len {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::UnmatchedDerivationExpressionUnit,
                format!("the expression references element {requested}, but the signature only contains {signature_len} elements"),
                declaration.location.clone().argument("expression"),
            ));
            return false;
        }

        unreferenced.remove(&requested);
    }

    if unreferenced.is_empty() {
        return true;
    }

    let mut unreferenced: Vec<usize> = unreferenced.into_iter().collect();
    unreferenced.sort_unstable();

    for index in unreferenced {
        diagnostics.push(Diagnostic::new(
            DiagnosticCode::ExpressionDoesNotIncludeUnit,
            format!("the expression does not include signature element {index}"),
            declaration.location.clone().argument("signature").index(index),
        ));
    }

    false
}

/// A signature is permutable only with at least two elements that are not
/// all identical.
fn is_permutable(signature: &[TypeIdentity]) -> bool {
    signature.len() >= 2 && signature.iter().any(|element| *element != signature[0])
}
