//! Specialization chains
//!
//! A specialization inherits its owning unit, and per flag its collections,
//! from the original type it names. Resolution runs bases-first, so by the
//! time a specialization is resolved its original already carries the fully
//! accumulated collections; inheriting is then a single concatenation, own
//! items first.
//!
//! Chains that never ground to a base are diagnosed after the fixed point
//! settles: [`diagnose_chain`] classifies why a given specialization was left
//! unresolved.

use mensura_models::TypeIdentity;
use std::collections::HashSet;

/// Why a specialization chain failed to ground to a base type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainFailure {
    /// The directly named original is not declared with the expected kind.
    MissingOriginal(TypeIdentity),

    /// The chain of originals leads back to the starting type.
    Cycle,

    /// The chain fails at a declaration further up; the diagnostic belongs
    /// there, not here.
    Upstream,
}

/// Classify why `start`, an unresolved specialization, failed to ground.
///
/// `lookup` maps an identity to its original: `None` when the identity is not
/// declared with the expected kind, `Some(None)` for a base declaration, and
/// `Some(Some(original))` for a specialization.
pub fn diagnose_chain(
    start: &TypeIdentity,
    lookup: impl Fn(&TypeIdentity) -> Option<Option<TypeIdentity>>,
) -> ChainFailure {
    let mut current = match lookup(start) {
        Some(Some(original)) => original,
        _ => return ChainFailure::Upstream,
    };

    let mut visited: HashSet<TypeIdentity> = HashSet::from([start.clone()]);
    let mut named_by_start = true;

    loop {
        if current == *start {
            return ChainFailure::Cycle;
        }
        if !visited.insert(current.clone()) {
            // A cycle that does not pass through `start`; its own members
            // carry the diagnostic.
            return ChainFailure::Upstream;
        }

        match lookup(&current) {
            Some(Some(original)) => {
                named_by_start = false;
                current = original;
            }
            // Grounded to a declared base that itself failed to resolve.
            Some(None) => return ChainFailure::Upstream,
            None => {
                return if named_by_start {
                    ChainFailure::MissingOriginal(current)
                } else {
                    ChainFailure::Upstream
                };
            }
        }
    }
}

/// Accumulate one collection across a specialization step: the type's own
/// items first, then the original's accumulated items when the flag is set.
pub fn inherit_collection<T: Clone>(mut own: Vec<T>, inherit: bool, original: &[T]) -> Vec<T> {
    if inherit {
        own.extend(original.iter().cloned());
    }
    own
}
