//! Population building
//!
//! Drives the whole resolution pass: indexes the raw declarations, resolves
//! units first, then scalars, vectors, vector groups and group members, each
//! bases-before-specializations, and aggregates every diagnostic produced
//! along the way into one flat list. The output is a [`Resolution`]: the
//! resolved [`Population`] next to its diagnostics, in declaration order.

pub mod builder;
pub mod cancellation;
pub mod index;

pub use builder::resolve;
pub use cancellation::CancellationToken;
pub use index::{DeclarationIndex, DeclarationKind};

use mensura_diagnostics::Diagnostic;
use mensura_models::{SourceRef, TypeIdentity};
use mensura_quantities::ResolvedScalar;
use mensura_units::UnitType;
use mensura_vectors::{ResolvedGroupMember, ResolvedVector, ResolvedVectorGroup};
use serde::ser::Serializer;
use serde::Serialize;
use std::collections::BTreeMap;

/// Every resolved type of one compilation pass, keyed by identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Population {
    #[serde(serialize_with = "identity_keyed")]
    pub units: BTreeMap<TypeIdentity, UnitType>,

    #[serde(serialize_with = "identity_keyed")]
    pub scalars: BTreeMap<TypeIdentity, ResolvedScalar>,

    #[serde(serialize_with = "identity_keyed")]
    pub vectors: BTreeMap<TypeIdentity, ResolvedVector>,

    #[serde(serialize_with = "identity_keyed")]
    pub groups: BTreeMap<TypeIdentity, ResolvedVectorGroup>,

    #[serde(serialize_with = "identity_keyed")]
    pub group_members: BTreeMap<TypeIdentity, ResolvedGroupMember>,

    /// Registered members per group, keyed by the group's base identity and
    /// indexed by dimension.
    #[serde(serialize_with = "identity_keyed")]
    pub members_by_group: BTreeMap<TypeIdentity, BTreeMap<u32, TypeIdentity>>,

    /// Base identity of every resolved group, itself included for bases.
    #[serde(serialize_with = "identity_keyed")]
    pub group_bases: BTreeMap<TypeIdentity, TypeIdentity>,

    /// Declaration sites of identities declared more than once.
    #[serde(serialize_with = "identity_keyed")]
    pub duplicate_types: BTreeMap<TypeIdentity, Vec<SourceRef>>,
}

impl Population {
    /// Registered members of a group, reachable through any group in its
    /// specialization chain.
    pub fn members_of(&self, group: &TypeIdentity) -> Option<&BTreeMap<u32, TypeIdentity>> {
        self.group_bases
            .get(group)
            .and_then(|base| self.members_by_group.get(base))
    }
}

/// The complete output of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub population: Population,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// JSON object keys must be strings; identity-keyed maps serialize under the
/// qualified name.
fn identity_keyed<S, V>(map: &BTreeMap<TypeIdentity, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_map(map.iter().map(|(identity, value)| (identity.qualified_name(), value)))
}
