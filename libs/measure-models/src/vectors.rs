//! Raw vector-quantity, vector-group and group-member declarations

use crate::derivations::DerivationDeclaration;
use crate::identity::{SourceRef, TypeIdentity};
use crate::quantities::{ConstantDeclaration, ConversionDeclaration, QuantityBasis, UnitListDeclaration};
use serde::{Deserialize, Serialize};

/// One declared vector quantity, base or specialization, unresolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorDeclaration {
    pub identity: TypeIdentity,

    pub basis: QuantityBasis,

    /// Dimension of the vector. When absent it is inferred from trailing
    /// digits of the type name (`Displacement3` is three-dimensional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub derivations: Vec<DerivationDeclaration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<ConstantDeclaration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversions: Vec<ConversionDeclaration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unit_lists: Vec<UnitListDeclaration>,

    pub location: SourceRef,
}

/// One declared vector group, a family of same-kind vectors indexed by
/// dimension. Groups have no constants of their own; members do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorGroupDeclaration {
    pub identity: TypeIdentity,

    pub basis: QuantityBasis,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub derivations: Vec<DerivationDeclaration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversions: Vec<ConversionDeclaration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unit_lists: Vec<UnitListDeclaration>,

    pub location: SourceRef,
}

/// One declared vector bound to a group at a specific dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMemberDeclaration {
    pub identity: TypeIdentity,

    /// The group this member registers with.
    pub group: TypeIdentity,

    /// Dimension this member fills within the group; inferred from trailing
    /// digits of the type name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<ConstantDeclaration>,

    pub location: SourceRef,
}
