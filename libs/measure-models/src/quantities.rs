//! Raw scalar-quantity declarations and the collections every quantity kind
//! shares: constants, conversions and unit inclusion/exclusion lists.

use crate::derivations::DerivationDeclaration;
use crate::identity::{SourceRef, TypeIdentity};
use serde::{Deserialize, Serialize};

/// One declared scalar quantity, base or specialization, unresolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarDeclaration {
    pub identity: TypeIdentity,

    pub basis: QuantityBasis,

    /// Whether the scalar tracks the owning unit's bias term. Only valid when
    /// the unit declares one.
    #[serde(default)]
    pub use_unit_bias: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub derivations: Vec<DerivationDeclaration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<ConstantDeclaration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversions: Vec<ConversionDeclaration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unit_lists: Vec<UnitListDeclaration>,

    /// Inclusion and exclusion lists for the scalar's bases, filtering which
    /// unit instances are exposed as static members. Independent of the unit
    /// lists.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_lists: Vec<UnitListDeclaration>,

    pub location: SourceRef,
}

impl ScalarDeclaration {
    /// The original type this declaration specializes, if any.
    pub fn original(&self) -> Option<&TypeIdentity> {
        self.basis.original()
    }
}

/// Whether a quantity type stands on its own unit or specializes another
/// quantity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "camelCase")]
pub enum QuantityBasis {
    /// A base type, owning its unit directly.
    Base { unit: TypeIdentity },

    /// A specialization of an original type, inheriting the unit transitively
    /// and, per flag, the original's collections.
    Specialization {
        original: TypeIdentity,

        #[serde(default)]
        inherit: InheritFlags,
    },
}

impl QuantityBasis {
    pub fn original(&self) -> Option<&TypeIdentity> {
        match self {
            Self::Base { .. } => None,
            Self::Specialization { original, .. } => Some(original),
        }
    }

    pub fn unit(&self) -> Option<&TypeIdentity> {
        match self {
            Self::Base { unit } => Some(unit),
            Self::Specialization { .. } => None,
        }
    }
}

/// Per-collection inheritance switches of a specialization. Everything is
/// inherited unless switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InheritFlags {
    #[serde(default = "default_true")]
    pub derivations: bool,

    #[serde(default = "default_true")]
    pub constants: bool,

    #[serde(default = "default_true")]
    pub conversions: bool,

    #[serde(default = "default_true")]
    pub unit_lists: bool,

    /// Scalar base lists; ignored by vectors and groups.
    #[serde(default = "default_true")]
    pub bases: bool,
}

impl Default for InheritFlags {
    fn default() -> Self {
        Self {
            derivations: true,
            constants: true,
            conversions: true,
            unit_lists: true,
            bases: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// One declared quantity constant, a named magnitude expressed in one unit
/// instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstantDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Name of the unit instance the value is expressed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_instance: Option<String>,

    pub value: f64,

    pub location: SourceRef,
}

/// One declared conversion: the quantities this type is convertible to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionDeclaration {
    #[serde(default)]
    pub quantities: Vec<TypeIdentity>,

    pub location: SourceRef,
}

/// One declared unit inclusion or exclusion list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitListDeclaration {
    pub operation: UnitListOperation,

    /// Named unit instances. `None` when the argument was absent entirely,
    /// `Some(vec![])` when explicitly empty — the latter is diagnosed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<Vec<String>>,

    pub location: SourceRef,
}

impl UnitListDeclaration {
    pub fn include(units: Vec<String>, location: SourceRef) -> Self {
        Self {
            operation: UnitListOperation::Include {
                stacking: InclusionStackingMode::default(),
            },
            units: Some(units),
            location,
        }
    }

    pub fn exclude(units: Vec<String>, location: SourceRef) -> Self {
        Self {
            operation: UnitListOperation::Exclude,
            units: Some(units),
            location,
        }
    }
}

/// Inclusion lists carry a stacking mode; exclusion lists always subtract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UnitListOperation {
    Include {
        #[serde(default)]
        stacking: InclusionStackingMode,
    },
    Exclude,
}

/// How an inclusion list combines with previously accumulated inclusions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InclusionStackingMode {
    /// Union with the accumulated set.
    #[default]
    Unify,

    /// Intersection with the accumulated set.
    Intersect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inherit_flags_default_to_inherit_everything() {
        let flags: InheritFlags = serde_json::from_str("{}").unwrap();

        assert!(flags.derivations);
        assert!(flags.constants);
        assert!(flags.conversions);
        assert!(flags.unit_lists);
        assert!(flags.bases);
    }

    #[test]
    fn stacking_mode_defaults_to_unify() {
        let list = UnitListDeclaration::include(vec![], SourceRef::attribute("IncludeUnits"));

        assert_eq!(
            list.operation,
            UnitListOperation::Include {
                stacking: InclusionStackingMode::Unify
            }
        );
    }

    #[test]
    fn basis_accessors() {
        let base = QuantityBasis::Base {
            unit: TypeIdentity::new("UnitOfLength"),
        };
        assert_eq!(base.unit().unwrap().name, "UnitOfLength");
        assert!(base.original().is_none());

        let specialization = QuantityBasis::Specialization {
            original: TypeIdentity::new("Length"),
            inherit: InheritFlags::default(),
        };
        assert_eq!(specialization.original().unwrap().name, "Length");
        assert!(specialization.unit().is_none());
    }
}
