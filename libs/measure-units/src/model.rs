//! Resolved unit model

use mensura_models::{Prefix, SourceRef, TypeIdentity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A fully resolved unit type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitType {
    pub identity: TypeIdentity,

    /// The scalar quantity this unit measures.
    pub quantity: TypeIdentity,

    /// Whether instances may carry a bias term.
    pub bias_term: bool,

    /// Surviving instances, keyed by unique name. Ordered for deterministic
    /// downstream synthesis.
    pub instances: BTreeMap<String, UnitInstance>,

    /// Validated derivation signatures, in declaration order.
    pub derivations: Vec<DerivationSignature>,
}

impl UnitType {
    pub fn instance(&self, name: &str) -> Option<&UnitInstance> {
        self.instances.get(name)
    }

    /// Names of all surviving instances.
    pub fn instance_names(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }

    pub fn derivation_by_id(&self, id: &str) -> Option<&DerivationSignature> {
        self.derivations
            .iter()
            .find(|derivation| derivation.derivation_id.as_deref() == Some(id))
    }

    /// The unit's only derivation signature, if it has exactly one.
    pub fn sole_derivation(&self) -> Option<&DerivationSignature> {
        match self.derivations.as_slice() {
            [derivation] => Some(derivation),
            _ => None,
        }
    }
}

/// One resolved unit instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitInstance {
    pub name: String,
    pub plural_form: String,
    pub definition: UnitInstanceKind,
    pub location: SourceRef,
}

/// Resolved instance definition. `original` names another surviving instance
/// of the same unit; the reference has been checked for existence and for
/// cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UnitInstanceKind {
    Fixed,
    Alias {
        original: String,
    },
    Scaled {
        original: String,
        factor: f64,
    },
    Prefixed {
        original: String,
        prefix: Prefix,
    },
    Biased {
        original: String,
        bias: Bias,
    },
    Derived {
        /// Signature this instance derives through. `None` when the unit has
        /// a single, unnamed signature.
        derivation_id: Option<String>,
        /// Source instance names, one per signature element.
        units: Vec<String>,
    },
}

impl UnitInstanceKind {
    pub fn original(&self) -> Option<&str> {
        match self {
            Self::Alias { original }
            | Self::Scaled { original, .. }
            | Self::Prefixed { original, .. }
            | Self::Biased { original, .. } => Some(original),
            Self::Fixed | Self::Derived { .. } => None,
        }
    }
}

/// A bias term: a plain offset or an expression over the original instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bias {
    Value(f64),
    Expression(String),
}

/// A validated derivation signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivationSignature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivation_id: Option<String>,

    pub expression: String,

    pub signature: Vec<TypeIdentity>,

    pub permutations: bool,

    pub location: SourceRef,
}

impl DerivationSignature {
    /// Key used for duplicate detection: permutable signatures compare
    /// order-insensitively.
    pub fn signature_key(&self) -> Vec<TypeIdentity> {
        signature_key(&self.signature, self.permutations)
    }
}

pub(crate) fn signature_key(signature: &[TypeIdentity], permutations: bool) -> Vec<TypeIdentity> {
    let mut key = signature.to_vec();
    if permutations {
        key.sort();
    }
    key
}
