//! Raw derivation-signature declarations
//!
//! Shared between units (derivable units) and quantities (derived
//! quantities): an ordered list of type identities plus an expression
//! template with one `{index}` placeholder per element.

use crate::identity::{SourceRef, TypeIdentity};
use serde::{Deserialize, Serialize};

/// One derivation-signature declaration, unvalidated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivationDeclaration {
    /// Identifier distinguishing this signature when a type declares more
    /// than one. Optional for a sole signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivation_id: Option<String>,

    /// Expression template, e.g. `"{0} / {1}"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,

    /// Ordered signature elements. `None` when the argument was absent
    /// entirely, `Some(vec![])` when it was explicitly empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Vec<TypeIdentity>>,

    /// Whether all permutations of the signature are derivable.
    #[serde(default)]
    pub permutations: bool,

    pub location: SourceRef,
}

impl DerivationDeclaration {
    pub fn new(
        expression: impl Into<String>,
        signature: Vec<TypeIdentity>,
        location: SourceRef,
    ) -> Self {
        Self {
            derivation_id: None,
            expression: Some(expression.into()),
            signature: Some(signature),
            permutations: false,
            location,
        }
    }

    pub fn with_id(mut self, derivation_id: impl Into<String>) -> Self {
        self.derivation_id = Some(derivation_id.into());
        self
    }

    pub fn with_permutations(mut self) -> Self {
        self.permutations = true;
        self
    }
}
