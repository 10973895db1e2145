//! Raw declaration records for the Mensura quantity type system
//!
//! This crate holds the unresolved output of the declaration-extraction
//! layer: loosely-validated records describing units, scalar quantities,
//! vector quantities, vector groups and their specializations. Nothing here
//! is cross-referenced or checked beyond what serde enforces — resolution and
//! validation happen downstream.
//!
//! # Design Philosophy
//!
//! - **Immutable input**: one [`DeclarationSet`] is produced per compilation
//!   pass and never mutated afterwards
//! - **Optional everywhere**: fields a declaration may omit stay `Option` so
//!   the resolver can diagnose absence precisely (absent is distinct from
//!   empty)
//! - **Serializable**: every record round-trips through JSON, which is also
//!   the CLI input format

pub mod derivations;
pub mod error;
pub mod identity;
pub mod quantities;
pub mod units;
pub mod vectors;

pub use derivations::*;
pub use error::{Error, Result};
pub use identity::*;
pub use quantities::*;
pub use units::*;
pub use vectors::*;

use serde::{Deserialize, Serialize};

/// Everything declared in one compilation pass, as handed over by the
/// extraction layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<UnitDeclaration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scalars: Vec<ScalarDeclaration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vectors: Vec<VectorDeclaration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<VectorGroupDeclaration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_members: Vec<GroupMemberDeclaration>,
}

impl DeclarationSet {
    /// Parse a declaration set from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Total number of top-level declarations.
    pub fn len(&self) -> usize {
        self.units.len()
            + self.scalars.len()
            + self.vectors.len()
            + self.groups.len()
            + self.group_members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
