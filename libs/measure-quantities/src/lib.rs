//! Quantity resolution
//!
//! Resolves scalar quantities and the collections shared by every quantity
//! kind: derivation signatures, constants, conversion targets and the
//! effective unit set. Specializations inherit their owning unit through the
//! chain of originals and, per flag, the original's collections; the chain
//! itself is grounded by the population builder, which resolves bases before
//! the specializations that name them.
//!
//! Vector quantities reuse [`core`] through their own crate; the scalar
//! resolver lives here.

pub mod constants;
pub mod conversions;
pub mod core;
pub mod inheritance;
pub mod scalar;
pub mod unit_lists;

pub use crate::constants::{resolve_constants, QuantityConstant};
pub use crate::conversions::resolve_conversions;
pub use crate::core::{resolve_core, QuantityCore, RawCollections};
pub use crate::inheritance::{diagnose_chain, inherit_collection, ChainFailure};
pub use crate::scalar::{resolve_scalar, ResolvedScalar};
pub use crate::unit_lists::apply_unit_lists;
