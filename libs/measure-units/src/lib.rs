//! Unit resolution
//!
//! Turns one raw [`UnitDeclaration`](mensura_models::UnitDeclaration) into a
//! resolved [`UnitType`]: every instance's "original" reference bound to a
//! declared instance, the instance dependency graph checked for cycles, and
//! the unit's derivation signatures validated and indexed.
//!
//! Failures are local: an invalid instance or signature is dropped from the
//! resolved unit while its siblings survive. The whole unit resolves to
//! nothing only when its primary declaration is unusable (the associated
//! quantity is not a scalar).

pub mod cycles;
pub mod derivations;
pub mod model;
pub mod resolver;

pub use derivations::resolve_derivations;
pub use model::{Bias, DerivationSignature, UnitInstance, UnitInstanceKind, UnitType};
pub use resolver::resolve_unit;
