//! Vector quantity resolution
//!
//! Turns raw vector, vector-group and group-member declarations into their
//! resolved forms. The shared collections (derivations, constants,
//! conversions, unit lists) are handled by `mensura-quantities`; this crate
//! adds dimension handling and the group/member split.

pub mod dimension;
pub mod resolver;

pub use dimension::{resolve_dimension, trailing_dimension, MAX_DIMENSION, MIN_DIMENSION};
pub use resolver::{
    resolve_group, resolve_group_member, resolve_vector, ResolvedGroupMember, ResolvedVector,
    ResolvedVectorGroup,
};
