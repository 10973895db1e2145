//! Declaration index
//!
//! Before anything is resolved, every top-level declaration is indexed by
//! identity. The first declaration of an identity wins; later ones, of any
//! kind, are duplicates and are diagnosed by the builder where they appear.

use mensura_models::{DeclarationSet, TypeIdentity};
use std::collections::HashMap;

/// The kind a type identity was first declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Unit,
    Scalar,
    Vector,
    VectorGroup,
    GroupMember,
}

impl DeclarationKind {
    /// Whether types of this kind represent quantities.
    pub fn is_quantity(self) -> bool {
        !matches!(self, Self::Unit)
    }
}

/// Kind-of-first-declaration per identity.
#[derive(Debug, Default)]
pub struct DeclarationIndex {
    kinds: HashMap<TypeIdentity, DeclarationKind>,
}

impl DeclarationIndex {
    pub fn new(declarations: &DeclarationSet) -> Self {
        let mut index = Self::default();

        for unit in &declarations.units {
            index.insert(&unit.identity, DeclarationKind::Unit);
        }
        for scalar in &declarations.scalars {
            index.insert(&scalar.identity, DeclarationKind::Scalar);
        }
        for vector in &declarations.vectors {
            index.insert(&vector.identity, DeclarationKind::Vector);
        }
        for group in &declarations.groups {
            index.insert(&group.identity, DeclarationKind::VectorGroup);
        }
        for member in &declarations.group_members {
            index.insert(&member.identity, DeclarationKind::GroupMember);
        }

        index
    }

    fn insert(&mut self, identity: &TypeIdentity, kind: DeclarationKind) {
        if !self.kinds.contains_key(identity) {
            self.kinds.insert(identity.clone(), kind);
        }
    }

    /// The kind `identity` was first declared as, if at all.
    pub fn kind(&self, identity: &TypeIdentity) -> Option<DeclarationKind> {
        self.kinds.get(identity).copied()
    }

    pub fn is(&self, identity: &TypeIdentity, kind: DeclarationKind) -> bool {
        self.kind(identity) == Some(kind)
    }

    pub fn is_quantity(&self, identity: &TypeIdentity) -> bool {
        self.kind(identity).is_some_and(DeclarationKind::is_quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mensura_models::{QuantityBasis, ScalarDeclaration, SourceRef, UnitDeclaration};

    fn id(name: &str) -> TypeIdentity {
        TypeIdentity::new(name)
    }

    fn unit(name: &str) -> UnitDeclaration {
        UnitDeclaration {
            identity: id(name),
            quantity: id("Length"),
            bias_term: false,
            instances: Vec::new(),
            derivations: Vec::new(),
            location: SourceRef::attribute("Unit"),
        }
    }

    fn scalar(name: &str) -> ScalarDeclaration {
        ScalarDeclaration {
            identity: id(name),
            basis: QuantityBasis::Base {
                unit: id("UnitOfLength"),
            },
            use_unit_bias: false,
            derivations: Vec::new(),
            constants: Vec::new(),
            conversions: Vec::new(),
            unit_lists: Vec::new(),
            base_lists: Vec::new(),
            location: SourceRef::attribute("ScalarQuantity"),
        }
    }

    #[test]
    fn first_declaration_wins() {
        let declarations = DeclarationSet {
            units: vec![unit("Length")],
            scalars: vec![scalar("Length")],
            ..DeclarationSet::default()
        };

        let index = DeclarationIndex::new(&declarations);

        assert_eq!(index.kind(&id("Length")), Some(DeclarationKind::Unit));
    }

    #[test]
    fn later_declarations_do_not_change_the_kind() {
        let declarations = DeclarationSet {
            scalars: vec![scalar("Length"), scalar("Length")],
            ..DeclarationSet::default()
        };

        let index = DeclarationIndex::new(&declarations);

        assert_eq!(index.kind(&id("Length")), Some(DeclarationKind::Scalar));
    }

    #[test]
    fn classifies_quantities() {
        let declarations = DeclarationSet {
            units: vec![unit("UnitOfLength")],
            scalars: vec![scalar("Length")],
            ..DeclarationSet::default()
        };

        let index = DeclarationIndex::new(&declarations);

        assert!(index.is_quantity(&id("Length")));
        assert!(!index.is_quantity(&id("UnitOfLength")));
        assert!(!index.is_quantity(&id("Unknown")));
    }
}
