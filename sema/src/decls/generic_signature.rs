//! Solved generic signatures
//!
//! A signature lists every generic parameter visible in a declaration (outer
//! parameters first), the requirements that survived checking, and the
//! equivalence classes formed by same-type requirements. Each class has one
//! representative parameter; the class is either bound to a concrete type or
//! stands for an archetype of that representative.

use super::collections::DeclMap;
use super::{DeclId, TypeId, TypeKind, TypeTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Conformance { subject: TypeId, protocol: DeclId },
    Superclass { subject: TypeId, class: TypeId },
    SameType { first: TypeId, second: TypeId },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericSignature {
    pub params: Vec<DeclId>,
    pub requirements: Vec<Requirement>,
    /// Parameter -> representative of its equivalence class
    pub representatives: DeclMap<DeclId>,
    /// Representative -> concrete type it is fixed to
    pub concrete: DeclMap<TypeId>,
}

impl GenericSignature {
    pub fn representative(&self, param: DeclId) -> DeclId {
        let mut current = param;
        // path-compressed by the builder, so this is at most one hop
        while let Some(next) = self.representatives.get(&current) {
            if *next == current {
                break;
            }
            current = *next;
        }
        current
    }

    pub fn concrete_type(&self, param: DeclId) -> Option<TypeId> {
        self.concrete.get(&self.representative(param)).copied()
    }

    /// Whether two parameters were made equal by same-type requirements
    pub fn same_class(&self, a: DeclId, b: DeclId) -> bool {
        self.representative(a) == self.representative(b)
    }

    /// Protocols a parameter's equivalence class must conform to
    pub fn conformances<'a>(&'a self, types: &'a TypeTable, param: DeclId) -> impl Iterator<Item = DeclId> + 'a {
        let rep = self.representative(param);
        self.requirements.iter().filter_map(move |r| match r {
            Requirement::Conformance { subject, protocol } if self.subject_rep(types, *subject) == Some(rep) => {
                Some(*protocol)
            }
            _ => None,
        })
    }

    pub fn superclass_bound(&self, types: &TypeTable, param: DeclId) -> Option<TypeId> {
        let rep = self.representative(param);
        self.requirements.iter().find_map(|r| match r {
            Requirement::Superclass { subject, class } if self.subject_rep(types, *subject) == Some(rep) => {
                Some(*class)
            }
            _ => None,
        })
    }

    fn subject_rep(&self, types: &TypeTable, subject: TypeId) -> Option<DeclId> {
        match types.kind(subject) {
            TypeKind::GenericParam { decl } | TypeKind::Archetype { param: decl } => Some(self.representative(*decl)),
            _ => None,
        }
    }

    /// Substitution mapping every parameter to its contextual type: the
    /// concrete type of its class, or the archetype of the representative
    pub fn context_map(&self, types: &mut TypeTable) -> DeclMap<TypeId> {
        let mut map = DeclMap::default();
        for &param in &self.params {
            let contextual = match self.concrete_type(param) {
                Some(concrete) => concrete,
                None => types.archetype(self.representative(param)),
            };
            map.insert(param, contextual);
        }
        map
    }
}
