//! Arena storage for declarations
//!
//! Declarations refer to each other only through [`DeclId`]s, so cyclic
//! relations (superclass, override, accessor-of) never create ownership
//! cycles. Declarations are never removed.

use super::{Decl, DeclId};
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Default)]
pub struct DeclArena {
    decls: Vec<Decl>,
}

impl DeclArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, decl: Decl) -> DeclId {
        let id = DeclId::from_raw(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    pub fn get(&self, id: DeclId) -> Option<&Decl> {
        self.decls.get(id.index())
    }

    pub fn get_mut(&mut self, id: DeclId) -> Option<&mut Decl> {
        self.decls.get_mut(id.index())
    }

    pub fn contains(&self, id: DeclId) -> bool {
        id.index() < self.decls.len()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = DeclId> + '_ {
        (0..self.decls.len() as u32).map(DeclId::from_raw)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Decl)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(i, d)| (DeclId::from_raw(i as u32), d))
    }
}

impl Index<DeclId> for DeclArena {
    type Output = Decl;

    fn index(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }
}

impl IndexMut<DeclId> for DeclArena {
    fn index_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.index()]
    }
}
