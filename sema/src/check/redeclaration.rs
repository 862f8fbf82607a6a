//! Redeclaration detection within one context

use super::{DeclChecker, DeclDiagnostic, DiagKind, NoteKind};
use crate::decls::*;

impl DeclChecker<'_> {
    /// Report `id` when an earlier declaration in the same context has the
    /// same name and signature. The later declaration is poisoned.
    pub fn check_redeclaration(&mut self, id: DeclId) -> bool {
        let decl = self.decl(id);
        if decl.is_invalid() || decl.implicit || decl.is_extension() || decl.is_accessor() {
            return false;
        }
        let siblings = self.context_siblings(id);
        let Some(position) = siblings.iter().position(|d| *d == id) else {
            return false;
        };
        let earlier: Vec<DeclId> = siblings[..position].to_vec();
        for other in earlier {
            if self.decl(other).is_invalid() || !self.conflicts(id, other) {
                continue;
            }
            let name = self.module.full_name(id);
            let diag = DeclDiagnostic::new(DiagKind::InvalidRedeclaration { name: name.clone() }, self.span(id))
                .note(NoteKind::PreviouslyDeclaredHere { name }, self.span(other));
            self.emit(diag);
            self.poison(id);
            return true;
        }
        false
    }

    /// Declarations sharing `id`'s context, in declaration order. Members of
    /// a nominal type and of its extensions share one scope.
    fn context_siblings(&self, id: DeclId) -> Vec<DeclId> {
        match self.decl(id).context {
            DeclContext::Module => self.module.top_level.clone(),
            DeclContext::Decl(owner) | DeclContext::Local(owner) => match self.module.as_nominal(owner) {
                Some(nominal) => self.module.all_members(nominal),
                None => self.decl(owner).members().to_vec(),
            },
        }
    }

    fn conflicts(&mut self, a: DeclId, b: DeclId) -> bool {
        let (da, db) = (self.decl(a), self.decl(b));
        if da.is_extension() || db.is_extension() || db.implicit || db.is_accessor() {
            return false;
        }
        let type_like = |d: &Decl| d.is_nominal() || matches!(d.kind, DeclKind::AssociatedType(_));
        if type_like(da) || type_like(db) {
            return type_like(da) && type_like(db) && da.name.base == db.name.base;
        }
        let both_vars = matches!(da.kind, DeclKind::Var(_)) && matches!(db.kind, DeclKind::Var(_));
        if both_vars {
            return da.name.base == db.name.base && da.is_static() == db.is_static();
        }
        if da.name != db.name || da.is_static() != db.is_static() {
            return false;
        }
        if std::mem::discriminant(&da.kind) != std::mem::discriminant(&db.kind) {
            // a case and a same-named property or method clash as values
            return matches!(da.kind, DeclKind::EnumElement(_)) || matches!(db.kind, DeclKind::EnumElement(_));
        }
        let (Some(ta), Some(tb)) = (da.interface_type, db.interface_type) else {
            return false;
        };
        if self.module.types.is_error(ta) || self.module.types.is_error(tb) {
            return false;
        }
        if self.module.own_generic_params(a).len() != self.module.own_generic_params(b).len() {
            return false;
        }
        let depth = self.own_generic_depth(a);
        let ta = self.canonical_member_type(a, ta, depth);
        let tb = self.canonical_member_type(b, tb, depth);
        let types = &mut self.module.types;
        types.unlabeled(ta) == types.unlabeled(tb)
    }
}
