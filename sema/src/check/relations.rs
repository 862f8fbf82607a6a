//! Type relations used by override matching: class upcasts, optional
//! injection and function variance

use super::DeclChecker;
use crate::decls::collections::{DeclMap, DeclSet};
use crate::decls::*;

impl DeclChecker<'_> {
    /// Substitution from a class's own generic parameters to the arguments of
    /// `class_ty`
    pub(crate) fn generic_args_map(&self, class_ty: TypeId) -> DeclMap<TypeId> {
        let types = &self.module.types;
        let Some(decl) = types.nominal_decl(class_ty) else {
            return DeclMap::default();
        };
        self.module
            .own_generic_params(decl)
            .into_iter()
            .zip(types.nominal_args(class_ty).iter().copied())
            .collect()
    }

    /// The superclass of a class type, with the class's generic arguments
    /// substituted in
    pub(crate) fn superclass_type_of(&mut self, class_ty: TypeId) -> Option<TypeId> {
        let decl = self.module.types.nominal_decl(class_ty)?;
        let superclass = self.module.superclass_of(decl)?;
        let map = self.generic_args_map(class_ty);
        Some(self.module.types.substitute(superclass, &map))
    }

    /// Type of a superclass member as seen from a subclass whose superclass
    /// type is `superclass_ty`
    pub(crate) fn member_type_in(&mut self, member_ty: TypeId, superclass_ty: TypeId) -> TypeId {
        let map = self.generic_args_map(superclass_ty);
        if map.is_empty() {
            return member_ty;
        }
        self.module.types.substitute(member_ty, &map)
    }

    /// Whether a value of type `sub` can be used where `sup` is expected
    /// without an explicit conversion. Error types relate to everything.
    pub fn is_subtype(&mut self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup {
            return true;
        }
        if let Some(&cached) = self.subtype_cache.get(&(sub, sup)) {
            self.stats.cache_hits += 1;
            return cached;
        }
        let result = self.compute_subtype(sub, sup);
        self.subtype_cache.insert((sub, sup), result);
        result
    }

    fn compute_subtype(&mut self, sub: TypeId, sup: TypeId) -> bool {
        let types = &self.module.types;
        if types.is_error(sub) || types.is_error(sup) {
            return true;
        }
        let sub_kind = types.kind(sub).clone();
        let sup_kind = types.kind(sup).clone();
        match (&sub_kind, &sup_kind) {
            (
                TypeKind::Optional(a) | TypeKind::ImplicitlyUnwrappedOptional(a),
                TypeKind::Optional(b) | TypeKind::ImplicitlyUnwrappedOptional(b),
            ) => self.is_subtype(*a, *b),
            (_, TypeKind::Optional(b) | TypeKind::ImplicitlyUnwrappedOptional(b)) => self.is_subtype(sub, *b),
            (TypeKind::Function(f), TypeKind::Function(g)) => {
                if f.params.len() != g.params.len() || (f.throws && !g.throws) {
                    return false;
                }
                let params_ok = f
                    .params
                    .iter()
                    .zip(&g.params)
                    .all(|(p, q)| self.is_subtype(q.ty, p.ty));
                params_ok && self.is_subtype(f.result, g.result)
            }
            (TypeKind::Tuple(a), TypeKind::Tuple(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|(x, y)| x.label == y.label && self.is_subtype(x.ty, y.ty))
            }
            (TypeKind::Nominal { decl, .. }, TypeKind::Nominal { .. }) if self.decl(*decl).is_class() => {
                self.is_superclass_of(sup, sub)
            }
            (TypeKind::Archetype { param } | TypeKind::GenericParam { decl: param }, _) => {
                let bound = self.decl(*param).bounds().and_then(|b| b.superclass);
                match bound {
                    Some(bound) => self.is_subtype(bound, sup),
                    None => false,
                }
            }
            (TypeKind::ReferenceStorage { referent, .. }, _) => self.is_subtype(*referent, sup),
            _ => false,
        }
    }

    /// Walk the superclass chain of `class_ty` looking for `ancestor`
    fn is_superclass_of(&mut self, ancestor: TypeId, class_ty: TypeId) -> bool {
        let mut visited = DeclSet::default();
        let mut current = Some(class_ty);
        while let Some(ty) = current {
            if ty == ancestor {
                return true;
            }
            let Some(decl) = self.module.types.nominal_decl(ty) else {
                return false;
            };
            if !visited.insert(decl) {
                return false;
            }
            current = self.superclass_type_of(ty);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::DeclChecker;

    #[test]
    fn test_class_and_optional_subtyping() {
        let mut b = ModuleBuilder::new("M");
        let base = b.class("Base", &[]);
        let derived = b.class("Derived", &["Base"]);
        let mut module = b.finish().unwrap();
        let mut checker = DeclChecker::new(&mut module);
        checker.check_inheritance_clause(derived);

        let base_ty = checker.module.types.nominal(base, vec![]);
        let derived_ty = checker.module.types.nominal(derived, vec![]);
        let opt_base = checker.module.types.optional(base_ty);

        assert!(checker.is_subtype(derived_ty, base_ty));
        assert!(!checker.is_subtype(base_ty, derived_ty));
        assert!(checker.is_subtype(derived_ty, opt_base));
        assert!(checker.is_subtype(derived_ty, base_ty));
        assert!(checker.stats().cache_hits >= 1);
    }

    #[test]
    fn test_function_variance() {
        let mut b = ModuleBuilder::new("M");
        let base = b.class("Base", &[]);
        let derived = b.class("Derived", &["Base"]);
        let mut module = b.finish().unwrap();
        let mut checker = DeclChecker::new(&mut module);
        checker.check_inheritance_clause(derived);

        let base_ty = checker.module.types.nominal(base, vec![]);
        let derived_ty = checker.module.types.nominal(derived, vec![]);
        let types = &mut checker.module.types;
        let takes_base = types.function(FunctionType {
            params: vec![Param::unlabeled(base_ty)],
            result: derived_ty,
            throws: false,
            noreturn: false,
        });
        let takes_derived = types.function(FunctionType {
            params: vec![Param::unlabeled(derived_ty)],
            result: base_ty,
            throws: false,
            noreturn: false,
        });
        assert!(checker.is_subtype(takes_base, takes_derived));
        assert!(!checker.is_subtype(takes_derived, takes_base));
    }
}
