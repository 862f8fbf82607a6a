//! Implicit initializers
//!
//! Structs get a memberwise and (when every stored property can start out
//! empty) a default initializer. Classes inherit their superclass's
//! designated initializers through chaining overrides when they add none of
//! their own; otherwise missing `required` initializers are reported and
//! stubbed. A root class without initializers gets `init()` when its stored
//! properties allow it.

use super::{DeclChecker, DeclDiagnostic, DiagKind, NoteKind};
use crate::decls::*;
use diagnostics::FixIt;
use log::debug;

impl DeclChecker<'_> {
    /// Synthesize the implicit initializers of a struct or class. Runs at
    /// most once per declaration.
    pub fn add_implicit_constructors(&mut self, id: DeclId) {
        let decl = self.decl(id);
        if !(decl.is_struct() || decl.is_class()) {
            return;
        }
        match self.decl_mut(id).nominal_mut() {
            Some(data) if !data.implicit_ctors_added => data.implicit_ctors_added = true,
            _ => return,
        }
        if self.decl(id).is_invalid() {
            return;
        }

        let members = self.decl(id).members().to_vec();
        for &member in &members {
            if matches!(self.decl(member).kind, DeclKind::Var(_) | DeclKind::Constructor(_)) {
                self.validate_decl(member);
            }
        }
        let has_designated = members
            .iter()
            .any(|&m| self.decl(m).is_designated_init() && !self.decl(m).implicit);

        if self.decl(id).is_struct() {
            if !has_designated {
                self.add_struct_initializers(id, &members);
            }
            return;
        }

        match self.module.superclass_decl(id) {
            Some(superclass) => self.inherit_initializers(id, superclass, has_designated),
            None if !has_designated => {
                let blockers = self.uninitialized_properties(&members);
                if blockers.is_empty() {
                    self.synthesize_ctor(id, Vec::new(), ImplicitCtorKind::Default, None);
                } else {
                    self.report_class_without_init(id, &blockers);
                }
            }
            None => {}
        }
    }

    /// Instance properties with their own storage
    fn stored_properties(&self, members: &[DeclId]) -> Vec<DeclId> {
        members
            .iter()
            .copied()
            .filter(|&m| {
                let d = self.decl(m);
                d.has_storage() && !d.is_static()
            })
            .collect()
    }

    /// Stored properties without an initial value that cannot start out
    /// empty
    fn uninitialized_properties(&self, members: &[DeclId]) -> Vec<DeclId> {
        self.stored_properties(members)
            .into_iter()
            .filter(|&m| {
                let d = self.decl(m);
                let has_initializer = matches!(&d.kind, DeclKind::Var(v) if v.has_initializer);
                let empty_ok = !d.is_let() && d.interface_type.is_some_and(|t| self.default_initializable(t));
                !(has_initializer || empty_ok || d.is_invalid())
            })
            .collect()
    }

    /// Optionals, and tuples or ownership wrappers of them
    fn default_initializable(&self, ty: TypeId) -> bool {
        match self.module.types.kind(ty) {
            TypeKind::Optional(_) | TypeKind::ImplicitlyUnwrappedOptional(_) | TypeKind::Error => true,
            TypeKind::ReferenceStorage { referent, .. } => self.default_initializable(*referent),
            TypeKind::Tuple(elements) => elements.iter().all(|e| self.default_initializable(e.ty)),
            _ => false,
        }
    }

    fn add_struct_initializers(&mut self, id: DeclId, members: &[DeclId]) {
        let memberwise: Vec<DeclId> = self
            .stored_properties(members)
            .into_iter()
            .filter(|&m| {
                let d = self.decl(m);
                let initialized_let = d.is_let() && matches!(&d.kind, DeclKind::Var(v) if v.has_initializer);
                !initialized_let && !d.is_invalid()
            })
            .collect();

        if !memberwise.is_empty() {
            let mut params = Vec::with_capacity(memberwise.len());
            for property in memberwise {
                let name = self.decl(property).name.base;
                let Some(ty) = self.decl(property).interface_type else {
                    continue;
                };
                let ty = self.module.types.reference_storage_referent(ty);
                params.push(self.implicit_param(Some(name), name, ty));
            }
            self.synthesize_ctor(id, params, ImplicitCtorKind::Memberwise, None);
        }
        if self.uninitialized_properties(members).is_empty() {
            self.synthesize_ctor(id, Vec::new(), ImplicitCtorKind::Default, None);
        }
    }

    fn implicit_param(&self, label: Option<Identifier>, name: Identifier, ty: TypeId) -> ParamDecl {
        let mut loc = TypeLoc::new(TypeRepr::named(self.type_name(ty)), source_map::SourceSpan::unknown());
        loc.set_type(ty);
        ParamDecl { label, name, ty: loc }
    }

    fn inherit_initializers(&mut self, class: DeclId, superclass: DeclId, has_designated: bool) {
        let Some(superclass_ty) = self.module.superclass_of(class) else {
            return;
        };
        // the superclass's own inherited initializers are inherited in turn
        self.add_implicit_constructors(superclass);
        let base_ctors: Vec<DeclId> = self
            .module
            .all_members(superclass)
            .into_iter()
            .filter(|&m| {
                let d = self.decl(m);
                matches!(d.kind, DeclKind::Constructor(_))
                    && (d.is_designated_init() || d.attrs.is_required)
                    && !d.attrs.is_unavailable()
            })
            .collect();
        for &ctor in &base_ctors {
            self.validate_decl(ctor);
        }
        let own_ctors: Vec<DeclId> = self
            .module
            .all_members(class)
            .into_iter()
            .filter(|&m| matches!(self.decl(m).kind, DeclKind::Constructor(_)))
            .collect();

        let members = self.decl(class).members().to_vec();
        let blockers = self.uninitialized_properties(&members);
        if !has_designated && !blockers.is_empty() {
            // nothing is inherited, so the class would have no initializers
            if !base_ctors.is_empty() {
                self.report_class_without_init(class, &blockers);
            }
            return;
        }

        for base in base_ctors {
            if self.decl(base).is_invalid() {
                continue;
            }
            let params = self.inherited_params(base, superclass_ty);
            if self.ctor_covered(&own_ctors, base, &params) {
                continue;
            }
            if !has_designated {
                self.synthesize_ctor(class, params, ImplicitCtorKind::Chaining, Some(base));
            } else if self.decl(base).attrs.is_required {
                self.report_missing_required(class, superclass, base);
                self.synthesize_ctor(class, params, ImplicitCtorKind::Stub, Some(base));
            }
        }
    }

    /// Parameters of a superclass initializer as seen from the subclass
    fn inherited_params(&mut self, base: DeclId, superclass_ty: TypeId) -> Vec<ParamDecl> {
        let params = self.decl(base).params().to_vec();
        params
            .into_iter()
            .map(|p| {
                let ty = p.ty.ty.unwrap_or_else(|| self.error_type());
                let ty = self.member_type_in(ty, superclass_ty);
                self.implicit_param(p.label, p.name, ty)
            })
            .collect()
    }

    /// An own initializer already overrides `base` or takes the same
    /// parameter types
    fn ctor_covered(&self, own: &[DeclId], base: DeclId, params: &[ParamDecl]) -> bool {
        let wanted: Vec<Option<TypeId>> = params.iter().map(|p| p.ty.ty).collect();
        own.iter().any(|&ctor| {
            let d = self.decl(ctor);
            d.overridden() == Some(base) || d.params().iter().map(|p| p.ty.ty).collect::<Vec<_>>() == wanted
        })
    }

    /// Add an implicit designated initializer to `owner`
    fn synthesize_ctor(
        &mut self,
        owner: DeclId,
        params: Vec<ParamDecl>,
        kind: ImplicitCtorKind,
        overridden: Option<DeclId>,
    ) -> DeclId {
        let init = self.module.ident("init");
        let labels = params.iter().map(|p| p.label).collect();
        let span = self.span(owner);
        // inherited initializers keep the effects and `required` of the base
        let (throws, failable, required) = match overridden.map(|b| self.decl(b)) {
            Some(Decl {
                kind: DeclKind::Constructor(c),
                attrs,
                ..
            }) => (c.throws, c.failable, attrs.is_required),
            _ => (false, false, false),
        };
        let mut decl = Decl::new(
            DeclName::compound(init, labels),
            DeclKind::Constructor(ConstructorData {
                params,
                generic_params: None,
                signature: None,
                throws,
                failable,
                kind: CtorKind::Designated,
                implicit: Some(kind),
                overridden: overridden.map(|base| OverrideEdge { base, exact: true }),
            }),
            DeclContext::Decl(owner),
            span,
        );
        decl.implicit = true;
        decl.attrs.is_required = required;
        decl.attrs.is_override = overridden.is_some();
        let id = self.module.decls.alloc(decl);
        if let Some(members) = self.decl_mut(owner).members_mut() {
            members.push(id);
        }
        self.validate_decl(id);
        self.stats.implicit_ctors_added += 1;
        debug!("added {:?} initializer '{}'", kind, self.module.full_name(id));
        id
    }

    fn report_class_without_init(&mut self, class: DeclId, blockers: &[DeclId]) {
        let properties: Vec<String> = blockers.iter().map(|&p| self.name(p)).collect();
        let mut diag = DeclDiagnostic::new(
            DiagKind::ClassWithoutInit {
                class: self.name(class),
                properties,
            },
            self.span(class),
        );
        for &property in blockers {
            let span = self.span(property);
            diag = diag.note(NoteKind::StoredPropertyWithoutInit { name: self.name(property) }, span);
            if let Some(value) = self.decl(property).interface_type.and_then(|t| self.default_value_text(t)) {
                diag = diag.fix_it(FixIt::insert(span, format!(" = {value}")));
            }
        }
        self.emit(diag);
    }

    /// Source text of an empty value of `ty`, for fix-its
    fn default_value_text(&self, ty: TypeId) -> Option<&'static str> {
        let types = &self.module.types;
        match types.kind(types.reference_storage_referent(ty)) {
            TypeKind::Optional(_) | TypeKind::ImplicitlyUnwrappedOptional(_) => Some("nil"),
            TypeKind::Array(_) => Some("[]"),
            TypeKind::Dictionary(..) => Some("[:]"),
            TypeKind::Builtin(BuiltinType::String) => Some("\"\""),
            TypeKind::Builtin(BuiltinType::Float | BuiltinType::Double) => Some("0.0"),
            TypeKind::Builtin(b) if b.integer_layout().is_some() => Some("0"),
            _ => None,
        }
    }

    fn report_missing_required(&mut self, class: DeclId, superclass: DeclId, base: DeclId) {
        let name = self.module.full_name(base);
        let params: Vec<String> = self
            .decl(base)
            .params()
            .iter()
            .map(|p| {
                let label = p.label.map_or("_", |l| self.module.interner.resolve(l));
                let ty = p.ty.ty.map(|t| self.type_name(t)).unwrap_or_default();
                format!("{label}: {ty}")
            })
            .collect();
        let body = format!(
            "\n    required init({}) {{\n        fatalError(\"{name} has not been implemented\")\n    }}\n",
            params.join(", ")
        );
        let span = self.span(class);
        let diag = DeclDiagnostic::new(
            DiagKind::RequiredInitializerMissing {
                class: self.name(class),
                name,
                base_class: self.name(superclass),
            },
            span,
        )
        .note(NoteKind::RequiredInitHere, self.span(base))
        .fix_it(FixIt::insert(span, body));
        self.emit(diag);
    }
}
