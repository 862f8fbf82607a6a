//! Override resolution
//!
//! Finds the superclass member a class member overrides, validates the pair
//! and records the edge. Mismatches are reported but never prevent the edge
//! from being recorded, so one bad override does not turn into spurious
//! "does not override" errors further down the hierarchy.
//!
//! When several candidates survive, exact matches win over covariant ones. A
//! selector match between two exposed declarations counts as exact; if more
//! than one exact match remains the override is ambiguous.

use super::{DeclChecker, DeclDiagnostic, DiagKind, NoteKind};
use crate::decls::*;
use diagnostics::FixIt;
use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchKind {
    Exact,
    Compatible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberKind {
    Property,
    Method,
    Subscript,
    Initializer,
}

fn member_kind(decl: &Decl) -> Option<MemberKind> {
    match &decl.kind {
        DeclKind::Var(_) => Some(MemberKind::Property),
        DeclKind::Func(f) if f.accessor.is_none() => Some(MemberKind::Method),
        DeclKind::Subscript(_) => Some(MemberKind::Subscript),
        DeclKind::Constructor(_) => Some(MemberKind::Initializer),
        _ => None,
    }
}

impl DeclChecker<'_> {
    /// Resolve and record the override edge of a class member. Returns
    /// `true` when an error was reported.
    pub fn check_overrides(&mut self, id: DeclId) -> bool {
        self.validate_decl(id);
        let decl = self.decl(id);
        if decl.is_invalid() || decl.overridden().is_some() || decl.implicit {
            return false;
        }
        let Some(kind) = member_kind(decl) else {
            return false;
        };
        let marked = decl.attrs.is_override;

        let class = self.enclosing_class(id);
        if let Some(class) = class {
            self.check_circularity(class);
        }
        let superclass = class.and_then(|class| self.module.superclass_of(class).map(|ty| (class, ty)));
        let Some((class, superclass_ty)) = superclass else {
            if marked {
                self.report_no_override(id, kind, &[]);
                return true;
            }
            return false;
        };

        let name = self.decl(id).name.clone();
        let mut retried = false;
        let mut candidates = self.override_candidates(id, kind, superclass_ty, &name);
        if candidates.is_empty() && marked && name.labels.is_some() {
            retried = true;
            let base_name = name.base_name();
            candidates = self.override_candidates(id, kind, superclass_ty, &base_name);
        }
        trace!("'{}' has {} override candidate(s)", self.module.full_name(id), candidates.len());

        let mut matches: Vec<(DeclId, MatchKind)> = Vec::new();
        for &candidate in &candidates {
            match self.match_override(id, kind, class, candidate) {
                Ok(Some(m)) => matches.push((candidate, m)),
                Ok(None) => {}
                Err(()) => return true,
            }
        }
        if matches.iter().any(|(_, m)| *m == MatchKind::Exact) {
            matches.retain(|(_, m)| *m == MatchKind::Exact);
        }

        let base = match matches.as_slice() {
            [] => {
                if marked {
                    self.report_no_override(id, kind, &candidates);
                    return true;
                }
                return false;
            }
            [(only, _)] => *only,
            _ => {
                let mut diag = DeclDiagnostic::new(
                    DiagKind::OverrideMultipleDecls {
                        kind: self.decl(id).descriptive_kind(),
                        arg_mismatch: retried,
                    },
                    self.span(id),
                );
                for (candidate, _) in &matches {
                    diag = diag.note(NoteKind::OverriddenHere, self.span(*candidate));
                }
                self.emit(diag);
                return true;
            }
        };

        let mut had_error = false;
        if retried {
            let kind_name = self.decl(id).descriptive_kind();
            let diag = DeclDiagnostic::new(
                DiagKind::ArgumentNameMismatch {
                    kind: kind_name,
                    name: self.module.full_name(id),
                    base_name: self.module.full_name(base),
                },
                self.span(id),
            )
            .note(NoteKind::OverriddenHere, self.span(base));
            self.emit(diag);
            had_error = true;
        }
        let exact = matches[0].1 == MatchKind::Exact;
        had_error |= self.check_override_pair(id, kind, class, base, exact);
        self.record_override(id, OverrideEdge { base, exact });
        had_error
    }

    /// Superclass members with the same name and shape as `id`
    fn override_candidates(&mut self, id: DeclId, kind: MemberKind, superclass_ty: TypeId, name: &DeclName) -> Vec<DeclId> {
        let is_static = self.decl(id).is_static();
        let label_count = self.decl(id).name.label_count();
        let generic_count = self.module.own_generic_params(id).len();
        let found = self.lookup_members(superclass_ty, name);
        let mut candidates = Vec::new();
        for candidate in found {
            let c = self.decl(candidate);
            let same_shape = member_kind(c) == Some(kind)
                && c.is_static() == is_static
                && c.name.label_count() == label_count
                && self.module.own_generic_params(candidate).len() == generic_count
                && !c.is_invalid()
                && c.ctor_kind() != Some(CtorKind::Convenience);
            if !same_shape || self.enclosing_class(candidate).is_none() {
                continue;
            }
            self.validate_decl(candidate);
            if self.decl(candidate).interface_type.is_some() && !self.decl(candidate).is_invalid() {
                candidates.push(candidate);
            }
        }
        // a candidate overridden by another candidate is reached through it
        let overridden: Vec<DeclId> = candidates.iter().filter_map(|&c| self.decl(c).overridden()).collect();
        candidates.retain(|c| !overridden.contains(c));
        candidates
    }

    /// Type of `member` as seen from `class`, which inherits from its owner
    fn inherited_member_type(&mut self, class: DeclId, member: DeclId) -> Option<TypeId> {
        let ty = self.decl(member).interface_type?;
        let owner = self.enclosing_class(member)?;
        let mut current = self.module.superclass_of(class);
        while let Some(superclass_ty) = current {
            if self.module.types.nominal_decl(superclass_ty) == Some(owner) {
                return Some(self.member_type_in(ty, superclass_ty));
            }
            current = self.superclass_type_of(superclass_ty);
        }
        Some(ty)
    }

    /// The part of a member's type that must line up with the base
    fn override_shape(&mut self, kind: MemberKind, ty: TypeId) -> TypeId {
        let types = &mut self.module.types;
        let ty = match kind {
            MemberKind::Property => types.reference_storage_referent(ty),
            MemberKind::Initializer => match types.as_function(ty).cloned() {
                Some(f) => {
                    let void = types.void_type();
                    types.function(FunctionType { result: void, ..f })
                }
                None => ty,
            },
            MemberKind::Method | MemberKind::Subscript => ty,
        };
        let ty = types.unlabeled(ty);
        types.without_effects(ty)
    }

    fn strip_optionality(&mut self, ty: TypeId) -> TypeId {
        self.module.types.transform(ty, &mut |table, t| table.any_optional_object(t))
    }

    /// Classify one candidate. `Err` means a selector conflict was reported
    /// and the search must stop.
    fn match_override(
        &mut self,
        id: DeclId,
        kind: MemberKind,
        class: DeclId,
        candidate: DeclId,
    ) -> Result<Option<MatchKind>, ()> {
        let (Some(own_ty), Some(base_ty)) = (
            self.decl(id).interface_type,
            self.inherited_member_type(class, candidate),
        ) else {
            return Ok(None);
        };
        // the two members declare their own generic parameters separately
        let depth = self.own_generic_depth(id);
        let own_canonical = self.canonical_member_type(id, own_ty, depth);
        let base_canonical = self.canonical_member_type(candidate, base_ty, depth);
        let own = self.override_shape(kind, own_canonical);
        let base = self.override_shape(kind, base_canonical);
        if own == base {
            return Ok(Some(MatchKind::Exact));
        }
        let compatible = self.is_subtype(own, base);

        if self.is_exposed(id) && self.is_exposed(candidate) {
            let selector = self.selector_of(id);
            if selector == self.selector_of(candidate) {
                let own_core = self.strip_optionality(own);
                let base_core = self.strip_optionality(base);
                if own_core == base_core || compatible {
                    return Ok(Some(MatchKind::Exact));
                }
                let diag = DeclDiagnostic::new(
                    DiagKind::ObjCTypeMismatch {
                        kind: self.decl(id).descriptive_kind(),
                        name: self.module.full_name(id),
                        selector,
                    },
                    self.span(id),
                )
                .note(
                    NoteKind::OverriddenHereWithType {
                        ty: self.type_name(base_ty),
                    },
                    self.span(candidate),
                );
                self.emit(diag);
                return Err(());
            }
        }

        // a property with the right name is the target even when its type is
        // wrong; the mismatch is reported once the pair is known
        if compatible || kind == MemberKind::Property {
            Ok(Some(MatchKind::Compatible))
        } else {
            Ok(None)
        }
    }

    /// Runtime selector of an exposed declaration
    pub(crate) fn selector_of(&self, id: DeclId) -> String {
        let decl = self.decl(id);
        if let Some(name) = decl.attrs.objc.as_ref().and_then(|o| o.name.clone()) {
            return name;
        }
        let base = self.name(id);
        let label = |l: Option<Identifier>| l.map(|i| self.module.interner.resolve(i).to_string()).unwrap_or_default();
        match &decl.kind {
            DeclKind::Var(_) => base,
            DeclKind::Subscript(_) => "subscript:".to_string(),
            _ => {
                let params = decl.params();
                let Some((first, rest)) = params.split_first() else {
                    return base;
                };
                let mut selector = if decl.ctor_kind().is_some() {
                    let first_label = label(first.label);
                    let mut chars = first_label.chars();
                    match chars.next() {
                        Some(c) => format!("initWith{}{}:", c.to_uppercase(), chars.as_str()),
                        None => "init:".to_string(),
                    }
                } else {
                    format!("{base}:")
                };
                for p in rest {
                    selector.push_str(&label(p.label));
                    selector.push(':');
                }
                selector
            }
        }
    }

    fn report_no_override(&mut self, id: DeclId, kind: MemberKind, near: &[DeclId]) {
        let name = self.module.full_name(id);
        let diag_kind = match kind {
            MemberKind::Property => DiagKind::PropertyDoesNotOverride { name: self.name(id) },
            MemberKind::Method => DiagKind::MethodDoesNotOverride { name },
            MemberKind::Initializer => DiagKind::InitializerDoesNotOverride { name },
            MemberKind::Subscript => DiagKind::SubscriptDoesNotOverride,
        };
        let mut diag = DeclDiagnostic::new(diag_kind, self.span(id));
        for &candidate in near {
            let note = NoteKind::OverriddenNearMatchHere {
                kind: self.decl(candidate).descriptive_kind(),
                name: self.module.full_name(candidate),
            };
            diag = diag.note(note, self.span(candidate));
        }
        self.emit(diag);
    }

    /// Validate a resolved override pair. Returns `true` when anything was
    /// reported.
    fn check_override_pair(&mut self, id: DeclId, kind: MemberKind, class: DeclId, base: DeclId, exact: bool) -> bool {
        let before = self.stats.diagnostics_emitted;
        let kind_name = self.decl(id).descriptive_kind();
        let span = self.span(id);

        self.check_override_keyword(id, kind, base);

        if self.config.enable_access_control {
            let class_access = self.compute_accessibility(class);
            let base_access = self.compute_accessibility(base);
            let own_access = self.compute_accessibility(id);
            let required = class_access.min(base_access);
            if own_access < required {
                self.diagnose(
                    DiagKind::OverrideNotAccessible {
                        setter: false,
                        kind: kind_name,
                        required,
                    },
                    span,
                );
            } else if self.decl(base).is_settable() && self.decl(id).is_settable() {
                let base_setter = self.decl(base).setter_access.unwrap_or(base_access);
                let own_setter = self.decl(id).setter_access.unwrap_or(own_access);
                let required = class_access.min(base_setter);
                if own_setter < required {
                    self.diagnose(
                        DiagKind::OverrideNotAccessible {
                            setter: true,
                            kind: kind_name,
                            required,
                        },
                        span,
                    );
                }
            }
        }

        match kind {
            MemberKind::Property => self.check_property_override(id, class, base, exact),
            MemberKind::Subscript => {
                if !exact && self.decl(base).is_settable() {
                    let ty = self.decl(id).interface_type.map(|t| self.type_name(t)).unwrap_or_default();
                    let base_ty = self.decl(base).interface_type.map(|t| self.type_name(t)).unwrap_or_default();
                    let diag = DeclDiagnostic::new(DiagKind::MutableCovariantSubscript { ty, base_ty }, span)
                        .note(NoteKind::SubscriptOverrideHere, self.span(base));
                    self.emit(diag);
                }
            }
            MemberKind::Method | MemberKind::Initializer => self.check_override_effects(id, base, kind_name),
        }

        if self.config.enable_availability_checking {
            self.check_override_availability(id, base, kind_name);
        }

        let own_in_extension = self.in_extension(id);
        let base_in_extension = self.in_extension(base);
        if (own_in_extension || base_in_extension) && !self.is_exposed(base) {
            self.diagnose(
                DiagKind::OverrideDeclExtension {
                    base_in_extension,
                    kind: kind_name,
                },
                span,
            );
        }

        if self.decl(base).attrs.is_final {
            let base_kind = self.decl(base).descriptive_kind();
            let diag = DeclDiagnostic::new(DiagKind::OverrideFinal { kind: kind_name, base_kind }, span)
                .note(NoteKind::OverriddenHere, self.span(base));
            self.emit(diag);
        }

        self.stats.diagnostics_emitted > before
    }

    fn in_extension(&self, id: DeclId) -> bool {
        self.decl(id)
            .context
            .owner()
            .is_some_and(|owner| self.decl(owner).is_extension())
    }

    fn check_override_keyword(&mut self, id: DeclId, kind: MemberKind, base: DeclId) {
        let decl = self.decl(id);
        if decl.attrs.is_override {
            return;
        }
        let needs_keyword = match kind {
            MemberKind::Initializer => decl.is_designated_init() && !self.decl(base).attrs.is_required,
            _ => true,
        };
        if !needs_keyword {
            return;
        }
        let span = self.span(id);
        let mut diag = DeclDiagnostic::new(
            DiagKind::MissingOverride {
                kind: decl.descriptive_kind(),
            },
            span,
        )
        .note(NoteKind::OverriddenHere, self.span(base));
        if kind != MemberKind::Property {
            diag = diag.fix_it(FixIt::insert(span, "override "));
        }
        self.emit(diag);
        self.decl_mut(id).attrs.is_override = true;
    }

    fn check_property_override(&mut self, id: DeclId, class: DeclId, base: DeclId, exact: bool) {
        let span = self.span(id);
        let name = self.name(id);
        let own_ownership = self.decl(id).attrs.ownership;
        let base_ownership = self.decl(base).attrs.ownership;
        if own_ownership != base_ownership {
            self.diagnose(
                DiagKind::OverrideOwnershipMismatch {
                    ownership: own_ownership.keyword(),
                    base_ownership: base_ownership.keyword(),
                },
                span,
            );
        }

        let (own, base_decl) = (self.decl(id), self.decl(base));
        let own_settable = own.is_settable();
        let base_settable = base_decl.is_settable();
        if base_decl.is_let() && own_settable {
            self.diagnose(DiagKind::OverrideLetProperty { name: name.clone() }, span);
        }
        let own = self.decl(id);
        if own.has_storage() && !own.has_observers() {
            self.diagnose(DiagKind::OverrideWithStoredProperty { name: name.clone() }, span);
        } else if self.decl(id).has_observers() && !base_settable {
            self.diagnose(DiagKind::ObservingReadonly { name: name.clone() }, span);
        } else if base_settable && !own_settable {
            self.diagnose(DiagKind::MutableWithReadonly { name: name.clone() }, span);
        }

        if exact {
            return;
        }
        let (Some(own_ty), Some(base_ty)) = (
            self.decl(id).interface_type,
            self.inherited_member_type(class, base),
        ) else {
            return;
        };
        let own_ty = self.module.types.reference_storage_referent(own_ty);
        let base_ty = self.module.types.reference_storage_referent(base_ty);
        let (ty, base_ty_name) = (self.type_name(own_ty), self.type_name(base_ty));
        let kind = if !self.is_subtype(own_ty, base_ty) {
            DiagKind::PropertyTypeMismatch {
                name,
                ty,
                base_ty: base_ty_name,
            }
        } else if base_settable {
            DiagKind::MutableCovariantProperty {
                name,
                ty,
                base_ty: base_ty_name,
            }
        } else {
            return;
        };
        let diag = DeclDiagnostic::new(kind, span).note(NoteKind::PropertyOverrideHere, self.span(base));
        self.emit(diag);
    }

    fn check_override_effects(&mut self, id: DeclId, base: DeclId, kind: &'static str) {
        let span = self.span(id);
        let (own, base_decl) = (self.decl(id), self.decl(base));
        let own_throws = own.throws() || own.attrs.rethrows;
        let base_throws = base_decl.throws() || base_decl.attrs.rethrows;
        let base_rethrows = base_decl.attrs.rethrows;
        let own_rethrows = own.attrs.rethrows;
        let base_noreturn = base_decl.attrs.noreturn;
        let own_noreturn = own.attrs.noreturn;

        if own_throws && !base_throws {
            self.diagnose(DiagKind::OverrideThrows { kind }, span);
        } else if !own_throws && base_throws && self.is_exposed(base) {
            self.diagnose(DiagKind::OverrideThrowsObjC { kind }, span);
        } else if base_rethrows && own_throws && !own_rethrows {
            self.diagnose(DiagKind::OverrideRethrowsWithNonRethrows { kind }, span);
        }
        if base_noreturn && !own_noreturn {
            self.diagnose(DiagKind::OverrideNoreturnWithReturn { kind }, span);
        }
    }

    fn check_override_availability(&mut self, id: DeclId, base: DeclId, kind: &'static str) {
        let span = self.span(id);
        if self.decl(base).attrs.is_unavailable() {
            let diag = DeclDiagnostic::new(
                DiagKind::OverrideUnavailable {
                    name: self.module.full_name(base),
                },
                span,
            )
            .note(NoteKind::OverriddenHere, self.span(base));
            self.emit(diag);
            return;
        }
        let own_attrs = self.decl(id).attrs.available.clone();
        for attr in own_attrs {
            let Some(introduced) = attr.introduced else {
                continue;
            };
            let Some(base_introduced) = self.decl(base).attrs.introduced_on(&attr.platform) else {
                continue;
            };
            if introduced > base_introduced {
                self.diagnose(
                    DiagKind::OverrideLessAvailable {
                        kind,
                        platform: attr.platform.clone(),
                        version: base_introduced,
                    },
                    span,
                );
            }
        }
    }

    /// Store the override edge and carry attributes from the base
    fn record_override(&mut self, id: DeclId, edge: OverrideEdge) {
        let base = edge.base;
        debug!(
            "'{}' overrides '{}'",
            self.module.full_name(id),
            self.module.full_name(base)
        );
        let base_attrs = self.decl(base).attrs.clone();
        let decl = self.decl_mut(id);
        decl.set_overridden(edge);
        if base_attrs.is_dynamic {
            decl.attrs.is_dynamic = true;
        }
        if decl.attrs.objc.is_none() {
            if let Some(objc) = base_attrs.objc {
                decl.attrs.objc = Some(ObjCAttr {
                    name: objc.name,
                    implicit: true,
                });
            }
        }
        self.stats.overrides_recorded += 1;

        let (own_getter, own_setter) = self.decl(id).accessors();
        let (base_getter, base_setter) = self.decl(base).accessors();
        if let (Some(getter), Some(base_getter)) = (own_getter, base_getter) {
            self.record_accessor_override(getter, OverrideEdge { base: base_getter, ..edge });
        }
        if let (Some(setter), Some(base_setter)) = (own_setter, base_setter) {
            // only a setter the subclass can see is overridden
            if self.compute_accessibility(base_setter) > Accessibility::Private {
                self.record_accessor_override(setter, OverrideEdge { base: base_setter, ..edge });
            }
        }
    }

    fn record_accessor_override(&mut self, accessor: DeclId, edge: OverrideEdge) {
        let dynamic = self.decl(edge.base).attrs.is_dynamic;
        let decl = self.decl_mut(accessor);
        if decl.overridden().is_some() {
            return;
        }
        decl.set_overridden(edge);
        if dynamic {
            decl.attrs.is_dynamic = true;
        }
        trace!("accessor override recorded");
    }
}
