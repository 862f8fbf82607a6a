//! Accessibility computation and the type-accessibility audit

use super::{AccessSubject, DeclChecker, DeclDiagnostic, DiagKind, NoteKind};
use crate::decls::*;
use log::trace;
use source_map::SourceSpan;

impl DeclChecker<'_> {
    /// Effective accessibility of a declaration, computed on first request
    pub fn compute_accessibility(&mut self, id: DeclId) -> Accessibility {
        if let Some(access) = self.decl(id).access {
            return access;
        }
        let access = match self.decl(id).attrs.access {
            Some(explicit) => explicit,
            None => self.default_accessibility(id),
        };
        self.decl_mut(id).access = Some(access);

        if self.decl(id).is_settable() {
            let explicit = self.decl(id).attrs.setter_access.filter(|_| self.config.enable_access_control);
            let setter = explicit.map_or(access, |s| s.min(access));
            self.decl_mut(id).setter_access = Some(setter);
        }
        trace!("accessibility of '{}' is {}", self.name(id), access);
        access
    }

    fn default_accessibility(&mut self, id: DeclId) -> Accessibility {
        if let DeclKind::Func(FuncData {
            accessor: Some((storage, kind)),
            ..
        }) = self.decl(id).kind
        {
            let storage_access = self.compute_accessibility(storage);
            return match kind {
                AccessorKind::Getter => storage_access,
                AccessorKind::Setter => self.decl(storage).setter_access.unwrap_or(storage_access),
            };
        }

        let context = self.decl(id).context;
        let owner = match context {
            DeclContext::Module => return Accessibility::Internal,
            DeclContext::Local(_) => return Accessibility::Private,
            DeclContext::Decl(owner) => owner,
        };
        let follows_owner = matches!(
            self.decl(id).kind,
            DeclKind::GenericParam(_) | DeclKind::AssociatedType(_) | DeclKind::EnumElement(_)
        );
        if follows_owner {
            return self.compute_accessibility(owner);
        }
        if self.decl(owner).is_extension() {
            return self.compute_extension_access(owner);
        }
        let container = self.compute_accessibility(owner);
        if self.decl(owner).is_protocol() {
            container
        } else {
            container.min(Accessibility::Internal)
        }
    }

    /// Default accessibility for the members of an extension. Also records
    /// the upper bound imposed by the extended type and where-clause.
    pub(crate) fn compute_extension_access(&mut self, ext: DeclId) -> Accessibility {
        if let Some(default) = self.decl(ext).extension().and_then(|e| e.default_access) {
            return default;
        }
        self.bind_extension(ext);
        let nominal = self.decl(ext).extension().and_then(|e| e.nominal);
        let mut max_access = match nominal {
            Some(n) => self.compute_accessibility(n),
            None => Accessibility::Private,
        };

        let constrained = self.decl(ext).extension().is_some_and(|e| !e.where_clause.is_empty());
        if constrained {
            self.validate_generic_signature(ext);
            for ty in self.where_clause_types(ext) {
                if let Some((access, _)) = self.type_access(ty) {
                    max_access = max_access.min(access);
                }
            }
        }

        let mut default = self.decl(ext).attrs.access.unwrap_or(Accessibility::Internal);
        if constrained {
            default = default.min(max_access);
        }
        let decl = self.decl_mut(ext);
        decl.access = Some(default);
        if let Some(data) = decl.extension_mut() {
            data.max_access = Some(max_access);
            data.default_access = Some(default);
        }
        default
    }

    fn where_clause_types(&self, ext: DeclId) -> Vec<TypeId> {
        let Some(data) = self.decl(ext).extension() else {
            return Vec::new();
        };
        data.where_clause
            .iter()
            .filter(|r| !r.invalid)
            .flat_map(|r| [r.subject.ty, r.constraint.ty])
            .flatten()
            .collect()
    }

    /// Most restrictive nominal reachable inside `ty`, with its accessibility
    fn type_access(&mut self, ty: TypeId) -> Option<(Accessibility, DeclId)> {
        if let Some(cached) = self.type_access_cache.get(&ty) {
            self.stats.cache_hits += 1;
            return *cached;
        }
        let mut nominals = Vec::new();
        self.module.types.walk(ty, &mut |t| {
            if let Some(decl) = self.module.types.nominal_decl(t) {
                nominals.push(decl);
            }
        });
        let mut narrowest: Option<(Accessibility, DeclId)> = None;
        for decl in nominals {
            let access = self.compute_accessibility(decl);
            if narrowest.map_or(true, |(a, _)| access < a) {
                narrowest = Some((access, decl));
            }
        }
        self.type_access_cache.insert(ty, narrowest);
        narrowest
    }

    /// The most restrictive component of `ty` when it is less accessible
    /// than `required`
    pub fn check_type_accessibility(&mut self, ty: TypeId, required: Accessibility) -> Option<(Accessibility, DeclId)> {
        self.type_access(ty).filter(|(access, _)| *access < required)
    }

    /// Report the most restrictive offender among `parts` once, at the span
    /// of the part it was found in
    fn report_type_access(
        &mut self,
        subject: AccessSubject,
        decl_access: Accessibility,
        parts: &[(TypeId, SourceSpan)],
    ) -> bool {
        let mut narrowest: Option<(Accessibility, DeclId, SourceSpan)> = None;
        for &(ty, span) in parts {
            if let Some((access, offender)) = self.check_type_accessibility(ty, decl_access) {
                if narrowest.map_or(true, |(a, _, _)| access < a) {
                    narrowest = Some((access, offender, span));
                }
            }
        }
        let Some((type_access, offender, span)) = narrowest else {
            return false;
        };
        let name = self.name(offender);
        let diag = DeclDiagnostic::new(
            DiagKind::TypeAccessViolation {
                subject,
                decl_access,
                type_access,
                ty: name.clone(),
            },
            span,
        )
        .note(
            NoteKind::TypeDeclaredHere {
                name,
                access: type_access,
            },
            self.span(offender),
        );
        self.emit(diag);
        true
    }

    /// Check that nothing in a declaration's signature is less visible than
    /// the declaration itself
    pub(crate) fn check_accessibility_audit(&mut self, id: DeclId) {
        if !self.config.enable_access_control || self.decl(id).is_invalid() || self.decl(id).is_accessor() {
            return;
        }
        let access = self.compute_accessibility(id);
        let span = self.span(id);
        let interface = self.decl(id).interface_type;

        match &self.decl(id).kind {
            DeclKind::Var(_) => {
                if let Some(ty) = interface {
                    self.report_type_access(AccessSubject::Property, access, &[(ty, span)]);
                }
                self.check_setter_accessibility(id, access);
            }
            DeclKind::Func(_) | DeclKind::Subscript(_) | DeclKind::Constructor(_) => {
                let subject = match self.decl(id).kind {
                    DeclKind::Subscript(_) => AccessSubject::Subscript,
                    DeclKind::Constructor(_) => AccessSubject::Initializer,
                    _ => AccessSubject::Function,
                };
                let parts: Vec<(TypeId, SourceSpan)> =
                    self.signature_parts(id).into_iter().map(|ty| (ty, span)).collect();
                self.report_type_access(subject, access, &parts);
                if subject == AccessSubject::Subscript {
                    self.check_setter_accessibility(id, access);
                }
            }
            DeclKind::Class(_) | DeclKind::Struct(_) | DeclKind::Enum(_) | DeclKind::Protocol(_) | DeclKind::Extension(_) => {
                self.check_inherited_accessibility(id, access);
            }
            DeclKind::AssociatedType(data) => {
                let default = data.default.as_ref().and_then(|d| d.ty.map(|t| (t, d.span)));
                self.check_inherited_accessibility(id, access);
                if let Some((ty, default_span)) = default {
                    self.report_type_access(AccessSubject::AssociatedTypeDefault, access, &[(ty, default_span)]);
                }
            }
            DeclKind::Destructor | DeclKind::EnumElement(_) | DeclKind::GenericParam(_) => {}
        }
        self.check_generic_accessibility(id, access);
    }

    /// Parameter types then the result of a function, subscript or initializer
    fn signature_parts(&self, id: DeclId) -> Vec<TypeId> {
        let decl = self.decl(id);
        let mut parts: Vec<TypeId> = decl.params().iter().filter_map(|p| p.ty.ty).collect();
        match &decl.kind {
            DeclKind::Func(f) => parts.extend(f.result.as_ref().and_then(|r| r.ty)),
            DeclKind::Subscript(s) => parts.extend(s.element.ty),
            _ => {}
        }
        parts
    }

    fn check_inherited_accessibility(&mut self, id: DeclId, access: Accessibility) {
        let entries: Vec<(TypeId, SourceSpan)> = self
            .decl(id)
            .inherited()
            .iter()
            .filter(|l| !l.invalid)
            .filter_map(|l| l.ty.map(|t| (t, l.span)))
            .collect();
        for entry in entries {
            self.report_type_access(AccessSubject::Inherited, access, &[entry]);
        }
    }

    /// Bounds of a declaration's own generic parameters and its requirements
    fn check_generic_accessibility(&mut self, id: DeclId, access: Accessibility) {
        let mut entries: Vec<(TypeId, SourceSpan)> = Vec::new();
        for param in self.module.own_generic_params(id) {
            for loc in self.decl(param).inherited() {
                if let (Some(ty), false) = (loc.ty, loc.invalid) {
                    entries.push((ty, loc.span));
                }
            }
        }
        let requirements = match &self.decl(id).kind {
            DeclKind::Extension(e) => Some(&e.where_clause),
            _ => self.decl(id).generic_params().map(|g| &g.requirements),
        };
        for requirement in requirements.into_iter().flatten().filter(|r| !r.invalid) {
            for loc in [&requirement.subject, &requirement.constraint] {
                if let Some(ty) = loc.ty {
                    entries.push((ty, loc.span));
                }
            }
        }
        self.report_type_access(AccessSubject::GenericRequirement, access, &entries);
    }

    fn check_setter_accessibility(&mut self, id: DeclId, access: Accessibility) {
        let Some(setter) = self.decl(id).attrs.setter_access else {
            return;
        };
        if setter > access {
            self.diagnose(DiagKind::SetterAccessAboveGetter { setter, getter: access }, self.span(id));
        }
    }
}
