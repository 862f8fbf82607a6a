//! Inheritance clause resolution
//!
//! Splits a declaration's inheritance clause into at most one superclass, at
//! most one raw type (enums) and a protocol list, reporting duplicates,
//! misplaced entries and entries the declaration kind cannot carry.

use super::{DeclChecker, DeclDiagnostic, DiagKind, ResolutionKind};
use crate::decls::collections::TypeSet;
use crate::decls::*;
use diagnostics::FixIt;
use log::debug;
use smallvec::SmallVec;
use source_map::SourceSpan;

/// What a declaration may put in its inheritance clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClauseOwner {
    Class,
    Enum,
    Other,
    Extension,
    Bound,
}

impl ClauseOwner {
    fn can_inherit_class(self) -> bool {
        matches!(self, ClauseOwner::Class | ClauseOwner::Bound)
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Superclass,
    RawType,
}

#[derive(Default)]
struct ResolvedClause {
    superclass: Option<TypeId>,
    raw_type: Option<TypeId>,
    protocols: SmallVec<[DeclId; 4]>,
}

impl DeclChecker<'_> {
    /// Resolve the inheritance clause of a nominal type, extension, generic
    /// parameter or associated type. Runs at most once per declaration.
    pub fn check_inheritance_clause(&mut self, id: DeclId) {
        if self.decl(id).state.inheritance_checked {
            return;
        }
        let owner = match &self.decl(id).kind {
            DeclKind::Class(_) => ClauseOwner::Class,
            DeclKind::Enum(_) => ClauseOwner::Enum,
            DeclKind::Struct(_) | DeclKind::Protocol(_) => ClauseOwner::Other,
            DeclKind::Extension(_) => ClauseOwner::Extension,
            DeclKind::GenericParam(_) | DeclKind::AssociatedType(_) => ClauseOwner::Bound,
            _ => return,
        };
        self.decl_mut(id).state.inheritance_checked = true;

        if owner == ClauseOwner::Extension && !self.check_extension_clause_allowed(id) {
            return;
        }

        let context = match owner {
            ClauseOwner::Bound => self.decl(id).context,
            _ => DeclContext::Decl(id),
        };
        let mut clause = self.decl(id).inherited().to_vec();
        let resolved = self.resolve_clause(id, owner, &mut clause, context);
        debug!(
            "inheritance of '{}': superclass={:?} raw={:?} protocols={}",
            self.name(id),
            resolved.superclass.map(|t| self.type_name(t)),
            resolved.raw_type.map(|t| self.type_name(t)),
            resolved.protocols.len()
        );

        let protocols = resolved.protocols.into_vec();
        match &mut self.decl_mut(id).kind {
            DeclKind::Class(n) | DeclKind::Struct(n) | DeclKind::Enum(n) | DeclKind::Protocol(n) => {
                n.inherited = clause;
                n.superclass = resolved.superclass;
                n.raw_type = resolved.raw_type;
                n.protocols = protocols;
            }
            DeclKind::Extension(e) => {
                e.inherited = clause;
                e.protocols = protocols;
            }
            DeclKind::GenericParam(GenericParamData { bounds, .. })
            | DeclKind::AssociatedType(AssociatedTypeData { bounds, .. }) => {
                bounds.inherited = clause;
                bounds.superclass = resolved.superclass;
                bounds.protocols = protocols;
            }
            _ => {}
        }
    }

    /// Protocol extensions and constrained extensions may not add conformances.
    /// Returns false when the clause was rejected and cleared.
    fn check_extension_clause_allowed(&mut self, id: DeclId) -> bool {
        self.bind_extension(id);
        let Some(ext) = self.decl(id).extension() else {
            return false;
        };
        let Some(first) = ext.inherited.first() else {
            return true;
        };
        let first_span = first.span;
        let constrained = !ext.where_clause.is_empty();
        let Some(nominal) = ext.nominal else {
            return true;
        };
        let ty = self.name(nominal);
        if self.decl(nominal).is_protocol() {
            self.diagnose(DiagKind::ExtensionProtocolInheritance { ty }, first_span);
            self.clear_extension_clause(id);
            return false;
        }
        if constrained {
            self.diagnose(DiagKind::ExtensionConstrainedInheritance { ty }, first_span);
            self.clear_extension_clause(id);
        }
        true
    }

    fn clear_extension_clause(&mut self, id: DeclId) {
        if let Some(ext) = self.decl_mut(id).extension_mut() {
            ext.inherited.clear();
        }
    }

    fn resolve_clause(
        &mut self,
        id: DeclId,
        owner: ClauseOwner,
        clause: &mut [TypeLoc],
        context: DeclContext,
    ) -> ResolvedClause {
        let mut resolved = ResolvedClause::default();
        let mut seen = TypeSet::default();
        let first_span = clause.first().map(|l| l.span);

        for (index, loc) in clause.iter_mut().enumerate() {
            if loc.invalid {
                continue;
            }
            let ty = self.resolve_loc(loc, context, ResolutionKind::InheritanceClause);
            if self.module.types.is_error(ty) {
                continue;
            }
            if !seen.insert(ty) {
                let diag = DeclDiagnostic::new(DiagKind::DuplicateInheritance { ty: self.type_name(ty) }, loc.span)
                    .fix_it(FixIt::remove(loc.span));
                self.emit(diag);
                continue;
            }

            if let Some(protocols) = self.protocols_of(ty) {
                for p in protocols {
                    if !resolved.protocols.contains(&p) {
                        resolved.protocols.push(p);
                    }
                }
                continue;
            }

            // enums take any other entry as a raw type candidate; literal
            // convertibility is checked with the raw values
            if owner == ClauseOwner::Enum {
                self.record_first_only(&mut resolved.raw_type, Slot::RawType, ty, index, loc.span, first_span);
                continue;
            }

            let is_class = self
                .module
                .types
                .nominal_decl(ty)
                .is_some_and(|d| self.decl(d).is_class());
            if is_class {
                if owner.can_inherit_class() {
                    self.record_first_only(&mut resolved.superclass, Slot::Superclass, ty, index, loc.span, first_span);
                } else if owner == ClauseOwner::Extension {
                    let decl = self.extended_name(id);
                    self.diagnose(
                        DiagKind::ExtensionClassInheritance {
                            decl,
                            ty: self.type_name(ty),
                        },
                        loc.span,
                    );
                } else {
                    self.diagnose(
                        DiagKind::NonClassInheritance {
                            decl: self.name(id),
                            ty: self.type_name(ty),
                        },
                        loc.span,
                    );
                }
                continue;
            }

            let ty_name = self.type_name(ty);
            if owner.can_inherit_class() {
                self.diagnose(DiagKind::InheritanceFromNonProtocolOrClass { ty: ty_name }, loc.span);
            } else {
                self.diagnose(DiagKind::InheritanceFromNonProtocol { ty: ty_name }, loc.span);
            }
        }
        resolved
    }

    /// Record a superclass or raw type. A second one is discarded; one that
    /// is not first is reported with a move fix-it but kept.
    fn record_first_only(
        &mut self,
        slot: &mut Option<TypeId>,
        which: Slot,
        ty: TypeId,
        index: usize,
        span: SourceSpan,
        first_span: Option<SourceSpan>,
    ) {
        if let Some(existing) = *slot {
            let (first, second) = (self.type_name(existing), self.type_name(ty));
            let kind = match which {
                Slot::Superclass => DiagKind::MultipleInheritance { first, second },
                Slot::RawType => DiagKind::MultipleEnumRawTypes { first, second },
            };
            self.emit(DeclDiagnostic::new(kind, span).fix_it(FixIt::remove(span)));
            return;
        }
        if index > 0 {
            let name = self.type_name(ty);
            let kind = match which {
                Slot::Superclass => DiagKind::SuperclassNotFirst { ty: name.clone() },
                Slot::RawType => DiagKind::RawTypeNotFirst { ty: name.clone() },
            };
            let mut diag = DeclDiagnostic::new(kind, span).fix_it(FixIt::remove(span));
            if let Some(first) = first_span {
                diag = diag.fix_it(FixIt::insert(first, format!("{name}, ")));
            }
            self.emit(diag);
        }
        *slot = Some(ty);
    }

    /// The protocols a type stands for when it appears in a clause, or
    /// `None` when it is not a protocol or protocol composition
    fn protocols_of(&self, ty: TypeId) -> Option<Vec<DeclId>> {
        match self.module.types.kind(ty) {
            TypeKind::Nominal { decl, .. } if self.decl(*decl).is_protocol() => Some(vec![*decl]),
            TypeKind::Composition(parts) => {
                let mut protocols = Vec::with_capacity(parts.len());
                for &part in parts {
                    protocols.extend(self.protocols_of(part)?);
                }
                Some(protocols)
            }
            _ => None,
        }
    }

    fn extended_name(&self, ext: DeclId) -> String {
        match self.decl(ext).extension().and_then(|e| e.nominal) {
            Some(nominal) => self.name(nominal),
            None => self.name(ext),
        }
    }
}
