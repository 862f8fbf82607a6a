//! Declaration checking
//!
//! [`DeclChecker`] is the session object for one checking run. It borrows the
//! [`Module`] mutably, owns the collaborators (type resolver, member lookup,
//! conformance oracle, literal checker, diagnostic sink) and the caches that
//! live for the run, and exposes the per-declaration entry points:
//!
//! - [`DeclChecker::validate_decl`] gives a declaration its interface type,
//!   accessibility and (for class members) its override edge
//! - [`DeclChecker::check_inheritance_clause`] splits an inheritance clause
//!   into superclass, raw type and protocols
//! - [`DeclChecker::validate_generic_signature`] solves generic requirements
//! - [`DeclChecker::compute_accessibility`] and
//!   [`DeclChecker::check_type_accessibility`]
//! - [`DeclChecker::check_overrides`]
//! - [`DeclChecker::check_enum_raw_values`]
//! - [`DeclChecker::add_implicit_constructors`]
//! - [`DeclChecker::type_check_decl`] and [`DeclChecker::check_module`] drive
//!   all of the above
//!
//! Findings never abort checking. Each one becomes a [`DeclDiagnostic`] in
//! the sink and the offending declaration is marked invalid or error-typed.

pub mod accessibility;
pub mod circularity;
pub mod collaborators;
pub mod diagnostics;
pub mod generics;
pub mod implicit_members;
pub mod inheritance;
pub mod literals;
pub mod overrides;
pub mod raw_values;
pub mod redeclaration;
pub mod relations;
pub mod state;
pub mod validate;

#[cfg(test)]
mod tests;

pub use collaborators::{
    CollectingSink, ConformanceChecker, DeclaredConformance, DiagnosticSink, ExpressionChecker,
    LiteralExpressionChecker, MemberLookup, NominalMemberLookup, ResolutionKind, ResolveError,
    ScopedTypeResolver, TypeResolver,
};
pub use diagnostics::{to_diagnostic, AccessSubject, DeclDiagnostic, DiagKind, NoteKind};

use crate::config::CheckerConfig;
use crate::decls::collections::{IdMap, TypeMap};
use crate::decls::*;
use source_map::SourceSpan;
use state::InFlight;

/// Counters for one checking run
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CheckerStats {
    pub decls_validated: usize,
    pub overrides_recorded: usize,
    pub implicit_ctors_added: usize,
    pub cache_hits: usize,
    pub diagnostics_emitted: usize,
}

/// Session state for checking one module
pub struct DeclChecker<'m> {
    /// The declaration graph being checked
    pub(crate) module: &'m mut Module,

    pub(crate) config: CheckerConfig,

    resolver: Box<dyn TypeResolver>,
    lookup: Box<dyn MemberLookup>,
    conformance: Box<dyn ConformanceChecker>,
    expr_checker: Box<dyn ExpressionChecker>,
    sink: Box<dyn DiagnosticSink>,

    /// Declarations currently being validated
    in_flight: InFlight,

    /// Most restrictive nominal reachable from a type, with its accessibility
    type_access_cache: TypeMap<Option<(Accessibility, DeclId)>>,

    /// Subtype relationship cache
    subtype_cache: IdMap<(TypeId, TypeId), bool>,

    /// Extensions have been attached to their nominals
    extensions_bound: bool,

    stats: CheckerStats,
}

impl<'m> DeclChecker<'m> {
    pub fn new(module: &'m mut Module) -> Self {
        Self {
            module,
            config: CheckerConfig::default(),
            resolver: Box::new(ScopedTypeResolver),
            lookup: Box::new(NominalMemberLookup),
            conformance: Box::new(DeclaredConformance),
            expr_checker: Box::new(LiteralExpressionChecker::default()),
            sink: Box::new(CollectingSink::default()),
            in_flight: InFlight::default(),
            type_access_cache: TypeMap::default(),
            subtype_cache: IdMap::default(),
            extensions_bound: false,
            stats: CheckerStats::default(),
        }
    }

    pub fn with_config(mut self, config: CheckerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_resolver(mut self, resolver: Box<dyn TypeResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_member_lookup(mut self, lookup: Box<dyn MemberLookup>) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_conformance(mut self, conformance: Box<dyn ConformanceChecker>) -> Self {
        self.conformance = conformance;
        self
    }

    pub fn with_expression_checker(mut self, checker: Box<dyn ExpressionChecker>) -> Self {
        self.expr_checker = checker;
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn module(&self) -> &Module {
        &*self.module
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn stats(&self) -> &CheckerStats {
        &self.stats
    }

    /// Drain the diagnostics collected by the sink
    pub fn take_diagnostics(&mut self) -> Vec<DeclDiagnostic> {
        self.sink.take()
    }

    pub fn validation_status(&self, decl: DeclId) -> ValidationStatus {
        state::status_of(self.module.decl(decl), self.in_flight.contains(decl))
    }

    pub(crate) fn emit(&mut self, diagnostic: DeclDiagnostic) {
        log::debug!("E{:04} {}", diagnostic.code(), diagnostic.message());
        self.stats.diagnostics_emitted += 1;
        self.sink.diagnose(diagnostic);
    }

    pub(crate) fn diagnose(&mut self, kind: DiagKind, span: SourceSpan) {
        self.emit(DeclDiagnostic::new(kind, span));
    }

    pub(crate) fn decl(&self, id: DeclId) -> &Decl {
        self.module.decl(id)
    }

    pub(crate) fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        self.module.decl_mut(id)
    }

    pub(crate) fn span(&self, id: DeclId) -> SourceSpan {
        self.module.decl(id).span
    }

    pub(crate) fn name(&self, id: DeclId) -> String {
        self.module.name_of(id).to_string()
    }

    pub(crate) fn type_name(&self, ty: TypeId) -> String {
        self.module.type_name(ty)
    }

    pub(crate) fn error_type(&self) -> TypeId {
        self.module.types.error_type()
    }

    /// Mark a declaration invalid and give it the error type
    pub(crate) fn poison(&mut self, id: DeclId) {
        let error = self.error_type();
        let decl = self.decl_mut(id);
        decl.set_invalid();
        decl.interface_type = Some(error);
    }

    /// Resolve a written type unless it already is. Failures are reported at
    /// the type's span and the location is marked invalid.
    pub(crate) fn resolve_loc(&mut self, loc: &mut TypeLoc, context: DeclContext, kind: ResolutionKind) -> TypeId {
        if let Some(ty) = loc.ty {
            return ty;
        }
        match self.resolver.resolve_type(self.module, &loc.repr, context, kind) {
            Ok(ty) => {
                let ty = self.canonicalize_in_context(context, ty);
                loc.set_type(ty);
                ty
            }
            Err(err) => {
                log::trace!("failed to resolve '{}': {}", loc.repr, err);
                self.diagnose(err.into_diag_kind(), loc.span);
                let error = self.error_type();
                loc.set_invalid(error);
                error
            }
        }
    }

    pub(crate) fn conforms_to(&self, ty: TypeId, protocol: &str, context: DeclContext) -> bool {
        self.conformance.conforms_to(&*self.module, ty, protocol, context)
    }

    pub(crate) fn lookup_members(&self, ty: TypeId, name: &DeclName) -> Vec<DeclId> {
        self.lookup.lookup_members(&*self.module, ty, name)
    }

    /// Run the expression checker on a literal, reporting into the sink
    pub(crate) fn type_check_literal(&mut self, expr: &LiteralExpr, context: DeclContext, expected: TypeId) -> bool {
        let before = self.stats.diagnostics_emitted;
        let mut sink = CollectingSink::default();
        let had_error = self
            .expr_checker
            .type_check_expression(&*self.module, expr, context, expected, &mut sink);
        for diagnostic in sink.diagnostics {
            self.emit(diagnostic);
        }
        had_error || self.stats.diagnostics_emitted > before
    }

    /// A declaration visible to the foreign runtime, with a selector
    pub(crate) fn is_exposed(&self, id: DeclId) -> bool {
        let attrs = &self.decl(id).attrs;
        self.config.objc_interop && (attrs.objc.is_some() || attrs.is_dynamic)
    }

    /// Class or extension of a class that declares `member`
    pub(crate) fn enclosing_class(&self, member: DeclId) -> Option<DeclId> {
        let nominal = self.module.context_nominal(self.decl(member).context)?;
        self.decl(nominal).is_class().then_some(nominal)
    }
}
