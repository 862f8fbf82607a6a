//! Interfaces to the services declaration checking consumes
//!
//! Type resolution, member lookup, conformance queries, literal checking and
//! diagnostic emission are traits so an embedding driver can plug in its own.
//! The defaults here work directly on the [`Module`] graph.

use super::diagnostics::{DeclDiagnostic, DiagKind};
use super::literals::{integer_bounds, parse_integer};
use crate::decls::collections::DeclSet;
use crate::decls::*;
use log::trace;
use thiserror::Error;

pub const INTEGER_LITERAL: &str = "IntegerLiteralConvertible";
pub const FLOAT_LITERAL: &str = "FloatLiteralConvertible";
pub const STRING_LITERAL: &str = "StringLiteralConvertible";
pub const GRAPHEME_LITERAL: &str = "ExtendedGraphemeClusterLiteralConvertible";
pub const UNICODE_SCALAR_LITERAL: &str = "UnicodeScalarLiteralConvertible";
pub const BOOLEAN_LITERAL: &str = "BooleanLiteralConvertible";
pub const NIL_LITERAL: &str = "NilLiteralConvertible";
pub const ARRAY_LITERAL: &str = "ArrayLiteralConvertible";
pub const DICTIONARY_LITERAL: &str = "DictionaryLiteralConvertible";

/// How a type expression is being used; affects generic argument rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    TypeAnnotation,
    InheritanceClause,
    GenericRequirement,
    /// The extended type of an extension: a generic type may omit arguments
    ExtensionTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("cannot find type '{0}' in scope")]
    UnknownType(String),
    #[error("generic type '{ty}' expects {expected} argument(s), found {found}")]
    GenericArgCount { ty: String, expected: usize, found: usize },
    #[error("'{name}' is not a member type of '{base}'")]
    NoMemberType { base: String, name: String },
    #[error("reference to generic type '{0}' requires arguments")]
    MissingGenericArgs(String),
}

impl ResolveError {
    pub fn into_diag_kind(self) -> DiagKind {
        match self {
            ResolveError::UnknownType(name) => DiagKind::UnresolvedType { name },
            ResolveError::GenericArgCount { ty, expected, found } => DiagKind::GenericArgCount { ty, expected, found },
            ResolveError::NoMemberType { base, name } => DiagKind::NoMemberType { base, name },
            ResolveError::MissingGenericArgs(ty) => DiagKind::GenericTypeRequiresArgs { ty },
        }
    }
}

pub trait TypeResolver {
    fn resolve_type(
        &self,
        module: &mut Module,
        repr: &TypeRepr,
        context: DeclContext,
        kind: ResolutionKind,
    ) -> Result<TypeId, ResolveError>;
}

pub trait MemberLookup {
    /// Members of `ty` named `name`, nearest declarations first
    fn lookup_members(&self, module: &Module, ty: TypeId, name: &DeclName) -> Vec<DeclId>;
}

pub trait ConformanceChecker {
    fn conforms_to(&self, module: &Module, ty: TypeId, protocol: &str, context: DeclContext) -> bool;
}

pub trait ExpressionChecker {
    /// Check a literal against its expected type. Returns `true` on error,
    /// after reporting it to `sink`.
    fn type_check_expression(
        &self,
        module: &Module,
        expr: &LiteralExpr,
        context: DeclContext,
        expected: TypeId,
        sink: &mut dyn DiagnosticSink,
    ) -> bool;
}

pub trait DiagnosticSink {
    fn diagnose(&mut self, diagnostic: DeclDiagnostic);

    /// Hand over everything collected so far
    fn take(&mut self) -> Vec<DeclDiagnostic> {
        Vec::new()
    }
}

#[derive(Debug, Default)]
pub struct CollectingSink {
    pub diagnostics: Vec<DeclDiagnostic>,
}

impl DiagnosticSink for CollectingSink {
    fn diagnose(&mut self, diagnostic: DeclDiagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn take(&mut self) -> Vec<DeclDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

/// Protocols directly or indirectly required of a generic parameter or
/// associated type
pub fn bound_protocols(module: &Module, decl: DeclId) -> Vec<DeclId> {
    let direct = module
        .decl(decl)
        .bounds()
        .map(|b| b.protocols.clone())
        .unwrap_or_default();
    protocol_closure(module, &direct)
}

/// `protocols` plus everything they inherit, without repeats
pub fn protocol_closure(module: &Module, protocols: &[DeclId]) -> Vec<DeclId> {
    let mut seen = DeclSet::default();
    let mut out = Vec::new();
    let mut stack: Vec<DeclId> = protocols.iter().rev().copied().collect();
    while let Some(p) = stack.pop() {
        if !seen.insert(p) {
            continue;
        }
        out.push(p);
        if let Some(n) = module.decl(p).nominal() {
            stack.extend(n.protocols.iter().rev().copied());
        }
    }
    out
}

fn find_associated_type(module: &Module, protocols: &[DeclId], name: &str) -> Option<DeclId> {
    let ident = module.interner.get(name)?;
    protocols.iter().find_map(|&p| {
        module
            .decl(p)
            .members()
            .iter()
            .copied()
            .find(|&m| module.decl(m).name.base == ident && matches!(module.decl(m).kind, DeclKind::AssociatedType(_)))
    })
}

enum Binding {
    GenericParam(DeclId),
    Nominal(DeclId),
    AssociatedType { protocol: DeclId, assoc: DeclId },
    SelfType(DeclId),
}

/// Lexical resolution: enclosing generic parameters (innermost first),
/// `Self`, nested types, module-level types, then builtins
#[derive(Debug, Default, Clone, Copy)]
pub struct ScopedTypeResolver;

impl ScopedTypeResolver {
    fn lookup(module: &Module, name: &str, context: DeclContext) -> Option<Binding> {
        let ident = module.interner.get(name);
        let mut ctx = context;
        while let DeclContext::Decl(d) | DeclContext::Local(d) = ctx {
            let decl = module.decl(d);
            let nominal = module.as_nominal(d);
            if let Some(ident) = ident {
                let mut scopes = vec![d];
                if let Some(n) = nominal.filter(|n| *n != d) {
                    scopes.push(n);
                }
                for scope in scopes {
                    let params = module.own_generic_params(scope);
                    if let Some(p) = params.into_iter().find(|p| module.decl(*p).name.base == ident) {
                        return Some(Binding::GenericParam(p));
                    }
                }
            }
            if let Some(n) = nominal {
                if name == "Self" {
                    return Some(Binding::SelfType(n));
                }
                if let Some(ident) = ident {
                    for m in module.all_members(n) {
                        let member = module.decl(m);
                        if member.name.base != ident {
                            continue;
                        }
                        if member.is_nominal() {
                            return Some(Binding::Nominal(m));
                        }
                        if matches!(member.kind, DeclKind::AssociatedType(_)) {
                            return Some(Binding::AssociatedType { protocol: n, assoc: m });
                        }
                    }
                }
            }
            ctx = decl.context;
        }
        module.lookup_top_level(name).map(Binding::Nominal)
    }

    fn context_within(module: &Module, context: DeclContext, target: DeclId) -> bool {
        let mut ctx = context;
        while let Some(owner) = ctx.owner() {
            if owner == target || module.as_nominal(owner) == Some(target) {
                return true;
            }
            ctx = module.decl(owner).context;
        }
        false
    }

    fn apply_args(
        module: &mut Module,
        nominal: DeclId,
        args: Vec<TypeId>,
        context: DeclContext,
        kind: ResolutionKind,
    ) -> Result<TypeId, ResolveError> {
        let expected = module.own_generic_params(nominal).len();
        if args.is_empty() && expected > 0 {
            if kind == ResolutionKind::ExtensionTarget || Self::context_within(module, context, nominal) {
                return Ok(module.declared_interface_type(nominal));
            }
            return Err(ResolveError::MissingGenericArgs(module.name_of(nominal).to_string()));
        }
        if args.len() != expected {
            return Err(ResolveError::GenericArgCount {
                ty: module.name_of(nominal).to_string(),
                expected,
                found: args.len(),
            });
        }
        Ok(module.types.nominal(nominal, args))
    }

    fn resolve_named(
        &self,
        module: &mut Module,
        name: &str,
        args: Vec<TypeId>,
        context: DeclContext,
        kind: ResolutionKind,
    ) -> Result<TypeId, ResolveError> {
        match Self::lookup(module, name, context) {
            Some(Binding::GenericParam(p)) => {
                if !args.is_empty() {
                    return Err(ResolveError::GenericArgCount {
                        ty: name.to_string(),
                        expected: 0,
                        found: args.len(),
                    });
                }
                Ok(module.types.generic_param(p))
            }
            Some(Binding::Nominal(n)) => Self::apply_args(module, n, args, context, kind),
            Some(Binding::SelfType(n)) => Ok(module.declared_interface_type(n)),
            Some(Binding::AssociatedType { protocol, assoc }) => {
                let base = module.types.nominal(protocol, Vec::new());
                Ok(module.types.dependent_member(base, assoc))
            }
            None => Self::resolve_standard(module, name, args),
        }
    }

    fn resolve_standard(module: &mut Module, name: &str, args: Vec<TypeId>) -> Result<TypeId, ResolveError> {
        let arity = |expected: usize| -> Result<(), ResolveError> {
            if args.len() == expected {
                Ok(())
            } else if args.is_empty() {
                Err(ResolveError::MissingGenericArgs(name.to_string()))
            } else {
                Err(ResolveError::GenericArgCount {
                    ty: name.to_string(),
                    expected,
                    found: args.len(),
                })
            }
        };
        if let Some(builtin) = BuiltinType::from_name(name) {
            arity(0)?;
            return Ok(module.types.builtin(builtin));
        }
        match name {
            "Void" => {
                arity(0)?;
                Ok(module.types.void_type())
            }
            "Any" => {
                arity(0)?;
                Ok(module.types.composition(Vec::new()))
            }
            "Optional" => {
                arity(1)?;
                Ok(module.types.optional(args[0]))
            }
            "ImplicitlyUnwrappedOptional" => {
                arity(1)?;
                Ok(module.types.implicitly_unwrapped(args[0]))
            }
            "Array" => {
                arity(1)?;
                Ok(module.types.array(args[0]))
            }
            "Dictionary" => {
                arity(2)?;
                Ok(module.types.dictionary(args[0], args[1]))
            }
            _ => Err(ResolveError::UnknownType(name.to_string())),
        }
    }

    fn resolve_member(
        &self,
        module: &mut Module,
        base: TypeId,
        name: &str,
        args: Vec<TypeId>,
        context: DeclContext,
        kind: ResolutionKind,
    ) -> Result<TypeId, ResolveError> {
        let no_member = |module: &Module| ResolveError::NoMemberType {
            base: module.type_name(base),
            name: name.to_string(),
        };
        let protocols = match module.types.kind(base).clone() {
            TypeKind::GenericParam { decl } | TypeKind::Archetype { param: decl } => bound_protocols(module, decl),
            TypeKind::DependentMember { assoc, .. } => bound_protocols(module, assoc),
            TypeKind::Nominal { decl, .. } => {
                if let Some(nested) = module
                    .lookup_member(decl, name)
                    .into_iter()
                    .find(|m| module.decl(*m).is_nominal())
                {
                    return Self::apply_args(module, nested, args, context, kind);
                }
                if module.decl(decl).is_protocol() {
                    protocol_closure(module, &[decl])
                } else {
                    return Err(no_member(module));
                }
            }
            _ => return Err(no_member(module)),
        };
        match find_associated_type(module, &protocols, name) {
            Some(assoc) => Ok(module.types.dependent_member(base, assoc)),
            None => Err(no_member(module)),
        }
    }

    fn resolve_elements(
        &self,
        module: &mut Module,
        elements: &[(Option<String>, TypeRepr)],
        context: DeclContext,
    ) -> Result<Vec<Param>, ResolveError> {
        elements
            .iter()
            .map(|(label, repr)| {
                let ty = self.resolve_type(module, repr, context, ResolutionKind::TypeAnnotation)?;
                let label = label.as_deref().map(|l| module.ident(l));
                Ok(Param { label, ty })
            })
            .collect()
    }
}

impl TypeResolver for ScopedTypeResolver {
    fn resolve_type(
        &self,
        module: &mut Module,
        repr: &TypeRepr,
        context: DeclContext,
        kind: ResolutionKind,
    ) -> Result<TypeId, ResolveError> {
        trace!("resolving '{}' ({:?})", repr, kind);
        let nested = ResolutionKind::TypeAnnotation;
        match repr {
            TypeRepr::Named { name, args } => {
                let args = args
                    .iter()
                    .map(|a| self.resolve_type(module, a, context, nested))
                    .collect::<Result<Vec<_>, _>>()?;
                self.resolve_named(module, name, args, context, kind)
            }
            TypeRepr::Member { base, name, args } => {
                let base = self.resolve_type(module, base, context, nested)?;
                let args = args
                    .iter()
                    .map(|a| self.resolve_type(module, a, context, nested))
                    .collect::<Result<Vec<_>, _>>()?;
                self.resolve_member(module, base, name, args, context, kind)
            }
            TypeRepr::Optional(inner) => {
                let inner = self.resolve_type(module, inner, context, nested)?;
                Ok(module.types.optional(inner))
            }
            TypeRepr::ImplicitlyUnwrapped(inner) => {
                let inner = self.resolve_type(module, inner, context, nested)?;
                Ok(module.types.implicitly_unwrapped(inner))
            }
            TypeRepr::Array(inner) => {
                let inner = self.resolve_type(module, inner, context, nested)?;
                Ok(module.types.array(inner))
            }
            TypeRepr::Dictionary(key, value) => {
                let key = self.resolve_type(module, key, context, nested)?;
                let value = self.resolve_type(module, value, context, nested)?;
                Ok(module.types.dictionary(key, value))
            }
            TypeRepr::Tuple(elements) => {
                let elements = self.resolve_elements(module, elements, context)?;
                Ok(module.types.tuple(elements))
            }
            TypeRepr::Function { params, result, throws } => {
                let params = self.resolve_elements(module, params, context)?;
                let result = self.resolve_type(module, result, context, nested)?;
                Ok(module.types.function(FunctionType {
                    params,
                    result,
                    throws: *throws,
                    noreturn: false,
                }))
            }
            TypeRepr::Composition(parts) => {
                let parts = parts
                    .iter()
                    .map(|p| self.resolve_type(module, p, context, kind))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(module.types.composition(parts))
            }
        }
    }
}

/// Members of the nominal, its extensions, then up the superclass chain.
/// Members overridden by a nearer result are hidden.
#[derive(Debug, Default, Clone, Copy)]
pub struct NominalMemberLookup;

impl MemberLookup for NominalMemberLookup {
    fn lookup_members(&self, module: &Module, ty: TypeId, name: &DeclName) -> Vec<DeclId> {
        let mut results = Vec::new();
        let mut hidden = DeclSet::default();
        let mut visited = DeclSet::default();
        let mut current = module.types.nominal_decl(module.types.reference_storage_referent(ty));
        while let Some(nominal) = current {
            if !visited.insert(nominal) {
                break;
            }
            for m in module.all_members(nominal) {
                if module.decl(m).name.matches(name) && !hidden.contains(&m) {
                    results.push(m);
                }
            }
            for &m in &results {
                if let Some(base) = module.decl(m).overridden() {
                    hidden.insert(base);
                }
            }
            current = module.superclass_decl(nominal);
        }
        results.retain(|m| !hidden.contains(m));
        trace!(
            "lookup of '{}' in {} found {} member(s)",
            name.display(&module.interner),
            module.type_name(ty),
            results.len()
        );
        results
    }
}

/// Builtin literal conformances plus declared protocol lists
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclaredConformance;

impl DeclaredConformance {
    fn builtin_conforms(builtin: BuiltinType, protocol: &str) -> bool {
        if matches!(protocol, "Equatable" | "Hashable") {
            return true;
        }
        match builtin {
            BuiltinType::Float | BuiltinType::Double => matches!(protocol, INTEGER_LITERAL | FLOAT_LITERAL),
            BuiltinType::String => matches!(protocol, STRING_LITERAL | GRAPHEME_LITERAL | UNICODE_SCALAR_LITERAL),
            BuiltinType::Character => matches!(protocol, GRAPHEME_LITERAL | UNICODE_SCALAR_LITERAL),
            BuiltinType::Bool => protocol == BOOLEAN_LITERAL,
            _ => protocol == INTEGER_LITERAL,
        }
    }

    fn protocols_named(module: &Module, protocols: &[DeclId], protocol: &str) -> bool {
        protocol_closure(module, protocols)
            .into_iter()
            .any(|p| module.name_of(p) == protocol)
    }

    fn nominal_conforms(module: &Module, nominal: DeclId, protocol: &str, visited: &mut DeclSet) -> bool {
        if !visited.insert(nominal) {
            return false;
        }
        let decl = module.decl(nominal);
        if decl.is_protocol() && module.name_of(nominal) == protocol {
            return true;
        }
        let Some(data) = decl.nominal() else {
            return false;
        };
        let mut declared = data.protocols.clone();
        let mut clauses: Vec<&TypeLoc> = decl.inherited().iter().collect();
        for &ext in &data.extensions {
            if let Some(e) = module.decl(ext).extension() {
                declared.extend_from_slice(&e.protocols);
                clauses.extend(e.inherited.iter());
            }
        }
        if Self::protocols_named(module, &declared, protocol) {
            return true;
        }
        // clauses not yet resolved are matched by the written name
        for loc in clauses.into_iter().filter(|l| !l.is_resolved()) {
            let Some(head) = loc.repr.head_name() else {
                continue;
            };
            if head == protocol {
                return true;
            }
            if let Some(p) = module.lookup_top_level(head) {
                if Self::nominal_conforms(module, p, protocol, visited) {
                    return true;
                }
            }
        }
        match module.superclass_decl(nominal) {
            Some(superclass) => Self::nominal_conforms(module, superclass, protocol, visited),
            None => false,
        }
    }

    fn bound_conforms(module: &Module, decl: DeclId, protocol: &str) -> bool {
        if Self::protocols_named(module, &bound_protocols(module, decl), protocol) {
            return true;
        }
        let superclass = module.decl(decl).bounds().and_then(|b| b.superclass);
        match superclass.and_then(|s| module.types.nominal_decl(s)) {
            Some(class) => Self::nominal_conforms(module, class, protocol, &mut DeclSet::default()),
            None => false,
        }
    }
}

impl ConformanceChecker for DeclaredConformance {
    fn conforms_to(&self, module: &Module, ty: TypeId, protocol: &str, context: DeclContext) -> bool {
        match module.types.kind(ty) {
            TypeKind::Builtin(b) => Self::builtin_conforms(*b, protocol),
            TypeKind::Optional(_) | TypeKind::ImplicitlyUnwrappedOptional(_) => protocol == NIL_LITERAL,
            TypeKind::Array(_) => protocol == ARRAY_LITERAL,
            TypeKind::Dictionary(..) => protocol == DICTIONARY_LITERAL,
            TypeKind::Nominal { decl, .. } => Self::nominal_conforms(module, *decl, protocol, &mut DeclSet::default()),
            TypeKind::GenericParam { decl } | TypeKind::Archetype { param: decl } => {
                Self::bound_conforms(module, *decl, protocol)
            }
            TypeKind::DependentMember { assoc, .. } => Self::bound_conforms(module, *assoc, protocol),
            TypeKind::Composition(parts) => parts.iter().any(|p| self.conforms_to(module, *p, protocol, context)),
            TypeKind::ReferenceStorage { referent, .. } => self.conforms_to(module, *referent, protocol, context),
            TypeKind::Error | TypeKind::Tuple(_) | TypeKind::Function(_) | TypeKind::CanonicalParam { .. } => false,
        }
    }
}

/// Accepts a literal when the expected type conforms to the matching
/// literal protocol, and range-checks integers against fixed-width builtins
#[derive(Debug, Default, Clone, Copy)]
pub struct LiteralExpressionChecker {
    conformance: DeclaredConformance,
}

impl LiteralExpressionChecker {
    fn accepts(&self, module: &Module, expr: &LiteralExpr, context: DeclContext, expected: TypeId) -> bool {
        let conforms = |p: &str| self.conformance.conforms_to(module, expected, p, context);
        match expr.kind {
            LiteralKind::Integer => conforms(INTEGER_LITERAL),
            LiteralKind::Float => conforms(FLOAT_LITERAL),
            LiteralKind::String => {
                conforms(STRING_LITERAL)
                    || (expr.text.chars().count() == 1 && (conforms(GRAPHEME_LITERAL) || conforms(UNICODE_SCALAR_LITERAL)))
            }
        }
    }
}

impl ExpressionChecker for LiteralExpressionChecker {
    fn type_check_expression(
        &self,
        module: &Module,
        expr: &LiteralExpr,
        context: DeclContext,
        expected: TypeId,
        sink: &mut dyn DiagnosticSink,
    ) -> bool {
        if module.types.is_error(expected) {
            return true;
        }
        if !self.accepts(module, expr, context, expected) {
            let literal = match expr.kind {
                LiteralKind::Integer => "integer",
                LiteralKind::Float => "floating-point",
                LiteralKind::String => "string",
            };
            sink.diagnose(DeclDiagnostic::new(
                DiagKind::LiteralTypeMismatch {
                    literal,
                    ty: module.type_name(expected),
                },
                expr.span,
            ));
            return true;
        }
        if expr.kind == LiteralKind::Integer {
            let layout = match module.types.kind(expected) {
                TypeKind::Builtin(b) => b.integer_layout(),
                _ => None,
            };
            if let Some((bits, signed)) = layout {
                let (min, max) = integer_bounds(bits, signed);
                let fits = parse_integer(&expr.text).is_some_and(|v| v >= min && v <= max);
                if !fits {
                    sink.diagnose(DeclDiagnostic::new(
                        DiagKind::IntegerLiteralOverflow {
                            literal: expr.text.clone(),
                            ty: module.type_name(expected),
                        },
                        expr.span,
                    ));
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(module: &mut Module, text: &str, context: DeclContext) -> Result<TypeId, ResolveError> {
        let repr = TypeRepr::parse(text).unwrap();
        ScopedTypeResolver.resolve_type(module, &repr, context, ResolutionKind::TypeAnnotation)
    }

    #[test]
    fn test_scoped_resolution() {
        let mut b = ModuleBuilder::new("M");
        let boxed = b.class("Box", &[]);
        let t = b.generic_param(boxed, "T", &[]);
        let f = b.func(Some(boxed), "f", &[], None);
        let mut module = b.finish().unwrap();

        let inside = DeclContext::Decl(f);
        let ty = resolve(&mut module, "[T]", inside).unwrap();
        let t_ty = module.types.generic_param(t);
        assert_eq!(ty, module.types.array(t_ty));

        assert_eq!(
            resolve(&mut module, "Box", DeclContext::Module),
            Err(ResolveError::MissingGenericArgs("Box".into()))
        );
        assert!(resolve(&mut module, "Box", inside).is_ok());
        assert!(matches!(
            resolve(&mut module, "Box<Int, Int>", DeclContext::Module),
            Err(ResolveError::GenericArgCount { expected: 1, found: 2, .. })
        ));
        assert_eq!(
            resolve(&mut module, "Missing", DeclContext::Module),
            Err(ResolveError::UnknownType("Missing".into()))
        );
        let int = module.types.builtin(BuiltinType::Int);
        assert_eq!(resolve(&mut module, "Optional<Int>", DeclContext::Module), Ok(module.types.optional(int)));
    }

    #[test]
    fn test_literal_conformances() {
        let mut module = Module::new("M");
        let conformance = DeclaredConformance;
        let double = module.types.builtin(BuiltinType::Double);
        let string = module.types.builtin(BuiltinType::String);
        let opt = module.types.optional(string);
        assert!(conformance.conforms_to(&module, double, INTEGER_LITERAL, DeclContext::Module));
        assert!(conformance.conforms_to(&module, double, FLOAT_LITERAL, DeclContext::Module));
        assert!(!conformance.conforms_to(&module, string, INTEGER_LITERAL, DeclContext::Module));
        assert!(conformance.conforms_to(&module, opt, NIL_LITERAL, DeclContext::Module));
    }

    #[test]
    fn test_literal_checker_reports_overflow_and_mismatch() {
        let module = Module::new("M");
        let uint8 = module.types.builtin(BuiltinType::UInt8);
        let checker = LiteralExpressionChecker::default();
        let mut sink = CollectingSink::default();

        assert!(!checker.type_check_expression(&module, &LiteralExpr::integer("255"), DeclContext::Module, uint8, &mut sink));
        assert!(checker.type_check_expression(&module, &LiteralExpr::integer("256"), DeclContext::Module, uint8, &mut sink));
        assert!(checker.type_check_expression(&module, &LiteralExpr::string("a"), DeclContext::Module, uint8, &mut sink));

        let codes: Vec<u16> = sink.take().iter().map(|d| d.code()).collect();
        assert_eq!(codes, vec![1509, 1507]);
    }
}
