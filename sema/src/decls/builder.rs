//! Programmatic construction of declaration graphs
//!
//! Used by the JSON loader and by tests. Type expressions are given as text
//! and parsed on the spot; parse failures are collected and reported by
//! [`ModuleBuilder::finish`] so construction code can stay linear.

use super::*;
use source_map::SourceSpan;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("in '{decl}': {source}")]
    TypeRepr {
        decl: String,
        #[source]
        source: TypeReprError,
    },
    #[error("in '{decl}': malformed requirement '{text}'")]
    Requirement { decl: String, text: String },
    #[error("'{decl}' cannot have {what}")]
    Misplaced { decl: String, what: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NominalKind {
    Class,
    Struct,
    Enum,
    Protocol,
}

/// A parameter given as `(label, type)`; a `None` label is `_`
pub type ParamSpec<'a> = (Option<&'a str>, &'a str);

pub struct ModuleBuilder {
    module: Module,
    errors: Vec<BuildError>,
    next_line: usize,
}

impl ModuleBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            module: Module::new(name),
            errors: Vec::new(),
            next_line: 0,
        }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    fn next_span(&mut self, len: usize) -> SourceSpan {
        self.next_line += 1;
        SourceSpan::at(self.module.file, self.next_line, 1, len.max(1))
    }

    fn type_loc(&mut self, owner: &str, text: &str, span: SourceSpan) -> TypeLoc {
        match TypeRepr::parse(text) {
            Ok(repr) => TypeLoc::new(repr, span),
            Err(source) => {
                self.errors.push(BuildError::TypeRepr {
                    decl: owner.to_string(),
                    source,
                });
                let mut loc = TypeLoc::new(TypeRepr::named(text), span);
                loc.set_invalid(self.module.types.error_type());
                loc
            }
        }
    }

    fn type_locs(&mut self, owner: &str, texts: &[&str], span: SourceSpan) -> Vec<TypeLoc> {
        texts.iter().map(|t| self.type_loc(owner, t, span)).collect()
    }

    fn params(&mut self, owner: &str, params: &[ParamSpec<'_>], span: SourceSpan) -> Vec<ParamDecl> {
        params
            .iter()
            .map(|(label, ty)| {
                let label_id = label.map(|l| self.module.ident(l));
                ParamDecl {
                    label: label_id,
                    name: label_id.unwrap_or(Identifier::EMPTY),
                    ty: self.type_loc(owner, ty, span),
                }
            })
            .collect()
    }

    fn context_for(owner: Option<DeclId>) -> DeclContext {
        match owner {
            Some(o) => DeclContext::Decl(o),
            None => DeclContext::Module,
        }
    }

    fn alloc(&mut self, name: DeclName, kind: DeclKind, context: DeclContext) -> DeclId {
        let len = self.module.interner.resolve(name.base).len();
        let span = self.next_span(len);
        self.alloc_at(name, kind, context, span)
    }

    fn alloc_at(&mut self, name: DeclName, kind: DeclKind, context: DeclContext, span: SourceSpan) -> DeclId {
        let is_generic_param = matches!(kind, DeclKind::GenericParam(_));
        let id = self.module.decls.alloc(Decl::new(name, kind, context, span));
        match context {
            DeclContext::Module => self.module.top_level.push(id),
            DeclContext::Decl(owner) if !is_generic_param => {
                let owner_name = self.module.full_name(owner);
                match self.module.decls[owner].members_mut() {
                    Some(members) => members.push(id),
                    None => self.errors.push(BuildError::Misplaced {
                        decl: owner_name,
                        what: "members",
                    }),
                }
            }
            _ => {}
        }
        id
    }

    pub fn nominal(&mut self, kind: NominalKind, name: &str, parent: Option<DeclId>, inherits: &[&str]) -> DeclId {
        let span = self.next_span(name.len());
        let data = NominalData {
            inherited: self.type_locs(name, inherits, span),
            ..Default::default()
        };
        let kind = match kind {
            NominalKind::Class => DeclKind::Class(data),
            NominalKind::Struct => DeclKind::Struct(data),
            NominalKind::Enum => DeclKind::Enum(data),
            NominalKind::Protocol => DeclKind::Protocol(data),
        };
        let ident = self.module.ident(name);
        self.alloc_at(DeclName::simple(ident), kind, Self::context_for(parent), span)
    }

    pub fn class(&mut self, name: &str, inherits: &[&str]) -> DeclId {
        self.nominal(NominalKind::Class, name, None, inherits)
    }

    pub fn struct_decl(&mut self, name: &str, inherits: &[&str]) -> DeclId {
        self.nominal(NominalKind::Struct, name, None, inherits)
    }

    pub fn enum_decl(&mut self, name: &str, inherits: &[&str]) -> DeclId {
        self.nominal(NominalKind::Enum, name, None, inherits)
    }

    pub fn protocol(&mut self, name: &str, inherits: &[&str]) -> DeclId {
        self.nominal(NominalKind::Protocol, name, None, inherits)
    }

    pub fn extension(&mut self, extended: &str, inherits: &[&str]) -> DeclId {
        let span = self.next_span(extended.len());
        let data = ExtensionData {
            extended: self.type_loc(extended, extended, span),
            nominal: None,
            inherited: self.type_locs(extended, inherits, span),
            members: Vec::new(),
            protocols: Vec::new(),
            where_clause: Vec::new(),
            signature: None,
            default_access: None,
            max_access: None,
        };
        let ident = self.module.ident(extended);
        self.alloc_at(DeclName::simple(ident), DeclKind::Extension(data), DeclContext::Module, span)
    }

    /// Append entries to an existing inheritance clause
    pub fn inherit(&mut self, decl: DeclId, inherits: &[&str]) {
        let owner = self.module.full_name(decl);
        let span = self.module.decls[decl].span;
        let locs = self.type_locs(&owner, inherits, span);
        match self.module.decls[decl].inherited_mut() {
            Some(clause) => clause.extend(locs),
            None => self.errors.push(BuildError::Misplaced {
                decl: owner,
                what: "an inheritance clause",
            }),
        }
    }

    pub fn generic_param(&mut self, owner: DeclId, name: &str, inherits: &[&str]) -> DeclId {
        let span = self.next_span(name.len());
        let bounds = BoundData {
            inherited: self.type_locs(name, inherits, span),
            ..Default::default()
        };
        let index = self.module.decls[owner]
            .generic_params()
            .map_or(0, |g| g.params.len() as u32);
        let ident = self.module.ident(name);
        let param = self.alloc_at(
            DeclName::simple(ident),
            DeclKind::GenericParam(GenericParamData {
                bounds,
                depth: 0,
                index,
            }),
            DeclContext::Decl(owner),
            span,
        );
        let owner_name = self.module.full_name(owner);
        match &mut self.module.decls[owner].kind {
            DeclKind::Class(n) | DeclKind::Struct(n) | DeclKind::Enum(n) | DeclKind::Protocol(n) => {
                n.generic_params.get_or_insert_with(Default::default).params.push(param)
            }
            DeclKind::Func(f) => f.generic_params.get_or_insert_with(Default::default).params.push(param),
            DeclKind::Constructor(c) => c.generic_params.get_or_insert_with(Default::default).params.push(param),
            _ => self.errors.push(BuildError::Misplaced {
                decl: owner_name,
                what: "generic parameters",
            }),
        }
        param
    }

    /// Add a `T: P` or `T == U` requirement to a generic declaration's
    /// parameter list or an extension's where-clause
    pub fn requirement(&mut self, owner: DeclId, text: &str) {
        let owner_name = self.module.full_name(owner);
        let span = self.module.decls[owner].span;
        let (kind, subject, constraint) = match text.split_once("==") {
            Some((l, r)) => (RequirementKind::SameType, l, r),
            None => match text.split_once(':') {
                Some((l, r)) => (RequirementKind::Conformance, l, r),
                None => {
                    self.errors.push(BuildError::Requirement {
                        decl: owner_name,
                        text: text.to_string(),
                    });
                    return;
                }
            },
        };
        let requirement = RequirementRepr {
            kind,
            subject: self.type_loc(&owner_name, subject.trim(), span),
            constraint: self.type_loc(&owner_name, constraint.trim(), span),
            invalid: false,
            span,
        };
        match &mut self.module.decls[owner].kind {
            DeclKind::Extension(e) => e.where_clause.push(requirement),
            DeclKind::Class(n) | DeclKind::Struct(n) | DeclKind::Enum(n) | DeclKind::Protocol(n) => n
                .generic_params
                .get_or_insert_with(Default::default)
                .requirements
                .push(requirement),
            DeclKind::Func(f) => f
                .generic_params
                .get_or_insert_with(Default::default)
                .requirements
                .push(requirement),
            DeclKind::Constructor(c) => c
                .generic_params
                .get_or_insert_with(Default::default)
                .requirements
                .push(requirement),
            _ => self.errors.push(BuildError::Misplaced {
                decl: owner_name,
                what: "a where-clause",
            }),
        }
    }

    pub fn associated_type(&mut self, protocol: DeclId, name: &str, inherits: &[&str], default: Option<&str>) -> DeclId {
        let span = self.next_span(name.len());
        let data = AssociatedTypeData {
            bounds: BoundData {
                inherited: self.type_locs(name, inherits, span),
                ..Default::default()
            },
            default: default.map(|d| self.type_loc(name, d, span)),
        };
        let ident = self.module.ident(name);
        self.alloc_at(DeclName::simple(ident), DeclKind::AssociatedType(data), DeclContext::Decl(protocol), span)
    }

    /// A mutable stored property (or global variable) without an initializer
    pub fn var(&mut self, owner: Option<DeclId>, name: &str, ty: &str) -> DeclId {
        let span = self.next_span(name.len());
        let data = VarData {
            ty: Some(self.type_loc(name, ty, span)),
            is_let: false,
            storage: StorageKind::Stored,
            has_initializer: false,
            getter: None,
            setter: None,
            overridden: None,
        };
        let ident = self.module.ident(name);
        self.alloc_at(DeclName::simple(ident), DeclKind::Var(data), Self::context_for(owner), span)
    }

    /// A stored property written without a type annotation
    pub fn untyped_var(&mut self, owner: Option<DeclId>, name: &str) -> DeclId {
        let span = self.next_span(name.len());
        let data = VarData {
            ty: None,
            is_let: false,
            storage: StorageKind::Stored,
            has_initializer: false,
            getter: None,
            setter: None,
            overridden: None,
        };
        let ident = self.module.ident(name);
        self.alloc_at(DeclName::simple(ident), DeclKind::Var(data), Self::context_for(owner), span)
    }

    pub fn func(&mut self, owner: Option<DeclId>, name: &str, params: &[ParamSpec<'_>], result: Option<&str>) -> DeclId {
        let span = self.next_span(name.len());
        let data = FuncData {
            params: self.params(name, params, span),
            result: result.map(|r| self.type_loc(name, r, span)),
            ..Default::default()
        };
        let decl_name = self.compound_name(name, params);
        self.alloc_at(decl_name, DeclKind::Func(data), Self::context_for(owner), span)
    }

    pub fn subscript(&mut self, owner: DeclId, params: &[ParamSpec<'_>], element: &str, settable: bool) -> DeclId {
        let span = self.next_span("subscript".len());
        let data = SubscriptData {
            indices: self.params("subscript", params, span),
            element: self.type_loc("subscript", element, span),
            settable,
            getter: None,
            setter: None,
            overridden: None,
        };
        let decl_name = self.compound_name("subscript", params);
        self.alloc_at(decl_name, DeclKind::Subscript(data), DeclContext::Decl(owner), span)
    }

    /// A designated initializer
    pub fn init(&mut self, owner: DeclId, params: &[ParamSpec<'_>]) -> DeclId {
        let span = self.next_span("init".len());
        let data = ConstructorData {
            params: self.params("init", params, span),
            generic_params: None,
            signature: None,
            throws: false,
            failable: false,
            kind: CtorKind::Designated,
            implicit: None,
            overridden: None,
        };
        let decl_name = self.compound_name("init", params);
        self.alloc_at(decl_name, DeclKind::Constructor(data), DeclContext::Decl(owner), span)
    }

    pub fn deinit(&mut self, owner: DeclId) -> DeclId {
        let ident = self.module.ident("deinit");
        self.alloc(DeclName::simple(ident), DeclKind::Destructor, DeclContext::Decl(owner))
    }

    pub fn case(&mut self, owner: DeclId, name: &str, raw: Option<LiteralExpr>) -> DeclId {
        let span = self.next_span(name.len());
        let raw_value = raw.map(|r| if r.span.is_unknown() { r.at(span) } else { r });
        let ident = self.module.ident(name);
        self.alloc_at(
            DeclName::simple(ident),
            DeclKind::EnumElement(EnumElementData {
                payload: None,
                raw_value,
            }),
            DeclContext::Decl(owner),
            span,
        )
    }

    pub fn case_with_payload(&mut self, owner: DeclId, name: &str, payload: &str) -> DeclId {
        let case = self.case(owner, name, None);
        let span = self.module.decls[case].span;
        let loc = self.type_loc(name, payload, span);
        if let DeclKind::EnumElement(e) = &mut self.module.decls[case].kind {
            e.payload = Some(loc);
        }
        case
    }

    fn compound_name(&mut self, base: &str, params: &[ParamSpec<'_>]) -> DeclName {
        let base = self.module.ident(base);
        let labels = params.iter().map(|(l, _)| l.map(|l| self.module.ident(l))).collect();
        DeclName::compound(base, labels)
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.module.decls[id]
    }

    pub fn attrs(&mut self, id: DeclId) -> &mut Attributes {
        &mut self.module.decls[id].attrs
    }

    pub fn set_access(&mut self, id: DeclId, access: Accessibility) {
        self.attrs(id).access = Some(access);
    }

    pub fn set_storage(&mut self, id: DeclId, storage: StorageKind) {
        if let DeclKind::Var(v) = &mut self.module.decls[id].kind {
            v.storage = storage;
        }
    }

    pub fn set_let(&mut self, id: DeclId) {
        if let DeclKind::Var(v) = &mut self.module.decls[id].kind {
            v.is_let = true;
        }
    }

    pub fn set_initializer(&mut self, id: DeclId) {
        if let DeclKind::Var(v) = &mut self.module.decls[id].kind {
            v.has_initializer = true;
        }
    }

    pub fn set_ctor_kind(&mut self, id: DeclId, kind: CtorKind) {
        if let DeclKind::Constructor(c) = &mut self.module.decls[id].kind {
            c.kind = kind;
        }
    }

    pub fn set_throws(&mut self, id: DeclId) {
        match &mut self.module.decls[id].kind {
            DeclKind::Func(f) => f.throws = true,
            DeclKind::Constructor(c) => c.throws = true,
            _ => {}
        }
    }

    pub fn set_failable(&mut self, id: DeclId) {
        if let DeclKind::Constructor(c) = &mut self.module.decls[id].kind {
            c.failable = true;
        }
    }

    /// Place a declaration in the source; its written types, requirements
    /// and raw value move with it
    pub fn at(&mut self, id: DeclId, line: usize, column: usize) {
        let file = self.module.file;
        let len = self.module.name_of(id).len().max(1);
        let span = SourceSpan::at(file, line, column, len);
        let decl = &mut self.module.decls[id];
        decl.span = span;

        fn params(list: &mut [ParamDecl], span: SourceSpan) {
            list.iter_mut().for_each(|p| p.ty.span = span);
        }
        fn generics(list: &mut Option<GenericParamList>, span: SourceSpan) {
            for r in list.iter_mut().flat_map(|g| g.requirements.iter_mut()) {
                r.span = span;
                r.subject.span = span;
                r.constraint.span = span;
            }
        }
        match &mut decl.kind {
            DeclKind::Class(n) | DeclKind::Struct(n) | DeclKind::Enum(n) | DeclKind::Protocol(n) => {
                n.inherited.iter_mut().for_each(|t| t.span = span);
                generics(&mut n.generic_params, span);
            }
            DeclKind::Extension(e) => {
                e.extended.span = span;
                e.inherited.iter_mut().for_each(|t| t.span = span);
                for r in &mut e.where_clause {
                    r.span = span;
                    r.subject.span = span;
                    r.constraint.span = span;
                }
            }
            DeclKind::Var(v) => {
                if let Some(ty) = &mut v.ty {
                    ty.span = span;
                }
            }
            DeclKind::Func(f) => {
                params(&mut f.params, span);
                if let Some(result) = &mut f.result {
                    result.span = span;
                }
                generics(&mut f.generic_params, span);
            }
            DeclKind::Subscript(s) => {
                params(&mut s.indices, span);
                s.element.span = span;
            }
            DeclKind::Constructor(c) => {
                params(&mut c.params, span);
                generics(&mut c.generic_params, span);
            }
            DeclKind::EnumElement(e) => {
                if let Some(payload) = &mut e.payload {
                    payload.span = span;
                }
                if let Some(raw) = &mut e.raw_value {
                    raw.span = span;
                }
            }
            DeclKind::GenericParam(g) => g.bounds.inherited.iter_mut().for_each(|t| t.span = span),
            DeclKind::AssociatedType(a) => {
                a.bounds.inherited.iter_mut().for_each(|t| t.span = span);
                if let Some(default) = &mut a.default {
                    default.span = span;
                }
            }
            DeclKind::Destructor => {}
        }
    }

    /// Create getter and setter functions for every property and subscript
    fn synthesize_accessors(&mut self) {
        let storage: Vec<DeclId> = self
            .module
            .decls
            .iter()
            .filter(|(_, d)| matches!(d.kind, DeclKind::Var(_) | DeclKind::Subscript(_)))
            .map(|(id, _)| id)
            .collect();
        for id in storage {
            if self.module.decls[id].accessors().0.is_some() {
                continue;
            }
            let getter = self.make_accessor(id, AccessorKind::Getter);
            let setter = self.module.decls[id]
                .is_settable()
                .then(|| self.make_accessor(id, AccessorKind::Setter));
            match &mut self.module.decls[id].kind {
                DeclKind::Var(v) => {
                    v.getter = Some(getter);
                    v.setter = setter;
                }
                DeclKind::Subscript(s) => {
                    s.getter = Some(getter);
                    s.setter = setter;
                }
                _ => {}
            }
        }
    }

    fn make_accessor(&mut self, storage: DeclId, kind: AccessorKind) -> DeclId {
        let decl = &self.module.decls[storage];
        let mut accessor = Decl::new(
            decl.name.clone(),
            DeclKind::Func(FuncData {
                accessor: Some((storage, kind)),
                ..Default::default()
            }),
            decl.context,
            decl.span,
        );
        accessor.attrs.is_static = decl.attrs.is_static;
        accessor.implicit = true;
        self.module.decls.alloc(accessor)
    }

    pub fn finish(mut self) -> Result<Module, BuildError> {
        if !self.errors.is_empty() {
            return Err(self.errors.swap_remove(0));
        }
        self.synthesize_accessors();
        Ok(self.module)
    }
}
