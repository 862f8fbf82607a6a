//! Declaration validation and the module driver
//!
//! [`DeclChecker::validate_decl`] is the lazy entry point: it computes a
//! declaration's interface type and accessibility on first request and
//! returns immediately for declarations already validated or currently on
//! the validation stack. [`DeclChecker::type_check_decl`] adds the checks
//! that only run once per declaration (members, raw values, implicit
//! initializers, redeclarations, the accessibility audit), and
//! [`DeclChecker::check_module`] runs it over every top-level declaration.

use super::{DeclChecker, DiagKind, ResolutionKind};
use crate::decls::*;
use log::{debug, info, trace};

impl DeclChecker<'_> {
    /// Attach an extension to the nominal type it extends
    pub(crate) fn bind_extension(&mut self, id: DeclId) {
        let decl = self.decl(id);
        let Some(ext) = decl.extension() else {
            return;
        };
        if ext.nominal.is_some() || ext.extended.invalid || decl.is_invalid() {
            return;
        }
        let mut loc = ext.extended.clone();
        let ty = self.resolve_loc(&mut loc, DeclContext::Module, ResolutionKind::ExtensionTarget);
        let nominal = self.module.types.nominal_decl(ty);
        if let Some(data) = self.decl_mut(id).extension_mut() {
            data.extended = loc;
            data.nominal = nominal;
        }

        match nominal {
            Some(nominal) => {
                if let Some(data) = self.decl_mut(nominal).nominal_mut() {
                    if !data.extensions.contains(&id) {
                        data.extensions.push(id);
                    }
                }
                trace!("bound extension of '{}'", self.name(nominal));
            }
            None => {
                if !self.module.types.is_error(ty) {
                    let span = self.decl(id).extension().map_or_else(|| self.span(id), |e| e.extended.span);
                    self.diagnose(DiagKind::NonNominalExtension { ty: self.type_name(ty) }, span);
                }
                self.poison(id);
            }
        }
    }

    fn bind_extensions(&mut self) {
        if self.extensions_bound {
            return;
        }
        self.extensions_bound = true;
        let top_level = self.module.top_level.clone();
        for id in top_level {
            if self.decl(id).is_extension() {
                self.bind_extension(id);
            }
        }
    }

    /// Give a declaration its interface type and accessibility. Re-entrant
    /// requests for a declaration already being validated return at once and
    /// leave its semantic fields as they are.
    pub fn validate_decl(&mut self, id: DeclId) {
        if self.decl(id).state.validated {
            return;
        }
        let Some(_guard) = self.in_flight.enter(id) else {
            trace!("'{}' is already being validated", self.name(id));
            return;
        };
        self.bind_extensions();

        match &self.decl(id).kind {
            DeclKind::Class(_) | DeclKind::Struct(_) | DeclKind::Enum(_) | DeclKind::Protocol(_) => {
                self.validate_nominal(id)
            }
            DeclKind::Extension(_) => self.validate_extension_decl(id),
            DeclKind::Var(_) => self.validate_var(id),
            DeclKind::Func(f) => match f.accessor {
                Some((storage, kind)) => self.validate_accessor(id, storage, kind),
                None => self.validate_func(id),
            },
            DeclKind::Subscript(_) => self.validate_subscript(id),
            DeclKind::Constructor(_) => self.validate_constructor(id),
            DeclKind::Destructor => {
                let void = self.module.types.void_type();
                let ty = self.module.types.function(FunctionType {
                    params: Vec::new(),
                    result: void,
                    throws: false,
                    noreturn: false,
                });
                self.decl_mut(id).interface_type = Some(ty);
            }
            DeclKind::EnumElement(_) => self.validate_enum_element(id),
            DeclKind::GenericParam(_) => {
                self.check_inheritance_clause(id);
                let ty = self.module.types.generic_param(id);
                self.decl_mut(id).interface_type = Some(ty);
            }
            DeclKind::AssociatedType(_) => self.validate_associated_type(id),
        }

        if self.decl(id).interface_type.is_none() && self.decl(id).is_invalid() {
            let error = self.error_type();
            self.decl_mut(id).interface_type = Some(error);
        }
        self.compute_accessibility(id);
        self.decl_mut(id).state.validated = true;
        self.stats.decls_validated += 1;
        debug!(
            "validated {} '{}'{}",
            self.decl(id).descriptive_kind(),
            self.module.full_name(id),
            if self.decl(id).is_invalid() { " (invalid)" } else { "" }
        );

        let overridable = matches!(
            self.decl(id).kind,
            DeclKind::Var(_) | DeclKind::Subscript(_) | DeclKind::Constructor(_) | DeclKind::Func(FuncData { accessor: None, .. })
        );
        if overridable && matches!(self.decl(id).context, DeclContext::Decl(_)) {
            self.check_overrides(id);
        }
    }

    fn validate_nominal(&mut self, id: DeclId) {
        self.validate_generic_signature(id);
        self.check_inheritance_clause(id);
        if self.decl(id).is_class() || self.decl(id).is_protocol() || self.decl(id).is_enum() {
            self.check_circularity(id);
        }
        if !self.decl(id).is_invalid() {
            let ty = self.module.declared_interface_type(id);
            self.decl_mut(id).interface_type = Some(ty);
        }
    }

    /// Bind an extension, solve its where-clause, resolve its inheritance
    /// clause and compute the default accessibility of its members
    pub fn validate_extension(&mut self, id: DeclId) {
        if self.decl(id).is_extension() {
            self.validate_decl(id);
        }
    }

    fn validate_extension_decl(&mut self, id: DeclId) {
        self.bind_extension(id);
        if self.decl(id).is_invalid() {
            return;
        }
        self.validate_generic_signature(id);
        self.check_inheritance_clause(id);
        self.compute_extension_access(id);
        if let Some(nominal) = self.decl(id).extension().and_then(|e| e.nominal) {
            let ty = self.module.declared_interface_type(nominal);
            self.decl_mut(id).interface_type = Some(ty);
        }
    }

    fn validate_var(&mut self, id: DeclId) {
        let context = self.decl(id).context;
        let Some(mut loc) = (match &self.decl(id).kind {
            DeclKind::Var(v) => v.ty.clone(),
            _ => None,
        }) else {
            self.diagnose(DiagKind::MissingTypeAnnotation { name: self.name(id) }, self.span(id));
            self.poison(id);
            return;
        };
        let mut ty = self.resolve_loc(&mut loc, context, ResolutionKind::TypeAnnotation);
        if let DeclKind::Var(v) = &mut self.decl_mut(id).kind {
            v.ty = Some(loc);
        }
        if self.module.types.is_error(ty) {
            self.poison(id);
            return;
        }
        let ownership = self.decl(id).attrs.ownership;
        if ownership != Ownership::Strong {
            ty = self.module.types.reference_storage(ownership, ty);
        }
        self.decl_mut(id).interface_type = Some(ty);
        self.validate_accessors_of(id);
    }

    /// Accessors take the final, dynamic and static bits of their storage
    fn validate_accessors_of(&mut self, storage: DeclId) {
        let (getter, setter) = self.decl(storage).accessors();
        let attrs = self.decl(storage).attrs.clone();
        for accessor in [getter, setter].into_iter().flatten() {
            let accessor_attrs = &mut self.decl_mut(accessor).attrs;
            accessor_attrs.is_final |= attrs.is_final;
            accessor_attrs.is_dynamic |= attrs.is_dynamic;
            accessor_attrs.is_static = attrs.is_static;
            self.validate_decl(accessor);
        }
    }

    /// Getter `(indices) -> T` and setter `(T, indices) -> ()` of a property
    /// or subscript
    fn validate_accessor(&mut self, id: DeclId, storage: DeclId, kind: AccessorKind) {
        self.validate_decl(storage);
        if self.decl(storage).is_invalid() {
            self.poison(id);
            return;
        }
        let Some(storage_ty) = self.decl(storage).interface_type else {
            return;
        };
        let is_subscript = matches!(self.decl(storage).kind, DeclKind::Subscript(_));
        let types = &mut self.module.types;
        let (indices, value) = match types.as_function(storage_ty).cloned() {
            Some(f) if is_subscript => (f.params, f.result),
            _ => (Vec::new(), types.reference_storage_referent(storage_ty)),
        };
        let void = types.void_type();
        let function = match kind {
            AccessorKind::Getter => FunctionType {
                params: indices,
                result: value,
                throws: false,
                noreturn: false,
            },
            AccessorKind::Setter => {
                let mut params = vec![Param::unlabeled(value)];
                params.extend(indices);
                FunctionType {
                    params,
                    result: void,
                    throws: false,
                    noreturn: false,
                }
            }
        };
        let ty = types.function(function);
        self.decl_mut(id).interface_type = Some(ty);
    }

    /// Resolve parameter types in `context`, writing them back. Returns the
    /// function parameters and whether any failed.
    fn resolve_params(&mut self, params: &mut [ParamDecl], context: DeclContext) -> (Vec<Param>, bool) {
        let mut failed = false;
        let mut resolved = Vec::with_capacity(params.len());
        for param in params.iter_mut() {
            let ty = self.resolve_loc(&mut param.ty, context, ResolutionKind::TypeAnnotation);
            failed |= self.module.types.is_error(ty);
            resolved.push(Param { label: param.label, ty });
        }
        (resolved, failed)
    }

    fn validate_func(&mut self, id: DeclId) {
        self.validate_generic_signature(id);
        let context = DeclContext::Decl(id);
        let DeclKind::Func(data) = &self.decl(id).kind else {
            return;
        };
        let mut params = data.params.clone();
        let mut result = data.result.clone();
        let throws = data.throws || self.decl(id).attrs.rethrows;
        let noreturn = self.decl(id).attrs.noreturn;

        let (param_types, mut failed) = self.resolve_params(&mut params, context);
        let result_ty = match result.as_mut() {
            Some(loc) => {
                let ty = self.resolve_loc(loc, context, ResolutionKind::TypeAnnotation);
                failed |= self.module.types.is_error(ty);
                ty
            }
            None => self.module.types.void_type(),
        };
        if let DeclKind::Func(data) = &mut self.decl_mut(id).kind {
            data.params = params;
            data.result = result;
        }

        let ty = self.module.types.function(FunctionType {
            params: param_types,
            result: result_ty,
            throws,
            noreturn,
        });
        let decl = self.decl_mut(id);
        decl.interface_type = Some(ty);
        if failed {
            decl.set_invalid();
        }
    }

    fn validate_subscript(&mut self, id: DeclId) {
        let context = self.decl(id).context;
        let DeclKind::Subscript(data) = &self.decl(id).kind else {
            return;
        };
        let mut indices = data.indices.clone();
        let mut element = data.element.clone();
        let (params, mut failed) = self.resolve_params(&mut indices, context);
        let element_ty = self.resolve_loc(&mut element, context, ResolutionKind::TypeAnnotation);
        failed |= self.module.types.is_error(element_ty);
        if let DeclKind::Subscript(data) = &mut self.decl_mut(id).kind {
            data.indices = indices;
            data.element = element;
        }
        if failed {
            self.poison(id);
            return;
        }
        let ty = self.module.types.function(FunctionType {
            params,
            result: element_ty,
            throws: false,
            noreturn: false,
        });
        self.decl_mut(id).interface_type = Some(ty);
        self.validate_accessors_of(id);
    }

    fn validate_constructor(&mut self, id: DeclId) {
        self.validate_generic_signature(id);
        let context = DeclContext::Decl(id);
        let DeclKind::Constructor(data) = &self.decl(id).kind else {
            return;
        };
        let mut params = data.params.clone();
        let (throws, failable) = (data.throws, data.failable);
        let (param_types, failed) = self.resolve_params(&mut params, context);
        if let DeclKind::Constructor(data) = &mut self.decl_mut(id).kind {
            data.params = params;
        }

        let Some(nominal) = self.module.context_nominal(self.decl(id).context) else {
            self.poison(id);
            return;
        };
        let mut result = self.module.declared_interface_type(nominal);
        if failable {
            result = self.module.types.optional(result);
        }
        let ty = self.module.types.function(FunctionType {
            params: param_types,
            result,
            throws,
            noreturn: false,
        });
        let decl = self.decl_mut(id);
        decl.interface_type = Some(ty);
        if failed {
            decl.set_invalid();
        }
    }

    fn validate_enum_element(&mut self, id: DeclId) {
        let context = self.decl(id).context;
        let Some(owner) = self.module.context_nominal(context) else {
            self.poison(id);
            return;
        };
        let enum_ty = self.module.declared_interface_type(owner);
        let payload = match &self.decl(id).kind {
            DeclKind::EnumElement(e) => e.payload.clone(),
            _ => None,
        };
        let Some(mut payload) = payload else {
            self.decl_mut(id).interface_type = Some(enum_ty);
            return;
        };
        let payload_ty = self.resolve_loc(&mut payload, context, ResolutionKind::TypeAnnotation);
        if let DeclKind::EnumElement(e) = &mut self.decl_mut(id).kind {
            e.payload = Some(payload);
        }
        if self.module.types.is_error(payload_ty) {
            self.poison(id);
            return;
        }
        let params = match self.module.types.kind(payload_ty) {
            TypeKind::Tuple(elements) => elements.clone(),
            _ => vec![Param::unlabeled(payload_ty)],
        };
        let ty = self.module.types.function(FunctionType {
            params,
            result: enum_ty,
            throws: false,
            noreturn: false,
        });
        self.decl_mut(id).interface_type = Some(ty);
    }

    fn validate_associated_type(&mut self, id: DeclId) {
        self.check_inheritance_clause(id);
        let context = self.decl(id).context;
        let default = match &self.decl(id).kind {
            DeclKind::AssociatedType(a) => a.default.clone(),
            _ => None,
        };
        if let Some(mut default) = default {
            self.resolve_loc(&mut default, context, ResolutionKind::TypeAnnotation);
            if let DeclKind::AssociatedType(a) = &mut self.decl_mut(id).kind {
                a.default = Some(default);
            }
        }
        let Some(protocol) = context.owner() else {
            self.poison(id);
            return;
        };
        let base = self.module.types.nominal(protocol, Vec::new());
        let ty = self.module.types.dependent_member(base, id);
        self.decl_mut(id).interface_type = Some(ty);
    }

    /// Validate a declaration and run the checks that apply once per
    /// declaration, recursing into members
    pub fn type_check_decl(&mut self, id: DeclId) {
        self.validate_decl(id);
        if self.decl(id).state.members_checked {
            return;
        }
        self.decl_mut(id).state.members_checked = true;

        let is_container = self.decl(id).is_nominal() || self.decl(id).is_extension();
        if is_container && !(self.decl(id).is_extension() && self.decl(id).is_invalid()) {
            for param in self.module.own_generic_params(id) {
                self.validate_decl(param);
            }
            let members = self.decl(id).members().to_vec();
            for &member in &members {
                self.type_check_decl(member);
            }
            for &member in &members {
                self.check_redeclaration(member);
            }
            if self.decl(id).is_enum() {
                self.check_enum_raw_values(id);
            }
            self.add_implicit_constructors(id);
        }
        self.check_accessibility_audit(id);
    }

    /// Check every declaration of the module
    pub fn check_module(&mut self) {
        info!(
            "checking module '{}' ({} top-level declarations)",
            self.module.name,
            self.module.top_level.len()
        );
        self.bind_extensions();
        let top_level = self.module.top_level.clone();
        for &id in &top_level {
            self.type_check_decl(id);
        }
        for id in top_level {
            self.check_redeclaration(id);
        }
        info!(
            "checked module '{}': {} declarations validated, {} overrides, {} implicit initializers, {} diagnostics",
            self.module.name,
            self.stats.decls_validated,
            self.stats.overrides_recorded,
            self.stats.implicit_ctors_added,
            self.stats.diagnostics_emitted
        );
    }
}
