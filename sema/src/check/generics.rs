//! Generic signature construction
//!
//! Collects the parameters visible in a generic declaration (outer ones
//! first), turns each parameter's inheritance clause into requirements,
//! resolves the explicit requirements, and merges same-type constraints into
//! equivalence classes with one representative each.

use super::{DeclChecker, DiagKind, ResolutionKind};
use crate::decls::collections::DeclMap;
use crate::decls::*;
use log::{debug, trace};
use std::rc::Rc;

/// Union-find over generic parameters while a signature is being built
struct SignatureBuilder {
    signature: GenericSignature,
}

impl SignatureBuilder {
    fn new(outer: Option<&GenericSignature>) -> Self {
        Self {
            signature: outer.cloned().unwrap_or_default(),
        }
    }

    fn find(&self, param: DeclId) -> DeclId {
        let mut current = param;
        while let Some(&next) = self.signature.representatives.get(&current) {
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// Merge the classes of `a` and `b`. Returns the conflicting concrete
    /// types when both classes were already fixed to different types.
    fn union(&mut self, a: DeclId, b: DeclId) -> Result<(), (TypeId, TypeId)> {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return Ok(());
        }
        let concrete_a = self.signature.concrete.get(&ra).copied();
        let concrete_b = self.signature.concrete.remove(&rb);
        match (concrete_a, concrete_b) {
            (Some(x), Some(y)) if x != y => {
                self.signature.concrete.insert(rb, y);
                return Err((x, y));
            }
            (None, Some(y)) => {
                self.signature.concrete.insert(ra, y);
            }
            _ => {}
        }
        self.signature.representatives.insert(rb, ra);
        Ok(())
    }

    /// Fix the class of `param` to `ty`
    fn bind_concrete(&mut self, param: DeclId, ty: TypeId) -> Result<(), TypeId> {
        let rep = self.find(param);
        match self.signature.concrete.get(&rep) {
            Some(&existing) if existing != ty => Err(existing),
            _ => {
                self.signature.concrete.insert(rep, ty);
                Ok(())
            }
        }
    }

    fn superclass_bound(&self, types: &TypeTable, param: DeclId) -> Option<TypeId> {
        self.signature.superclass_bound(types, param)
    }

    fn finish(mut self) -> GenericSignature {
        let params: Vec<DeclId> = self.signature.params.clone();
        let compressed: DeclMap<DeclId> = params.iter().map(|&p| (p, self.find(p))).collect();
        self.signature.representatives = compressed;
        self.signature
    }
}

impl DeclChecker<'_> {
    /// Build and cache the generic signature of a nominal type, extension,
    /// function or initializer. Returns `None` for non-generic contexts.
    pub fn validate_generic_signature(&mut self, id: DeclId) -> Option<Rc<GenericSignature>> {
        if let Some(signature) = self.decl(id).signature() {
            return Some(Rc::clone(signature));
        }
        let is_extension = self.decl(id).is_extension();
        let generic_owner = self.decl(id).is_nominal()
            || is_extension
            || matches!(self.decl(id).kind, DeclKind::Func(_) | DeclKind::Constructor(_));
        if !generic_owner {
            return None;
        }

        let outer = if is_extension {
            self.bind_extension(id);
            let nominal = self.decl(id).extension().and_then(|e| e.nominal);
            nominal.and_then(|n| self.validate_generic_signature(n))
        } else {
            self.outer_signature(self.decl(id).context)
        };

        let own_params = self.module.own_generic_params(id);
        let mut requirements = match &self.decl(id).kind {
            DeclKind::Extension(e) => e.where_clause.clone(),
            _ => self
                .decl(id)
                .generic_params()
                .map(|g| g.requirements.clone())
                .unwrap_or_default(),
        };
        if own_params.is_empty() && requirements.is_empty() {
            if let Some(outer) = &outer {
                self.decl_mut(id).set_signature(Rc::clone(outer));
            }
            return outer;
        }

        let depth = outer
            .as_deref()
            .and_then(|o| o.params.iter().map(|&p| self.param_position(p).0).max())
            .map_or(0, |d| d + 1);
        let mut builder = SignatureBuilder::new(outer.as_deref());
        for &param in &own_params {
            if let DeclKind::GenericParam(data) = &mut self.decl_mut(param).kind {
                data.depth = depth;
            }
            builder.signature.params.push(param);
            builder.signature.representatives.insert(param, param);
            self.add_param_bounds(&mut builder, param);
        }

        // conformances first so that later member types like `T.Element` can
        // see protocols introduced by the where-clause
        let context = DeclContext::Decl(id);
        for requirement in requirements.iter_mut() {
            if requirement.kind == RequirementKind::Conformance {
                self.add_conformance_requirement(&mut builder, &own_params, requirement, context);
            }
        }
        for requirement in requirements.iter_mut() {
            if requirement.kind == RequirementKind::SameType {
                self.add_same_type_requirement(&mut builder, requirement, context);
            }
        }

        let signature = Rc::new(builder.finish());
        for requirement in requirements.iter_mut().filter(|r| !r.invalid) {
            for loc in [&mut requirement.subject, &mut requirement.constraint] {
                if let Some(ty) = loc.ty {
                    loc.ty = Some(self.rewrite_to_representatives(&signature, ty));
                }
            }
        }

        let decl = self.decl_mut(id);
        if let Some(ext) = decl.extension_mut() {
            ext.where_clause = requirements;
        } else if let Some(list) = decl.generic_params_mut() {
            list.requirements = requirements;
        }

        debug!(
            "generic signature of '{}': {} params, {} requirements",
            self.name(id),
            signature.params.len(),
            signature.requirements.len()
        );
        self.decl_mut(id).set_signature(Rc::clone(&signature));
        Some(signature)
    }

    /// Signature of the nearest generic context enclosing `context`
    fn outer_signature(&mut self, context: DeclContext) -> Option<Rc<GenericSignature>> {
        let mut ctx = context;
        while let Some(owner) = ctx.owner() {
            let decl = self.decl(owner);
            if decl.is_nominal() || decl.is_extension() || matches!(decl.kind, DeclKind::Func(_) | DeclKind::Constructor(_)) {
                return self.validate_generic_signature(owner);
            }
            ctx = decl.context;
        }
        None
    }

    fn add_param_bounds(&mut self, builder: &mut SignatureBuilder, param: DeclId) {
        self.check_inheritance_clause(param);
        let subject = self.module.types.generic_param(param);
        self.decl_mut(param).interface_type = Some(subject);
        let Some(bounds) = self.decl(param).bounds() else {
            return;
        };
        if let Some(class) = bounds.superclass {
            builder.signature.requirements.push(Requirement::Superclass { subject, class });
        }
        for &protocol in &bounds.protocols {
            builder.signature.requirements.push(Requirement::Conformance { subject, protocol });
        }
    }

    fn resolve_requirement_side(&mut self, loc: &mut TypeLoc, context: DeclContext) -> Option<TypeId> {
        loc.revert();
        let ty = self.resolve_loc(loc, context, ResolutionKind::GenericRequirement);
        (!self.module.types.is_error(ty)).then_some(ty)
    }

    /// The parameter a requirement subject names, if it is a bare parameter
    fn subject_param(&self, ty: TypeId) -> Option<DeclId> {
        match self.module.types.kind(ty) {
            TypeKind::GenericParam { decl } | TypeKind::Archetype { param: decl } => Some(*decl),
            _ => None,
        }
    }

    fn is_dependent(&self, ty: TypeId) -> bool {
        matches!(
            self.module.types.kind(ty),
            TypeKind::GenericParam { .. } | TypeKind::Archetype { .. } | TypeKind::DependentMember { .. }
        )
    }

    fn add_conformance_requirement(
        &mut self,
        builder: &mut SignatureBuilder,
        own_params: &[DeclId],
        requirement: &mut RequirementRepr,
        context: DeclContext,
    ) {
        if requirement.invalid {
            return;
        }
        let subject = self.resolve_requirement_side(&mut requirement.subject, context);
        let constraint = self.resolve_requirement_side(&mut requirement.constraint, context);
        let (Some(subject), Some(constraint)) = (subject, constraint) else {
            requirement.invalid = true;
            return;
        };
        if !self.is_dependent(subject) {
            self.diagnose(
                DiagKind::RequirementSubjectNotGeneric { ty: self.type_name(subject) },
                requirement.subject.span,
            );
            requirement.invalid = true;
            return;
        }

        let protocols = match self.module.types.kind(constraint).clone() {
            TypeKind::Nominal { decl, .. } if self.decl(decl).is_protocol() => Some(vec![decl]),
            TypeKind::Composition(parts) => parts
                .iter()
                .map(|&p| self.module.types.nominal_decl(p).filter(|d| self.decl(*d).is_protocol()))
                .collect::<Option<Vec<_>>>(),
            _ => None,
        };
        if let Some(protocols) = protocols {
            for protocol in protocols {
                trace!("requirement {}: {}", self.type_name(subject), self.name(protocol));
                builder.signature.requirements.push(Requirement::Conformance { subject, protocol });
                // make the protocol's associated types reachable through the parameter
                if let Some(param) = self.subject_param(subject).filter(|p| own_params.contains(p)) {
                    if let Some(bounds) = self.decl_mut(param).bounds_mut() {
                        if !bounds.protocols.contains(&protocol) {
                            bounds.protocols.push(protocol);
                        }
                    }
                }
            }
            return;
        }

        let is_class = self
            .module
            .types
            .nominal_decl(constraint)
            .is_some_and(|d| self.decl(d).is_class());
        if !is_class {
            self.diagnose(
                DiagKind::RequirementNotProtocolOrClass {
                    subject: self.type_name(subject),
                    ty: self.type_name(constraint),
                },
                requirement.constraint.span,
            );
            requirement.invalid = true;
            return;
        }
        if let Some(param) = self.subject_param(subject) {
            if let Some(existing) = builder.superclass_bound(&self.module.types, param) {
                if existing != constraint {
                    self.diagnose(
                        DiagKind::MultipleSuperclassBounds {
                            param: self.name(param),
                            first: self.type_name(existing),
                            second: self.type_name(constraint),
                        },
                        requirement.span,
                    );
                    requirement.invalid = true;
                    return;
                }
            }
        }
        trace!("requirement {}: class {}", self.type_name(subject), self.type_name(constraint));
        builder
            .signature
            .requirements
            .push(Requirement::Superclass { subject, class: constraint });
    }

    fn add_same_type_requirement(
        &mut self,
        builder: &mut SignatureBuilder,
        requirement: &mut RequirementRepr,
        context: DeclContext,
    ) {
        if requirement.invalid {
            return;
        }
        let first = self.resolve_requirement_side(&mut requirement.subject, context);
        let second = self.resolve_requirement_side(&mut requirement.constraint, context);
        let (Some(first), Some(second)) = (first, second) else {
            requirement.invalid = true;
            return;
        };

        let outcome = match (self.subject_param(first), self.subject_param(second)) {
            (Some(a), Some(b)) => builder.union(a, b).map_err(|(x, y)| (a, x, y)),
            (Some(a), None) => builder.bind_concrete(a, second).map_err(|x| (a, x, second)),
            (None, Some(b)) => builder.bind_concrete(b, first).map_err(|x| (b, x, first)),
            (None, None) if self.is_dependent(first) || self.is_dependent(second) => Ok(()),
            (None, None) => {
                self.diagnose(
                    DiagKind::RequirementSubjectNotGeneric { ty: self.type_name(first) },
                    requirement.subject.span,
                );
                requirement.invalid = true;
                return;
            }
        };
        match outcome {
            Ok(()) => builder.signature.requirements.push(Requirement::SameType { first, second }),
            Err((param, existing, conflicting)) => {
                self.diagnose(
                    DiagKind::SameTypeConflict {
                        param: self.name(param),
                        first: self.type_name(existing),
                        second: self.type_name(conflicting),
                    },
                    requirement.span,
                );
                requirement.invalid = true;
            }
        }
    }

    /// `(depth, index)` of a generic parameter
    pub(crate) fn param_position(&self, param: DeclId) -> (u32, u32) {
        match &self.decl(param).kind {
            DeclKind::GenericParam(data) => (data.depth, data.index),
            _ => (0, 0),
        }
    }

    /// Depth of the parameters `decl` declares itself
    pub(crate) fn own_generic_depth(&mut self, decl: DeclId) -> u32 {
        self.validate_generic_signature(decl);
        self.module
            .own_generic_params(decl)
            .first()
            .map_or(0, |&p| self.param_position(p).0)
    }

    /// Replace every parameter that is not its class's representative with
    /// the representative
    fn rewrite_to_representatives(&mut self, signature: &GenericSignature, ty: TypeId) -> TypeId {
        let mut map = DeclMap::default();
        for &param in &signature.params {
            let rep = signature.representative(param);
            if rep != param {
                map.insert(param, self.module.types.generic_param(rep));
            }
        }
        self.module.types.substitute(ty, &map)
    }

    /// Solved signature of the nearest enclosing context that has one
    fn context_signature(&self, context: DeclContext) -> Option<Rc<GenericSignature>> {
        let mut ctx = context;
        while let Some(owner) = ctx.owner() {
            if let Some(signature) = self.decl(owner).signature() {
                return Some(Rc::clone(signature));
            }
            ctx = self.decl(owner).context;
        }
        None
    }

    /// Rewrite a type resolved in `context` to representatives of the
    /// enclosing signature
    pub(crate) fn canonicalize_in_context(&mut self, context: DeclContext, ty: TypeId) -> TypeId {
        match self.context_signature(context) {
            Some(signature) => self.rewrite_to_representatives(&signature, ty),
            None => ty,
        }
    }

    /// `ty` with the parameters `member` declares itself replaced by
    /// positional parameters at `depth`, or by the concrete type their class
    /// is fixed to. Outer parameters are left alone.
    pub(crate) fn canonical_member_type(&mut self, member: DeclId, ty: TypeId, depth: u32) -> TypeId {
        let own = self.module.own_generic_params(member);
        if own.is_empty() {
            return ty;
        }
        let Some(signature) = self.validate_generic_signature(member) else {
            return ty;
        };
        let mut map = DeclMap::default();
        for &param in &own {
            let rep = signature.representative(param);
            let canonical = match signature.concrete_type(param) {
                Some(concrete) => concrete,
                None if own.contains(&rep) => {
                    let (_, index) = self.param_position(rep);
                    self.module.types.canonical_param(depth, index)
                }
                None => self.module.types.generic_param(rep),
            };
            map.insert(param, canonical);
        }
        self.module.types.substitute(ty, &map)
    }

    /// Map an interface type into the context of a generic declaration:
    /// parameters become their class's concrete type or archetype
    pub fn map_type_into_context(&mut self, decl: DeclId, ty: TypeId) -> TypeId {
        let Some(signature) = self.validate_generic_signature(decl) else {
            return ty;
        };
        let map = signature.context_map(&mut self.module.types);
        self.module.types.substitute(ty, &map)
    }
}
