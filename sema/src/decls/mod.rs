//! Declaration graph data model
//!
//! A [`Module`] owns every declaration (in a [`DeclArena`]), every type (in a
//! hash-consing [`TypeTable`]) and the identifier [`Interner`]. All relations
//! between declarations are [`DeclId`] edges.

pub mod arena;
pub mod builder;
pub mod decl;
pub mod generic_signature;
pub mod id_types;
pub mod string_intern;
pub mod type_repr;
pub mod types;

pub use arena::DeclArena;
pub use builder::{BuildError, ModuleBuilder, NominalKind, ParamSpec};
pub use decl::*;
pub use generic_signature::{GenericSignature, Requirement};
pub use id_types::collections;
pub use id_types::{DeclId, TypeId};
pub use string_intern::{DeclName, Identifier, Interner};
pub use type_repr::{TypeRepr, TypeReprError};
pub use types::{BuiltinType, FunctionType, Ownership, Param, TypeKind, TypeTable};

use source_map::FileId;
use std::fmt::{self, Write as _};

/// One compilation unit's declaration graph
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub file: FileId,
    pub interner: Interner,
    pub decls: DeclArena,
    pub types: TypeTable,
    /// Top-level declarations and extensions, in source order
    pub top_level: Vec<DeclId>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: FileId::new(0),
            interner: Interner::new(),
            decls: DeclArena::new(),
            types: TypeTable::new(),
            top_level: Vec::new(),
        }
    }

    pub fn ident(&mut self, text: &str) -> Identifier {
        self.interner.intern(text)
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id]
    }

    /// Base name of a declaration
    pub fn name_of(&self, id: DeclId) -> &str {
        self.interner.resolve(self.decls[id].name.base)
    }

    /// Full name including argument labels, e.g. `f(x:_:)`
    pub fn full_name(&self, id: DeclId) -> String {
        self.decls[id].name.display(&self.interner).to_string()
    }

    /// Find a top-level declaration by base name
    pub fn lookup_top_level(&self, name: &str) -> Option<DeclId> {
        let ident = self.interner.get(name)?;
        self.top_level
            .iter()
            .copied()
            .find(|&d| self.decls[d].name.base == ident && !self.decls[d].is_extension())
    }

    /// Find a direct member of a nominal or extension by base name
    pub fn lookup_member(&self, owner: DeclId, name: &str) -> Vec<DeclId> {
        let Some(ident) = self.interner.get(name) else {
            return Vec::new();
        };
        self.decls[owner]
            .members()
            .iter()
            .copied()
            .filter(|&m| self.decls[m].name.base == ident)
            .collect()
    }

    /// The nominal type a context is (or extends), if any
    pub fn context_nominal(&self, context: DeclContext) -> Option<DeclId> {
        let owner = match context {
            DeclContext::Decl(owner) => owner,
            _ => return None,
        };
        self.as_nominal(owner)
    }

    /// `id` itself when nominal, or the nominal it extends
    pub fn as_nominal(&self, id: DeclId) -> Option<DeclId> {
        let decl = &self.decls[id];
        match &decl.kind {
            DeclKind::Extension(e) => e.nominal,
            _ if decl.is_nominal() => Some(id),
            _ => None,
        }
    }

    /// Members of a nominal type followed by those of its extensions
    pub fn all_members(&self, nominal: DeclId) -> Vec<DeclId> {
        let decl = &self.decls[nominal];
        let mut members = decl.members().to_vec();
        if let Some(n) = decl.nominal() {
            for &ext in &n.extensions {
                members.extend_from_slice(self.decls[ext].members());
            }
        }
        members
    }

    /// Generic parameters of a nominal's own parameter list
    pub fn own_generic_params(&self, id: DeclId) -> Vec<DeclId> {
        self.decls[id]
            .generic_params()
            .map(|g| g.params.clone())
            .unwrap_or_default()
    }

    /// The type of a nominal as seen from inside it: `Box<T>` for `Box<T>`
    pub fn declared_interface_type(&mut self, nominal: DeclId) -> TypeId {
        let args = self
            .own_generic_params(nominal)
            .into_iter()
            .map(|p| self.types.generic_param(p))
            .collect();
        self.types.nominal(nominal, args)
    }

    pub fn superclass_of(&self, class: DeclId) -> Option<TypeId> {
        self.decls[class].nominal().and_then(|n| n.superclass)
    }

    /// Superclass declaration of a class, if resolved
    pub fn superclass_decl(&self, class: DeclId) -> Option<DeclId> {
        self.superclass_of(class).and_then(|t| self.types.nominal_decl(t))
    }

    pub fn type_name(&self, ty: TypeId) -> String {
        TypeDisplay { module: self, ty }.to_string()
    }

    pub fn display_type(&self, ty: TypeId) -> TypeDisplay<'_> {
        TypeDisplay { module: self, ty }
    }
}

/// Source-like rendering of a type
pub struct TypeDisplay<'a> {
    module: &'a Module,
    ty: TypeId,
}

impl TypeDisplay<'_> {
    fn with(&self, ty: TypeId) -> Self {
        TypeDisplay { module: self.module, ty }
    }

    fn write_params(&self, f: &mut fmt::Formatter<'_>, params: &[Param]) -> fmt::Result {
        f.write_char('(')?;
        for (i, p) in params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if let Some(label) = p.label {
                write!(f, "{}: ", self.module.interner.resolve(label))?;
            }
            write!(f, "{}", self.with(p.ty))?;
        }
        f.write_char(')')
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.module;
        match m.types.kind(self.ty) {
            TypeKind::Error => f.write_str("<<error type>>"),
            TypeKind::Builtin(b) => f.write_str(b.name()),
            TypeKind::Nominal { decl, args } => {
                f.write_str(m.name_of(*decl))?;
                if !args.is_empty() {
                    f.write_char('<')?;
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", self.with(*a))?;
                    }
                    f.write_char('>')?;
                }
                Ok(())
            }
            TypeKind::GenericParam { decl } | TypeKind::Archetype { param: decl } => f.write_str(m.name_of(*decl)),
            TypeKind::CanonicalParam { depth, index } => write!(f, "τ_{depth}_{index}"),
            TypeKind::DependentMember { base, assoc } => write!(f, "{}.{}", self.with(*base), m.name_of(*assoc)),
            TypeKind::Tuple(elements) => self.write_params(f, elements),
            TypeKind::Function(func) => {
                self.write_params(f, &func.params)?;
                if func.throws {
                    f.write_str(" throws")?;
                }
                write!(f, " -> {}", self.with(func.result))
            }
            TypeKind::Optional(inner) => write!(f, "{}?", self.with(*inner)),
            TypeKind::ImplicitlyUnwrappedOptional(inner) => write!(f, "{}!", self.with(*inner)),
            TypeKind::Array(inner) => write!(f, "[{}]", self.with(*inner)),
            TypeKind::Dictionary(k, v) => write!(f, "[{}: {}]", self.with(*k), self.with(*v)),
            TypeKind::Composition(parts) => {
                if parts.is_empty() {
                    return f.write_str("Any");
                }
                for (i, p) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" & ")?;
                    }
                    write!(f, "{}", self.with(*p))?;
                }
                Ok(())
            }
            TypeKind::ReferenceStorage { ownership, referent } => {
                write!(f, "{} {}", ownership.keyword(), self.with(*referent))
            }
        }
    }
}
