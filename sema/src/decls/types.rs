//! Hash-consed semantic types
//!
//! Every structurally distinct type is stored once; [`TypeId`] equality is
//! therefore canonical type identity. Sugar that must not affect identity for
//! some comparisons (argument labels, function effects, result optionality)
//! is removed by explicit transformations such as [`TypeTable::unlabeled`].

use super::collections::{DeclMap, IdMap};
use super::{DeclId, Identifier, TypeId};
use serde::{Deserialize, Serialize};

/// Standard-library value types known to the checker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinType {
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
    Bool,
    String,
    Character,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 15] = [
        BuiltinType::Int,
        BuiltinType::Int8,
        BuiltinType::Int16,
        BuiltinType::Int32,
        BuiltinType::Int64,
        BuiltinType::UInt,
        BuiltinType::UInt8,
        BuiltinType::UInt16,
        BuiltinType::UInt32,
        BuiltinType::UInt64,
        BuiltinType::Float,
        BuiltinType::Double,
        BuiltinType::Bool,
        BuiltinType::String,
        BuiltinType::Character,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Int => "Int",
            BuiltinType::Int8 => "Int8",
            BuiltinType::Int16 => "Int16",
            BuiltinType::Int32 => "Int32",
            BuiltinType::Int64 => "Int64",
            BuiltinType::UInt => "UInt",
            BuiltinType::UInt8 => "UInt8",
            BuiltinType::UInt16 => "UInt16",
            BuiltinType::UInt32 => "UInt32",
            BuiltinType::UInt64 => "UInt64",
            BuiltinType::Float => "Float",
            BuiltinType::Double => "Double",
            BuiltinType::Bool => "Bool",
            BuiltinType::String => "String",
            BuiltinType::Character => "Character",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.name() == name)
    }

    /// Bit width and signedness of fixed-width integers
    pub fn integer_layout(self) -> Option<(u32, bool)> {
        match self {
            BuiltinType::Int | BuiltinType::Int64 => Some((64, true)),
            BuiltinType::Int8 => Some((8, true)),
            BuiltinType::Int16 => Some((16, true)),
            BuiltinType::Int32 => Some((32, true)),
            BuiltinType::UInt | BuiltinType::UInt64 => Some((64, false)),
            BuiltinType::UInt8 => Some((8, false)),
            BuiltinType::UInt16 => Some((16, false)),
            BuiltinType::UInt32 => Some((32, false)),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Reference ownership of a stored property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ownership {
    #[default]
    Strong,
    Weak,
    Unowned,
    Unmanaged,
}

impl Ownership {
    pub fn keyword(self) -> &'static str {
        match self {
            Ownership::Strong => "strong",
            Ownership::Weak => "weak",
            Ownership::Unowned => "unowned",
            Ownership::Unmanaged => "unowned(unsafe)",
        }
    }
}

/// A labelled tuple element or function parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Param {
    pub label: Option<Identifier>,
    pub ty: TypeId,
}

impl Param {
    pub fn unlabeled(ty: TypeId) -> Self {
        Self { label: None, ty }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub params: Vec<Param>,
    pub result: TypeId,
    pub throws: bool,
    pub noreturn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Error,
    Builtin(BuiltinType),
    /// Class, struct, enum or protocol (as an existential), with generic arguments
    Nominal { decl: DeclId, args: Vec<TypeId> },
    /// A generic parameter as written in interface types
    GenericParam { decl: DeclId },
    /// The contextual stand-in for a generic parameter's equivalence class
    Archetype { param: DeclId },
    /// A generic parameter identified only by position, for comparing
    /// signatures that declare their parameters separately
    CanonicalParam { depth: u32, index: u32 },
    /// `T.Assoc`
    DependentMember { base: TypeId, assoc: DeclId },
    /// The empty tuple is `Void`
    Tuple(Vec<Param>),
    Function(FunctionType),
    Optional(TypeId),
    ImplicitlyUnwrappedOptional(TypeId),
    Array(TypeId),
    Dictionary(TypeId, TypeId),
    /// `P & Q`
    Composition(Vec<TypeId>),
    ReferenceStorage { ownership: Ownership, referent: TypeId },
}

/// Interning table for all types of a module
#[derive(Debug, Clone)]
pub struct TypeTable {
    kinds: Vec<TypeKind>,
    index: IdMap<TypeKind, TypeId>,
    error: TypeId,
    void: TypeId,
    builtins: Vec<TypeId>,
}

impl TypeTable {
    pub fn new() -> Self {
        let mut table = Self {
            kinds: Vec::new(),
            index: IdMap::default(),
            error: TypeId::invalid(),
            void: TypeId::invalid(),
            builtins: Vec::new(),
        };
        table.error = table.intern(TypeKind::Error);
        table.void = table.intern(TypeKind::Tuple(Vec::new()));
        table.builtins = BuiltinType::ALL
            .iter()
            .map(|b| table.intern(TypeKind::Builtin(*b)))
            .collect();
        table
    }

    pub fn intern(&mut self, kind: TypeKind) -> TypeId {
        if let Some(id) = self.index.get(&kind) {
            return *id;
        }
        let id = TypeId::from_raw(self.kinds.len() as u32);
        self.kinds.push(kind.clone());
        self.index.insert(kind, id);
        id
    }

    pub fn kind(&self, id: TypeId) -> &TypeKind {
        self.kinds.get(id.index()).unwrap_or(&TypeKind::Error)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn error_type(&self) -> TypeId {
        self.error
    }

    pub fn void_type(&self) -> TypeId {
        self.void
    }

    pub fn builtin(&self, builtin: BuiltinType) -> TypeId {
        self.builtins[builtin.index()]
    }

    pub fn optional(&mut self, inner: TypeId) -> TypeId {
        self.intern(TypeKind::Optional(inner))
    }

    pub fn implicitly_unwrapped(&mut self, inner: TypeId) -> TypeId {
        self.intern(TypeKind::ImplicitlyUnwrappedOptional(inner))
    }

    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeKind::Array(element))
    }

    pub fn dictionary(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(TypeKind::Dictionary(key, value))
    }

    pub fn tuple(&mut self, elements: Vec<Param>) -> TypeId {
        self.intern(TypeKind::Tuple(elements))
    }

    pub fn function(&mut self, function: FunctionType) -> TypeId {
        self.intern(TypeKind::Function(function))
    }

    pub fn nominal(&mut self, decl: DeclId, args: Vec<TypeId>) -> TypeId {
        self.intern(TypeKind::Nominal { decl, args })
    }

    pub fn generic_param(&mut self, decl: DeclId) -> TypeId {
        self.intern(TypeKind::GenericParam { decl })
    }

    pub fn archetype(&mut self, param: DeclId) -> TypeId {
        self.intern(TypeKind::Archetype { param })
    }

    pub fn canonical_param(&mut self, depth: u32, index: u32) -> TypeId {
        self.intern(TypeKind::CanonicalParam { depth, index })
    }

    pub fn dependent_member(&mut self, base: TypeId, assoc: DeclId) -> TypeId {
        self.intern(TypeKind::DependentMember { base, assoc })
    }

    pub fn reference_storage(&mut self, ownership: Ownership, referent: TypeId) -> TypeId {
        if ownership == Ownership::Strong {
            return referent;
        }
        self.intern(TypeKind::ReferenceStorage { ownership, referent })
    }

    /// A composition of one type is that type; nested compositions flatten.
    pub fn composition(&mut self, parts: Vec<TypeId>) -> TypeId {
        let mut flat: Vec<TypeId> = Vec::with_capacity(parts.len());
        for part in parts {
            match self.kind(part) {
                TypeKind::Composition(inner) => {
                    for p in inner.clone() {
                        if !flat.contains(&p) {
                            flat.push(p);
                        }
                    }
                }
                _ => {
                    if !flat.contains(&part) {
                        flat.push(part);
                    }
                }
            }
        }
        if flat.len() == 1 {
            return flat[0];
        }
        self.intern(TypeKind::Composition(flat))
    }

    pub fn is_error(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Error)
    }

    pub fn is_void(&self, id: TypeId) -> bool {
        id == self.void
    }

    /// Whether an error type appears anywhere inside `id`
    pub fn contains_error(&self, id: TypeId) -> bool {
        let mut found = false;
        self.walk(id, &mut |t| found |= matches!(self.kind(t), TypeKind::Error));
        found
    }

    /// The wrapped type of `T?` or `T!`
    pub fn any_optional_object(&self, id: TypeId) -> Option<TypeId> {
        match self.kind(id) {
            TypeKind::Optional(inner) | TypeKind::ImplicitlyUnwrappedOptional(inner) => Some(*inner),
            _ => None,
        }
    }

    pub fn nominal_decl(&self, id: TypeId) -> Option<DeclId> {
        match self.kind(id) {
            TypeKind::Nominal { decl, .. } => Some(*decl),
            _ => None,
        }
    }

    pub fn nominal_args(&self, id: TypeId) -> &[TypeId] {
        match self.kind(id) {
            TypeKind::Nominal { args, .. } => args,
            _ => &[],
        }
    }

    /// Strip a weak/unowned wrapper
    pub fn reference_storage_referent(&self, id: TypeId) -> TypeId {
        match self.kind(id) {
            TypeKind::ReferenceStorage { referent, .. } => *referent,
            _ => id,
        }
    }

    pub fn as_function(&self, id: TypeId) -> Option<&FunctionType> {
        match self.kind(id) {
            TypeKind::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Visit `id` and every type nested inside it, outermost first
    pub fn walk(&self, id: TypeId, visit: &mut dyn FnMut(TypeId)) {
        visit(id);
        match self.kind(id) {
            TypeKind::Error
            | TypeKind::Builtin(_)
            | TypeKind::GenericParam { .. }
            | TypeKind::Archetype { .. }
            | TypeKind::CanonicalParam { .. } => {}
            TypeKind::Nominal { args, .. } => {
                for a in args {
                    self.walk(*a, visit);
                }
            }
            TypeKind::DependentMember { base, .. } => self.walk(*base, visit),
            TypeKind::Tuple(elements) => {
                for e in elements {
                    self.walk(e.ty, visit);
                }
            }
            TypeKind::Function(f) => {
                for p in &f.params {
                    self.walk(p.ty, visit);
                }
                self.walk(f.result, visit);
            }
            TypeKind::Optional(inner)
            | TypeKind::ImplicitlyUnwrappedOptional(inner)
            | TypeKind::Array(inner)
            | TypeKind::ReferenceStorage { referent: inner, .. } => self.walk(*inner, visit),
            TypeKind::Dictionary(k, v) => {
                self.walk(*k, visit);
                self.walk(*v, visit);
            }
            TypeKind::Composition(parts) => {
                for p in parts {
                    self.walk(*p, visit);
                }
            }
        }
    }

    /// Rebuild `id` bottom-up. `rewrite` sees each node after its children
    /// were rebuilt and may replace it.
    pub fn transform(&mut self, id: TypeId, rewrite: &mut dyn FnMut(&mut TypeTable, TypeId) -> Option<TypeId>) -> TypeId {
        let kind = self.kind(id).clone();
        let rebuilt = match kind {
            TypeKind::Error
            | TypeKind::Builtin(_)
            | TypeKind::GenericParam { .. }
            | TypeKind::Archetype { .. }
            | TypeKind::CanonicalParam { .. } => id,
            TypeKind::Nominal { decl, args } => {
                let args = args.into_iter().map(|a| self.transform(a, rewrite)).collect();
                self.nominal(decl, args)
            }
            TypeKind::DependentMember { base, assoc } => {
                let base = self.transform(base, rewrite);
                self.dependent_member(base, assoc)
            }
            TypeKind::Tuple(elements) => {
                let elements = elements
                    .into_iter()
                    .map(|e| Param {
                        label: e.label,
                        ty: self.transform(e.ty, rewrite),
                    })
                    .collect();
                self.tuple(elements)
            }
            TypeKind::Function(f) => {
                let params = f
                    .params
                    .into_iter()
                    .map(|p| Param {
                        label: p.label,
                        ty: self.transform(p.ty, rewrite),
                    })
                    .collect();
                let result = self.transform(f.result, rewrite);
                self.function(FunctionType {
                    params,
                    result,
                    throws: f.throws,
                    noreturn: f.noreturn,
                })
            }
            TypeKind::Optional(inner) => {
                let inner = self.transform(inner, rewrite);
                self.optional(inner)
            }
            TypeKind::ImplicitlyUnwrappedOptional(inner) => {
                let inner = self.transform(inner, rewrite);
                self.implicitly_unwrapped(inner)
            }
            TypeKind::Array(inner) => {
                let inner = self.transform(inner, rewrite);
                self.array(inner)
            }
            TypeKind::Dictionary(k, v) => {
                let k = self.transform(k, rewrite);
                let v = self.transform(v, rewrite);
                self.dictionary(k, v)
            }
            TypeKind::Composition(parts) => {
                let parts = parts.into_iter().map(|p| self.transform(p, rewrite)).collect();
                self.composition(parts)
            }
            TypeKind::ReferenceStorage { ownership, referent } => {
                let referent = self.transform(referent, rewrite);
                self.reference_storage(ownership, referent)
            }
        };
        rewrite(self, rebuilt).unwrap_or(rebuilt)
    }

    /// Replace generic parameters and archetypes according to `map`
    pub fn substitute(&mut self, id: TypeId, map: &DeclMap<TypeId>) -> TypeId {
        if map.is_empty() {
            return id;
        }
        self.transform(id, &mut |table, t| match table.kind(t) {
            TypeKind::GenericParam { decl } | TypeKind::Archetype { param: decl } => {
                map.get(decl).copied()
            }
            _ => None,
        })
    }

    /// Drop argument labels from tuples and function parameters
    pub fn unlabeled(&mut self, id: TypeId) -> TypeId {
        self.transform(id, &mut |table, t| match table.kind(t) {
            TypeKind::Tuple(elements) if elements.iter().any(|e| e.label.is_some()) => {
                let elements = elements.iter().map(|e| Param::unlabeled(e.ty)).collect();
                Some(table.tuple(elements))
            }
            TypeKind::Function(f) if f.params.iter().any(|p| p.label.is_some()) => {
                let mut f = f.clone();
                for p in &mut f.params {
                    p.label = None;
                }
                Some(table.function(f))
            }
            _ => None,
        })
    }

    /// For a function type, drop `throws` and no-return markers
    pub fn without_effects(&mut self, id: TypeId) -> TypeId {
        match self.kind(id) {
            TypeKind::Function(f) if f.throws || f.noreturn => {
                let mut f = f.clone();
                f.throws = false;
                f.noreturn = false;
                self.function(f)
            }
            _ => id,
        }
    }

    /// For a function type, strip `?`/`!` from its result
    pub fn drop_result_optionality(&mut self, id: TypeId) -> TypeId {
        let Some(f) = self.as_function(id).cloned() else {
            return id;
        };
        match self.any_optional_object(f.result) {
            Some(object) => self.function(FunctionType { result: object, ..f }),
            None => id,
        }
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning_gives_identity() {
        let mut types = TypeTable::new();
        let int = types.builtin(BuiltinType::Int);
        let a = types.optional(int);
        let b = types.optional(int);
        assert_eq!(a, b);
        assert_ne!(a, types.implicitly_unwrapped(int));
        let unit = types.tuple(Vec::new());
        assert!(types.is_void(unit));
    }

    #[test]
    fn test_unlabeled_and_effects() {
        let mut types = TypeTable::new();
        let mut interner = crate::decls::Interner::new();
        let x = interner.intern("x");
        let int = types.builtin(BuiltinType::Int);
        let labelled = types.function(FunctionType {
            params: vec![Param { label: Some(x), ty: int }],
            result: int,
            throws: true,
            noreturn: false,
        });
        let plain = types.function(FunctionType {
            params: vec![Param::unlabeled(int)],
            result: int,
            throws: false,
            noreturn: false,
        });
        let stripped = types.unlabeled(labelled);
        assert_eq!(types.without_effects(stripped), plain);
    }

    #[test]
    fn test_substitute_and_contains_error() {
        let mut types = TypeTable::new();
        let param = DeclId::from_raw(4);
        let t = types.generic_param(param);
        let array_t = types.array(t);
        let mut map = DeclMap::default();
        map.insert(param, types.builtin(BuiltinType::String));
        let array_string = types.substitute(array_t, &map);
        let expected = types.array(types.builtin(BuiltinType::String));
        assert_eq!(array_string, expected);

        let broken = types.optional(types.error_type());
        assert!(types.contains_error(broken));
        assert!(!types.contains_error(array_string));
    }

    #[test]
    fn test_composition_flattens() {
        let mut types = TypeTable::new();
        let p = types.nominal(DeclId::from_raw(1), vec![]);
        let q = types.nominal(DeclId::from_raw(2), vec![]);
        let pq = types.composition(vec![p, q]);
        assert_eq!(types.composition(vec![pq, p]), pq);
        assert_eq!(types.composition(vec![p]), p);
    }
}
