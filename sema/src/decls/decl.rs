//! Declarations
//!
//! A [`Decl`] is a common header (name, context, attributes, computed
//! semantic fields and validation state) plus a [`DeclKind`] payload. The
//! set of kinds is closed so every checker phase matches exhaustively.

use super::generic_signature::GenericSignature;
use super::types::Ownership;
use super::{DeclId, DeclName, Identifier, TypeId, TypeRepr};
use serde::{Deserialize, Serialize};
use source_map::SourceSpan;
use std::fmt;
use std::rc::Rc;

/// Visibility levels, ordered from most to least restrictive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessibility {
    Private,
    Internal,
    Public,
}

impl Accessibility {
    pub fn keyword(self) -> &'static str {
        match self {
            Accessibility::Private => "private",
            Accessibility::Internal => "internal",
            Accessibility::Public => "public",
        }
    }

    pub fn from_keyword(text: &str) -> Option<Self> {
        match text {
            "private" => Some(Accessibility::Private),
            "internal" => Some(Accessibility::Internal),
            "public" => Some(Accessibility::Public),
            _ => None,
        }
    }
}

impl fmt::Display for Accessibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A dotted platform version such as `10.10` or `8.0.1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = match parts.next() {
            Some(p) => p.parse().ok()?,
            None => 0,
        };
        let patch = match parts.next() {
            Some(p) => p.parse().ok()?,
            None => 0,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self { major, minor, patch })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

/// One `@available` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableAttr {
    pub platform: String,
    pub introduced: Option<Version>,
    pub unavailable: bool,
}

/// The member a declaration overrides, and whether its type matched the
/// base exactly or only as a covariant subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideEdge {
    pub base: DeclId,
    pub exact: bool,
}

/// External exposure with an optional explicit selector
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjCAttr {
    pub name: Option<String>,
    /// Added by the checker (inherited from an overridden declaration)
    pub implicit: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub access: Option<Accessibility>,
    pub setter_access: Option<Accessibility>,
    pub is_override: bool,
    pub is_final: bool,
    pub is_dynamic: bool,
    pub is_required: bool,
    pub is_static: bool,
    pub objc: Option<ObjCAttr>,
    pub rethrows: bool,
    pub noreturn: bool,
    pub ownership: Ownership,
    pub available: Vec<AvailableAttr>,
}

impl Attributes {
    pub fn is_unavailable(&self) -> bool {
        self.available.iter().any(|a| a.unavailable)
    }

    /// Introduction version on `platform`, if the declaration states one
    pub fn introduced_on(&self, platform: &str) -> Option<Version> {
        self.available
            .iter()
            .filter(|a| a.platform == platform)
            .find_map(|a| a.introduced)
    }
}

/// The lexical owner of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclContext {
    Module,
    /// Member, generic parameter or enum case of a nominal type or extension
    Decl(DeclId),
    /// Declared inside a function body
    Local(DeclId),
}

impl DeclContext {
    pub fn owner(self) -> Option<DeclId> {
        match self {
            DeclContext::Module => None,
            DeclContext::Decl(d) | DeclContext::Local(d) => Some(d),
        }
    }

    pub fn is_local(self) -> bool {
        matches!(self, DeclContext::Local(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CircularityCheck {
    #[default]
    Unchecked,
    Checking,
    Checked,
}

/// Externally observable validation progress of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationStatus {
    Unchecked,
    BeingChecked,
    Checked,
    Invalid,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ValidationStatus::Unchecked => "unchecked",
            ValidationStatus::BeingChecked => "being-checked",
            ValidationStatus::Checked => "checked",
            ValidationStatus::Invalid => "invalid",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeclState {
    pub validated: bool,
    /// Sticky: never cleared once set
    pub invalid: bool,
    pub circularity: CircularityCheck,
    pub inheritance_checked: bool,
    pub members_checked: bool,
}

/// A written type together with its resolution
#[derive(Debug, Clone, PartialEq)]
pub struct TypeLoc {
    pub repr: TypeRepr,
    pub ty: Option<TypeId>,
    pub invalid: bool,
    pub span: SourceSpan,
}

impl TypeLoc {
    pub fn new(repr: TypeRepr, span: SourceSpan) -> Self {
        Self {
            repr,
            ty: None,
            invalid: false,
            span,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.ty.is_some()
    }

    pub fn set_type(&mut self, ty: TypeId) {
        self.ty = Some(ty);
    }

    pub fn set_invalid(&mut self, error_type: TypeId) {
        self.ty = Some(error_type);
        self.invalid = true;
    }

    /// Forget a successful resolution so the type can be resolved again
    pub fn revert(&mut self) {
        if !self.invalid {
            self.ty = None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementKind {
    /// `T: P` (protocol conformance or superclass bound)
    Conformance,
    /// `T == U`
    SameType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequirementRepr {
    pub kind: RequirementKind,
    pub subject: TypeLoc,
    pub constraint: TypeLoc,
    pub invalid: bool,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericParamList {
    pub params: Vec<DeclId>,
    pub requirements: Vec<RequirementRepr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Integer,
    Float,
    String,
}

/// Raw value literal of an enum case
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub kind: LiteralKind,
    pub text: String,
    /// Synthesized by auto-increment or from the case name
    pub implicit: bool,
    pub span: SourceSpan,
}

impl LiteralExpr {
    pub fn integer(text: impl Into<String>) -> Self {
        Self::new(LiteralKind::Integer, text)
    }

    pub fn float(text: impl Into<String>) -> Self {
        Self::new(LiteralKind::Float, text)
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::new(LiteralKind::String, text)
    }

    fn new(kind: LiteralKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            implicit: false,
            span: SourceSpan::unknown(),
        }
    }

    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }

    pub fn at(mut self, span: SourceSpan) -> Self {
        self.span = span;
        self
    }
}

impl fmt::Display for LiteralExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LiteralKind::String => write!(f, "\"{}\"", self.text),
            _ => f.write_str(&self.text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    Stored,
    /// Stored with `willSet`/`didSet` observers
    Observed,
    /// Getter only
    Computed,
    /// Getter and setter
    ComputedSettable,
}

impl StorageKind {
    pub fn has_storage(self) -> bool {
        matches!(self, StorageKind::Stored | StorageKind::Observed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Getter,
    Setter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtorKind {
    Designated,
    Convenience,
    /// Designated in form, but not inherited by subclasses
    Factory,
}

/// How an initializer the checker added came about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImplicitCtorKind {
    /// `init()`
    Default,
    /// One parameter per stored property
    Memberwise,
    /// Inherited superclass initializer that calls through
    Chaining,
    /// Placeholder override that traps at runtime
    Stub,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub label: Option<Identifier>,
    pub name: Identifier,
    pub ty: TypeLoc,
}

/// Payload shared by classes, structs, enums and protocols
#[derive(Debug, Clone, Default)]
pub struct NominalData {
    pub generic_params: Option<GenericParamList>,
    pub inherited: Vec<TypeLoc>,
    pub members: Vec<DeclId>,
    pub extensions: Vec<DeclId>,
    pub superclass: Option<TypeId>,
    pub raw_type: Option<TypeId>,
    /// Directly declared protocols (inherited protocols for a protocol)
    pub protocols: Vec<DeclId>,
    pub signature: Option<Rc<GenericSignature>>,
    pub implicit_ctors_added: bool,
    pub raw_values_checked: bool,
}

#[derive(Debug, Clone)]
pub struct ExtensionData {
    pub extended: TypeLoc,
    pub nominal: Option<DeclId>,
    pub inherited: Vec<TypeLoc>,
    pub members: Vec<DeclId>,
    pub protocols: Vec<DeclId>,
    pub where_clause: Vec<RequirementRepr>,
    pub signature: Option<Rc<GenericSignature>>,
    /// Accessibility its members get by default
    pub default_access: Option<Accessibility>,
    /// Upper bound for members, from the extended type and where-clause
    pub max_access: Option<Accessibility>,
}

#[derive(Debug, Clone)]
pub struct VarData {
    pub ty: Option<TypeLoc>,
    pub is_let: bool,
    pub storage: StorageKind,
    pub has_initializer: bool,
    pub getter: Option<DeclId>,
    pub setter: Option<DeclId>,
    pub overridden: Option<OverrideEdge>,
}

#[derive(Debug, Clone, Default)]
pub struct FuncData {
    pub params: Vec<ParamDecl>,
    pub result: Option<TypeLoc>,
    pub generic_params: Option<GenericParamList>,
    pub signature: Option<Rc<GenericSignature>>,
    pub throws: bool,
    pub accessor: Option<(DeclId, AccessorKind)>,
    pub overridden: Option<OverrideEdge>,
}

#[derive(Debug, Clone)]
pub struct SubscriptData {
    pub indices: Vec<ParamDecl>,
    pub element: TypeLoc,
    pub settable: bool,
    pub getter: Option<DeclId>,
    pub setter: Option<DeclId>,
    pub overridden: Option<OverrideEdge>,
}

#[derive(Debug, Clone)]
pub struct ConstructorData {
    pub params: Vec<ParamDecl>,
    pub generic_params: Option<GenericParamList>,
    pub signature: Option<Rc<GenericSignature>>,
    pub throws: bool,
    pub failable: bool,
    pub kind: CtorKind,
    pub implicit: Option<ImplicitCtorKind>,
    pub overridden: Option<OverrideEdge>,
}

#[derive(Debug, Clone, Default)]
pub struct EnumElementData {
    pub payload: Option<TypeLoc>,
    pub raw_value: Option<LiteralExpr>,
}

/// Bounds shared by generic parameters and associated types
#[derive(Debug, Clone, Default)]
pub struct BoundData {
    pub inherited: Vec<TypeLoc>,
    pub superclass: Option<TypeId>,
    pub protocols: Vec<DeclId>,
}

#[derive(Debug, Clone, Default)]
pub struct GenericParamData {
    pub bounds: BoundData,
    pub depth: u32,
    pub index: u32,
}

#[derive(Debug, Clone, Default)]
pub struct AssociatedTypeData {
    pub bounds: BoundData,
    pub default: Option<TypeLoc>,
}

#[derive(Debug, Clone)]
pub enum DeclKind {
    Class(NominalData),
    Struct(NominalData),
    Enum(NominalData),
    Protocol(NominalData),
    Extension(ExtensionData),
    Var(VarData),
    Func(FuncData),
    Subscript(SubscriptData),
    Constructor(ConstructorData),
    Destructor,
    EnumElement(EnumElementData),
    GenericParam(GenericParamData),
    AssociatedType(AssociatedTypeData),
}

#[derive(Debug, Clone)]
pub struct Decl {
    pub name: DeclName,
    pub kind: DeclKind,
    pub context: DeclContext,
    pub span: SourceSpan,
    pub attrs: Attributes,
    pub interface_type: Option<TypeId>,
    pub access: Option<Accessibility>,
    /// Computed setter accessibility of settable storage
    pub setter_access: Option<Accessibility>,
    pub state: DeclState,
    /// Added by the checker rather than written
    pub implicit: bool,
}

impl Decl {
    pub fn new(name: DeclName, kind: DeclKind, context: DeclContext, span: SourceSpan) -> Self {
        Self {
            name,
            kind,
            context,
            span,
            attrs: Attributes::default(),
            interface_type: None,
            access: None,
            setter_access: None,
            state: DeclState::default(),
            implicit: false,
        }
    }

    /// Kind as it appears in diagnostics
    pub fn descriptive_kind(&self) -> &'static str {
        match &self.kind {
            DeclKind::Class(_) => "class",
            DeclKind::Struct(_) => "struct",
            DeclKind::Enum(_) => "enum",
            DeclKind::Protocol(_) => "protocol",
            DeclKind::Extension(_) => "extension",
            DeclKind::Var(_) if self.context.owner().is_some() && !self.context.is_local() => "property",
            DeclKind::Var(_) => "variable",
            DeclKind::Func(f) => match f.accessor {
                Some((_, AccessorKind::Getter)) => "getter",
                Some((_, AccessorKind::Setter)) => "setter",
                None if self.context.owner().is_some() && !self.context.is_local() => "method",
                None => "function",
            },
            DeclKind::Subscript(_) => "subscript",
            DeclKind::Constructor(_) => "initializer",
            DeclKind::Destructor => "deinitializer",
            DeclKind::EnumElement(_) => "enum case",
            DeclKind::GenericParam(_) => "generic parameter",
            DeclKind::AssociatedType(_) => "associated type",
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.state.invalid
    }

    pub fn set_invalid(&mut self) {
        self.state.invalid = true;
    }

    pub fn nominal(&self) -> Option<&NominalData> {
        match &self.kind {
            DeclKind::Class(n) | DeclKind::Struct(n) | DeclKind::Enum(n) | DeclKind::Protocol(n) => Some(n),
            _ => None,
        }
    }

    pub fn nominal_mut(&mut self) -> Option<&mut NominalData> {
        match &mut self.kind {
            DeclKind::Class(n) | DeclKind::Struct(n) | DeclKind::Enum(n) | DeclKind::Protocol(n) => Some(n),
            _ => None,
        }
    }

    pub fn extension(&self) -> Option<&ExtensionData> {
        match &self.kind {
            DeclKind::Extension(e) => Some(e),
            _ => None,
        }
    }

    pub fn extension_mut(&mut self) -> Option<&mut ExtensionData> {
        match &mut self.kind {
            DeclKind::Extension(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_nominal(&self) -> bool {
        self.nominal().is_some()
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, DeclKind::Class(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self.kind, DeclKind::Protocol(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, DeclKind::Enum(_))
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, DeclKind::Struct(_))
    }

    pub fn is_extension(&self) -> bool {
        matches!(self.kind, DeclKind::Extension(_))
    }

    pub fn is_accessor(&self) -> bool {
        matches!(&self.kind, DeclKind::Func(f) if f.accessor.is_some())
    }

    pub fn inherited(&self) -> &[TypeLoc] {
        match &self.kind {
            DeclKind::Class(n) | DeclKind::Struct(n) | DeclKind::Enum(n) | DeclKind::Protocol(n) => &n.inherited,
            DeclKind::Extension(e) => &e.inherited,
            DeclKind::GenericParam(g) => &g.bounds.inherited,
            DeclKind::AssociatedType(a) => &a.bounds.inherited,
            _ => &[],
        }
    }

    pub fn inherited_mut(&mut self) -> Option<&mut Vec<TypeLoc>> {
        match &mut self.kind {
            DeclKind::Class(n) | DeclKind::Struct(n) | DeclKind::Enum(n) | DeclKind::Protocol(n) => {
                Some(&mut n.inherited)
            }
            DeclKind::Extension(e) => Some(&mut e.inherited),
            DeclKind::GenericParam(g) => Some(&mut g.bounds.inherited),
            DeclKind::AssociatedType(a) => Some(&mut a.bounds.inherited),
            _ => None,
        }
    }

    pub fn bounds(&self) -> Option<&BoundData> {
        match &self.kind {
            DeclKind::GenericParam(g) => Some(&g.bounds),
            DeclKind::AssociatedType(a) => Some(&a.bounds),
            _ => None,
        }
    }

    pub fn bounds_mut(&mut self) -> Option<&mut BoundData> {
        match &mut self.kind {
            DeclKind::GenericParam(g) => Some(&mut g.bounds),
            DeclKind::AssociatedType(a) => Some(&mut a.bounds),
            _ => None,
        }
    }

    pub fn generic_params(&self) -> Option<&GenericParamList> {
        match &self.kind {
            DeclKind::Class(n) | DeclKind::Struct(n) | DeclKind::Enum(n) | DeclKind::Protocol(n) => {
                n.generic_params.as_ref()
            }
            DeclKind::Func(f) => f.generic_params.as_ref(),
            DeclKind::Constructor(c) => c.generic_params.as_ref(),
            _ => None,
        }
    }

    pub fn generic_params_mut(&mut self) -> Option<&mut GenericParamList> {
        match &mut self.kind {
            DeclKind::Class(n) | DeclKind::Struct(n) | DeclKind::Enum(n) | DeclKind::Protocol(n) => {
                n.generic_params.as_mut()
            }
            DeclKind::Func(f) => f.generic_params.as_mut(),
            DeclKind::Constructor(c) => c.generic_params.as_mut(),
            _ => None,
        }
    }

    pub fn signature(&self) -> Option<&Rc<GenericSignature>> {
        match &self.kind {
            DeclKind::Class(n) | DeclKind::Struct(n) | DeclKind::Enum(n) | DeclKind::Protocol(n) => n.signature.as_ref(),
            DeclKind::Extension(e) => e.signature.as_ref(),
            DeclKind::Func(f) => f.signature.as_ref(),
            DeclKind::Constructor(c) => c.signature.as_ref(),
            _ => None,
        }
    }

    pub fn set_signature(&mut self, signature: Rc<GenericSignature>) {
        match &mut self.kind {
            DeclKind::Class(n) | DeclKind::Struct(n) | DeclKind::Enum(n) | DeclKind::Protocol(n) => {
                n.signature = Some(signature)
            }
            DeclKind::Extension(e) => e.signature = Some(signature),
            DeclKind::Func(f) => f.signature = Some(signature),
            DeclKind::Constructor(c) => c.signature = Some(signature),
            _ => {}
        }
    }

    pub fn members(&self) -> &[DeclId] {
        match &self.kind {
            DeclKind::Class(n) | DeclKind::Struct(n) | DeclKind::Enum(n) | DeclKind::Protocol(n) => &n.members,
            DeclKind::Extension(e) => &e.members,
            _ => &[],
        }
    }

    pub fn members_mut(&mut self) -> Option<&mut Vec<DeclId>> {
        match &mut self.kind {
            DeclKind::Class(n) | DeclKind::Struct(n) | DeclKind::Enum(n) | DeclKind::Protocol(n) => Some(&mut n.members),
            DeclKind::Extension(e) => Some(&mut e.members),
            _ => None,
        }
    }

    pub fn overridden(&self) -> Option<DeclId> {
        self.override_edge().map(|edge| edge.base)
    }

    pub fn override_edge(&self) -> Option<OverrideEdge> {
        match &self.kind {
            DeclKind::Var(v) => v.overridden,
            DeclKind::Func(f) => f.overridden,
            DeclKind::Subscript(s) => s.overridden,
            DeclKind::Constructor(c) => c.overridden,
            _ => None,
        }
    }

    pub fn set_overridden(&mut self, edge: OverrideEdge) {
        match &mut self.kind {
            DeclKind::Var(v) => v.overridden = Some(edge),
            DeclKind::Func(f) => f.overridden = Some(edge),
            DeclKind::Subscript(s) => s.overridden = Some(edge),
            DeclKind::Constructor(c) => c.overridden = Some(edge),
            _ => {}
        }
    }

    /// Getter and setter of a property or subscript
    pub fn accessors(&self) -> (Option<DeclId>, Option<DeclId>) {
        match &self.kind {
            DeclKind::Var(v) => (v.getter, v.setter),
            DeclKind::Subscript(s) => (s.getter, s.setter),
            _ => (None, None),
        }
    }

    pub fn params(&self) -> &[ParamDecl] {
        match &self.kind {
            DeclKind::Func(f) => &f.params,
            DeclKind::Constructor(c) => &c.params,
            DeclKind::Subscript(s) => &s.indices,
            _ => &[],
        }
    }

    pub fn throws(&self) -> bool {
        match &self.kind {
            DeclKind::Func(f) => f.throws,
            DeclKind::Constructor(c) => c.throws,
            _ => false,
        }
    }

    pub fn is_static(&self) -> bool {
        self.attrs.is_static
    }

    /// A property with its own storage (stored or observed)
    pub fn has_storage(&self) -> bool {
        matches!(&self.kind, DeclKind::Var(v) if v.storage.has_storage())
    }

    pub fn has_observers(&self) -> bool {
        matches!(&self.kind, DeclKind::Var(v) if v.storage == StorageKind::Observed)
    }

    pub fn is_let(&self) -> bool {
        matches!(&self.kind, DeclKind::Var(v) if v.is_let)
    }

    /// Whether the storage can be assigned to
    pub fn is_settable(&self) -> bool {
        match &self.kind {
            DeclKind::Var(v) => {
                !v.is_let
                    && matches!(
                        v.storage,
                        StorageKind::Stored | StorageKind::Observed | StorageKind::ComputedSettable
                    )
            }
            DeclKind::Subscript(s) => s.settable,
            _ => false,
        }
    }

    pub fn is_designated_init(&self) -> bool {
        matches!(&self.kind, DeclKind::Constructor(c) if c.kind == CtorKind::Designated)
    }

    pub fn ctor_kind(&self) -> Option<CtorKind> {
        match &self.kind {
            DeclKind::Constructor(c) => Some(c.kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessibility_order() {
        assert!(Accessibility::Private < Accessibility::Internal);
        assert!(Accessibility::Internal < Accessibility::Public);
        assert_eq!(Accessibility::from_keyword("public"), Some(Accessibility::Public));
        assert_eq!(
            Accessibility::Public.min(Accessibility::Private),
            Accessibility::Private
        );
    }

    #[test]
    fn test_version_parse_and_order() {
        let a = Version::parse("10.9").unwrap();
        let b = Version::parse("10.10").unwrap();
        assert!(a < b);
        assert_eq!(Version::parse("8.0.1"), Some(Version::new(8, 0, 1)));
        assert_eq!(Version::parse("x.1"), None);
        assert_eq!(b.to_string(), "10.10");
    }

    #[test]
    fn test_type_loc_revert_keeps_errors() {
        let mut loc = TypeLoc::new(TypeRepr::named("Int"), SourceSpan::unknown());
        loc.set_type(TypeId::from_raw(5));
        loc.revert();
        assert!(!loc.is_resolved());

        loc.set_invalid(TypeId::from_raw(0));
        loc.revert();
        assert_eq!(loc.ty, Some(TypeId::from_raw(0)));
    }

    #[test]
    fn test_settability() {
        let var = |is_let, storage| {
            Decl::new(
                DeclName::default(),
                DeclKind::Var(VarData {
                    ty: None,
                    is_let,
                    storage,
                    has_initializer: false,
                    getter: None,
                    setter: None,
                    overridden: None,
                }),
                DeclContext::Module,
                SourceSpan::unknown(),
            )
        };
        assert!(var(false, StorageKind::Stored).is_settable());
        assert!(!var(true, StorageKind::Stored).is_settable());
        assert!(!var(false, StorageKind::Computed).is_settable());
        assert!(var(false, StorageKind::ComputedSettable).is_settable());
        assert!(var(false, StorageKind::Observed).has_observers());
    }
}
