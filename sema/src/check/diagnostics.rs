//! Typed diagnostics produced by declaration checking
//!
//! Checker phases build a [`DeclDiagnostic`] from a [`DiagKind`] (whose
//! arguments are already rendered to strings), attach notes and fix-its, and
//! hand it to the session's sink. [`to_diagnostic`] turns one into the
//! presentation-level [`diagnostics::Diagnostic`].

use crate::decls::{Accessibility, Version};
use crate::error_codes::{format_error_code, get_error_code};
use diagnostics::{Diagnostic, DiagnosticBuilder, FixIt};
use source_map::SourceSpan;
use std::fmt;

/// Which part of a declaration leaked a less accessible type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessSubject {
    Property,
    Function,
    Subscript,
    Inherited,
    GenericRequirement,
    AssociatedTypeDefault,
    Initializer,
}

impl AccessSubject {
    fn code(self) -> u16 {
        match self {
            AccessSubject::Property => 1301,
            AccessSubject::Function => 1302,
            AccessSubject::Subscript => 1303,
            AccessSubject::Inherited => 1304,
            AccessSubject::GenericRequirement => 1305,
            AccessSubject::AssociatedTypeDefault => 1306,
            AccessSubject::Initializer => 1307,
        }
    }

    fn noun(self) -> &'static str {
        match self {
            AccessSubject::Property => "property",
            AccessSubject::Function => "function",
            AccessSubject::Subscript => "subscript",
            AccessSubject::Inherited => "inherited type",
            AccessSubject::GenericRequirement => "generic requirement of",
            AccessSubject::AssociatedTypeDefault => "associated type default of",
            AccessSubject::Initializer => "initializer",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagKind {
    // declarations
    UnresolvedType { name: String },
    GenericArgCount { ty: String, expected: usize, found: usize },
    NoMemberType { base: String, name: String },
    GenericTypeRequiresArgs { ty: String },
    MissingTypeAnnotation { name: String },
    InvalidRedeclaration { name: String },
    NonNominalExtension { ty: String },

    // inheritance
    DuplicateInheritance { ty: String },
    MultipleInheritance { first: String, second: String },
    SuperclassNotFirst { ty: String },
    MultipleEnumRawTypes { first: String, second: String },
    RawTypeNotFirst { ty: String },
    NonClassInheritance { decl: String, ty: String },
    ExtensionClassInheritance { decl: String, ty: String },
    InheritanceFromNonProtocolOrClass { ty: String },
    InheritanceFromNonProtocol { ty: String },
    ExtensionProtocolInheritance { ty: String },
    ExtensionConstrainedInheritance { ty: String },
    CircularClassInheritance { path: String },
    CircularProtocolDef { path: String },
    CircularEnumInheritance { path: String },

    // generics
    RequirementNotProtocolOrClass { subject: String, ty: String },
    SameTypeConflict { param: String, first: String, second: String },
    RequirementSubjectNotGeneric { ty: String },
    MultipleSuperclassBounds { param: String, first: String, second: String },

    // accessibility
    TypeAccessViolation {
        subject: AccessSubject,
        decl_access: Accessibility,
        type_access: Accessibility,
        ty: String,
    },
    SetterAccessAboveGetter { setter: Accessibility, getter: Accessibility },

    // overrides
    PropertyDoesNotOverride { name: String },
    MethodDoesNotOverride { name: String },
    InitializerDoesNotOverride { name: String },
    SubscriptDoesNotOverride,
    OverrideMultipleDecls { kind: &'static str, arg_mismatch: bool },
    ArgumentNameMismatch { kind: &'static str, name: String, base_name: String },
    ObjCTypeMismatch { kind: &'static str, name: String, selector: String },
    OverrideNotAccessible { setter: bool, kind: &'static str, required: Accessibility },
    MutableCovariantSubscript { ty: String, base_ty: String },
    PropertyTypeMismatch { name: String, ty: String, base_ty: String },
    MutableCovariantProperty { name: String, ty: String, base_ty: String },
    OverrideWithStoredProperty { name: String },
    ObservingReadonly { name: String },
    MutableWithReadonly { name: String },
    OverrideLetProperty { name: String },
    OverrideDeclExtension { base_in_extension: bool, kind: &'static str },
    MissingOverride { kind: &'static str },
    OverrideThrows { kind: &'static str },
    OverrideThrowsObjC { kind: &'static str },
    OverrideUnavailable { name: String },
    OverrideLessAvailable { kind: &'static str, platform: String, version: Version },
    OverrideRethrowsWithNonRethrows { kind: &'static str },
    OverrideFinal { kind: &'static str, base_kind: &'static str },
    OverrideNoreturnWithReturn { kind: &'static str },
    OverrideOwnershipMismatch { ownership: &'static str, base_ownership: &'static str },

    // raw values
    RawValueNotUnique,
    NonIntegerAutoIncrement,
    CaseNeedsRawValue,
    CaseWithPayload,
    RawTypeNotLiteralConvertible { ty: String },
    EmptyEnumRawType,
    LiteralTypeMismatch { literal: &'static str, ty: String },
    RawValueWithoutRawType,
    IntegerLiteralOverflow { literal: String, ty: String },

    // implicit members
    ClassWithoutInit { class: String, properties: Vec<String> },
    RequiredInitializerMissing { class: String, name: String, base_class: String },
}

impl DiagKind {
    pub fn code(&self) -> u16 {
        use DiagKind::*;
        match self {
            UnresolvedType { .. } => 1001,
            GenericArgCount { .. } => 1002,
            NoMemberType { .. } => 1003,
            GenericTypeRequiresArgs { .. } => 1004,
            MissingTypeAnnotation { .. } => 1005,
            InvalidRedeclaration { .. } => 1010,
            NonNominalExtension { .. } => 1011,
            DuplicateInheritance { .. } => 1101,
            MultipleInheritance { .. } => 1102,
            SuperclassNotFirst { .. } => 1103,
            MultipleEnumRawTypes { .. } => 1104,
            RawTypeNotFirst { .. } => 1105,
            NonClassInheritance { .. } => 1106,
            ExtensionClassInheritance { .. } => 1107,
            InheritanceFromNonProtocolOrClass { .. } => 1108,
            InheritanceFromNonProtocol { .. } => 1109,
            ExtensionProtocolInheritance { .. } => 1110,
            ExtensionConstrainedInheritance { .. } => 1111,
            CircularClassInheritance { .. } => 1112,
            CircularProtocolDef { .. } => 1113,
            CircularEnumInheritance { .. } => 1114,
            RequirementNotProtocolOrClass { .. } => 1201,
            SameTypeConflict { .. } => 1202,
            RequirementSubjectNotGeneric { .. } => 1203,
            MultipleSuperclassBounds { .. } => 1204,
            TypeAccessViolation { subject, .. } => subject.code(),
            SetterAccessAboveGetter { .. } => 1308,
            PropertyDoesNotOverride { .. } => 1401,
            MethodDoesNotOverride { .. } => 1402,
            InitializerDoesNotOverride { .. } => 1403,
            SubscriptDoesNotOverride => 1404,
            OverrideMultipleDecls { .. } => 1405,
            ArgumentNameMismatch { .. } => 1406,
            ObjCTypeMismatch { .. } => 1407,
            OverrideNotAccessible { .. } => 1408,
            MutableCovariantSubscript { .. } => 1409,
            PropertyTypeMismatch { .. } => 1410,
            MutableCovariantProperty { .. } => 1411,
            OverrideWithStoredProperty { .. } => 1412,
            ObservingReadonly { .. } => 1413,
            MutableWithReadonly { .. } => 1414,
            OverrideLetProperty { .. } => 1415,
            OverrideDeclExtension { .. } => 1416,
            MissingOverride { .. } => 1417,
            OverrideThrows { .. } => 1418,
            OverrideThrowsObjC { .. } => 1419,
            OverrideUnavailable { .. } => 1420,
            OverrideLessAvailable { .. } => 1421,
            OverrideRethrowsWithNonRethrows { .. } => 1422,
            OverrideFinal { .. } => 1423,
            OverrideNoreturnWithReturn { .. } => 1424,
            OverrideOwnershipMismatch { .. } => 1425,
            RawValueNotUnique => 1501,
            NonIntegerAutoIncrement => 1502,
            CaseNeedsRawValue => 1503,
            CaseWithPayload => 1504,
            RawTypeNotLiteralConvertible { .. } => 1505,
            EmptyEnumRawType => 1506,
            LiteralTypeMismatch { .. } => 1507,
            RawValueWithoutRawType => 1508,
            IntegerLiteralOverflow { .. } => 1509,
            ClassWithoutInit { .. } => 1601,
            RequiredInitializerMissing { .. } => 1602,
        }
    }
}

impl fmt::Display for DiagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DiagKind::*;
        match self {
            UnresolvedType { name } => write!(f, "cannot find type '{name}' in scope"),
            GenericArgCount { ty, expected, found } => write!(
                f,
                "generic type '{ty}' specialized with {found} type argument(s), but expects {expected}"
            ),
            NoMemberType { base, name } => write!(f, "'{name}' is not a member type of '{base}'"),
            GenericTypeRequiresArgs { ty } => write!(f, "reference to generic type '{ty}' requires arguments in <...>"),
            MissingTypeAnnotation { name } => write!(f, "'{name}' requires a type annotation"),
            InvalidRedeclaration { name } => write!(f, "invalid redeclaration of '{name}'"),
            NonNominalExtension { ty } => write!(f, "non-nominal type '{ty}' cannot be extended"),

            DuplicateInheritance { ty } => write!(f, "duplicate inheritance from '{ty}'"),
            MultipleInheritance { first, second } => {
                write!(f, "multiple inheritance from classes '{first}' and '{second}'")
            }
            SuperclassNotFirst { ty } => write!(f, "superclass '{ty}' must appear first in the inheritance clause"),
            MultipleEnumRawTypes { first, second } => {
                write!(f, "multiple enum raw types '{first}' and '{second}'")
            }
            RawTypeNotFirst { ty } => write!(f, "raw type '{ty}' must appear first in the enum inheritance clause"),
            NonClassInheritance { decl, ty } => write!(f, "non-class type '{decl}' cannot inherit from class '{ty}'"),
            ExtensionClassInheritance { decl, ty } => {
                write!(f, "extension of type '{decl}' cannot inherit from class '{ty}'")
            }
            InheritanceFromNonProtocolOrClass { ty } => {
                write!(f, "inheritance from non-protocol, non-class type '{ty}'")
            }
            InheritanceFromNonProtocol { ty } => write!(f, "inheritance from non-protocol type '{ty}'"),
            ExtensionProtocolInheritance { ty } => {
                write!(f, "extension of protocol '{ty}' cannot have an inheritance clause")
            }
            ExtensionConstrainedInheritance { ty } => write!(
                f,
                "extension of type '{ty}' with constraints cannot have an inheritance clause"
            ),
            CircularClassInheritance { path } => write!(f, "circular class inheritance {path}"),
            CircularProtocolDef { path } => write!(f, "circular protocol inheritance {path}"),
            CircularEnumInheritance { path } => write!(f, "circular enum raw types {path}"),

            RequirementNotProtocolOrClass { subject, ty } => write!(
                f,
                "type '{subject}' constrained to non-protocol, non-class type '{ty}'"
            ),
            SameTypeConflict { param, first, second } => write!(
                f,
                "generic parameter '{param}' cannot be equal to both '{first}' and '{second}'"
            ),
            RequirementSubjectNotGeneric { ty } => {
                write!(f, "requirement subject '{ty}' does not refer to a generic parameter or associated type")
            }
            MultipleSuperclassBounds { param, first, second } => write!(
                f,
                "generic parameter '{param}' cannot be a subclass of both '{first}' and '{second}'"
            ),

            TypeAccessViolation {
                subject,
                decl_access,
                type_access,
                ty,
            } => match subject {
                AccessSubject::Inherited => write!(
                    f,
                    "{decl_access} type cannot inherit from {type_access} type '{ty}'"
                ),
                AccessSubject::GenericRequirement | AccessSubject::AssociatedTypeDefault => write!(
                    f,
                    "{} {decl_access} declaration uses {type_access} type '{ty}'",
                    subject.noun()
                ),
                _ => write!(
                    f,
                    "{} must be declared {type_access} because its type uses a {type_access} type ('{ty}')",
                    subject.noun()
                ),
            },
            SetterAccessAboveGetter { setter, getter } => {
                write!(f, "{getter} property cannot have a {setter} setter")
            }

            PropertyDoesNotOverride { name } => {
                write!(f, "property '{name}' does not override any property from its superclass")
            }
            MethodDoesNotOverride { name } => {
                write!(f, "method '{name}' does not override any method from its superclass")
            }
            InitializerDoesNotOverride { name } => write!(
                f,
                "initializer '{name}' does not override a designated initializer from its superclass"
            ),
            SubscriptDoesNotOverride => write!(f, "subscript does not override any subscript from its superclass"),
            OverrideMultipleDecls { kind, arg_mismatch } => {
                if *arg_mismatch {
                    write!(f, "{kind} with different argument names overrides more than one superclass declaration")
                } else {
                    write!(f, "{kind} overrides more than one superclass declaration")
                }
            }
            ArgumentNameMismatch { kind, name, base_name } => write!(
                f,
                "argument names for {kind} '{name}' do not match those of overridden {kind} '{base_name}'"
            ),
            ObjCTypeMismatch { kind, name, selector } => write!(
                f,
                "{kind} '{name}' with selector '{selector}' has an incompatible type with the overridden declaration"
            ),
            OverrideNotAccessible { setter, kind, required } => {
                if *setter {
                    write!(f, "setter of overriding {kind} must be as accessible as its enclosing type ({required})")
                } else {
                    write!(f, "overriding {kind} must be as accessible as its enclosing type ({required})")
                }
            }
            MutableCovariantSubscript { ty, base_ty } => write!(
                f,
                "cannot override mutable subscript of type '{base_ty}' with covariant type '{ty}'"
            ),
            PropertyTypeMismatch { name, ty, base_ty } => write!(
                f,
                "property '{name}' with type '{ty}' cannot override a property with type '{base_ty}'"
            ),
            MutableCovariantProperty { name, ty, base_ty } => write!(
                f,
                "cannot override mutable property '{name}' of type '{base_ty}' with covariant type '{ty}'"
            ),
            OverrideWithStoredProperty { name } => {
                write!(f, "cannot override with a stored property '{name}'")
            }
            ObservingReadonly { name } => write!(f, "cannot observe read-only property '{name}'; it can't change"),
            MutableWithReadonly { name } => {
                write!(f, "cannot override mutable property with read-only property '{name}'")
            }
            OverrideLetProperty { name } => write!(f, "cannot override immutable 'let' property '{name}' with the getter of a 'var'"),
            OverrideDeclExtension { base_in_extension, kind } => {
                if *base_in_extension {
                    write!(f, "declarations in extensions cannot be overridden yet ({kind})")
                } else {
                    write!(f, "declarations in extensions cannot override yet ({kind})")
                }
            }
            MissingOverride { kind } => write!(f, "overriding {kind} requires an 'override' keyword"),
            OverrideThrows { kind } => write!(f, "cannot override non-throwing {kind} with throwing {kind}"),
            OverrideThrowsObjC { kind } => write!(f, "overriding a throwing exposed {kind} with a non-throwing {kind} is not supported"),
            OverrideUnavailable { name } => write!(f, "cannot override '{name}' which has been marked unavailable"),
            OverrideLessAvailable { kind, platform, version } => write!(
                f,
                "overriding {kind} must be as available as declaration it overrides (introduced in {platform} {version})"
            ),
            OverrideRethrowsWithNonRethrows { kind } => {
                write!(f, "override of 'rethrows' {kind} should also be 'rethrows'")
            }
            OverrideFinal { kind, base_kind } => write!(f, "{kind} overrides a 'final' {base_kind}"),
            OverrideNoreturnWithReturn { kind } => {
                write!(f, "an override of a 'noreturn' {kind} must also be 'noreturn'")
            }
            OverrideOwnershipMismatch { ownership, base_ownership } => write!(
                f,
                "cannot override {base_ownership} property with {ownership} property"
            ),

            RawValueNotUnique => write!(f, "raw value for enum case is not unique"),
            NonIntegerAutoIncrement => write!(
                f,
                "enum case must declare a raw value when the preceding raw value is not an integer"
            ),
            CaseNeedsRawValue => write!(
                f,
                "enum cases require explicit raw values when the raw type is not integer or string literal convertible"
            ),
            CaseWithPayload => write!(f, "enum with raw type cannot have cases with arguments"),
            RawTypeNotLiteralConvertible { ty } => write!(
                f,
                "raw type '{ty}' is not convertible from any literal"
            ),
            EmptyEnumRawType => write!(f, "an enum with no cases cannot declare a raw type"),
            LiteralTypeMismatch { literal, ty } => {
                write!(f, "{literal} literal cannot be converted to raw type '{ty}'")
            }
            RawValueWithoutRawType => write!(f, "enum case cannot have a raw value if the enum does not have a raw type"),
            IntegerLiteralOverflow { literal, ty } => {
                write!(f, "integer literal '{literal}' overflows when stored into '{ty}'")
            }

            ClassWithoutInit { class, properties } => match properties.as_slice() {
                [] => write!(f, "class '{class}' has no initializers"),
                [a] => write!(f, "class '{class}' has no initializers; stored property '{a}' has no initial value"),
                [a, b] => write!(
                    f,
                    "class '{class}' has no initializers; stored properties '{a}' and '{b}' have no initial values"
                ),
                [a, b, ..] => write!(
                    f,
                    "class '{class}' has no initializers; stored properties '{a}', '{b}', and others have no initial values"
                ),
            },
            RequiredInitializerMissing { class, name, base_class } => write!(
                f,
                "'required' initializer '{name}' must be provided by subclass '{class}' of '{base_class}'"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NoteKind {
    /// `class 'A' declared here`
    KindDeclaredHere { kind: &'static str, name: String },
    OverriddenHere,
    OverriddenHereWithType { ty: String },
    PropertyOverrideHere,
    SubscriptOverrideHere,
    OverriddenNearMatchHere { kind: &'static str, name: String },
    PreviouslyDeclaredHere { name: String },
    EnumRawTypeHere { ty: String },
    RawValueUsedHere,
    IncrementingFromHere,
    IncrementingFromZero,
    StoredPropertyWithoutInit { name: String },
    RequiredInitHere,
    TypeDeclaredHere { name: String, access: Accessibility },
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteKind::KindDeclaredHere { kind, name } => write!(f, "{kind} '{name}' declared here"),
            NoteKind::OverriddenHere => write!(f, "overridden declaration is here"),
            NoteKind::OverriddenHereWithType { ty } => write!(f, "overridden declaration here has type '{ty}'"),
            NoteKind::PropertyOverrideHere => write!(f, "attempt to override property here"),
            NoteKind::SubscriptOverrideHere => write!(f, "attempt to override subscript here"),
            NoteKind::OverriddenNearMatchHere { kind, name } => {
                write!(f, "potential overridden {kind} '{name}' here")
            }
            NoteKind::PreviouslyDeclaredHere { name } => write!(f, "'{name}' previously declared here"),
            NoteKind::EnumRawTypeHere { ty } => write!(f, "declared raw type '{ty}' here"),
            NoteKind::RawValueUsedHere => write!(f, "raw value previously used here"),
            NoteKind::IncrementingFromHere => write!(f, "raw value auto-incremented from here"),
            NoteKind::IncrementingFromZero => write!(f, "raw value implicitly auto-incremented from zero"),
            NoteKind::StoredPropertyWithoutInit { name } => write!(
                f,
                "stored property '{name}' without initial value prevents synthesized initializers"
            ),
            NoteKind::RequiredInitHere => write!(f, "'required' initializer is declared in superclass here"),
            NoteKind::TypeDeclaredHere { name, access } => write!(f, "type '{name}' is declared {access} here"),
        }
    }
}

/// A checker finding with its attachments
#[derive(Debug, Clone, PartialEq)]
pub struct DeclDiagnostic {
    pub kind: DiagKind,
    pub span: SourceSpan,
    pub notes: Vec<(NoteKind, SourceSpan)>,
    pub fixits: Vec<FixIt>,
}

impl DeclDiagnostic {
    pub fn new(kind: DiagKind, span: SourceSpan) -> Self {
        Self {
            kind,
            span,
            notes: Vec::new(),
            fixits: Vec::new(),
        }
    }

    pub fn note(mut self, note: NoteKind, span: SourceSpan) -> Self {
        self.notes.push((note, span));
        self
    }

    pub fn fix_it(mut self, fix: FixIt) -> Self {
        self.fixits.push(fix);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.code()
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Render for the text formatter: code, primary label, notes and fix-its
pub fn to_diagnostic(diag: &DeclDiagnostic) -> Diagnostic {
    let code = diag.code();
    let mut builder = DiagnosticBuilder::error(diag.message(), diag.span)
        .code(format_error_code(code))
        .label(diag.span, "");
    for (note, span) in &diag.notes {
        builder = if span.is_unknown() {
            builder.note(note.to_string())
        } else {
            builder.note_at(*span, note.to_string())
        };
    }
    for fix in &diag.fixits {
        builder = builder.fix_it(fix);
    }
    if let Some(help) = get_error_code(code).and_then(|c| c.help) {
        builder = builder.help(help);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_codes::error_registry;

    fn all_kinds() -> Vec<DiagKind> {
        use DiagKind::*;
        let s = || String::from("X");
        vec![
            UnresolvedType { name: s() },
            DuplicateInheritance { ty: s() },
            CircularClassInheritance { path: "'A' -> 'B' -> 'A'".into() },
            SameTypeConflict { param: s(), first: s(), second: s() },
            TypeAccessViolation {
                subject: AccessSubject::Function,
                decl_access: Accessibility::Public,
                type_access: Accessibility::Private,
                ty: s(),
            },
            OverrideMultipleDecls { kind: "method", arg_mismatch: false },
            OverrideLessAvailable {
                kind: "method",
                platform: "macos".into(),
                version: Version::new(10, 10, 0),
            },
            RawValueNotUnique,
            ClassWithoutInit { class: s(), properties: vec![s(), s(), s()] },
            RequiredInitializerMissing { class: s(), name: s(), base_class: s() },
        ]
    }

    #[test]
    fn test_every_code_is_registered() {
        for kind in all_kinds() {
            assert!(
                error_registry().is_valid_code(kind.code()),
                "code {} of {:?} missing from registry",
                kind.code(),
                kind
            );
        }
    }

    #[test]
    fn test_messages() {
        let kind = DiagKind::TypeAccessViolation {
            subject: AccessSubject::Function,
            decl_access: Accessibility::Public,
            type_access: Accessibility::Private,
            ty: "Secret".into(),
        };
        assert_eq!(
            kind.to_string(),
            "function must be declared private because its type uses a private type ('Secret')"
        );

        let one = DiagKind::ClassWithoutInit {
            class: "C".into(),
            properties: vec!["x".into()],
        };
        assert!(one.to_string().contains("stored property 'x' has no initial value"));
    }

    #[test]
    fn test_to_diagnostic_carries_code_notes_and_fixits() {
        let span = SourceSpan::at(source_map::FileId::new(0), 2, 5, 1);
        let diag = DeclDiagnostic::new(DiagKind::MissingOverride { kind: "method" }, span)
            .note(NoteKind::OverriddenHere, span)
            .fix_it(FixIt::insert(span, "override "));
        let rendered = to_diagnostic(&diag);
        assert_eq!(rendered.code.as_deref(), Some("E1417"));
        assert_eq!(rendered.notes.len(), 1);
        assert_eq!(rendered.suggestions.len(), 1);
        assert!(!rendered.help.is_empty());
    }
}
