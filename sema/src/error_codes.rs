//! Error Code Registry for declaration checking
//!
//! Every diagnostic the checker emits carries a stable numeric code. Codes are
//! grouped by range so that a code alone tells which component produced it.
//!
//! # Error Code Ranges
//!
//! - E0001-E0099: Input graph errors (malformed JSON, bad type expressions)
//! - E1000-E1099: Declaration errors (type resolution, redeclaration, extensions)
//! - E1100-E1199: Inheritance clause and inheritance cycle errors
//! - E1200-E1299: Generic signature errors
//! - E1300-E1399: Accessibility errors
//! - E1400-E1499: Override errors
//! - E1500-E1599: Enum raw value errors
//! - E1600-E1699: Implicit initializer errors

use std::collections::BTreeMap;
use std::fmt;

/// Error code struct containing the numeric code and human-readable description
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    /// The numeric error code (e.g., 1101)
    pub code: u16,
    /// Component that reports it
    pub category: &'static str,
    /// Brief description of what this error means
    pub description: &'static str,
    /// Optional help text with suggestions for fixing the error
    pub help: Option<&'static str>,
}

impl ErrorCode {
    pub const fn new(
        code: u16,
        category: &'static str,
        description: &'static str,
        help: Option<&'static str>,
    ) -> Self {
        Self {
            code,
            category,
            description,
            help,
        }
    }

    /// Format the error code as "E{code:04}" (e.g., "E1101")
    pub fn format_code(&self) -> String {
        format_error_code(self.code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {}",
            self.format_code(),
            self.category,
            self.description
        )
    }
}

const INPUT: &str = "Input";
const DECL: &str = "Declaration";
const INHERITANCE: &str = "Inheritance";
const GENERICS: &str = "Generics";
const ACCESS: &str = "Accessibility";
const OVERRIDE: &str = "Override";
const RAW_VALUE: &str = "RawValue";
const IMPLICIT: &str = "ImplicitMember";

static CODES: &[ErrorCode] = &[
    // ===== INPUT (E0001-E0099) =====
    ErrorCode::new(1, INPUT, "Malformed declaration graph", Some("The input must be a JSON object with 'module' and 'decls'")),
    ErrorCode::new(2, INPUT, "Invalid type expression", Some("Type expressions use Name<Args>, T?, [T], [K: V], (A) -> B, P & Q")),
    ErrorCode::new(3, INPUT, "Invalid generic requirement", Some("Requirements are written 'T: Bound' or 'T == U'")),
    ErrorCode::new(4, INPUT, "Invalid source location", Some("Locations are written 'line:column'")),
    // ===== DECLARATIONS (E1000-E1099) =====
    ErrorCode::new(1001, DECL, "Cannot find type in scope", Some("Check the spelling or declare the type")),
    ErrorCode::new(1002, DECL, "Wrong number of generic arguments", None),
    ErrorCode::new(1003, DECL, "Type has no member type with this name", None),
    ErrorCode::new(1004, DECL, "Reference to generic type requires arguments", Some("Write the generic arguments in angle brackets")),
    ErrorCode::new(1005, DECL, "Missing type annotation", Some("Declarations must carry an explicit type")),
    ErrorCode::new(1010, DECL, "Invalid redeclaration", Some("Rename one of the declarations or change its signature")),
    ErrorCode::new(1011, DECL, "Extension of a non-nominal type", Some("Only classes, structs, enums and protocols can be extended")),
    // ===== INHERITANCE (E1100-E1199) =====
    ErrorCode::new(1101, INHERITANCE, "Duplicate inheritance clause entry", Some("Remove the repeated entry")),
    ErrorCode::new(1102, INHERITANCE, "Multiple superclasses", Some("A class can inherit from at most one class")),
    ErrorCode::new(1103, INHERITANCE, "Superclass must appear first", Some("Move the superclass to the front of the clause")),
    ErrorCode::new(1104, INHERITANCE, "Multiple enum raw types", None),
    ErrorCode::new(1105, INHERITANCE, "Raw type must appear first", Some("Move the raw type to the front of the clause")),
    ErrorCode::new(1106, INHERITANCE, "Non-class type cannot inherit from a class", None),
    ErrorCode::new(1107, INHERITANCE, "Extension cannot add a superclass", None),
    ErrorCode::new(1108, INHERITANCE, "Inheritance from non-protocol, non-class type", None),
    ErrorCode::new(1109, INHERITANCE, "Inheritance from non-protocol type", None),
    ErrorCode::new(1110, INHERITANCE, "Protocol extension cannot have an inheritance clause", None),
    ErrorCode::new(1111, INHERITANCE, "Constrained extension cannot have an inheritance clause", None),
    ErrorCode::new(1112, INHERITANCE, "Circular class inheritance", Some("Break the cycle by removing one superclass")),
    ErrorCode::new(1113, INHERITANCE, "Circular protocol inheritance", Some("Break the cycle by removing one inherited protocol")),
    ErrorCode::new(1114, INHERITANCE, "Circular enum raw type", None),
    // ===== GENERICS (E1200-E1299) =====
    ErrorCode::new(1201, GENERICS, "Constraint to a non-protocol, non-class type", None),
    ErrorCode::new(1202, GENERICS, "Conflicting same-type requirements", None),
    ErrorCode::new(1203, GENERICS, "Requirement does not refer to a generic parameter", None),
    ErrorCode::new(1204, GENERICS, "Multiple superclass bounds", None),
    // ===== ACCESSIBILITY (E1300-E1399) =====
    ErrorCode::new(1301, ACCESS, "Property uses a less accessible type", Some("Raise the type's accessibility or lower the property's")),
    ErrorCode::new(1302, ACCESS, "Function uses a less accessible type", Some("Raise the type's accessibility or lower the function's")),
    ErrorCode::new(1303, ACCESS, "Subscript uses a less accessible type", None),
    ErrorCode::new(1304, ACCESS, "Inherited type is less accessible", None),
    ErrorCode::new(1305, ACCESS, "Generic requirement uses a less accessible type", None),
    ErrorCode::new(1306, ACCESS, "Associated type default is less accessible", None),
    ErrorCode::new(1307, ACCESS, "Initializer uses a less accessible type", None),
    ErrorCode::new(1308, ACCESS, "Setter more accessible than getter", None),
    // ===== OVERRIDES (E1400-E1499) =====
    ErrorCode::new(1401, OVERRIDE, "Property does not override any property", Some("Remove 'override' or fix the name")),
    ErrorCode::new(1402, OVERRIDE, "Method does not override any method", Some("Remove 'override' or fix the signature")),
    ErrorCode::new(1403, OVERRIDE, "Initializer does not override a designated initializer", None),
    ErrorCode::new(1404, OVERRIDE, "Subscript does not override any subscript", None),
    ErrorCode::new(1405, OVERRIDE, "Declaration overrides more than one superclass declaration", None),
    ErrorCode::new(1406, OVERRIDE, "Argument names do not match overridden declaration", None),
    ErrorCode::new(1407, OVERRIDE, "Selector match with incompatible type", None),
    ErrorCode::new(1408, OVERRIDE, "Override is less accessible than required", None),
    ErrorCode::new(1409, OVERRIDE, "Covariant override of a mutable subscript", None),
    ErrorCode::new(1410, OVERRIDE, "Property type does not match overridden property", None),
    ErrorCode::new(1411, OVERRIDE, "Covariant override of a mutable property", None),
    ErrorCode::new(1412, OVERRIDE, "Cannot override with a stored property", Some("Use a computed property or add observers")),
    ErrorCode::new(1413, OVERRIDE, "Cannot observe a read-only property", None),
    ErrorCode::new(1414, OVERRIDE, "Cannot override mutable property with read-only property", None),
    ErrorCode::new(1415, OVERRIDE, "Cannot override a 'let' property", None),
    ErrorCode::new(1416, OVERRIDE, "Override involving a declaration in an extension", None),
    ErrorCode::new(1417, OVERRIDE, "Missing 'override' keyword", Some("Add 'override' before the declaration")),
    ErrorCode::new(1418, OVERRIDE, "Throwing override of a non-throwing declaration", None),
    ErrorCode::new(1419, OVERRIDE, "Non-throwing override of a throwing exposed declaration", None),
    ErrorCode::new(1420, OVERRIDE, "Override of an unavailable declaration", None),
    ErrorCode::new(1421, OVERRIDE, "Override is less available than overridden declaration", None),
    ErrorCode::new(1422, OVERRIDE, "Override of 'rethrows' declaration must be 'rethrows'", None),
    ErrorCode::new(1423, OVERRIDE, "Cannot override a final declaration", None),
    ErrorCode::new(1424, OVERRIDE, "Returning override of a non-returning declaration", None),
    ErrorCode::new(1425, OVERRIDE, "Ownership does not match overridden property", None),
    // ===== RAW VALUES (E1500-E1599) =====
    ErrorCode::new(1501, RAW_VALUE, "Raw value is not unique", None),
    ErrorCode::new(1502, RAW_VALUE, "Cannot auto-increment from a non-integer raw value", None),
    ErrorCode::new(1503, RAW_VALUE, "Case needs an explicit raw value", Some("Only integer- and string-convertible raw types get automatic values")),
    ErrorCode::new(1504, RAW_VALUE, "Case with payload in enum with raw type", None),
    ErrorCode::new(1505, RAW_VALUE, "Raw type is not convertible from any literal", None),
    ErrorCode::new(1506, RAW_VALUE, "Enum with raw type has no cases", None),
    ErrorCode::new(1507, RAW_VALUE, "Literal cannot be converted to the raw type", None),
    ErrorCode::new(1508, RAW_VALUE, "Raw value on enum without raw type", None),
    ErrorCode::new(1509, RAW_VALUE, "Integer literal overflows the raw type", None),
    // ===== IMPLICIT MEMBERS (E1600-E1699) =====
    ErrorCode::new(1601, IMPLICIT, "Class has no initializers", Some("Give every stored property an initial value or write an initializer")),
    ErrorCode::new(1602, IMPLICIT, "Required initializer must be provided by subclass", None),
];

/// Registry of every code the checker can emit
pub struct ErrorCodeRegistry {
    codes: BTreeMap<u16, &'static ErrorCode>,
}

impl ErrorCodeRegistry {
    pub fn new() -> Self {
        Self {
            codes: CODES.iter().map(|c| (c.code, c)).collect(),
        }
    }

    pub fn get(&self, code: u16) -> Option<&'static ErrorCode> {
        self.codes.get(&code).copied()
    }

    /// Get an error code by its formatted string (e.g., "E1101")
    pub fn get_by_string(&self, code_str: &str) -> Option<&'static ErrorCode> {
        self.get(parse_error_code(code_str)?)
    }

    pub fn is_valid_code(&self, code: u16) -> bool {
        self.codes.contains_key(&code)
    }

    /// All codes of one category, in numeric order
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'static ErrorCode> + 'a {
        self.codes
            .values()
            .copied()
            .filter(move |c| c.category == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static ErrorCode> + '_ {
        self.codes.values().copied()
    }
}

impl Default for ErrorCodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static REGISTRY: std::sync::OnceLock<ErrorCodeRegistry> = std::sync::OnceLock::new();

/// Get the global error code registry
pub fn error_registry() -> &'static ErrorCodeRegistry {
    REGISTRY.get_or_init(ErrorCodeRegistry::new)
}

pub fn get_error_code(code: u16) -> Option<&'static ErrorCode> {
    error_registry().get(code)
}

/// 1101 -> "E1101"
pub fn format_error_code(code: u16) -> String {
    format!("E{:04}", code)
}

/// "E1101" -> Some(1101)
pub fn parse_error_code(code_str: &str) -> Option<u16> {
    code_str.strip_prefix('E')?.parse::<u16>().ok()
}
