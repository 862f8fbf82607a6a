//! Identifier interning
//!
//! Declaration names, argument labels and selectors are interned once per
//! module so name comparisons during lookup and override matching are integer
//! comparisons.

use fxhash::FxBuildHasher;
use indexmap::IndexSet;
use std::fmt;

/// An interned identifier. The default value is the empty identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Identifier(u32);

impl Identifier {
    /// The empty string, always interned at index 0
    pub const EMPTY: Identifier = Identifier(0);

    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// Insertion-ordered string table
#[derive(Debug, Clone)]
pub struct Interner {
    strings: IndexSet<Box<str>, FxBuildHasher>,
}

impl Interner {
    pub fn new() -> Self {
        let mut strings = IndexSet::with_hasher(FxBuildHasher::default());
        strings.insert(Box::from(""));
        Self { strings }
    }

    pub fn intern(&mut self, text: &str) -> Identifier {
        if let Some(index) = self.strings.get_index_of(text) {
            return Identifier(index as u32);
        }
        let (index, _) = self.strings.insert_full(Box::from(text));
        Identifier(index as u32)
    }

    /// Look up without interning
    pub fn get(&self, text: &str) -> Option<Identifier> {
        self.strings.get_index_of(text).map(|i| Identifier(i as u32))
    }

    pub fn resolve(&self, id: Identifier) -> &str {
        self.strings
            .get_index(id.0 as usize)
            .map(|s| &**s)
            .unwrap_or("<unknown>")
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

/// A declaration's full name: base name plus argument labels.
///
/// `labels` is `None` for simple names (properties, types, enum cases) and
/// `Some` for functions, initializers and subscripts, where a `None` label is
/// the unlabeled `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DeclName {
    pub base: Identifier,
    pub labels: Option<Vec<Option<Identifier>>>,
}

impl DeclName {
    pub fn simple(base: Identifier) -> Self {
        Self { base, labels: None }
    }

    pub fn compound(base: Identifier, labels: Vec<Option<Identifier>>) -> Self {
        Self {
            base,
            labels: Some(labels),
        }
    }

    pub fn is_simple(&self) -> bool {
        self.labels.is_none()
    }

    pub fn label_count(&self) -> usize {
        self.labels.as_ref().map_or(0, Vec::len)
    }

    /// The same name without its argument labels
    pub fn base_name(&self) -> DeclName {
        DeclName::simple(self.base)
    }

    /// Whether a lookup for `query` should return a declaration named `self`.
    /// A simple query matches any declaration with the same base name.
    pub fn matches(&self, query: &DeclName) -> bool {
        self.base == query.base && (query.labels.is_none() || self.labels == query.labels)
    }

    pub fn display<'a>(&'a self, interner: &'a Interner) -> DeclNameDisplay<'a> {
        DeclNameDisplay {
            name: self,
            interner,
        }
    }
}

pub struct DeclNameDisplay<'a> {
    name: &'a DeclName,
    interner: &'a Interner,
}

impl fmt::Display for DeclNameDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.interner.resolve(self.name.base))?;
        if let Some(labels) = &self.name.labels {
            write!(f, "(")?;
            for label in labels {
                match label {
                    Some(l) => write!(f, "{}:", self.interner.resolve(*l))?,
                    None => write!(f, "_:")?,
                }
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
