//! Index types for the declaration arena and the type table
//!
//! Each ID is a `u32` newtype so declaration and type indices cannot be mixed
//! up. `u32::MAX` is reserved as the invalid sentinel.

use std::fmt;

/// Macro to define ID types with consistent behavior
macro_rules! define_id_type {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn as_raw(self) -> u32 {
                self.0
            }

            /// Position in the owning arena
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }

            pub const fn invalid() -> Self {
                Self(u32::MAX)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", stringify!($name), self.0)
                } else {
                    write!(f, "{}(<invalid>)", stringify!($name))
                }
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self::from_raw(raw)
            }
        }
    };
}

define_id_type! {
    /// Index of a declaration in the module's [`DeclArena`](super::DeclArena)
    DeclId
}

define_id_type! {
    /// Index of an interned type in the [`TypeTable`](super::TypeTable).
    ///
    /// Types are hash-consed, so two `TypeId`s are equal exactly when the
    /// types are structurally identical.
    TypeId
}

/// Hash maps and sets keyed by IDs
pub mod collections {
    use super::{DeclId, TypeId};

    pub type IdMap<K, V> = fxhash::FxHashMap<K, V>;
    pub type IdSet<K> = fxhash::FxHashSet<K>;

    pub type DeclMap<V> = IdMap<DeclId, V>;
    pub type DeclSet = IdSet<DeclId>;
    pub type TypeMap<V> = IdMap<TypeId, V>;
    pub type TypeSet = IdSet<TypeId>;
}
