//! Declaration validation for a nominal-type language
//!
//! Given a declaration graph (classes, structs, enums, protocols,
//! extensions and their members) the checker computes interface types,
//! accessibility, generic signatures and override edges, validates enum raw
//! values and synthesizes implicit initializers, reporting every problem as
//! a coded diagnostic.
//!
//! ```no_run
//! use sema::config::CheckerConfig;
//! use sema::pipeline::check_module_json;
//!
//! let outcome = check_module_json(r#"{ "module": "App", "decls": [] }"#, CheckerConfig::default())?;
//! print!("{}", outcome.render_text(false));
//! # Ok::<(), sema::loader::LoadError>(())
//! ```

pub mod check;
pub mod config;
pub mod decls;
pub mod error_codes;
pub mod loader;
pub mod logging;
pub mod pipeline;

pub use check::{CheckerStats, DeclChecker, DeclDiagnostic};
pub use config::CheckerConfig;
pub use decls::{Module, ModuleBuilder};
