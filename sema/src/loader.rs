//! JSON declaration graphs
//!
//! A module file lists top-level declarations with their members nested
//! inside them. Types are written as text (`[String: Int]`, `Box<T>?`) and
//! parsed by [`TypeRepr`](crate::decls::TypeRepr); positions are optional
//! `"line:col"` strings pointing into the module's `source` text.
//!
//! ```json
//! { "module": "App",
//!   "decls": [
//!     { "kind": "class", "name": "Base", "members": [
//!         { "kind": "func", "name": "f", "params": [{"label": "x", "type": "Int"}],
//!           "result": "Int", "attrs": ["final"] } ] },
//!     { "kind": "extension", "extends": "Base", "members": [] } ] }
//! ```

use crate::decls::*;
use log::{debug, info, warn};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed module file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("'{decl}': bad location '{value}', expected line:col")]
    Location { decl: String, value: String },
    #[error("'{decl}': bad version '{value}'")]
    Version { decl: String, value: String },
    #[error("'{decl}': a {kind} cannot appear {place}")]
    Misplaced {
        decl: String,
        kind: &'static str,
        place: &'static str,
    },
}

impl LoadError {
    /// Registry code reported for this failure
    pub fn code(&self) -> u16 {
        match self {
            LoadError::Io { .. } | LoadError::Json(_) | LoadError::Misplaced { .. } => 1,
            LoadError::Build(BuildError::TypeRepr { .. }) => 2,
            LoadError::Build(BuildError::Requirement { .. }) => 3,
            LoadError::Build(BuildError::Misplaced { .. }) => 1,
            LoadError::Version { .. } => 1,
            LoadError::Location { .. } => 4,
        }
    }
}

/// Root of a module file
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleFile {
    pub module: String,

    /// Source text that `loc` positions refer to, used when rendering
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub decls: Vec<DeclEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclEntry {
    Class(NominalEntry),
    Struct(NominalEntry),
    Enum(NominalEntry),
    Protocol(NominalEntry),
    Extension(ExtensionEntry),
    Var(VarEntry),
    Func(FuncEntry),
    Subscript(SubscriptEntry),
    Init(InitEntry),
    Deinit(CommonEntry),
    Case(CaseEntry),
    #[serde(rename = "associatedtype")]
    AssociatedType(AssociatedTypeEntry),
}

impl DeclEntry {
    fn kind_name(&self) -> &'static str {
        match self {
            DeclEntry::Class(_) => "class",
            DeclEntry::Struct(_) => "struct",
            DeclEntry::Enum(_) => "enum",
            DeclEntry::Protocol(_) => "protocol",
            DeclEntry::Extension(_) => "extension",
            DeclEntry::Var(_) => "var",
            DeclEntry::Func(_) => "func",
            DeclEntry::Subscript(_) => "subscript",
            DeclEntry::Init(_) => "init",
            DeclEntry::Deinit(_) => "deinit",
            DeclEntry::Case(_) => "case",
            DeclEntry::AssociatedType(_) => "associatedtype",
        }
    }
}

/// Fields every declaration may carry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommonEntry {
    #[serde(default)]
    pub access: Option<Accessibility>,

    #[serde(default)]
    pub setter_access: Option<Accessibility>,

    /// `"line:col"`
    #[serde(default)]
    pub loc: Option<String>,

    #[serde(default)]
    pub attrs: Vec<String>,

    /// Explicit selector; implies the `objc` attribute
    #[serde(default)]
    pub objc: Option<String>,

    #[serde(default)]
    pub available: Vec<AvailableEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailableEntry {
    #[serde(default = "any_platform")]
    pub platform: String,

    #[serde(default)]
    pub introduced: Option<String>,

    #[serde(default)]
    pub unavailable: bool,
}

fn any_platform() -> String {
    "*".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenericParamEntry {
    pub name: String,

    #[serde(default)]
    pub inherits: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParamEntry {
    /// Argument label; absent means `_`
    #[serde(default)]
    pub label: Option<String>,

    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NominalEntry {
    pub name: String,

    #[serde(default)]
    pub inherits: Vec<String>,

    #[serde(default)]
    pub generic_params: Vec<GenericParamEntry>,

    #[serde(default, rename = "where")]
    pub where_clause: Vec<String>,

    #[serde(default)]
    pub members: Vec<DeclEntry>,

    #[serde(flatten)]
    pub common: CommonEntry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionEntry {
    pub extends: String,

    #[serde(default)]
    pub inherits: Vec<String>,

    #[serde(default, rename = "where")]
    pub where_clause: Vec<String>,

    #[serde(default)]
    pub members: Vec<DeclEntry>,

    #[serde(flatten)]
    pub common: CommonEntry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VarEntry {
    pub name: String,

    /// Missing when the property was written without an annotation
    #[serde(default, rename = "type")]
    pub ty: Option<String>,

    #[serde(default, rename = "let")]
    pub is_let: bool,

    #[serde(default = "stored")]
    pub storage: StorageKind,

    #[serde(default)]
    pub initializer: bool,

    #[serde(flatten)]
    pub common: CommonEntry,
}

fn stored() -> StorageKind {
    StorageKind::Stored
}

#[derive(Debug, Clone, Deserialize)]
pub struct FuncEntry {
    pub name: String,

    #[serde(default)]
    pub params: Vec<ParamEntry>,

    #[serde(default)]
    pub result: Option<String>,

    #[serde(default)]
    pub throws: bool,

    #[serde(default)]
    pub generic_params: Vec<GenericParamEntry>,

    #[serde(default, rename = "where")]
    pub where_clause: Vec<String>,

    #[serde(flatten)]
    pub common: CommonEntry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptEntry {
    #[serde(default)]
    pub params: Vec<ParamEntry>,

    pub element: String,

    #[serde(default)]
    pub settable: bool,

    #[serde(flatten)]
    pub common: CommonEntry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InitEntry {
    #[serde(default)]
    pub params: Vec<ParamEntry>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub failable: bool,

    #[serde(default)]
    pub throws: bool,

    #[serde(default)]
    pub generic_params: Vec<GenericParamEntry>,

    #[serde(default, rename = "where")]
    pub where_clause: Vec<String>,

    #[serde(flatten)]
    pub common: CommonEntry,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawEntry {
    Int(String),
    Float(String),
    String(String),
}

impl RawEntry {
    fn literal(&self) -> LiteralExpr {
        match self {
            RawEntry::Int(text) => LiteralExpr::integer(text.as_str()),
            RawEntry::Float(text) => LiteralExpr::float(text.as_str()),
            RawEntry::String(text) => LiteralExpr::string(text.as_str()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaseEntry {
    pub name: String,

    #[serde(default)]
    pub raw: Option<RawEntry>,

    /// Associated values, e.g. `(Int, label: String)`
    #[serde(default)]
    pub payload: Option<String>,

    #[serde(flatten)]
    pub common: CommonEntry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssociatedTypeEntry {
    pub name: String,

    #[serde(default)]
    pub inherits: Vec<String>,

    #[serde(default)]
    pub default: Option<String>,

    #[serde(flatten)]
    pub common: CommonEntry,
}

fn strs(items: &[String]) -> Vec<&str> {
    items.iter().map(String::as_str).collect()
}

fn param_specs(params: &[ParamEntry]) -> Vec<ParamSpec<'_>> {
    params
        .iter()
        .map(|p| (p.label.as_deref().filter(|l| *l != "_"), p.ty.as_str()))
        .collect()
}

/// Parse a module file into a declaration graph
pub fn load_module_str(text: &str) -> Result<Module, LoadError> {
    let file: ModuleFile = serde_json::from_str(text)?;
    build_module(&file)
}

pub fn load_module_file(path: &Path) -> Result<(ModuleFile, Module), LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file: ModuleFile = serde_json::from_str(&text)?;
    let module = build_module(&file)?;
    Ok((file, module))
}

pub fn build_module(file: &ModuleFile) -> Result<Module, LoadError> {
    let mut loader = Loader {
        builder: ModuleBuilder::new(&file.module),
    };
    for entry in &file.decls {
        loader.add_decl(entry, None)?;
    }
    let module = loader.builder.finish()?;
    info!("loaded module '{}' with {} declarations", module.name, module.decls.len());
    Ok(module)
}

struct Loader {
    builder: ModuleBuilder,
}

impl Loader {
    fn add_decl(&mut self, entry: &DeclEntry, parent: Option<DeclId>) -> Result<DeclId, LoadError> {
        let id = match entry {
            DeclEntry::Class(n) => self.add_nominal(NominalKind::Class, n, parent)?,
            DeclEntry::Struct(n) => self.add_nominal(NominalKind::Struct, n, parent)?,
            DeclEntry::Enum(n) => self.add_nominal(NominalKind::Enum, n, parent)?,
            DeclEntry::Protocol(n) => self.add_nominal(NominalKind::Protocol, n, parent)?,
            DeclEntry::Extension(e) => {
                if parent.is_some() {
                    return Err(self.misplaced(&e.extends, entry, "inside another declaration"));
                }
                let b = &mut self.builder;
                let id = b.extension(&e.extends, &strs(&e.inherits));
                for requirement in &e.where_clause {
                    b.requirement(id, requirement);
                }
                self.apply_common(id, &e.common)?;
                for member in &e.members {
                    self.add_decl(member, Some(id))?;
                }
                id
            }
            DeclEntry::Var(v) => {
                let b = &mut self.builder;
                let id = match &v.ty {
                    Some(ty) => b.var(parent, &v.name, ty),
                    None => b.untyped_var(parent, &v.name),
                };
                if v.is_let {
                    b.set_let(id);
                }
                b.set_storage(id, v.storage);
                if v.initializer {
                    b.set_initializer(id);
                }
                self.apply_common(id, &v.common)?;
                id
            }
            DeclEntry::Func(f) => {
                let b = &mut self.builder;
                let id = b.func(parent, &f.name, &param_specs(&f.params), f.result.as_deref());
                if f.throws {
                    b.set_throws(id);
                }
                self.add_generics(id, &f.generic_params, &f.where_clause);
                self.apply_common(id, &f.common)?;
                id
            }
            DeclEntry::Subscript(s) => {
                let owner = self.member_owner(parent, "subscript", entry)?;
                let id = self
                    .builder
                    .subscript(owner, &param_specs(&s.params), &s.element, s.settable);
                self.apply_common(id, &s.common)?;
                id
            }
            DeclEntry::Init(i) => {
                let owner = self.member_owner(parent, "init", entry)?;
                let b = &mut self.builder;
                let id = b.init(owner, &param_specs(&i.params));
                if i.required {
                    b.attrs(id).is_required = true;
                }
                if i.failable {
                    b.set_failable(id);
                }
                if i.throws {
                    b.set_throws(id);
                }
                self.add_generics(id, &i.generic_params, &i.where_clause);
                self.apply_common(id, &i.common)?;
                id
            }
            DeclEntry::Deinit(common) => {
                let owner = self.member_owner(parent, "deinit", entry)?;
                let id = self.builder.deinit(owner);
                self.apply_common(id, common)?;
                id
            }
            DeclEntry::Case(c) => {
                let owner = self.member_owner(parent, &c.name, entry)?;
                let raw = c.raw.as_ref().map(RawEntry::literal);
                let id = match &c.payload {
                    Some(payload) => {
                        let id = self.builder.case_with_payload(owner, &c.name, payload);
                        if let Some(raw) = raw {
                            let span = self.builder.module().decl(id).span;
                            if let DeclKind::EnumElement(e) = &mut self.builder.decl_mut(id).kind {
                                e.raw_value = Some(raw.at(span));
                            }
                        }
                        id
                    }
                    None => self.builder.case(owner, &c.name, raw),
                };
                self.apply_common(id, &c.common)?;
                id
            }
            DeclEntry::AssociatedType(a) => {
                let owner = self.member_owner(parent, &a.name, entry)?;
                let id = self
                    .builder
                    .associated_type(owner, &a.name, &strs(&a.inherits), a.default.as_deref());
                self.apply_common(id, &a.common)?;
                id
            }
        };
        debug!("loaded {} '{}'", entry.kind_name(), self.builder.module().full_name(id));
        Ok(id)
    }

    fn add_nominal(&mut self, kind: NominalKind, entry: &NominalEntry, parent: Option<DeclId>) -> Result<DeclId, LoadError> {
        let id = self.builder.nominal(kind, &entry.name, parent, &strs(&entry.inherits));
        self.add_generics(id, &entry.generic_params, &entry.where_clause);
        self.apply_common(id, &entry.common)?;
        for member in &entry.members {
            self.add_decl(member, Some(id))?;
        }
        Ok(id)
    }

    fn add_generics(&mut self, owner: DeclId, params: &[GenericParamEntry], where_clause: &[String]) {
        for param in params {
            self.builder.generic_param(owner, &param.name, &strs(&param.inherits));
        }
        for requirement in where_clause {
            self.builder.requirement(owner, requirement);
        }
    }

    fn member_owner(&self, parent: Option<DeclId>, name: &str, entry: &DeclEntry) -> Result<DeclId, LoadError> {
        parent.ok_or_else(|| self.misplaced(name, entry, "at the top level"))
    }

    fn misplaced(&self, name: &str, entry: &DeclEntry, place: &'static str) -> LoadError {
        LoadError::Misplaced {
            decl: name.to_string(),
            kind: entry.kind_name(),
            place,
        }
    }

    fn apply_common(&mut self, id: DeclId, common: &CommonEntry) -> Result<(), LoadError> {
        let name = self.builder.module().full_name(id);
        let b = &mut self.builder;
        if let Some(access) = common.access {
            b.set_access(id, access);
        }
        if let Some(setter) = common.setter_access {
            b.attrs(id).setter_access = Some(setter);
        }
        if let Some(loc) = &common.loc {
            let (line, column) = parse_location(loc).ok_or_else(|| LoadError::Location {
                decl: name.clone(),
                value: loc.clone(),
            })?;
            b.at(id, line, column);
        }
        if let Some(selector) = &common.objc {
            b.attrs(id).objc = Some(ObjCAttr {
                name: Some(selector.clone()),
                implicit: false,
            });
        }
        for entry in &common.available {
            let introduced = match &entry.introduced {
                Some(text) => Some(Version::parse(text).ok_or_else(|| LoadError::Version {
                    decl: name.clone(),
                    value: text.clone(),
                })?),
                None => None,
            };
            b.attrs(id).available.push(AvailableAttr {
                platform: entry.platform.clone(),
                introduced,
                unavailable: entry.unavailable,
            });
        }
        for attr in &common.attrs {
            match attr.as_str() {
                "override" => b.attrs(id).is_override = true,
                "final" => b.attrs(id).is_final = true,
                "dynamic" => b.attrs(id).is_dynamic = true,
                "required" => b.attrs(id).is_required = true,
                "static" | "class" => b.attrs(id).is_static = true,
                "rethrows" => b.attrs(id).rethrows = true,
                "noreturn" => b.attrs(id).noreturn = true,
                "objc" => {
                    let attrs = b.attrs(id);
                    if attrs.objc.is_none() {
                        attrs.objc = Some(ObjCAttr::default());
                    }
                }
                "weak" => b.attrs(id).ownership = Ownership::Weak,
                "unowned" => b.attrs(id).ownership = Ownership::Unowned,
                "unmanaged" => b.attrs(id).ownership = Ownership::Unmanaged,
                "throws" => b.set_throws(id),
                "failable" => b.set_failable(id),
                "convenience" => b.set_ctor_kind(id, CtorKind::Convenience),
                "factory" => b.set_ctor_kind(id, CtorKind::Factory),
                "let" => b.set_let(id),
                other => warn!("'{}': ignoring unknown attribute '{}'", name, other),
            }
        }
        Ok(())
    }
}

fn parse_location(text: &str) -> Option<(usize, usize)> {
    let (line, column) = text.split_once(':')?;
    let line = line.trim().parse().ok()?;
    let column = column.trim().parse().ok()?;
    (line > 0 && column > 0).then_some((line, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_nested_members() {
        let module = load_module_str(
            r#"{ "module": "App", "decls": [
                { "kind": "class", "name": "Base", "access": "public", "loc": "3:7",
                  "generic_params": [{"name": "T"}],
                  "members": [
                    { "kind": "var", "name": "x", "type": "Int", "initializer": true },
                    { "kind": "func", "name": "f", "params": [{"label": "x", "type": "Int"}, {"type": "T"}],
                      "result": "Int", "attrs": ["final"], "objc": "fWithX:" },
                    { "kind": "init", "params": [], "required": true }
                  ] },
                { "kind": "extension", "extends": "Base", "members": [
                    { "kind": "subscript", "params": [{"type": "Int"}], "element": "String" } ] }
            ] }"#,
        )
        .unwrap();

        assert_eq!(module.name, "App");
        let base = module.lookup_top_level("Base").unwrap();
        let decl = module.decl(base);
        assert_eq!(decl.attrs.access, Some(Accessibility::Public));
        assert_eq!((decl.span.start.line, decl.span.start.column), (3, 7));
        assert_eq!(decl.members().len(), 3);
        assert_eq!(decl.generic_params().map(|g| g.params.len()), Some(1));

        let f = decl.members()[1];
        assert_eq!(module.full_name(f), "f(x:_:)");
        assert!(module.decl(f).attrs.is_final);
        assert_eq!(module.decl(f).attrs.objc.as_ref().and_then(|o| o.name.as_deref()), Some("fWithX:"));
        assert!(module.decl(decl.members()[2]).attrs.is_required);
        assert_eq!(module.top_level.len(), 2);
    }

    #[test]
    fn test_raw_values_and_attributes() {
        let module = load_module_str(
            r#"{ "module": "M", "decls": [
                { "kind": "enum", "name": "E", "inherits": ["Int"], "members": [
                    { "kind": "case", "name": "a", "raw": {"int": "0x10"} },
                    { "kind": "case", "name": "b", "payload": "(Int, label: String)" } ] },
                { "kind": "class", "name": "C", "members": [
                    { "kind": "var", "name": "d", "type": "C?", "attrs": ["weak"], "storage": "computed_settable",
                      "available": [{"platform": "macos", "introduced": "10.10"}] } ] }
            ] }"#,
        )
        .unwrap();

        let e = module.lookup_top_level("E").unwrap();
        let a = module.decl(e).members()[0];
        match &module.decl(a).kind {
            DeclKind::EnumElement(data) => {
                let raw = data.raw_value.as_ref().unwrap();
                assert_eq!(raw.kind, LiteralKind::Integer);
                assert_eq!(raw.text, "0x10");
                assert!(!raw.implicit);
            }
            other => panic!("unexpected {other:?}"),
        }
        let c = module.lookup_top_level("C").unwrap();
        let d = module.decl(module.decl(c).members()[0]);
        assert_eq!(d.attrs.ownership, Ownership::Weak);
        assert!(d.is_settable());
        assert_eq!(d.attrs.introduced_on("macos"), Some(Version::new(10, 10, 0)));
    }

    #[test]
    fn test_untyped_var() {
        let module = load_module_str(r#"{ "module": "M", "decls": [ { "kind": "var", "name": "v" } ] }"#).unwrap();
        let v = module.top_level[0];
        assert!(matches!(&module.decl(v).kind, DeclKind::Var(data) if data.ty.is_none()));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(load_module_str("{"), Err(LoadError::Json(_))));
        assert!(matches!(
            load_module_str(r#"{ "module": "M", "decls": [ { "kind": "init" } ] }"#),
            Err(LoadError::Misplaced { kind: "init", .. })
        ));
        assert!(matches!(
            load_module_str(r#"{ "module": "M", "decls": [ { "kind": "struct", "name": "S", "loc": "x" } ] }"#),
            Err(LoadError::Location { .. })
        ));
        assert!(matches!(
            load_module_str(r#"{ "module": "M", "decls": [ { "kind": "var", "name": "v", "type": "[Int" } ] }"#),
            Err(LoadError::Build(BuildError::TypeRepr { .. }))
        ));
        assert!(matches!(
            load_module_str(r#"{ "module": "M", "decls": [ { "kind": "operator", "name": "+" } ] }"#),
            Err(LoadError::Json(_))
        ));
    }
}
