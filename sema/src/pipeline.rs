//! Load, check and render a module file in one call

use crate::check::{to_diagnostic, CheckerStats, DeclChecker, DeclDiagnostic};
use crate::config::CheckerConfig;
use crate::decls::*;
use crate::error_codes::format_error_code;
use crate::loader::{build_module, LoadError, ModuleFile};
use diagnostics::{Diagnostics, ErrorFormatter, SourceMap, SourceSpan};
use log::info;
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::path::Path;

/// Everything one checking run produced
pub struct CheckOutcome {
    pub module: Module,
    pub diagnostics: Vec<DeclDiagnostic>,
    pub stats: CheckerStats,

    /// Holds the module's source text under the module name
    pub source_map: SourceMap,

    max_errors: usize,
}

impl CheckOutcome {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Diagnostics in formatter form, cut to the configured error limit
    pub fn rendered(&self) -> Diagnostics {
        let mut rendered: Diagnostics = self.diagnostics.iter().map(to_diagnostic).collect();
        if self.max_errors > 0 {
            rendered.truncate_errors(self.max_errors);
        }
        rendered
    }

    pub fn render_text(&self, colored: bool) -> String {
        let formatter = if colored {
            ErrorFormatter::with_colors()
        } else {
            ErrorFormatter::new()
        };
        formatter.format_diagnostics(&self.rendered(), &self.source_map)
    }

    pub fn to_json(&self) -> Value {
        let limit = if self.max_errors > 0 {
            self.max_errors
        } else {
            usize::MAX
        };
        let diagnostics: Vec<Value> = self
            .diagnostics
            .iter()
            .take(limit)
            .map(|d| {
                json!({
                    "code": format_error_code(d.code()),
                    "message": d.message(),
                    "location": location(d.span),
                    "notes": d.notes.iter().map(|(note, span)| json!({
                        "message": note.to_string(),
                        "location": location(*span),
                    })).collect::<Vec<_>>(),
                    "fixits": d.fixits.iter().map(|f| json!({
                        "description": f.describe(),
                        "location": location(f.span),
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();
        json!({
            "module": self.module.name,
            "diagnostics": diagnostics,
            "stats": self.stats,
        })
    }

    /// Indented listing of every declaration with its computed semantics
    pub fn dump(&self) -> String {
        let mut out = format!("module {}\n", self.module.name);
        for &id in &self.module.top_level {
            dump_decl(&self.module, id, 1, &mut out);
        }
        out
    }
}

fn location(span: SourceSpan) -> Value {
    if span.is_unknown() {
        Value::Null
    } else {
        json!({ "line": span.start.line, "column": span.start.column })
    }
}

fn dump_decl(module: &Module, id: DeclId, depth: usize, out: &mut String) {
    let decl = module.decl(id);
    let _ = write!(out, "{:indent$}{} {}", "", decl.descriptive_kind(), module.full_name(id), indent = depth * 2);
    if let Some(ty) = decl.interface_type {
        let _ = write!(out, ": {}", module.display_type(ty));
    }
    if let Some(access) = decl.access {
        let _ = write!(out, " [{access}]");
    }
    if let Some(edge) = decl.override_edge() {
        let owner = module.decl(edge.base).context.owner().map(|o| module.name_of(o)).unwrap_or("");
        let kind = if edge.exact { "exact" } else { "compatible" };
        let _ = write!(out, " overrides {}.{} ({kind})", owner, module.full_name(edge.base));
    }
    if let DeclKind::EnumElement(e) = &decl.kind {
        if let Some(raw) = &e.raw_value {
            let _ = write!(out, " = {raw}");
        }
    }
    if decl.implicit {
        out.push_str(" (implicit)");
    }
    if decl.is_invalid() {
        out.push_str(" (invalid)");
    } else if !decl.state.validated {
        out.push_str(" (unchecked)");
    }
    out.push('\n');
    for &member in decl.members() {
        if !module.decl(member).is_accessor() {
            dump_decl(module, member, depth + 1, out);
        }
    }
}

/// Check an already parsed module file
pub fn check_file(file: &ModuleFile, config: CheckerConfig) -> Result<CheckOutcome, LoadError> {
    let mut module = build_module(file)?;
    let mut source_map = SourceMap::new();
    source_map.add_file(file.module.clone(), file.source.clone().unwrap_or_default());

    let max_errors = config.max_errors;
    let mut checker = DeclChecker::new(&mut module).with_config(config);
    checker.check_module();
    let diagnostics = checker.take_diagnostics();
    let stats = checker.stats().clone();
    drop(checker);

    info!(
        "checked module '{}': {} diagnostics, {} overrides, {} implicit initializers",
        module.name,
        diagnostics.len(),
        stats.overrides_recorded,
        stats.implicit_ctors_added
    );
    Ok(CheckOutcome {
        module,
        diagnostics,
        stats,
        source_map,
        max_errors,
    })
}

pub fn check_module_json(text: &str, config: CheckerConfig) -> Result<CheckOutcome, LoadError> {
    let file: ModuleFile = serde_json::from_str(text)?;
    check_file(&file, config)
}

pub fn check_path(path: &Path, config: CheckerConfig) -> Result<CheckOutcome, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    check_module_json(&text, config)
}
