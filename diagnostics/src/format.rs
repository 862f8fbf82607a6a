//! Rustc-style text rendering of diagnostics

use crate::{Diagnostic, DiagnosticSeverity, Diagnostics, SourceMap, SourceSpan};
use std::fmt::Write;

const RESET: &str = "\x1b[0m";
const BLUE: &str = "\x1b[96m";
const BOLD: &str = "\x1b[1;97m";

/// Formatter for displaying diagnostics
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorFormatter {
    use_colors: bool,
}

impl ErrorFormatter {
    pub fn new() -> Self {
        Self { use_colors: false }
    }

    pub fn with_colors() -> Self {
        Self { use_colors: true }
    }

    pub fn format_diagnostics(&self, diagnostics: &Diagnostics, source_map: &SourceMap) -> String {
        diagnostics
            .diagnostics
            .iter()
            .map(|d| self.format_diagnostic(d, source_map))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic, source_map: &SourceMap) -> String {
        let mut out = String::new();

        let severity_color = match diagnostic.severity {
            DiagnosticSeverity::Error => "\x1b[31m",
            DiagnosticSeverity::Warning => "\x1b[33m",
        };
        let code = diagnostic
            .code
            .as_ref()
            .map(|c| format!("[{}]", c))
            .unwrap_or_default();
        if self.use_colors {
            let _ = writeln!(
                out,
                "{}{}{}{}: {}{}{}",
                severity_color, diagnostic.severity, code, RESET, BOLD, diagnostic.message, RESET
            );
        } else {
            let _ = writeln!(out, "{}{}: {}", diagnostic.severity, code, diagnostic.message);
        }

        let primary_label = diagnostic.labels.first().map(|l| l.message.as_str());
        self.write_snippet(&mut out, &diagnostic.span, primary_label, source_map);

        for suggestion in &diagnostic.suggestions {
            let _ = writeln!(
                out,
                "{}: {} at {}",
                self.paint("\x1b[38;5;208m", "suggestion"),
                suggestion.message,
                suggestion.span
            );
        }

        for help in &diagnostic.help {
            let _ = writeln!(out, "     {}: {}", self.paint("\x1b[32m", "help"), help);
        }

        for note in &diagnostic.notes {
            let _ = writeln!(out, "{}: {}", self.paint("\x1b[34m", "note"), note.message);
            if let Some(span) = &note.span {
                self.write_snippet(&mut out, span, None, source_map);
            }
        }

        out
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn write_location(&self, out: &mut String, span: &SourceSpan, source_map: &SourceMap) {
        if span.is_unknown() {
            return;
        }
        let Some(file) = source_map.get_file(span.file_id) else {
            return;
        };
        let _ = writeln!(
            out,
            "  {} {}:{}:{}",
            self.paint(BLUE, "-->"),
            file.name,
            span.start.line,
            span.start.column
        );
    }

    fn write_snippet(
        &self,
        out: &mut String,
        span: &SourceSpan,
        label: Option<&str>,
        source_map: &SourceMap,
    ) {
        self.write_location(out, span, source_map);
        let Some(line) = source_map.get_line(span.file_id, span.start.line) else {
            return;
        };
        if span.is_unknown() {
            return;
        }

        let gutter = span.start.line.to_string().len();
        let bar = self.paint(BLUE, "|");
        let _ = writeln!(out, "{:gutter$} {}", "", bar);
        let _ = writeln!(
            out,
            "{} {} {}",
            self.paint(BLUE, &span.start.line.to_string()),
            bar,
            line
        );

        let start = span.start.column.saturating_sub(1);
        let width = if span.end.line == span.start.line && span.end.column > span.start.column {
            span.end.column - span.start.column
        } else {
            line.len().saturating_sub(start).max(1)
        };
        let carets = self.paint("\x1b[31m", &"^".repeat(width));
        match label {
            Some(msg) => {
                let _ = writeln!(out, "{:gutter$} {} {:start$}{} {}", "", bar, "", carets, msg);
            }
            None => {
                let _ = writeln!(out, "{:gutter$} {} {:start$}{}", "", bar, "", carets);
            }
        }
    }
}
