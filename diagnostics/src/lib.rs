//! Diagnostics library for declaration checking
//!
//! Provides rustc-style diagnostics with:
//! - Error and warning severities
//! - A labelled primary span
//! - Located notes ("overridden declaration is here")
//! - Fix-its rendered as suggestions with applicability
//! - Plain or colored terminal formatting

use std::fmt;

pub mod fixit;
mod format;

pub use fixit::{FixIt, FixItKind};
pub use format::ErrorFormatter;
// Re-export source mapping types from the source_map crate
pub use source_map::{FileId, SourceFile, SourceMap, SourcePosition, SourceSpan};

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
        }
    }
}

/// A label that points to a span of code
#[derive(Debug, Clone)]
pub struct Label {
    pub span: SourceSpan,
    pub message: String,
}

impl Label {
    pub fn primary(span: SourceSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// Applicability level for suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applicability {
    MachineApplicable,
    HasPlaceholders,
    MaybeIncorrect,
}

/// A textual edit offered to fix an issue
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub message: String,
    pub span: SourceSpan,
    pub replacement: String,
    pub applicability: Applicability,
}

/// A note attached to a diagnostic, optionally pointing at another location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub span: Option<SourceSpan>,
    pub message: String,
}

/// A diagnostic message with severity, labels, notes and suggestions
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: Option<String>,
    pub message: String,
    pub span: SourceSpan,
    pub labels: Vec<Label>,
    pub suggestions: Vec<Suggestion>,
    pub notes: Vec<Note>,
    pub help: Vec<String>,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

/// Collection of diagnostics in emission order
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
    }

    /// Keep only the first `limit` errors; warnings are kept.
    pub fn truncate_errors(&mut self, limit: usize) {
        let mut seen = 0;
        self.diagnostics.retain(|d| {
            if !d.is_error() {
                return true;
            }
            seen += 1;
            seen <= limit
        });
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self {
            diagnostics: iter.into_iter().collect(),
        }
    }
}

/// Builder for creating diagnostics
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            diagnostic: Diagnostic {
                severity,
                code: None,
                message: message.into(),
                span,
                labels: vec![],
                suggestions: vec![],
                notes: vec![],
                help: vec![],
            },
        }
    }

    pub fn error(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(DiagnosticSeverity::Error, message, span)
    }

    pub fn warning(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(DiagnosticSeverity::Warning, message, span)
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.diagnostic.code = Some(code.into());
        self
    }

    pub fn label(mut self, span: SourceSpan, message: impl Into<String>) -> Self {
        self.diagnostic.labels.push(Label::primary(span, message));
        self
    }

    pub fn suggestion(
        mut self,
        message: impl Into<String>,
        span: SourceSpan,
        replacement: impl Into<String>,
        applicability: Applicability,
    ) -> Self {
        self.diagnostic.suggestions.push(Suggestion {
            message: message.into(),
            span,
            replacement: replacement.into(),
            applicability,
        });
        self
    }

    /// Attach a fix-it as a machine-applicable suggestion
    pub fn fix_it(self, fix: &FixIt) -> Self {
        let message = fix.describe();
        let replacement = fix.replacement().to_string();
        self.suggestion(message, fix.span, replacement, fix.applicability())
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.diagnostic.notes.push(Note {
            span: None,
            message: note.into(),
        });
        self
    }

    pub fn note_at(mut self, span: SourceSpan, note: impl Into<String>) -> Self {
        self.diagnostic.notes.push(Note {
            span: Some(span),
            message: note.into(),
        });
        self
    }

    pub fn help(mut self, help_msg: impl Into<String>) -> Self {
        self.diagnostic.help.push(help_msg.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }
}
