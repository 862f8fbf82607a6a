//! Fix-its: small source edits attached to a diagnostic
//!
//! A fix-it is either an insertion before a span, a removal of a span, or a
//! replacement of a span's text.

use crate::{Applicability, SourceSpan};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixItKind {
    Insert(String),
    Remove,
    Replace(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixIt {
    pub span: SourceSpan,
    pub kind: FixItKind,
    /// Text contains placeholders the user must fill in
    pub placeholders: bool,
}

impl FixIt {
    pub fn insert(span: SourceSpan, text: impl Into<String>) -> Self {
        Self {
            span,
            kind: FixItKind::Insert(text.into()),
            placeholders: false,
        }
    }

    pub fn remove(span: SourceSpan) -> Self {
        Self {
            span,
            kind: FixItKind::Remove,
            placeholders: false,
        }
    }

    pub fn replace(span: SourceSpan, text: impl Into<String>) -> Self {
        Self {
            span,
            kind: FixItKind::Replace(text.into()),
            placeholders: false,
        }
    }

    pub fn with_placeholders(mut self) -> Self {
        self.placeholders = true;
        self
    }

    pub fn replacement(&self) -> &str {
        match &self.kind {
            FixItKind::Insert(text) | FixItKind::Replace(text) => text,
            FixItKind::Remove => "",
        }
    }

    pub fn applicability(&self) -> Applicability {
        if self.placeholders {
            Applicability::HasPlaceholders
        } else {
            Applicability::MachineApplicable
        }
    }

    pub fn describe(&self) -> String {
        match &self.kind {
            FixItKind::Insert(text) => format!("insert '{}'", text.trim_end()),
            FixItKind::Remove => "remove this".to_string(),
            FixItKind::Replace(text) => format!("replace with '{}'", text),
        }
    }
}
