//! Source files, positions and spans for declaration diagnostics
//!
//! Declaration graphs arrive with `line:column` locations rather than byte
//! offsets, so spans here are built from line/column pairs and the byte
//! offset is derived from the registered file text when it is available.

use std::fmt;

/// A 1-based line/column position plus the byte offset it corresponds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
    pub byte_offset: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize, byte_offset: usize) -> Self {
        Self {
            line,
            column,
            byte_offset,
        }
    }

    /// Position 0:0, used for synthesized declarations
    pub const fn unknown() -> Self {
        Self {
            line: 0,
            column: 0,
            byte_offset: 0,
        }
    }
}

/// Unique identifier for a registered source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(usize);

impl FileId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

/// A half-open range of source text within one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    pub start: SourcePosition,
    pub end: SourcePosition,
    pub file_id: FileId,
}

impl SourceSpan {
    pub fn new(start: SourcePosition, end: SourcePosition, file_id: FileId) -> Self {
        Self {
            start,
            end,
            file_id,
        }
    }

    /// A span covering `len` columns starting at `line:column`.
    ///
    /// The byte offsets are left at zero; use [`SourceMap::span_at`] when the
    /// file text is registered and offsets matter.
    pub fn at(file_id: FileId, line: usize, column: usize, len: usize) -> Self {
        Self {
            start: SourcePosition::new(line, column, 0),
            end: SourcePosition::new(line, column + len.max(1), 0),
            file_id,
        }
    }

    /// Span for declarations that have no source, such as implicit initializers
    pub const fn unknown() -> Self {
        Self {
            start: SourcePosition::unknown(),
            end: SourcePosition::unknown(),
            file_id: FileId(0),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.start.line == 0
    }

    /// Smallest span containing both. Spans from different files keep `self`.
    pub fn merge(self, other: SourceSpan) -> SourceSpan {
        if self.file_id != other.file_id || other.is_unknown() {
            return self;
        }
        if self.is_unknown() {
            return other;
        }
        SourceSpan::new(
            self.start.min(other.start),
            self.end.max(other.end),
            self.file_id,
        )
    }
}

impl Default for SourceSpan {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            write!(f, "<implicit>")
        } else {
            write!(f, "{}:{}", self.start.line, self.start.column)
        }
    }
}

/// A registered file with precomputed line starts
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(name: String, content: String) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            content
                .char_indices()
                .filter(|(_, ch)| *ch == '\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            name,
            content,
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Text of a 1-based line without its terminator
    pub fn get_line(&self, line_number: usize) -> Option<&str> {
        let start = *self.line_starts.get(line_number.checked_sub(1)?)?;
        let end = self
            .line_starts
            .get(line_number)
            .copied()
            .unwrap_or(self.content.len());
        Some(self.content[start..end].trim_end_matches(['\n', '\r']))
    }

    /// Byte offset of a 1-based `line:column`, clamped to the line's end
    pub fn offset_of(&self, line: usize, column: usize) -> Option<usize> {
        let text = self.get_line(line)?;
        let start = self.line_starts[line - 1];
        Some(start + column.saturating_sub(1).min(text.len()))
    }
}

/// All files participating in one checking run, indexed by [`FileId`]
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, name: String, content: String) -> FileId {
        self.files.push(SourceFile::new(name, content));
        FileId(self.files.len() - 1)
    }

    pub fn get_file(&self, file_id: FileId) -> Option<&SourceFile> {
        self.files.get(file_id.0)
    }

    pub fn get_line(&self, file_id: FileId, line_number: usize) -> Option<&str> {
        self.get_file(file_id)?.get_line(line_number)
    }

    /// Like [`SourceSpan::at`], with byte offsets filled in from the file text
    pub fn span_at(&self, file_id: FileId, line: usize, column: usize, len: usize) -> SourceSpan {
        let mut span = SourceSpan::at(file_id, line, column, len);
        if let Some(file) = self.get_file(file_id) {
            span.start.byte_offset = file.offset_of(line, column).unwrap_or(0);
            span.end.byte_offset = file.offset_of(line, span.end.column).unwrap_or(0);
        }
        span
    }

    pub fn file_ids(&self) -> impl Iterator<Item = FileId> + '_ {
        (0..self.files.len()).map(FileId)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
