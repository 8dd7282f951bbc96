//! Source document snapshots.
//!
//! A [`SourceDocument`] is the raw text of a file at one instant. The locator
//! never caches documents: callers read a fresh snapshot for every request.

use std::io;
use std::path::{Path, PathBuf};

/// The raw text of a Markdown file at one instant.
///
/// Lines are split on `\n` only, so a trailing newline produces a final empty
/// line and `\r` is kept as part of the line (verbatim slices round-trip
/// exactly). All externally visible line numbers are 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    path: PathBuf,
    text: String,
}

impl SourceDocument {
    /// Create a document from in-memory text.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read a document from disk as UTF-8.
    pub fn read(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(path, text))
    }

    /// Get the document's path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the document's full text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Split the text into lines (0-indexed slice positions).
    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    /// Number of lines, counting the empty line after a trailing newline.
    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Return lines `start..=end` (1-indexed, inclusive) joined by `\n`.
    ///
    /// Returns `None` when the range is empty or out of bounds.
    pub fn slice_lines(&self, start: usize, end: usize) -> Option<String> {
        if start == 0 || start > end {
            return None;
        }
        let lines = self.lines();
        if end > lines.len() {
            return None;
        }
        Some(lines[start - 1..end].join("\n"))
    }
}
