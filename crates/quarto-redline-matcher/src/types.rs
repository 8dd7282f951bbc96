//! Result types shared by the locator functions.
//!
//! These types are serializable so the server layer can return them as JSON
//! without conversion.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A located line range in a source document.
///
/// `matched_source` is always the verbatim source lines
/// `start_line..=end_line` joined by `\n`, never the normalized projection,
/// so the original markup round-trips through an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Path of the document the match was found in.
    pub file_path: PathBuf,
    /// First matched line (1-indexed).
    pub start_line: usize,
    /// Last matched line (1-indexed, inclusive, `>= start_line`).
    pub end_line: usize,
    /// The verbatim source text of the matched lines.
    pub matched_source: String,
}

impl MatchResult {
    /// Number of source lines covered by the match.
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}

/// An ATX heading found outside fenced code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingBoundary {
    /// Number of leading `#` markers (1–6).
    pub level: usize,
    /// Heading text with markup stripped and whitespace normalized.
    pub text: String,
    /// Line number of the heading (1-indexed).
    pub line_number: usize,
}

/// One line's contribution to the plain-text projection of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionEntry {
    /// Stripped (outside code) or verbatim (inside code) text, normalized.
    pub normalized_text: String,
    /// Line index in the source (0-indexed).
    pub original_line: usize,
}
