//! Mapping rendered selections back to source lines.
//!
//! The locator builds a *projection* of the document: one entry per source
//! line that would produce visible text, holding that text with markup
//! stripped and whitespace normalized. Entries are joined with single
//! spaces into a search string, the normalized selection is found in it,
//! and the match offsets are mapped back to the entries' source lines.
//!
//! ```text
//! line 5: ## Intro              -> "Intro"
//! line 6:                       -> (no entry)
//! line 7: Hello **world**.      -> "Hello world."
//!
//! search string: "Intro Hello world."
//! ```

use std::io;
use std::path::Path;

use tracing::trace;

use crate::document::SourceDocument;
use crate::normalize::{normalize_whitespace, strip_markup};
use crate::scan::{FenceTracker, content_start, skip_preamble};
use crate::types::{MatchResult, ProjectionEntry};

/// The plain-text view of a document used only for locating selections.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    entries: Vec<ProjectionEntry>,
    text: String,
}

impl Projection {
    /// Build the projection of a document.
    ///
    /// Front matter, leading blank lines and import directives are skipped.
    /// Fence delimiter lines contribute nothing; lines inside a fence are
    /// used verbatim (right-trimmed), all other lines go through
    /// [`strip_markup`]. Every entry is normalized *before* concatenation so
    /// that entry lengths match their spans in the search string.
    pub fn build(document: &SourceDocument) -> Self {
        let lines = document.lines();
        let start = skip_preamble(&lines, content_start(&lines));

        let mut entries = Vec::new();
        let mut fence = FenceTracker::default();

        for (index, line) in lines.iter().enumerate().skip(start) {
            if fence.observe(line) {
                continue;
            }

            let visible = if fence.is_inside() {
                line.trim_end().to_string()
            } else {
                strip_markup(line)
            };

            let normalized_text = normalize_whitespace(&visible);
            if normalized_text.is_empty() {
                continue;
            }
            entries.push(ProjectionEntry {
                normalized_text,
                original_line: index,
            });
        }

        let text = entries
            .iter()
            .map(|e| e.normalized_text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Self { entries, text }
    }

    /// The concatenated search string.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The projection entries in document order.
    pub fn entries(&self) -> &[ProjectionEntry] {
        &self.entries
    }

    /// Find the leftmost occurrence of an already-normalized needle and
    /// return the 0-indexed source lines of the first and last entries it
    /// touches.
    pub fn find(&self, needle: &str) -> Option<(usize, usize)> {
        if needle.is_empty() {
            return None;
        }
        let match_start = self.text.find(needle)?;
        let match_end = match_start + needle.len();

        let mut offset = 0;
        let mut first_line = None;
        for entry in &self.entries {
            let entry_end = offset + entry.normalized_text.len();
            if first_line.is_none() && entry_end > match_start {
                first_line = Some(entry.original_line);
            }
            if entry_end >= match_end {
                return first_line.map(|first| (first, entry.original_line));
            }
            offset = entry_end + 1;
        }
        None
    }
}

/// Locate a rendered selection in a document's source.
///
/// The selection is whitespace-normalized the same way as the projection.
/// Returns `None` if it is empty after normalization or does not occur. If
/// it occurs more than once, the earliest occurrence wins.
///
/// # Example
///
/// ```
/// use quarto_redline_matcher::{SourceDocument, locate};
///
/// let doc = SourceDocument::new(
///     "post.md",
///     "---\ntitle: x\n---\n\n## Intro\n\nHello **world**.\n",
/// );
/// let found = locate(&doc, "Hello world.").unwrap();
/// assert_eq!((found.start_line, found.end_line), (7, 7));
/// assert_eq!(found.matched_source, "Hello **world**.");
/// ```
pub fn locate(document: &SourceDocument, selection: &str) -> Option<MatchResult> {
    let needle = normalize_whitespace(selection);
    if needle.is_empty() {
        return None;
    }

    let projection = Projection::build(document);
    trace!(
        path = %document.path().display(),
        entries = projection.entries().len(),
        "Built projection"
    );

    let (first, last) = projection.find(&needle)?;
    let start_line = first + 1;
    let end_line = last + 1;
    let matched_source = document.slice_lines(start_line, end_line)?;

    Some(MatchResult {
        file_path: document.path().to_path_buf(),
        start_line,
        end_line,
        matched_source,
    })
}

/// Read a file and locate a selection in it.
pub fn locate_in_file(path: impl AsRef<Path>, selection: &str) -> io::Result<Option<MatchResult>> {
    let document = SourceDocument::read(path)?;
    Ok(locate(&document, selection))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "---\ntitle: x\n---\n\n## Intro\n\nHello **world**.\n";

    fn doc(text: &str) -> SourceDocument {
        SourceDocument::new("test.md", text)
    }

    #[test]
    fn projection_of_example() {
        let projection = Projection::build(&doc(EXAMPLE));
        assert_eq!(projection.text(), "Intro Hello world.");
        let lines: Vec<usize> = projection.entries().iter().map(|e| e.original_line).collect();
        assert_eq!(lines, vec![4, 6]);
    }

    #[test]
    fn locates_heading_and_paragraph() {
        let doc = doc(EXAMPLE);

        let heading = locate(&doc, "Intro").unwrap();
        assert_eq!(heading.start_line, 5);
        assert_eq!(heading.end_line, 5);
        assert_eq!(heading.matched_source, "## Intro");

        let para = locate(&doc, "Hello world.").unwrap();
        assert_eq!(para.start_line, 7);
        assert_eq!(para.end_line, 7);
        assert_eq!(para.matched_source, "Hello **world**.");
        assert_eq!(para.file_path, Path::new("test.md"));
    }

    #[test]
    fn empty_selection_is_not_found() {
        assert_eq!(locate(&doc(EXAMPLE), ""), None);
        assert_eq!(locate(&doc(EXAMPLE), "  \n\t "), None);
    }

    #[test]
    fn entries_are_normalized_before_joining() {
        // Multi-space runs inside a line must not shift later offsets.
        let doc = doc("one    two   three\nfour five");
        let projection = Projection::build(&doc);
        assert_eq!(projection.text(), "one two three four five");

        let found = locate(&doc, "four").unwrap();
        assert_eq!(found.start_line, 2);
        assert_eq!(found.end_line, 2);
    }

    #[test]
    fn match_spanning_entry_boundary() {
        let doc = doc("alpha beta\n\ngamma delta");
        let found = locate(&doc, "beta gamma").unwrap();
        assert_eq!(found.start_line, 1);
        assert_eq!(found.end_line, 3);
        assert_eq!(found.matched_source, "alpha beta\n\ngamma delta");
    }

    #[test]
    fn match_ending_exactly_at_entry_end() {
        let doc = doc("first line\nsecond line");
        let found = locate(&doc, "first line").unwrap();
        assert_eq!((found.start_line, found.end_line), (1, 1));
    }

    #[test]
    fn code_blocks_are_verbatim() {
        let doc = doc("Intro\n\n```rust\nlet x = **y**;\n```\n");
        let found = locate(&doc, "let x = **y**;").unwrap();
        assert_eq!(found.start_line, 4);
        assert_eq!(found.matched_source, "let x = **y**;");
        // Stripped form of code is not in the projection
        assert_eq!(locate(&doc, "let x = y;"), None);
    }

    #[test]
    fn fence_lines_never_match() {
        let doc = doc("```rust\nfn main() {}\n```\n");
        assert_eq!(locate(&doc, "rust"), None);
    }

    #[test]
    fn empty_and_directive_only_documents() {
        assert_eq!(locate(&doc(""), "anything"), None);
        assert_eq!(
            locate(&doc("import A from './A.astro';\nimport B from './B.astro';\n"), "A from"),
            None
        );
        assert_eq!(locate(&doc("---\ntitle: secret\n---\n"), "secret"), None);
    }

    #[test]
    fn crlf_lines_round_trip() {
        let doc = doc("# Title\r\n\r\nBody text.\r\n");
        let found = locate(&doc, "Body text.").unwrap();
        assert_eq!(found.start_line, 3);
        assert_eq!(found.matched_source, "Body text.\r");
    }
}
