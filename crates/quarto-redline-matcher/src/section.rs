//! Heading outlines and section extraction.

use crate::document::SourceDocument;
use crate::normalize::{heading_level, normalize_whitespace, strip_markup};
use crate::scan::{FenceTracker, content_start};
use crate::types::{HeadingBoundary, MatchResult};

/// Collect every ATX heading outside fenced code, after front matter.
///
/// Lines inside a fence are never headings, so `# comment` lines in a
/// Python or shell block do not appear in the outline.
pub fn headings(document: &SourceDocument) -> Vec<HeadingBoundary> {
    let lines = document.lines();
    let mut fence = FenceTracker::default();
    let mut result = Vec::new();

    for (index, line) in lines.iter().enumerate().skip(content_start(&lines)) {
        if fence.observe(line) || fence.is_inside() {
            continue;
        }
        if let Some(level) = heading_level(line) {
            result.push(HeadingBoundary {
                level,
                text: normalize_whitespace(&strip_markup(line)),
                line_number: index + 1,
            });
        }
    }

    result
}

/// Locate the section introduced by a heading.
///
/// The section starts at the first heading of exactly `level` whose
/// stripped, normalized text equals the normalized `heading`. It ends just
/// before the next heading of the same or a shallower level, or at the end
/// of the document. Trailing blank lines are excluded from the range.
///
/// # Example
///
/// ```
/// use quarto_redline_matcher::{SourceDocument, locate_section};
///
/// let doc = SourceDocument::new("a.md", "# One\n\nFirst.\n\n# Two\n\nSecond.\n");
/// let section = locate_section(&doc, "One", 1).unwrap();
/// assert_eq!(section.matched_source, "# One\n\nFirst.");
/// ```
pub fn locate_section(
    document: &SourceDocument,
    heading: &str,
    level: usize,
) -> Option<MatchResult> {
    let wanted = normalize_whitespace(&strip_markup(heading));
    if wanted.is_empty() {
        return None;
    }

    let outline = headings(document);
    let position = outline
        .iter()
        .position(|h| h.level == level && h.text == wanted)?;
    let start_line = outline[position].line_number;

    let lines = document.lines();
    let mut end_line = outline[position + 1..]
        .iter()
        .find(|h| h.level <= level)
        .map(|h| h.line_number - 1)
        .unwrap_or(lines.len());

    while end_line > start_line && lines[end_line - 1].trim().is_empty() {
        end_line -= 1;
    }

    Some(MatchResult {
        file_path: document.path().to_path_buf(),
        start_line,
        end_line,
        matched_source: lines[start_line - 1..end_line].join("\n"),
    })
}
