//! Line-level markup stripping and whitespace normalization.
//!
//! A rendered view of a Markdown document shows prose without its syntax:
//! `## **Intro**` renders as "Intro", `[docs](https://…)` renders as "docs".
//! The functions here reproduce that loss on a single source line so the
//! result can be compared against text a reader selected in the rendered
//! view.
//!
//! ```text
//! Source:   - See the [guide](./guide.md) for `cargo` **details**.
//! Stripped: See the guide for cargo details.
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// ATX heading markers (`#` to `######`) at the start of the line.
static HEADING_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s+").unwrap());

/// Bulleted list markers (`-`, `*`, `+`), possibly indented.
static BULLET_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-*+]\s+").unwrap());

/// Numbered list markers (`1.`, `23.`), possibly indented.
static NUMBERED_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+\.\s+").unwrap());

static STRONG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").unwrap());

/// `__strong__` delimited by word boundaries, so `snake_case` names survive.
static STRONG_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b__(.+?)__\b").unwrap());

static EMPHASIS_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b_(.+?)_\b").unwrap());

static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.+?)`").unwrap());

static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.+?)\]\(.+?\)").unwrap());

/// Opening, closing and self-closing HTML/JSX tags.
///
/// The tag name must start with a letter, so prose such as `a < b` or
/// `<-- arrow` is left alone.
static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[a-zA-Z][a-zA-Z0-9-]*(?:\s[^>]*)?/?>").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Remove Markdown syntax from a single source line.
///
/// Strips, in order: a leading heading marker, a leading list marker
/// (bulleted or numbered), strong and emphasis markers (`*` or `_`), inline-code
/// backticks, link syntax (keeping the link text) and well-formed inline
/// HTML tags. The result is trimmed.
///
/// # Example
///
/// ```
/// use quarto_redline_matcher::strip_markup;
///
/// assert_eq!(strip_markup("## **Setup** and `cargo`"), "Setup and cargo");
/// assert_eq!(strip_markup("See [the guide](guide.md)."), "See the guide.");
/// ```
pub fn strip_markup(line: &str) -> String {
    let line = HEADING_MARKER.replace(line, "");
    let line = BULLET_MARKER.replace(&line, "");
    let line = NUMBERED_MARKER.replace(&line, "");
    let line = STRONG.replace_all(&line, "${1}");
    let line = EMPHASIS.replace_all(&line, "${1}");
    let line = STRONG_UNDERSCORE.replace_all(&line, "${1}");
    let line = EMPHASIS_UNDERSCORE.replace_all(&line, "${1}");
    let line = INLINE_CODE.replace_all(&line, "${1}");
    let line = LINK.replace_all(&line, "${1}");
    let line = HTML_TAG.replace_all(&line, "");
    line.trim().to_string()
}

/// Collapse every run of whitespace (newlines included) to a single space
/// and trim both ends.
///
/// Applied identically to source-derived text and to caller-supplied
/// selections, so incidental whitespace differences never prevent a match.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Count the leading `#` characters of an ATX heading line.
///
/// Returns `None` for lines that are not headings: more than six markers,
/// or markers not followed by whitespace or end of line (`#hashtag`).
pub(crate) fn heading_level(line: &str) -> Option<usize> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match line[hashes..].chars().next() {
        None => Some(hashes),
        Some(c) if c.is_whitespace() => Some(hashes),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_heading_markers_at_every_level() {
        for level in 1..=6 {
            let line = format!("{} Title", "#".repeat(level));
            assert_eq!(strip_markup(&line), "Title");
        }
        // Seven markers is not a heading
        assert_eq!(strip_markup("####### Title"), "####### Title");
    }

    #[test]
    fn strips_list_markers() {
        assert_eq!(strip_markup("- first"), "first");
        assert_eq!(strip_markup("  * nested"), "nested");
        assert_eq!(strip_markup("+ plus"), "plus");
        assert_eq!(strip_markup("12. numbered"), "numbered");
    }

    #[test]
    fn collapses_inline_spans() {
        insta::assert_snapshot!(strip_markup("This is **bold** and *italic*."), @"This is bold and italic.");
        insta::assert_snapshot!(strip_markup("Run `console.log` to debug."), @"Run console.log to debug.");
        insta::assert_snapshot!(
            strip_markup("Read [the docs](https://example.com) first."),
            @"Read the docs first."
        );
    }

    #[test]
    fn collapses_underscore_spans() {
        insta::assert_snapshot!(
            strip_markup("An __important__ and _subtle_ point."),
            @"An important and subtle point."
        );
        assert_eq!(strip_markup("_Note:_ read this"), "Note: read this");
    }

    #[test]
    fn keeps_underscores_inside_words() {
        assert_eq!(strip_markup("Set snake_case_name here."), "Set snake_case_name here.");
        assert_eq!(strip_markup("Use MAX_RETRY_COUNT and my_var."), "Use MAX_RETRY_COUNT and my_var.");
    }

    #[test]
    fn combined_markup() {
        assert_eq!(
            strip_markup("## **Important** [link](https://example.com) and `code` together"),
            "Important link and code together"
        );
    }

    #[test]
    fn strips_well_formed_tags_only() {
        assert_eq!(strip_markup("<div>content</div> here."), "content here.");
        assert_eq!(strip_markup(r#"<Comp title="hidden" />"#), "");
        assert_eq!(strip_markup("a < b and c > d"), "a < b and c > d");
        assert_eq!(strip_markup("<-- arrow"), "<-- arrow");
        assert_eq!(strip_markup("x <3 y"), "x <3 y");
    }

    #[test]
    fn blank_and_plain_lines() {
        assert_eq!(strip_markup(""), "");
        assert_eq!(strip_markup("   "), "");
        assert_eq!(strip_markup("  plain text  "), "plain text");
    }

    #[test]
    fn normalize_collapses_runs() {
        assert_eq!(normalize_whitespace("  a   b\n\n c\t d  "), "a b c d");
        assert_eq!(normalize_whitespace("\n \t "), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = [
            "",
            "   ",
            "single",
            "two  words",
            "line one\nline two\r\n\tline three ",
            "全角　スペース", // U+3000 is whitespace
        ];
        for input in inputs {
            let once = normalize_whitespace(input);
            assert_eq!(normalize_whitespace(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn heading_levels() {
        assert_eq!(heading_level("# One"), Some(1));
        assert_eq!(heading_level("### Three"), Some(3));
        assert_eq!(heading_level("######"), Some(6));
        assert_eq!(heading_level("#hashtag"), None);
        assert_eq!(heading_level("####### seven"), None);
        assert_eq!(heading_level("plain"), None);
    }
}
