//! Document scanning shared by the locator and the section extractor:
//! front matter detection, leading directive skipping and fenced-code
//! tracking.

use once_cell::sync::Lazy;
use regex::Regex;

/// MDX-style `import X from '...'` lines.
static IMPORT_DIRECTIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^import\s").unwrap());

const FRONT_MATTER_DELIMITER: &str = "---";

/// Index of the first line after the front matter block.
///
/// Front matter is recognized only when the very first line is `---`. If the
/// block is never closed, the document is treated as having no front matter.
pub(crate) fn content_start(lines: &[&str]) -> usize {
    if lines.first().map(|l| l.trim()) != Some(FRONT_MATTER_DELIMITER) {
        return 0;
    }
    lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| line.trim() == FRONT_MATTER_DELIMITER)
        .map(|(i, _)| i + 1)
        .unwrap_or(0)
}

/// Advance past blank lines and import directives starting at `start`.
pub(crate) fn skip_preamble(lines: &[&str], start: usize) -> usize {
    let mut index = start;
    while let Some(line) = lines.get(index) {
        let trimmed = line.trim();
        if trimmed.is_empty() || IMPORT_DIRECTIVE.is_match(trimmed) {
            index += 1;
        } else {
            break;
        }
    }
    index
}

/// Tracks whether a top-to-bottom scan is inside a fenced code block.
///
/// A fence opens on a line whose trimmed text starts with at least three
/// backticks or tildes (an info string such as `typescript` may follow). It
/// closes on a line consisting solely of the same character repeated at
/// least as many times as the opener. Anything else inside the block,
/// including `#` comments, is content.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<(u8, usize)>,
}

impl FenceTracker {
    pub(crate) fn is_inside(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line. Returns `true` if the line is a fence delimiter, in
    /// which case it contributes nothing to the scan.
    pub(crate) fn observe(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        let Some((marker, run)) = fence_marker(trimmed) else {
            return false;
        };

        match self.open {
            None => {
                self.open = Some((marker, run));
                true
            }
            Some((open_marker, open_run)) => {
                let closes = marker == open_marker
                    && run >= open_run
                    && trimmed[run..].trim().is_empty();
                if closes {
                    self.open = None;
                }
                closes
            }
        }
    }
}

fn fence_marker(trimmed: &str) -> Option<(u8, usize)> {
    let first = *trimmed.as_bytes().first()?;
    if first != b'`' && first != b'~' {
        return None;
    }
    let run = trimmed.bytes().take_while(|&b| b == first).count();
    (run >= 3).then_some((first, run))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_matter_is_skipped() {
        let lines = vec!["---", "title: x", "---", "", "body"];
        assert_eq!(content_start(&lines), 3);
    }

    #[test]
    fn no_front_matter() {
        let lines = vec!["# Title", "---", "body"];
        assert_eq!(content_start(&lines), 0);
    }

    #[test]
    fn unterminated_front_matter_is_ignored() {
        let lines = vec!["---", "title: x", "body"];
        assert_eq!(content_start(&lines), 0);
    }

    #[test]
    fn preamble_skips_blank_and_imports() {
        let lines = vec![
            "",
            "import A from './A.astro';",
            "import B from './B.astro';",
            "",
            "important text",
        ];
        assert_eq!(skip_preamble(&lines, 0), 4);
    }

    #[test]
    fn fence_with_info_string() {
        let mut fence = FenceTracker::default();
        assert!(fence.observe("```typescript"));
        assert!(fence.is_inside());
        assert!(!fence.observe("# not a heading"));
        assert!(fence.observe("```"));
        assert!(!fence.is_inside());
    }

    #[test]
    fn fence_closer_must_match_opener() {
        let mut fence = FenceTracker::default();
        assert!(fence.observe("````"));
        assert!(!fence.observe("```"));
        assert!(!fence.observe("~~~~"));
        assert!(fence.is_inside());
        assert!(fence.observe("`````"));
        assert!(!fence.is_inside());
    }

    #[test]
    fn tilde_fences() {
        let mut fence = FenceTracker::default();
        assert!(fence.observe("~~~"));
        assert!(!fence.observe("```python"));
        assert!(fence.observe("  ~~~  "));
        assert!(!fence.is_inside());
    }
}
