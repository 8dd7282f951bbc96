//! Apply, undo and redo against live documents.
//!
//! Each operation runs under the per-document lock from [`EditLog`], so the
//! read, hash check, splice, write and append sequence never interleaves
//! with another operation on the same document. Operations on different
//! documents only share the brief lookup in the log's outer map.

use std::path::{Path, PathBuf};

use quarto_redline_matcher::{normalize_whitespace, strip_markup};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::edit_log::{
    EditEvent, EditKind, EditLog, EditRecord, find_last_effective, find_last_undone,
    hash_content, ineffective_seqs, lock,
};
use crate::error::{Error, Result};
use crate::storage::FileStore;

/// Result of a successful undo or redo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryOutcome {
    /// Plain text of the first restored line, for scrolling a rendered view
    /// to the change. Empty if the restored text is blank.
    pub scroll_hint: String,
    /// The event recorded for this transition.
    pub event: EditEvent,
}

/// Whether undo and redo are currently available for a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// The undo/redo orchestrator: a [`FileStore`] plus the [`EditLog`] that
/// records every change made through it.
#[derive(Debug, Default)]
pub struct EditHistory<S> {
    store: S,
    log: EditLog,
}

impl<S: FileStore> EditHistory<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            log: EditLog::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn log(&self) -> &EditLog {
        &self.log
    }

    /// Replace lines `start_line..=end_line` (1-indexed) with `modified` and
    /// record the change.
    pub fn apply(
        &self,
        path: &Path,
        start_line: usize,
        end_line: usize,
        modified: &str,
    ) -> Result<EditEvent> {
        let key = self.store.resolve(path);
        let document = self.log.document(&key);
        let mut document = lock(&document);

        let before = self.store.read(&key)?;
        let (after, original) = splice_lines(&before, start_line, end_line, modified)?;
        self.store.write(&key, &after)?;

        let event = document.append(EditRecord {
            start_line,
            end_line,
            original,
            modified: modified.to_string(),
            hash_before: hash_content(&before),
            hash_after: hash_content(&after),
            kind: EditKind::Apply,
        });

        info!(
            path = %key.display(),
            seq = event.seq,
            start_line,
            end_line,
            "Applied edit"
        );
        Ok(event)
    }

    /// Revert the newest apply that is still in effect.
    pub fn undo(&self, path: &Path) -> Result<HistoryOutcome> {
        let key = self.store.resolve(path);
        let Some(document) = self.log.existing(&key) else {
            return Err(Error::NothingToUndo(key));
        };
        let mut document = lock(&document);

        let events = document.events();
        let ineffective = ineffective_seqs(events);
        let target = find_last_effective(events, &ineffective)
            .cloned()
            .ok_or_else(|| Error::NothingToUndo(key.clone()))?;

        let before = self.store.read(&key)?;
        let found = hash_content(&before);
        if found != target.hash_after {
            warn!(
                path = %key.display(),
                target_seq = target.seq,
                "Refusing to undo: document changed outside the edit history"
            );
            return Err(Error::ExternalModification {
                path: key,
                expected: target.hash_after,
                found,
            });
        }

        let end_line = target.start_line + target.modified_line_count - 1;
        let (after, _) = splice_lines(&before, target.start_line, end_line, &target.original)?;
        self.store.write(&key, &after)?;

        let event = document.append(EditRecord {
            start_line: target.start_line,
            end_line,
            original: target.modified.clone(),
            modified: target.original.clone(),
            hash_before: found,
            hash_after: hash_content(&after),
            kind: EditKind::Undo { target: target.seq },
        });

        info!(path = %key.display(), seq = event.seq, target_seq = target.seq, "Undid edit");
        Ok(HistoryOutcome {
            scroll_hint: scroll_hint(&event.modified),
            event,
        })
    }

    /// Re-apply the edit reverted by the newest undo that is still in effect.
    pub fn redo(&self, path: &Path) -> Result<HistoryOutcome> {
        let key = self.store.resolve(path);
        let Some(document) = self.log.existing(&key) else {
            return Err(Error::NothingToRedo(key));
        };
        let mut document = lock(&document);

        let events = document.events();
        let ineffective = ineffective_seqs(events);
        let (undo_seq, apply_seq) = find_last_undone(events, &ineffective)
            .and_then(|undo| undo.undo_target().map(|target| (undo.seq, target)))
            .ok_or_else(|| Error::NothingToRedo(key.clone()))?;
        let original = events
            .iter()
            .find(|e| e.seq == apply_seq)
            .cloned()
            .ok_or(Error::CorruptedEvent {
                seq: undo_seq,
                target: apply_seq,
            })?;

        let before = self.store.read(&key)?;
        let found = hash_content(&before);
        if found != original.hash_before {
            warn!(
                path = %key.display(),
                target_seq = undo_seq,
                "Refusing to redo: document changed outside the edit history"
            );
            return Err(Error::ExternalModification {
                path: key,
                expected: original.hash_before,
                found,
            });
        }

        let end_line = original.start_line + original.original_line_count - 1;
        let (after, _) =
            splice_lines(&before, original.start_line, end_line, &original.modified)?;
        self.store.write(&key, &after)?;

        let event = document.append(EditRecord {
            start_line: original.start_line,
            end_line,
            original: original.original.clone(),
            modified: original.modified.clone(),
            hash_before: found,
            hash_after: hash_content(&after),
            kind: EditKind::Redo { target: undo_seq },
        });

        info!(path = %key.display(), seq = event.seq, target_seq = undo_seq, "Redid edit");
        Ok(HistoryOutcome {
            scroll_hint: scroll_hint(&event.modified),
            event,
        })
    }

    pub fn history_state(&self, path: &Path) -> HistoryState {
        let key = self.store.resolve(path);
        HistoryState {
            can_undo: self.log.can_undo(&key),
            can_redo: self.log.can_redo(&key),
        }
    }

    pub fn events(&self, path: &Path) -> Vec<EditEvent> {
        self.log.events(&self.store.resolve(path))
    }

    /// The key the log uses for `path`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.store.resolve(path)
    }
}

/// Replace lines `start_line..=end_line` (1-indexed) of `text` with
/// `replacement`, returning the new text and the replaced lines.
pub fn splice_lines(
    text: &str,
    start_line: usize,
    end_line: usize,
    replacement: &str,
) -> Result<(String, String)> {
    let lines: Vec<&str> = text.split('\n').collect();
    if start_line == 0 || start_line > end_line || end_line > lines.len() {
        return Err(Error::InvalidRange {
            start_line,
            end_line,
            line_count: lines.len(),
        });
    }

    let replaced = lines[start_line - 1..end_line].join("\n");
    let spliced: Vec<&str> = lines[..start_line - 1]
        .iter()
        .copied()
        .chain(replacement.split('\n'))
        .chain(lines[end_line..].iter().copied())
        .collect();

    Ok((spliced.join("\n"), replaced))
}

/// First non-blank line of `text` as a rendered view would show it.
pub fn scroll_hint(text: &str) -> String {
    text.lines()
        .map(|line| normalize_whitespace(&strip_markup(line)))
        .find(|line| !line.is_empty())
        .unwrap_or_default()
}
