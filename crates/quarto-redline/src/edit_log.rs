//! Append-only edit history per document.
//!
//! Every apply, undo and redo appends one immutable [`EditEvent`]. Nothing is
//! ever rewritten or removed, so the full history of a file stays
//! reconstructible. What can be undone or redone *right now* is derived by
//! replaying the events:
//!
//! ```text
//! seq 1  Apply          cancelled: {}
//! seq 2  Undo(1)        cancelled: {1}
//! seq 3  Redo(2)        cancelled: {2, 3}        (1 reinstated)
//! seq 4  Undo(1)        cancelled: {1, 2, 3}
//! ```
//!
//! The undo target is the newest apply not cancelled; the redo target is the
//! newest undo not cancelled. The log lives for the process lifetime and is
//! never persisted.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// What an event did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditKind {
    /// A direct edit.
    Apply,
    /// Reverted the apply event with sequence number `target`.
    Undo { target: u64 },
    /// Reverted the undo event with sequence number `target`.
    Redo { target: u64 },
}

/// One recorded line-range replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditEvent {
    /// Per-document sequence number, starting at 1.
    pub seq: u64,
    pub file_path: PathBuf,
    /// First replaced line (1-indexed).
    pub start_line: usize,
    /// Last replaced line (1-indexed, inclusive).
    pub end_line: usize,
    /// Text of the replaced lines before the edit.
    pub original: String,
    /// Text written in their place.
    pub modified: String,
    pub original_line_count: usize,
    pub modified_line_count: usize,
    /// Content hash of the whole file before the edit.
    pub hash_before: String,
    /// Content hash of the whole file after the edit.
    pub hash_after: String,
    pub kind: EditKind,
}

impl EditEvent {
    pub fn is_apply(&self) -> bool {
        self.kind == EditKind::Apply
    }

    /// The apply event this undo reverted, if this is an undo.
    pub fn undo_target(&self) -> Option<u64> {
        match self.kind {
            EditKind::Undo { target } => Some(target),
            _ => None,
        }
    }
}

/// The fields of an event before the log assigns it a sequence number.
#[derive(Debug, Clone)]
pub struct EditRecord {
    pub start_line: usize,
    pub end_line: usize,
    pub original: String,
    pub modified: String,
    pub hash_before: String,
    pub hash_after: String,
    pub kind: EditKind,
}

/// Number of lines in a replacement text (an empty string is one line).
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Compute SHA-256 hash of content, returning "sha256:<hex-digest>" format.
///
/// Used only for optimistic concurrency checks against the same document.
pub fn hash_content(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    format!("sha256:{:x}", digest)
}

/// Replay `events` oldest to newest and return the sequence numbers of every
/// event whose effect is not part of the document's current content.
///
/// An undo cancels its target apply; the undo itself stays effective until
/// a redo consumes it. A redo cancels itself and its target undo, and
/// reinstates the apply that undo had cancelled (a later undo in the same
/// replay cancels it again).
pub fn ineffective_seqs(events: &[EditEvent]) -> BTreeSet<u64> {
    let mut cancelled = BTreeSet::new();

    for event in events {
        match event.kind {
            EditKind::Apply => {}
            EditKind::Undo { target } => {
                cancelled.insert(target);
            }
            EditKind::Redo { target } => {
                cancelled.insert(event.seq);
                cancelled.insert(target);
                let reinstated = events
                    .iter()
                    .find(|e| e.seq == target)
                    .and_then(EditEvent::undo_target);
                if let Some(apply_seq) = reinstated {
                    cancelled.remove(&apply_seq);
                }
            }
        }
    }

    cancelled
}

/// The newest apply event still in effect: the undo target.
pub fn find_last_effective<'a>(
    events: &'a [EditEvent],
    ineffective: &BTreeSet<u64>,
) -> Option<&'a EditEvent> {
    events
        .iter()
        .rev()
        .find(|e| e.is_apply() && !ineffective.contains(&e.seq))
}

/// The newest undo event still in effect: the redo target.
pub fn find_last_undone<'a>(
    events: &'a [EditEvent],
    ineffective: &BTreeSet<u64>,
) -> Option<&'a EditEvent> {
    events
        .iter()
        .rev()
        .find(|e| e.undo_target().is_some() && !ineffective.contains(&e.seq))
}

/// The event list of a single document.
///
/// Holding the lock on a `DocumentLog` serializes every read-check-write
/// sequence against that document.
#[derive(Debug)]
pub struct DocumentLog {
    path: PathBuf,
    events: Vec<EditEvent>,
    next_seq: u64,
}

impl DocumentLog {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            events: Vec::new(),
            next_seq: 1,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn events(&self) -> &[EditEvent] {
        &self.events
    }

    /// Assign the next sequence number and append.
    pub fn append(&mut self, record: EditRecord) -> EditEvent {
        let event = EditEvent {
            seq: self.next_seq,
            file_path: self.path.clone(),
            start_line: record.start_line,
            end_line: record.end_line,
            original_line_count: line_count(&record.original),
            modified_line_count: line_count(&record.modified),
            original: record.original,
            modified: record.modified,
            hash_before: record.hash_before,
            hash_after: record.hash_after,
            kind: record.kind,
        };
        self.next_seq += 1;
        self.events.push(event.clone());
        event
    }

    pub fn can_undo(&self) -> bool {
        find_last_effective(&self.events, &ineffective_seqs(&self.events)).is_some()
    }

    pub fn can_redo(&self) -> bool {
        find_last_undone(&self.events, &ineffective_seqs(&self.events)).is_some()
    }
}

/// Keyed store of document logs, one per resolved document path.
#[derive(Debug, Default)]
pub struct EditLog {
    documents: Mutex<HashMap<PathBuf, Arc<Mutex<DocumentLog>>>>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the log for a document, creating an empty one on first use.
    pub fn document(&self, path: &Path) -> Arc<Mutex<DocumentLog>> {
        let mut documents = lock(&self.documents);
        documents
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(DocumentLog::new(path.to_path_buf()))))
            .clone()
    }

    /// Get the log for a document only if events were ever recorded for it.
    pub fn existing(&self, path: &Path) -> Option<Arc<Mutex<DocumentLog>>> {
        lock(&self.documents).get(path).cloned()
    }

    pub fn contains(&self, path: &Path) -> bool {
        lock(&self.documents).contains_key(path)
    }

    /// Append an event for `path`.
    pub fn append_event(&self, path: &Path, record: EditRecord) -> EditEvent {
        let document = self.document(path);
        let mut document = lock(&document);
        document.append(record)
    }

    /// Snapshot of the events recorded for `path` (empty if none).
    pub fn events(&self, path: &Path) -> Vec<EditEvent> {
        match self.existing(path) {
            Some(doc) => {
                let doc = lock(&doc);
                doc.events().to_vec()
            }
            None => Vec::new(),
        }
    }

    pub fn can_undo(&self, path: &Path) -> bool {
        match self.existing(path) {
            Some(doc) => {
                let doc = lock(&doc);
                doc.can_undo()
            }
            None => false,
        }
    }

    pub fn can_redo(&self, path: &Path) -> bool {
        match self.existing(path) {
            Some(doc) => {
                let doc = lock(&doc);
                doc.can_redo()
            }
            None => false,
        }
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
///
/// Event lists are only ever appended to, so a poisoned lock still guards a
/// consistent history.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
