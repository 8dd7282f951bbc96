//! The text-generating agent and edit proposals.
//!
//! An [`Agent`] receives the located source range plus the reader's
//! instruction and returns replacement text. [`propose_edit`] drives one
//! round trip but never writes the document or touches the edit log; the
//! caller applies an accepted proposal through
//! [`EditHistory::apply`](crate::history::EditHistory::apply).

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use quarto_redline_matcher::{
    MatchResult, SourceDocument, locate, locate_section, normalize_whitespace,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::storage::FileStore;

/// Everything an agent sees for a single edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditContext {
    /// The whole document.
    pub full_source: String,
    /// Verbatim source lines covering the selection.
    pub matched_source: String,
    /// The text the reader selected in the rendered view.
    pub selected_text: String,
    pub start_line: usize,
    pub end_line: usize,
    pub instruction: String,
    /// Key for the agent's conversation with this document.
    pub file_key: String,
}

impl EditContext {
    /// Whether the reader selected only part of the matched lines.
    pub fn is_partial_selection(&self) -> bool {
        self.selected_text != self.matched_source.trim()
    }
}

/// A text-generating collaborator.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Produce replacement text for `context.matched_source`.
    async fn edit(&self, context: &EditContext) -> Result<String>;

    /// Drop any conversation state held for `file_key`.
    fn reset_session(&self, file_key: &str);
}

/// Replacement text proposed by an agent, not yet applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditProposal {
    pub id: String,
    pub file_path: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    /// The source lines the proposal replaces.
    pub original: String,
    pub modified: String,
}

/// A request to edit the text a reader selected.
#[derive(Debug, Clone)]
pub struct EditRequest<'a> {
    /// Document to edit, as understood by the file store.
    pub path: &'a Path,
    /// Key for the agent's conversation with this document.
    pub file_key: &'a str,
    pub selected_text: &'a str,
    pub instruction: &'a str,
    /// Upper bound on the agent call.
    pub timeout: Duration,
}

/// Locate the selection, ask the agent for a rewrite and return the result
/// as a proposal.
pub async fn propose_edit<A, S>(
    agent: &A,
    store: &S,
    request: EditRequest<'_>,
) -> Result<EditProposal>
where
    A: Agent + ?Sized,
    S: FileStore + ?Sized,
{
    if normalize_whitespace(request.selected_text).is_empty() {
        return Err(Error::EmptySelection);
    }
    if normalize_whitespace(request.instruction).is_empty() {
        return Err(Error::EmptyInstruction);
    }

    let path = request.path;
    let document = SourceDocument::new(path, store.read(path)?);
    let matched = locate(&document, request.selected_text)
        .ok_or_else(|| Error::SelectionNotFound(path.to_path_buf()))?;

    let context = EditContext {
        full_source: document.text().to_string(),
        matched_source: matched.matched_source.clone(),
        selected_text: request.selected_text.to_string(),
        start_line: matched.start_line,
        end_line: matched.end_line,
        instruction: request.instruction.to_string(),
        file_key: request.file_key.to_string(),
    };

    debug!(
        path = %path.display(),
        start_line = context.start_line,
        end_line = context.end_line,
        "Requesting agent edit"
    );

    let reply = match tokio::time::timeout(request.timeout, agent.edit(&context)).await {
        Ok(reply) => reply?,
        Err(_) => {
            warn!(
                path = %path.display(),
                timeout_secs = request.timeout.as_secs(),
                "Agent edit timed out"
            );
            return Err(Error::AgentTimeout(request.timeout.as_secs()));
        }
    };

    Ok(EditProposal {
        id: Uuid::new_v4().to_string(),
        file_path: matched.file_path,
        start_line: matched.start_line,
        end_line: matched.end_line,
        original: matched.matched_source,
        modified: reply.trim_end_matches(['\n', '\r']).to_string(),
    })
}

/// Read `path` from `store` and locate the section under a heading.
pub fn find_section<S: FileStore + ?Sized>(
    store: &S,
    path: &Path,
    heading: &str,
    level: usize,
) -> Result<MatchResult> {
    let document = SourceDocument::new(path, store.read(path)?);
    locate_section(&document, heading, level).ok_or_else(|| Error::HeadingNotFound {
        path: path.to_path_buf(),
        heading: heading.to_string(),
        level,
    })
}
