//! Error types for quarto-redline

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Selected text not found in {0}")]
    SelectionNotFound(PathBuf),

    #[error("Heading '{heading}' (level {level}) not found in {path}")]
    HeadingNotFound {
        path: PathBuf,
        heading: String,
        level: usize,
    },

    #[error("Selection is empty")]
    EmptySelection,

    #[error("Edit instruction is empty")]
    EmptyInstruction,

    #[error("Nothing to undo for {0}")]
    NothingToUndo(PathBuf),

    #[error("Nothing to redo for {0}")]
    NothingToRedo(PathBuf),

    #[error(
        "{path} was modified outside of the edit history (expected {expected}, found {found})"
    )]
    ExternalModification {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("Edit event {seq} refers to missing event {target}")]
    CorruptedEvent { seq: u64, target: u64 },

    #[error("Invalid line range {start_line}-{end_line} for a document with {line_count} lines")]
    InvalidRange {
        start_line: usize,
        end_line: usize,
        line_count: usize,
    },

    #[error("Agent timed out after {0}s")]
    AgentTimeout(u64),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Path escapes the project root: {0}")]
    PathOutsideRoot(PathBuf),

    #[error("Failed to parse config: {0}")]
    ConfigParse(String),

    #[error("Invalid route pattern '{pattern}': {message}")]
    InvalidRoute { pattern: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
