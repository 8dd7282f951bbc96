//! quarto-redline: agent-driven editing of Markdown sources with undo/redo
//!
//! This crate provides:
//! - An append-only, per-document edit log from which the current undo and
//!   redo targets are derived by replay
//! - The apply/undo/redo orchestrator, which refuses to touch a file that
//!   changed outside the log since it last wrote it
//! - The agent capability and edit proposals built on
//!   [`quarto_redline_matcher`]
//! - Project plumbing: path validation, document discovery, URL routes and
//!   `redline.toml` configuration
//!
//! # Usage
//!
//! ```rust
//! use std::path::Path;
//! use quarto_redline::{EditHistory, MemoryFileStore};
//!
//! let store = MemoryFileStore::new();
//! store.insert("post.md", "# Title\n\nOld text.\n");
//! let history = EditHistory::new(store);
//!
//! history.apply(Path::new("post.md"), 3, 3, "New text.").unwrap();
//! let outcome = history.undo(Path::new("post.md")).unwrap();
//! assert_eq!(outcome.scroll_hint, "Old text.");
//! assert!(history.history_state(Path::new("post.md")).can_redo);
//! ```

pub mod agent;
pub mod config;
pub mod discovery;
pub mod edit_log;
pub mod error;
pub mod history;
pub mod paths;
pub mod route_map;
pub mod session;
pub mod storage;

pub use agent::{Agent, EditContext, EditProposal, EditRequest, find_section, propose_edit};
pub use config::{AgentConfig, ProxyConfig, RedlineConfig};
pub use discovery::list_markdown_files;
pub use edit_log::{EditEvent, EditKind, EditLog, hash_content};
pub use error::{Error, Result};
pub use history::{EditHistory, HistoryOutcome, HistoryState};
pub use paths::{resolve_file_path, validate_file_path};
pub use route_map::{RouteConfig, RouteMap};
pub use session::{AgentSession, SessionStore};
pub use storage::{FileStore, MemoryFileStore, NativeFileStore};
