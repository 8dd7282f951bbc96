//! Agent conversation sessions, one per file key.
//!
//! An agent that keeps conversational context opens a session the first
//! time a file is edited and resumes it on later edits, so the full source
//! only has to be sent once.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;
use uuid::Uuid;

use crate::edit_log::lock;

/// A session handle returned by [`SessionStore::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSession {
    pub id: Uuid,
    /// True when the session was created by this call.
    pub is_first_call: bool,
}

/// Keyed store of agent session ids.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Uuid>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume the session for `file_key`, or start a new one.
    pub fn begin(&self, file_key: &str) -> AgentSession {
        let mut sessions = lock(&self.sessions);
        if let Some(id) = sessions.get(file_key) {
            return AgentSession {
                id: *id,
                is_first_call: false,
            };
        }

        let id = Uuid::new_v4();
        sessions.insert(file_key.to_string(), id);
        debug!(file_key, %id, "Started agent session");
        AgentSession {
            id,
            is_first_call: true,
        }
    }

    pub fn get(&self, file_key: &str) -> Option<Uuid> {
        lock(&self.sessions).get(file_key).copied()
    }

    pub fn contains(&self, file_key: &str) -> bool {
        lock(&self.sessions).contains_key(file_key)
    }

    /// Forget the session so the next edit starts fresh.
    pub fn reset(&self, file_key: &str) -> bool {
        let removed = lock(&self.sessions).remove(file_key).is_some();
        if removed {
            debug!(file_key, "Reset agent session");
        }
        removed
    }
}
