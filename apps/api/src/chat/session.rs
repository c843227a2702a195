//! Conversation sessions: ordered message history, one request at a time.
//!
//! Each session sits behind its own async mutex. A chat request holds the
//! session guard for its whole lifetime, so a second request on the same session
//! is refused instead of interleaving with the first.
//!
//! The store forgets sessions that sit idle past the configured TTL and caps how
//! many it keeps; each session keeps only its most recent messages.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::models::chat::{ChatMessage, Role};

/// Messages kept per session; older ones are dropped as new ones arrive.
pub const MAX_HISTORY_MESSAGES: usize = 50;

#[derive(Debug)]
pub struct ChatSession {
    pub id: Uuid,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            messages: Vec::new(),
        }
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) -> &ChatMessage {
        if self.messages.len() >= MAX_HISTORY_MESSAGES {
            let excess = self.messages.len() + 1 - MAX_HISTORY_MESSAGES;
            self.messages.drain(..excess);
        }
        self.messages.push(ChatMessage::new(role, content));
        &self.messages[self.messages.len() - 1]
    }

    /// The most recent `MAX_HISTORY_MESSAGES` messages, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn reset(&mut self) {
        self.messages.clear();
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SessionAccess {
    NotFound,
    Busy,
}

pub type SharedSession = Arc<AsyncMutex<ChatSession>>;

struct SessionEntry {
    session: SharedSession,
    last_used: Instant,
}

impl SessionEntry {
    /// A handle held outside the store means a request is using the session.
    fn in_use(&self) -> bool {
        Arc::strong_count(&self.session) > 1
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Registers an empty session and returns its id, evicting idle sessions
    /// first and the least recently used one when the store is full.
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.map();

        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, entry| {
            entry.in_use() || now.duration_since(entry.last_used) < self.idle_ttl
        });

        if sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .filter(|(_, entry)| !entry.in_use())
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| *id);
            if let Some(oldest) = oldest {
                sessions.remove(&oldest);
            }
        }
        if sessions.len() < before {
            debug!("Evicted {} chat sessions", before - sessions.len());
        }

        sessions.insert(
            id,
            SessionEntry {
                session: Arc::new(AsyncMutex::new(ChatSession::new(id))),
                last_used: now,
            },
        );
        id
    }

    /// Exclusive access to an existing session, refused while another request holds it.
    pub fn acquire(&self, id: Uuid) -> Result<OwnedMutexGuard<ChatSession>, SessionAccess> {
        let session = self.get(id).ok_or(SessionAccess::NotFound)?;
        session.try_lock_owned().map_err(|_| SessionAccess::Busy)
    }

    /// Shared handle for readers that are willing to wait for an in-flight request.
    pub fn get(&self, id: Uuid) -> Option<SharedSession> {
        let mut sessions = self.map();
        let entry = sessions.get_mut(&id)?;
        entry.last_used = Instant::now();
        Some(entry.session.clone())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.map().len()
    }

    fn map(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}
