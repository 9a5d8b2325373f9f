use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::debug;

/// Turns kept per session for prompt context.
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    turns: VecDeque<Turn>,
    #[serde(skip)]
    window: usize,
}

impl Session {
    pub fn new(id: impl Into<String>, window: usize) -> Self {
        Self {
            id: id.into(),
            created_at: OffsetDateTime::now_utc(),
            turns: VecDeque::new(),
            window: window.max(1),
        }
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push_back(Turn {
            role,
            content: content.into(),
        });
        while self.turns.len() > self.window {
            self.turns.pop_front();
        }
    }

    #[must_use]
    pub fn history(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// Explicit session lifecycle: created on first message, destroyed on end.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the existing session or creates it.
    async fn open(&self, id: &str) -> SessionHandle;

    async fn get(&self, id: &str) -> Option<SessionHandle>;

    /// Destroys the session; `false` when it did not exist.
    async fn end(&self, id: &str) -> bool;

    async fn len(&self) -> usize;
}

#[derive(Debug)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, SessionHandle>,
    window: usize,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            window,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn open(&self, id: &str) -> SessionHandle {
        self.sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                debug!(target: "practice_session", session = id, "session created");
                Arc::new(Mutex::new(Session::new(id, self.window)))
            })
            .clone()
    }

    async fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    async fn end(&self, id: &str) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            debug!(target: "practice_session", session = id, "session ended");
        }
        removed
    }

    async fn len(&self) -> usize {
        self.sessions.len()
    }
}
