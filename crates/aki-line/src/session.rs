//! In-memory game session registry
//!
//! Maps a chat user to their game handle. Sessions live for the lifetime
//! of the process; there is no eviction.

use std::sync::Arc;

use aki_core::{GameClient, GameClientFactory};
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;

/// One user's game
pub struct SessionEntry {
    pub game: Box<dyn GameClient>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionEntry {
    fn new(game: Box<dyn GameClient>) -> Self {
        let now = Utc::now();
        Self {
            game,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Time from session creation to the last command
    pub fn age(&self) -> TimeDelta {
        self.updated_at - self.created_at
    }
}

/// Shared handle on a session. Holding the lock serializes that user's commands.
pub type SessionHandle = Arc<Mutex<SessionEntry>>;

/// Registry of game sessions keyed by chat user id
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, SessionHandle>>,
    factory: Arc<dyn GameClientFactory>,
}

impl SessionRegistry {
    /// Create a registry that builds new games with `factory`
    pub fn new(factory: Arc<dyn GameClientFactory>) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            factory,
        }
    }

    /// Get or create the session for a user
    pub fn get_or_create(&self, user_id: &str) -> SessionHandle {
        self.sessions
            .entry(user_id.to_string())
            .or_insert_with(|| {
                info!("Creating game session for user: {}", user_id);
                Arc::new(Mutex::new(SessionEntry::new(self.factory.create())))
            })
            .value()
            .clone()
    }

    /// Get a session if it exists
    pub fn get(&self, user_id: &str) -> Option<SessionHandle> {
        self.sessions.get(user_id).map(|s| s.value().clone())
    }

    /// Get session count
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop every session. Called when the server stops.
    pub fn shutdown(&self) {
        let count = self.sessions.len();
        self.sessions.clear();
        info!("Released {} game session(s)", count);
    }
}
