//! Connection registry.
//!
//! Maps a connection identifier to its session state and keeps a username
//! index so that sessions can be found by the name other users see.

use crate::channel::ChannelId;
use crate::roles::Role;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONNECTION: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a live transport link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub String);

impl ConnectionId {
    /// Create a connection ID from an existing string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a process-unique connection ID.
    #[must_use]
    pub fn generate() -> Self {
        let n = NEXT_CONNECTION.fetch_add(1, Ordering::Relaxed);
        Self(format!("conn_{:x}", n))
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ConnectionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ConnectionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Session state of a joined connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Name shown to other users. Not unique.
    pub username: String,
    /// The one channel this connection currently belongs to.
    pub channel: ChannelId,
    /// Role recorded at join.
    pub role: Role,
}

/// Registry of joined connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    sessions: HashMap<ConnectionId, Session>,
    by_username: HashMap<String, HashSet<ConnectionId>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or overwrite a connection's session.
    ///
    /// Returns the session that was replaced, if any.
    pub fn put(
        &mut self,
        connection_id: ConnectionId,
        username: impl Into<String>,
        channel: impl Into<ChannelId>,
        role: Role,
    ) -> Option<Session> {
        let username = username.into();
        self.by_username
            .entry(username.clone())
            .or_default()
            .insert(connection_id.clone());

        let session = Session {
            username,
            channel: channel.into(),
            role,
        };
        let previous = self.sessions.insert(connection_id.clone(), session);

        if let Some(prev) = &previous {
            let renamed = self
                .sessions
                .get(&connection_id)
                .is_some_and(|current| current.username != prev.username);
            if renamed {
                self.unindex(&prev.username, &connection_id);
            }
        }
        previous
    }

    /// Look up a connection's session.
    #[must_use]
    pub fn get(&self, connection_id: &ConnectionId) -> Option<&Session> {
        self.sessions.get(connection_id)
    }

    /// Remove a connection's session. No-op if absent.
    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<Session> {
        let session = self.sessions.remove(connection_id)?;
        self.unindex(&session.username, connection_id);
        Some(session)
    }

    /// All connections currently joined under `username`, sorted.
    #[must_use]
    pub fn connections_for(&self, username: &str) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self
            .by_username
            .get(username)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Number of joined connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if no connection is joined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn unindex(&mut self, username: &str, connection_id: &ConnectionId) {
        if let Some(set) = self.by_username.get_mut(username) {
            set.remove(connection_id);
            if set.is_empty() {
                self.by_username.remove(username);
            }
        }
    }
}
