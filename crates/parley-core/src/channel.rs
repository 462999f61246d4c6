//! Channel directory.
//!
//! Channels are named groups of connections. They are created on first
//! reference and never removed.

use crate::registry::ConnectionId;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// A channel identifier.
pub type ChannelId = String;

/// A named broadcast group.
#[derive(Debug, Clone, Default)]
pub struct Channel {
    /// Channel name.
    name: ChannelId,
    /// Set of member connection IDs.
    members: HashSet<ConnectionId>,
}

impl Channel {
    /// Create an empty channel.
    #[must_use]
    pub fn new(name: impl Into<ChannelId>) -> Self {
        Self {
            name: name.into(),
            members: HashSet::new(),
        }
    }

    /// Get the channel name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of members.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Check if the channel has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Directory of all known channels.
///
/// Backed by a `BTreeMap` so that [`names`](Self::names) is sorted and
/// reproducible.
#[derive(Debug, Default)]
pub struct ChannelDirectory {
    channels: BTreeMap<ChannelId, Channel>,
}

impl ChannelDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `name` with no members if it does not exist.
    ///
    /// Returns `true` if the channel was newly created.
    pub fn ensure_exists(&mut self, name: &str) -> bool {
        if self.channels.contains_key(name) {
            return false;
        }
        self.channels.insert(name.to_string(), Channel::new(name));
        debug!(channel = %name, "Channel created");
        true
    }

    /// Add a connection to an existing channel.
    ///
    /// Returns `true` if the connection was not already a member. Adding to an
    /// unknown channel is a caller error and does nothing.
    pub fn add_member(&mut self, name: &str, connection_id: &ConnectionId) -> bool {
        let Some(channel) = self.channels.get_mut(name) else {
            warn!(channel = %name, connection = %connection_id, "Add member to unknown channel");
            return false;
        };
        let added = channel.members.insert(connection_id.clone());
        if added {
            debug!(
                channel = %name,
                connection = %connection_id,
                members = channel.member_count(),
                "Member added"
            );
        }
        added
    }

    /// Remove a connection from a channel. No-op if absent.
    ///
    /// Returns `true` if the connection was a member.
    pub fn remove_member(&mut self, name: &str, connection_id: &ConnectionId) -> bool {
        let removed = self
            .channels
            .get_mut(name)
            .is_some_and(|channel| channel.members.remove(connection_id));
        if removed {
            debug!(channel = %name, connection = %connection_id, "Member removed");
        }
        removed
    }

    /// Snapshot of a channel's members. Empty if the channel is unknown.
    #[must_use]
    pub fn members(&self, name: &str) -> Vec<ConnectionId> {
        self.channels
            .get(name)
            .map(|channel| channel.members.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// All channel names, in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.channels.keys().cloned().collect()
    }

    /// Look up a channel.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    /// Check if a channel exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Get the member count for a channel.
    #[must_use]
    pub fn member_count(&self, name: &str) -> usize {
        self.channels
            .get(name)
            .map(Channel::member_count)
            .unwrap_or(0)
    }

    /// Number of channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Check if the directory has no channels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
