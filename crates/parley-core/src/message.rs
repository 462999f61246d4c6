//! Envelopes routed to connections.

use std::fmt;

/// Wire label used for coordinator-generated notifications.
pub const SYSTEM_SENDER: &str = "system";

/// Who authored a chat line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sender {
    /// The relay itself (join, leave, and moderation notices).
    System,
    /// A joined user, by username.
    User(String),
}

impl Sender {
    /// The label shown to clients.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Sender::System => SYSTEM_SENDER,
            Sender::User(name) => name,
        }
    }

    /// Whether this is the system sender.
    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self, Sender::System)
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A unit of delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// A line of text in a channel.
    Chat {
        /// Author of the line.
        sender: Sender,
        /// Message body.
        text: String,
    },
    /// A channel was explicitly created.
    ChannelCreated {
        /// Name of the new channel.
        channel: String,
    },
}

impl Envelope {
    /// Create a system-authored chat line.
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Envelope::Chat {
            sender: Sender::System,
            text: text.into(),
        }
    }

    /// Create a user-authored chat line.
    #[must_use]
    pub fn chat(username: impl Into<String>, text: impl Into<String>) -> Self {
        Envelope::Chat {
            sender: Sender::User(username.into()),
            text: text.into(),
        }
    }

    /// Create a channel creation announcement.
    #[must_use]
    pub fn channel_created(channel: impl Into<String>) -> Self {
        Envelope::ChannelCreated {
            channel: channel.into(),
        }
    }

    /// Text carried by a chat line, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Envelope::Chat { text, .. } => Some(text),
            Envelope::ChannelCreated { .. } => None,
        }
    }
}
