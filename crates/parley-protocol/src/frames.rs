//! Frame types for the Parley protocol.
//!
//! Frames are internally tagged by a `type` field, so the JSON form of a join
//! is `{"type":"join","username":"alice","channel":"general"}`.

use serde::{Deserialize, Serialize};

/// Current protocol version, sent in the `connected` frame.
pub const PROTOCOL_VERSION: u8 = 1;

/// Error codes carried by `error` frames.
pub mod codes {
    /// The frame could not be decoded.
    pub const INVALID_FRAME: u16 = 1001;
    /// The frame decoded but is not something a client may send.
    pub const UNEXPECTED_FRAME: u16 = 1002;
    /// The message exceeded the configured size limit.
    pub const MESSAGE_TOO_LARGE: u16 = 1009;
}

/// Frame type identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameType {
    Join = 0x01,
    Message = 0x02,
    CreateChannel = 0x03,
    ChannelCreated = 0x04,
    Moderate = 0x05,
    Ping = 0x06,
    Pong = 0x07,
    Connected = 0x08,
    Error = 0x09,
}

impl From<FrameType> for u8 {
    fn from(ft: FrameType) -> u8 {
        ft as u8
    }
}

impl TryFrom<u8> for FrameType {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, <Self as TryFrom<u8>>::Error> {
        match value {
            0x01 => Ok(FrameType::Join),
            0x02 => Ok(FrameType::Message),
            0x03 => Ok(FrameType::CreateChannel),
            0x04 => Ok(FrameType::ChannelCreated),
            0x05 => Ok(FrameType::Moderate),
            0x06 => Ok(FrameType::Ping),
            0x07 => Ok(FrameType::Pong),
            0x08 => Ok(FrameType::Connected),
            0x09 => Ok(FrameType::Error),
            _ => Err("Invalid frame type"),
        }
    }
}

/// A protocol frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Frame {
    /// Join a channel under a username.
    #[serde(rename = "join")]
    Join {
        /// Name to show to others.
        #[serde(default)]
        username: String,
        /// Channel to enter.
        channel: String,
    },

    /// A chat line.
    ///
    /// Clients send only `text`; the server fills in `user` when relaying.
    #[serde(rename = "message")]
    Message {
        /// Sender label.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user: Option<String>,
        /// Message body.
        text: String,
    },

    /// Declare a new channel.
    #[serde(rename = "create_channel")]
    CreateChannel {
        /// Channel name.
        channel: String,
    },

    /// A channel was created.
    #[serde(rename = "channel_created")]
    ChannelCreated {
        /// Channel name.
        channel: String,
    },

    /// Remove a user from the relay (admins only).
    #[serde(rename = "moderate")]
    Moderate {
        /// Username of the user to remove.
        #[serde(rename = "targetUser")]
        target_user: String,
    },

    /// Keepalive ping.
    #[serde(rename = "ping")]
    Ping {
        /// Optional timestamp.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<u64>,
    },

    /// Keepalive pong.
    #[serde(rename = "pong")]
    Pong {
        /// Echoed timestamp from ping.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<u64>,
    },

    /// Connection established.
    #[serde(rename = "connected")]
    Connected {
        /// Unique connection identifier.
        connection_id: String,
        /// Protocol version.
        version: u8,
        /// Heartbeat interval in milliseconds.
        heartbeat: u32,
    },

    /// Protocol-level error.
    #[serde(rename = "error")]
    Error {
        /// Error code, see [`codes`].
        code: u16,
        /// Human-readable error message.
        message: String,
    },
}

impl Frame {
    /// Get the frame type.
    #[must_use]
    pub fn frame_type(&self) -> FrameType {
        match self {
            Frame::Join { .. } => FrameType::Join,
            Frame::Message { .. } => FrameType::Message,
            Frame::CreateChannel { .. } => FrameType::CreateChannel,
            Frame::ChannelCreated { .. } => FrameType::ChannelCreated,
            Frame::Moderate { .. } => FrameType::Moderate,
            Frame::Ping { .. } => FrameType::Ping,
            Frame::Pong { .. } => FrameType::Pong,
            Frame::Connected { .. } => FrameType::Connected,
            Frame::Error { .. } => FrameType::Error,
        }
    }

    /// Create a Join frame.
    #[must_use]
    pub fn join(username: impl Into<String>, channel: impl Into<String>) -> Self {
        Frame::Join {
            username: username.into(),
            channel: channel.into(),
        }
    }

    /// Create a client Message frame.
    #[must_use]
    pub fn say(text: impl Into<String>) -> Self {
        Frame::Message {
            user: None,
            text: text.into(),
        }
    }

    /// Create a relayed Message frame.
    #[must_use]
    pub fn message(user: impl Into<String>, text: impl Into<String>) -> Self {
        Frame::Message {
            user: Some(user.into()),
            text: text.into(),
        }
    }

    /// Create a CreateChannel frame.
    #[must_use]
    pub fn create_channel(channel: impl Into<String>) -> Self {
        Frame::CreateChannel {
            channel: channel.into(),
        }
    }

    /// Create a ChannelCreated frame.
    #[must_use]
    pub fn channel_created(channel: impl Into<String>) -> Self {
        Frame::ChannelCreated {
            channel: channel.into(),
        }
    }

    /// Create a Moderate frame.
    #[must_use]
    pub fn moderate(target_user: impl Into<String>) -> Self {
        Frame::Moderate {
            target_user: target_user.into(),
        }
    }

    /// Create a Pong frame.
    #[must_use]
    pub fn pong(timestamp: Option<u64>) -> Self {
        Frame::Pong { timestamp }
    }

    /// Create a Connected frame.
    #[must_use]
    pub fn connected(connection_id: impl Into<String>, heartbeat: u32) -> Self {
        Frame::Connected {
            connection_id: connection_id.into(),
            version: PROTOCOL_VERSION,
            heartbeat,
        }
    }

    /// Create an Error frame.
    #[must_use]
    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Frame::Error {
            code,
            message: message.into(),
        }
    }
}
