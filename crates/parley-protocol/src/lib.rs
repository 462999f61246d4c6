//! # parley-protocol
//!
//! Wire protocol definitions for the Parley chat relay.
//!
//! Every message exchanged with a client is a [`Frame`]. Frames travel either
//! as JSON text (one frame per WebSocket text message) or as length-prefixed
//! MessagePack (binary WebSocket messages).
//!
//! ## Frame Types
//!
//! - `Join` / `Message` / `CreateChannel` / `Moderate` - Client events
//! - `Message` / `ChannelCreated` - Server broadcasts
//! - `Connected` / `Ping` / `Pong` / `Error` - Link housekeeping
//!
//! ## Example
//!
//! ```rust
//! use parley_protocol::{codec, Frame};
//!
//! let frame = Frame::join("alice", "general");
//!
//! let text = codec::encode_text(&frame).unwrap();
//! assert_eq!(codec::decode_text(&text).unwrap(), frame);
//!
//! let bytes = codec::encode(&frame).unwrap();
//! assert_eq!(codec::decode(&bytes).unwrap(), frame);
//! ```

pub mod codec;
pub mod frames;

pub use codec::{decode, decode_text, encode, encode_text, Encoding, ProtocolError};
pub use frames::{codes, Frame, FrameType, PROTOCOL_VERSION};
