//! # parley-core
//!
//! Session coordination and channel broadcast for the Parley chat relay.
//!
//! This crate provides the state machine behind a multi-channel chat room:
//!
//! - **ConnectionRegistry** - Session state per live connection
//! - **ChannelDirectory** - Channel names and their member sets
//! - **RoleRegistry** - Which usernames hold which role
//! - **BroadcastRouter** - Fan-out of envelopes to connection sinks
//! - **SessionCoordinator** - Join, message, create, moderate, and disconnect
//!
//! The crate performs no network I/O. A transport attaches a [`Delivery`] sink
//! per connection and feeds [`SessionEvent`]s into the coordinator.
//!
//! ## Architecture
//!
//! ```text
//!                ┌────────────────────┐
//!  events ──────▶│ SessionCoordinator │
//!                └────────────────────┘
//!                  │        │        │
//!                  ▼        ▼        ▼
//!          ┌──────────┐ ┌─────────┐ ┌─────────────────┐
//!          │ Registry │ │Directory│ │ BroadcastRouter │──▶ sinks
//!          └──────────┘ └─────────┘ └─────────────────┘
//! ```

pub mod auth;
pub mod channel;
pub mod coordinator;
pub mod message;
pub mod registry;
pub mod roles;
pub mod router;

pub use auth::{Authenticator, Credentials, Identity, TrustingAuthenticator};
pub use channel::{Channel, ChannelDirectory, ChannelId};
pub use coordinator::{CoordinatorStats, Moderation, SessionCoordinator, SessionEvent};
pub use message::{Envelope, Sender, SYSTEM_SENDER};
pub use registry::{ConnectionId, ConnectionRegistry, Session};
pub use roles::{Role, RoleRegistry};
pub use router::{BroadcastRouter, Delivery, DeliveryError, Fanout};
