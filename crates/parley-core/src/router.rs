//! Broadcast router.
//!
//! The router owns one delivery sink per attached connection and fans
//! envelopes out to them. Delivery is fire-and-forget: a failing recipient is
//! logged and skipped, and never holds up the rest of the fan-out.

use crate::message::Envelope;
use crate::registry::ConnectionId;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

/// Per-recipient delivery errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The connection's outbound queue is gone.
    #[error("Connection closed")]
    Closed,

    /// The connection's outbound queue is full.
    #[error("Outbound queue full")]
    Full,
}

/// A per-connection delivery callback supplied by the transport.
///
/// Implementations must not block: the router calls them while fanning out to
/// every other recipient.
pub trait Delivery: Send + Sync {
    /// Hand an envelope to the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the envelope could not be queued.
    fn deliver(&self, envelope: Arc<Envelope>) -> Result<(), DeliveryError>;
}

impl Delivery for mpsc::Sender<Arc<Envelope>> {
    fn deliver(&self, envelope: Arc<Envelope>) -> Result<(), DeliveryError> {
        self.try_send(envelope).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::Full,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}

impl Delivery for mpsc::UnboundedSender<Arc<Envelope>> {
    fn deliver(&self, envelope: Arc<Envelope>) -> Result<(), DeliveryError> {
        self.send(envelope).map_err(|_| DeliveryError::Closed)
    }
}

/// Outcome of a single fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fanout {
    /// Recipients the envelope was queued for.
    pub delivered: usize,
    /// Recipients that could not take it.
    pub dropped: usize,
}

impl Fanout {
    /// Total recipients attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.delivered + self.dropped
    }
}

/// Routes envelopes to attached connections.
#[derive(Default)]
pub struct BroadcastRouter {
    sinks: DashMap<ConnectionId, Box<dyn Delivery>>,
}

impl BroadcastRouter {
    /// Create a router with no attached connections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a delivery sink for a connection.
    ///
    /// Returns `true` if the connection was not attached before. An existing
    /// sink is replaced.
    pub fn attach(&self, connection_id: ConnectionId, sink: impl Delivery + 'static) -> bool {
        debug!(connection = %connection_id, "Connection attached");
        self.sinks.insert(connection_id, Box::new(sink)).is_none()
    }

    /// Detach a connection's sink. Dropping the sink closes its queue.
    ///
    /// Returns `true` if the connection was attached.
    pub fn detach(&self, connection_id: &ConnectionId) -> bool {
        let removed = self.sinks.remove(connection_id).is_some();
        if removed {
            debug!(connection = %connection_id, "Connection detached");
        }
        removed
    }

    /// Check if a connection has a sink.
    #[must_use]
    pub fn is_attached(&self, connection_id: &ConnectionId) -> bool {
        self.sinks.contains_key(connection_id)
    }

    /// Number of attached connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.sinks.len()
    }

    /// Deliver an envelope to the given channel members.
    pub fn publish(&self, channel: &str, members: &[ConnectionId], envelope: Envelope) -> Fanout {
        let envelope = Arc::new(envelope);
        let mut fanout = Fanout::default();

        for member in members {
            match self.sinks.get(member) {
                Some(sink) => self.deliver_one(member, sink.value().as_ref(), &envelope, &mut fanout),
                None => trace!(channel = %channel, connection = %member, "Member has no sink"),
            }
        }

        trace!(
            channel = %channel,
            delivered = fanout.delivered,
            dropped = fanout.dropped,
            "Published envelope"
        );
        fanout
    }

    /// Deliver an envelope to every attached connection.
    pub fn publish_all(&self, envelope: Envelope) -> Fanout {
        let envelope = Arc::new(envelope);
        let mut fanout = Fanout::default();

        for entry in self.sinks.iter() {
            self.deliver_one(entry.key(), entry.value().as_ref(), &envelope, &mut fanout);
        }

        trace!(
            delivered = fanout.delivered,
            dropped = fanout.dropped,
            "Published envelope to all connections"
        );
        fanout
    }

    fn deliver_one(
        &self,
        connection_id: &ConnectionId,
        sink: &dyn Delivery,
        envelope: &Arc<Envelope>,
        fanout: &mut Fanout,
    ) {
        match sink.deliver(Arc::clone(envelope)) {
            Ok(()) => fanout.delivered += 1,
            Err(e) => {
                warn!(connection = %connection_id, error = %e, "Dropped envelope");
                fanout.dropped += 1;
            }
        }
    }
}

impl std::fmt::Debug for BroadcastRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastRouter")
            .field("connections", &self.sinks.len())
            .finish()
    }
}
