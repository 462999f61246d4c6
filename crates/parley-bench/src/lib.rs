//! Fixtures shared by the Parley benchmarks.

use parley_core::{ConnectionId, Envelope, SessionCoordinator};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Receiving half of a benchmark connection.
pub type Inbox = mpsc::UnboundedReceiver<Arc<Envelope>>;

/// Build a coordinator with `members` connections joined to `channel`.
///
/// Returns the coordinator, the connection IDs in join order, and their
/// inboxes with the join notices already drained.
#[must_use]
pub fn populated(channel: &str, members: usize) -> (SessionCoordinator, Vec<ConnectionId>, Vec<Inbox>) {
    let mut coordinator = SessionCoordinator::new();
    let mut ids = Vec::with_capacity(members);
    let mut inboxes = Vec::with_capacity(members);

    for i in 0..members {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::new(format!("conn-{}", i));
        coordinator.attach(id.clone(), tx);
        coordinator.join(&id, &format!("user-{}", i), channel);
        ids.push(id);
        inboxes.push(rx);
    }

    for inbox in &mut inboxes {
        drain(inbox);
    }

    (coordinator, ids, inboxes)
}

/// Discard everything queued in an inbox, returning how many envelopes it held.
pub fn drain(inbox: &mut Inbox) -> usize {
    let mut count = 0;
    while inbox.try_recv().is_ok() {
        count += 1;
    }
    count
}
