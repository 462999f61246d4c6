//! Session coordinator.
//!
//! The coordinator owns the connection registry, channel directory, role
//! registry and broadcast router, and applies session events to them. Each
//! connection moves through three states:
//!
//! ```text
//! Unjoined ──join──▶ Joined ──disconnect / moderate──▶ Gone
//!                    │    ▲
//!                    └join┘
//! ```
//!
//! A connection is `Unjoined` once the transport has attached a sink for it,
//! `Joined` once it has a registry entry, and `Gone` once its sink is
//! detached. Events from `Gone` connections are ignored.
//!
//! Every method takes `&mut self`; callers that share a coordinator between
//! tasks must serialize access, e.g. behind a mutex.

use crate::auth::Identity;
use crate::channel::{ChannelDirectory, ChannelId};
use crate::message::Envelope;
use crate::registry::{ConnectionId, ConnectionRegistry};
use crate::roles::{Role, RoleRegistry};
use crate::router::{BroadcastRouter, Delivery, Fanout};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// An event delivered by the transport on behalf of a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Enter a channel under a username.
    Join {
        /// Name to show to others.
        username: String,
        /// Channel to enter.
        channel: String,
    },
    /// Say something in the current channel.
    Message {
        /// Message body.
        text: String,
    },
    /// Declare a new channel.
    CreateChannel {
        /// Channel name.
        channel: String,
    },
    /// Remove another user's sessions.
    Moderate {
        /// Username of the user to remove.
        target: String,
    },
    /// The transport link went away.
    Disconnect,
}

impl SessionEvent {
    /// Short name of the event kind, for logs and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::Join { .. } => "join",
            SessionEvent::Message { .. } => "message",
            SessionEvent::CreateChannel { .. } => "create_channel",
            SessionEvent::Moderate { .. } => "moderate",
            SessionEvent::Disconnect => "disconnect",
        }
    }
}

/// Result of a moderation request.
///
/// Only used for logging and metrics; the requester is told nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moderation {
    /// The target's sessions were removed.
    Applied {
        /// Number of sessions removed.
        removed: usize,
        /// Fan-out of the moderation notices.
        fanout: Fanout,
    },
    /// The requester is not joined or not an admin.
    Denied,
    /// No joined session has the target username.
    TargetNotFound,
}

impl Moderation {
    /// Short name of the outcome, for logs and metrics.
    #[must_use]
    pub fn outcome(&self) -> &'static str {
        match self {
            Moderation::Applied { .. } => "applied",
            Moderation::Denied => "denied",
            Moderation::TargetNotFound => "target_not_found",
        }
    }

    /// Fan-out of the moderation notices; empty unless applied.
    #[must_use]
    pub fn fanout(&self) -> Fanout {
        match self {
            Moderation::Applied { fanout, .. } => *fanout,
            Moderation::Denied | Moderation::TargetNotFound => Fanout::default(),
        }
    }
}

/// Coordinator statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorStats {
    /// Attached transport connections.
    pub connections: usize,
    /// Joined sessions.
    pub sessions: usize,
    /// Known channels.
    pub channels: usize,
}

/// Applies session events and routes the resulting envelopes.
#[derive(Debug, Default)]
pub struct SessionCoordinator {
    registry: ConnectionRegistry,
    directory: ChannelDirectory,
    roles: RoleRegistry,
    router: BroadcastRouter,
}

impl SessionCoordinator {
    /// Create a coordinator with no channels.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a coordinator with the given channels already present.
    #[must_use]
    pub fn with_channels<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut coordinator = Self::new();
        for name in channels {
            coordinator.directory.ensure_exists(name.as_ref());
        }
        coordinator
    }

    /// Register a transport connection and its delivery sink.
    ///
    /// The connection starts out `Unjoined`. Returns `false` if the connection
    /// was already attached, in which case its sink is replaced.
    pub fn attach(&mut self, connection_id: ConnectionId, sink: impl Delivery + 'static) -> bool {
        self.router.attach(connection_id, sink)
    }

    /// Record an authenticated identity's role.
    ///
    /// Returns `true` if the role was newly granted.
    pub fn login(&mut self, identity: &Identity) -> bool {
        self.grant_role(&identity.username, identity.role)
    }

    /// Grant a role to a username.
    pub fn grant_role(&mut self, username: &str, role: Role) -> bool {
        self.roles.grant(username, role)
    }

    /// Apply an event for a connection.
    pub fn handle(&mut self, connection_id: &ConnectionId, event: SessionEvent) -> Fanout {
        match event {
            SessionEvent::Join { username, channel } => {
                self.join(connection_id, &username, &channel)
            }
            SessionEvent::Message { text } => self.message(connection_id, text),
            SessionEvent::CreateChannel { channel } => self.create_channel(&channel),
            SessionEvent::Moderate { target } => self.moderate(connection_id, &target).fanout(),
            SessionEvent::Disconnect => self.disconnect(connection_id),
        }
    }

    /// Join `channel` as `username`.
    ///
    /// Creates the channel silently if needed. A connection that was already
    /// in another channel leaves it first. Everyone in the channel, including
    /// the joiner, is told `"<username> joined <channel>"`.
    pub fn join(&mut self, connection_id: &ConnectionId, username: &str, channel: &str) -> Fanout {
        if !self.router.is_attached(connection_id) {
            debug!(connection = %connection_id, "Join from detached connection ignored");
            return Fanout::default();
        }

        self.directory.ensure_exists(channel);

        let previous = self
            .registry
            .put(connection_id.clone(), username, channel, Role::User);
        if let Some(prev) = previous {
            if prev.channel != channel {
                self.directory.remove_member(&prev.channel, connection_id);
            }
        }
        self.directory.add_member(channel, connection_id);

        debug!(connection = %connection_id, username = %username, channel = %channel, "Joined");

        self.publish_to_channel(channel, Envelope::system(format!("{username} joined {channel}")))
    }

    /// Send `text` to the sender's current channel.
    ///
    /// Dropped silently if the connection has not joined.
    pub fn message(&mut self, connection_id: &ConnectionId, text: impl Into<String>) -> Fanout {
        let Some(session) = self.registry.get(connection_id) else {
            debug!(connection = %connection_id, "Message from unjoined connection dropped");
            return Fanout::default();
        };

        let channel = session.channel.clone();
        let envelope = Envelope::chat(session.username.clone(), text);
        self.publish_to_channel(&channel, envelope)
    }

    /// Create `name` and announce it to every connection.
    ///
    /// Does nothing if the channel already exists.
    pub fn create_channel(&mut self, name: &str) -> Fanout {
        if !self.directory.ensure_exists(name) {
            debug!(channel = %name, "Channel already exists");
            return Fanout::default();
        }
        info!(channel = %name, "Channel created");
        self.router.publish_all(Envelope::channel_created(name))
    }

    /// Remove every session of `target` on behalf of `connection_id`.
    ///
    /// The requester must be joined under a username holding the admin role.
    /// Each channel holding one of the target's sessions is told
    /// `"<target> has been moderated"` once; the sessions are then removed from
    /// their channels and the registry, and their sinks are detached.
    pub fn moderate(&mut self, connection_id: &ConnectionId, target: &str) -> Moderation {
        let Some(requester) = self.registry.get(connection_id) else {
            debug!(connection = %connection_id, "Moderation from unjoined connection denied");
            return Moderation::Denied;
        };
        if !self.roles.is_admin(&requester.username) {
            debug!(
                connection = %connection_id,
                username = %requester.username,
                target = %target,
                "Moderation denied"
            );
            return Moderation::Denied;
        }
        let requester = requester.username.clone();

        let targets = self.registry.connections_for(target);
        if targets.is_empty() {
            debug!(target = %target, "Moderation target not found");
            return Moderation::TargetNotFound;
        }

        let channels: BTreeSet<ChannelId> = targets
            .iter()
            .filter_map(|id| self.registry.get(id))
            .map(|session| session.channel.clone())
            .collect();

        let mut fanout = Fanout::default();
        for channel in &channels {
            let sent = self.publish_to_channel(
                channel,
                Envelope::system(format!("{target} has been moderated")),
            );
            fanout.delivered += sent.delivered;
            fanout.dropped += sent.dropped;
        }

        for id in &targets {
            if let Some(session) = self.registry.remove(id) {
                self.directory.remove_member(&session.channel, id);
            }
            self.router.detach(id);
        }

        info!(
            moderator = %requester,
            target = %target,
            sessions = targets.len(),
            "User moderated"
        );

        Moderation::Applied {
            removed: targets.len(),
            fanout,
        }
    }

    /// Tear down a connection.
    ///
    /// The remaining channel members are told `"<username> left"`. Calling
    /// this for a connection that is already gone does nothing.
    pub fn disconnect(&mut self, connection_id: &ConnectionId) -> Fanout {
        self.router.detach(connection_id);

        let Some(session) = self.registry.remove(connection_id) else {
            return Fanout::default();
        };
        self.directory.remove_member(&session.channel, connection_id);

        debug!(
            connection = %connection_id,
            username = %session.username,
            channel = %session.channel,
            "Left"
        );

        let text = format!("{} left", session.username);
        self.publish_to_channel(&session.channel, Envelope::system(text))
    }

    /// All channel names, sorted.
    #[must_use]
    pub fn channel_names(&self) -> Vec<String> {
        self.directory.names()
    }

    /// Current statistics.
    #[must_use]
    pub fn stats(&self) -> CoordinatorStats {
        CoordinatorStats {
            connections: self.router.connection_count(),
            sessions: self.registry.len(),
            channels: self.directory.len(),
        }
    }

    /// The connection registry.
    #[must_use]
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// The channel directory.
    #[must_use]
    pub fn directory(&self) -> &ChannelDirectory {
        &self.directory
    }

    /// The role registry.
    #[must_use]
    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    fn publish_to_channel(&self, channel: &str, envelope: Envelope) -> Fanout {
        let members = self.directory.members(channel);
        self.router.publish(channel, &members, envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    type Inbox = mpsc::UnboundedReceiver<Arc<Envelope>>;

    fn connect(coordinator: &mut SessionCoordinator, id: &str) -> (ConnectionId, Inbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::from(id);
        coordinator.attach(id.clone(), tx);
        (id, rx)
    }

    fn drain(rx: &mut Inbox) -> Vec<Envelope> {
        let mut out = Vec::new();
        while let Ok(env) = rx.try_recv() {
            out.push((*env).clone());
        }
        out
    }

    fn texts(rx: &mut Inbox) -> Vec<String> {
        drain(rx)
            .into_iter()
            .filter_map(|env| env.text().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_join_announces_to_channel_members_only() {
        let mut coordinator = SessionCoordinator::new();
        let (a, mut rx_a) = connect(&mut coordinator, "conn-a");
        let (b, mut rx_b) = connect(&mut coordinator, "conn-b");
        let (c, mut rx_c) = connect(&mut coordinator, "conn-c");

        coordinator.join(&a, "alice", "general");
        coordinator.join(&c, "carol", "random");
        coordinator.join(&b, "bob", "general");

        assert_eq!(
            texts(&mut rx_a),
            vec!["alice joined general", "bob joined general"]
        );
        assert_eq!(texts(&mut rx_b), vec!["bob joined general"]);
        assert_eq!(texts(&mut rx_c), vec!["carol joined random"]);
    }

    #[test]
    fn test_join_creates_channel_silently() {
        let mut coordinator = SessionCoordinator::new();
        let (a, _rx_a) = connect(&mut coordinator, "conn-a");
        let (_bystander, mut rx_by) = connect(&mut coordinator, "conn-x");

        coordinator.join(&a, "alice", "fresh");

        assert!(coordinator.directory().contains("fresh"));
        assert!(drain(&mut rx_by).is_empty());
    }

    #[test]
    fn test_join_accepts_empty_username() {
        let mut coordinator = SessionCoordinator::new();
        let (a, mut rx_a) = connect(&mut coordinator, "conn-a");

        coordinator.join(&a, "", "general");
        assert_eq!(texts(&mut rx_a), vec![" joined general"]);
        assert_eq!(coordinator.registry().get(&a).unwrap().role, Role::User);
    }

    #[test]
    fn test_join_from_detached_connection_ignored() {
        let mut coordinator = SessionCoordinator::new();
        let fanout = coordinator.join(&"ghost".into(), "casper", "general");

        assert_eq!(fanout.attempted(), 0);
        assert!(coordinator.registry().is_empty());
        assert!(!coordinator.directory().contains("general"));
    }

    #[test]
    fn test_message_includes_sender() {
        let mut coordinator = SessionCoordinator::new();
        let (a, mut rx_a) = connect(&mut coordinator, "conn-a");
        let (b, mut rx_b) = connect(&mut coordinator, "conn-b");
        coordinator.join(&a, "A", "general");
        coordinator.join(&b, "B", "general");
        drain(&mut rx_a);
        drain(&mut rx_b);

        let fanout = coordinator.message(&a, "hi");
        assert_eq!(fanout.delivered, 2);

        let expected = Envelope::Chat {
            sender: Sender::User("A".to_string()),
            text: "hi".to_string(),
        };
        assert_eq!(drain(&mut rx_a), vec![expected.clone()]);
        assert_eq!(drain(&mut rx_b), vec![expected]);
    }

    #[test]
    fn test_message_without_join_is_dropped() {
        let mut coordinator = SessionCoordinator::new();
        let (a, mut rx_a) = connect(&mut coordinator, "conn-a");
        let (b, mut rx_b) = connect(&mut coordinator, "conn-b");
        coordinator.join(&b, "bob", "general");
        drain(&mut rx_b);

        let fanout = coordinator.message(&a, "anyone?");
        assert_eq!(fanout.attempted(), 0);
        assert!(drain(&mut rx_a).is_empty());
        assert!(drain(&mut rx_b).is_empty());
    }

    #[test]
    fn test_message_stays_in_channel() {
        let mut coordinator = SessionCoordinator::new();
        let (a, _rx_a) = connect(&mut coordinator, "conn-a");
        let (c, mut rx_c) = connect(&mut coordinator, "conn-c");
        coordinator.join(&a, "alice", "general");
        coordinator.join(&c, "carol", "random");
        drain(&mut rx_c);

        coordinator.message(&a, "general only");
        assert!(drain(&mut rx_c).is_empty());
    }

    #[test]
    fn test_rejoin_moves_membership() {
        let mut coordinator = SessionCoordinator::new();
        let (a, _rx_a) = connect(&mut coordinator, "conn-a");
        let (b, mut rx_b) = connect(&mut coordinator, "conn-b");
        coordinator.join(&b, "bob", "general");
        coordinator.join(&a, "alice", "general");
        coordinator.join(&a, "alice", "random");
        drain(&mut rx_b);

        assert_eq!(coordinator.directory().member_count("general"), 1);
        assert_eq!(coordinator.directory().member_count("random"), 1);

        coordinator.message(&a, "over here");
        assert!(drain(&mut rx_b).is_empty());
    }

    #[test]
    fn test_create_channel_announces_once() {
        let mut coordinator = SessionCoordinator::new();
        let (a, mut rx_a) = connect(&mut coordinator, "conn-a");
        let (_u, mut rx_u) = connect(&mut coordinator, "conn-unjoined");
        coordinator.join(&a, "alice", "general");
        drain(&mut rx_a);

        let fanout = coordinator.create_channel("random");
        assert_eq!(fanout.delivered, 2);

        let expected = vec![Envelope::channel_created("random")];
        assert_eq!(drain(&mut rx_a), expected);
        assert_eq!(drain(&mut rx_u), expected);

        let again = coordinator.create_channel("random");
        assert_eq!(again.attempted(), 0);
        assert!(drain(&mut rx_a).is_empty());
        assert!(drain(&mut rx_u).is_empty());
    }

    #[test]
    fn test_create_channel_after_implicit_join_is_silent() {
        let mut coordinator = SessionCoordinator::new();
        let (a, mut rx_a) = connect(&mut coordinator, "conn-a");
        coordinator.join(&a, "alice", "general");
        drain(&mut rx_a);

        coordinator.create_channel("general");
        assert!(drain(&mut rx_a).is_empty());
    }

    #[test]
    fn test_admin_moderates_user() {
        let mut coordinator = SessionCoordinator::new();
        coordinator.grant_role("root", Role::Admin);
        let (root, mut rx_root) = connect(&mut coordinator, "conn-root");
        let (bob, mut rx_bob) = connect(&mut coordinator, "conn-bob");
        coordinator.join(&root, "root", "general");
        coordinator.join(&bob, "bob", "general");
        drain(&mut rx_root);
        drain(&mut rx_bob);

        let outcome = coordinator.moderate(&root, "bob");
        assert!(matches!(outcome, Moderation::Applied { removed: 1, .. }));
        assert_eq!(outcome.outcome(), "applied");
        assert_eq!(outcome.fanout().delivered, 2);

        assert_eq!(texts(&mut rx_root), vec!["bob has been moderated"]);
        assert_eq!(texts(&mut rx_bob), vec!["bob has been moderated"]);
        assert!(coordinator.registry().get(&bob).is_none());
        assert_eq!(coordinator.directory().member_count("general"), 1);

        // Bob's sink is gone and further events from him do nothing
        assert!(rx_bob.try_recv().is_err());
        assert_eq!(coordinator.message(&bob, "still here?").attempted(), 0);
        assert_eq!(coordinator.join(&bob, "bob", "general").attempted(), 0);
        assert!(drain(&mut rx_root).is_empty());

        // The transport dropping bob's link afterwards announces nothing
        assert_eq!(coordinator.disconnect(&bob).attempted(), 0);
        assert!(drain(&mut rx_root).is_empty());
        assert_eq!(coordinator.stats().connections, 1);
    }

    #[test]
    fn test_moderation_targets_last_known_channel() {
        let mut coordinator = SessionCoordinator::new();
        coordinator.grant_role("root", Role::Admin);
        let (root, mut rx_root) = connect(&mut coordinator, "conn-root");
        let (bob, _rx_bob) = connect(&mut coordinator, "conn-bob");
        let (carol, mut rx_carol) = connect(&mut coordinator, "conn-carol");
        coordinator.join(&root, "root", "general");
        coordinator.join(&carol, "carol", "random");
        coordinator.join(&bob, "bob", "general");
        coordinator.join(&bob, "bob", "random");
        drain(&mut rx_root);
        drain(&mut rx_carol);

        coordinator.moderate(&root, "bob");

        assert!(drain(&mut rx_root).is_empty());
        assert_eq!(texts(&mut rx_carol), vec!["bob has been moderated"]);
    }

    #[test]
    fn test_non_admin_moderation_is_silent() {
        let mut coordinator = SessionCoordinator::new();
        let (eve, mut rx_eve) = connect(&mut coordinator, "conn-eve");
        let (bob, mut rx_bob) = connect(&mut coordinator, "conn-bob");
        coordinator.join(&eve, "eve", "general");
        coordinator.join(&bob, "bob", "general");
        drain(&mut rx_eve);
        drain(&mut rx_bob);

        assert_eq!(coordinator.moderate(&eve, "bob"), Moderation::Denied);

        assert!(coordinator.registry().get(&bob).is_some());
        assert!(drain(&mut rx_eve).is_empty());
        assert!(drain(&mut rx_bob).is_empty());
    }

    #[test]
    fn test_moderation_requires_joined_requester() {
        let mut coordinator = SessionCoordinator::new();
        coordinator.grant_role("root", Role::Admin);
        let (anon, _rx) = connect(&mut coordinator, "conn-anon");
        let (bob, _rx_bob) = connect(&mut coordinator, "conn-bob");
        coordinator.join(&bob, "bob", "general");

        assert_eq!(coordinator.moderate(&anon, "bob"), Moderation::Denied);
        assert!(coordinator.registry().get(&bob).is_some());
    }

    #[test]
    fn test_moderation_of_unknown_target() {
        let mut coordinator = SessionCoordinator::new();
        coordinator.grant_role("root", Role::Admin);
        let (root, mut rx_root) = connect(&mut coordinator, "conn-root");
        coordinator.join(&root, "root", "general");
        drain(&mut rx_root);

        let outcome = coordinator.moderate(&root, "nobody");
        assert_eq!(outcome, Moderation::TargetNotFound);
        assert_eq!(outcome.outcome(), "target_not_found");
        assert_eq!(outcome.fanout(), Fanout::default());
        assert!(drain(&mut rx_root).is_empty());
    }

    #[test]
    fn test_moderation_removes_all_sessions_of_username() {
        let mut coordinator = SessionCoordinator::new();
        coordinator.grant_role("root", Role::Admin);
        let (root, mut rx_root) = connect(&mut coordinator, "conn-root");
        let (bob1, _rx1) = connect(&mut coordinator, "conn-bob-1");
        let (bob2, _rx2) = connect(&mut coordinator, "conn-bob-2");
        coordinator.join(&root, "root", "general");
        coordinator.join(&bob1, "bob", "general");
        coordinator.join(&bob2, "bob", "general");
        drain(&mut rx_root);

        let outcome = coordinator.moderate(&root, "bob");
        assert!(matches!(outcome, Moderation::Applied { removed: 2, .. }));
        assert_eq!(texts(&mut rx_root), vec!["bob has been moderated"]);
        assert_eq!(coordinator.stats().sessions, 1);
    }

    #[test]
    fn test_disconnect_announces_and_is_idempotent() {
        let mut coordinator = SessionCoordinator::new();
        let (a, _rx_a) = connect(&mut coordinator, "conn-a");
        let (b, mut rx_b) = connect(&mut coordinator, "conn-b");
        coordinator.join(&a, "alice", "general");
        coordinator.join(&b, "bob", "general");
        drain(&mut rx_b);

        let fanout = coordinator.disconnect(&a);
        assert_eq!(fanout.delivered, 1);
        assert_eq!(texts(&mut rx_b), vec!["alice left"]);
        assert_eq!(coordinator.directory().member_count("general"), 1);

        assert_eq!(coordinator.disconnect(&a).attempted(), 0);
        assert!(drain(&mut rx_b).is_empty());
    }

    #[test]
    fn test_disconnect_unjoined_detaches() {
        let mut coordinator = SessionCoordinator::new();
        let (a, _rx_a) = connect(&mut coordinator, "conn-a");

        coordinator.disconnect(&a);
        assert_eq!(coordinator.stats().connections, 0);
    }

    #[test]
    fn test_handle_dispatch() {
        let mut coordinator = SessionCoordinator::with_channels(["general"]);
        let (a, mut rx_a) = connect(&mut coordinator, "conn-a");

        coordinator.handle(
            &a,
            SessionEvent::Join {
                username: "alice".into(),
                channel: "general".into(),
            },
        );
        coordinator.handle(&a, SessionEvent::Message { text: "yo".into() });
        coordinator.handle(
            &a,
            SessionEvent::CreateChannel {
                channel: "random".into(),
            },
        );

        assert_eq!(
            drain(&mut rx_a),
            vec![
                Envelope::system("alice joined general"),
                Envelope::chat("alice", "yo"),
                Envelope::channel_created("random"),
            ]
        );

        coordinator.handle(&a, SessionEvent::Disconnect);
        assert_eq!(
            coordinator.stats(),
            CoordinatorStats {
                connections: 0,
                sessions: 0,
                channels: 2,
            }
        );
    }

    #[test]
    fn test_login_records_role() {
        let mut coordinator = SessionCoordinator::new();
        let identity = Identity {
            username: "root".into(),
            role: Role::Admin,
        };
        assert!(coordinator.login(&identity));
        assert!(!coordinator.login(&identity));
        assert!(coordinator.roles().is_admin("root"));
    }

    #[test]
    fn test_channel_names_include_seeded() {
        let mut coordinator = SessionCoordinator::with_channels(["general"]);
        coordinator.create_channel("announcements");
        assert_eq!(coordinator.channel_names(), vec!["announcements", "general"]);
    }

    #[test]
    fn test_event_kind() {
        assert_eq!(SessionEvent::Disconnect.kind(), "disconnect");
        assert_eq!(
            SessionEvent::Moderate {
                target: "bob".into()
            }
            .kind(),
            "moderate"
        );
    }
}
