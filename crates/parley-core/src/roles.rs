//! Roles and the username -> role registry.
//!
//! Roles are granted at authentication time and never revoked. Grants are
//! idempotent, so repeated logins do not pile up duplicate entries.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A user's privilege level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular participant.
    #[default]
    User,
    /// May moderate other participants.
    Admin,
}

impl Role {
    /// The role's name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err("Unknown role"),
        }
    }
}

/// Mapping from role to the usernames holding it.
#[derive(Debug, Default)]
pub struct RoleRegistry {
    holders: HashMap<Role, HashSet<String>>,
}

impl RoleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `role` to `username`.
    ///
    /// Returns `true` if the username did not already hold the role. A username
    /// may end up holding several roles; nothing is removed on grant.
    pub fn grant(&mut self, username: impl Into<String>, role: Role) -> bool {
        let username = username.into();
        let added = self
            .holders
            .entry(role)
            .or_default()
            .insert(username.clone());
        if added {
            debug!(username = %username, role = %role, "Role granted");
        }
        added
    }

    /// Check whether `username` holds `role`.
    #[must_use]
    pub fn has_role(&self, username: &str, role: Role) -> bool {
        self.holders
            .get(&role)
            .is_some_and(|set| set.contains(username))
    }

    /// Shorthand for `has_role(username, Role::Admin)`.
    #[must_use]
    pub fn is_admin(&self, username: &str) -> bool {
        self.has_role(username, Role::Admin)
    }
}
