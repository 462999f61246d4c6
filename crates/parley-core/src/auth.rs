//! Authentication seam.
//!
//! The relay does not verify credentials itself. An [`Authenticator`] turns
//! request-level credentials into an [`Identity`], and the coordinator records
//! the resulting role without further checks.

use crate::roles::Role;
use serde::{Deserialize, Serialize};

/// Credentials presented at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Requested username.
    pub username: String,
    /// Requested role.
    #[serde(default)]
    pub role: Role,
}

impl Credentials {
    /// Create credentials for a username and role.
    #[must_use]
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Authenticated username.
    pub username: String,
    /// Assigned role.
    pub role: Role,
}

/// Turns credentials into an identity.
pub trait Authenticator: Send + Sync {
    /// Authenticate a login request.
    ///
    /// Returns `None` if the credentials are rejected.
    fn authenticate(&self, credentials: &Credentials) -> Option<Identity>;
}

/// Accepts whatever role the client declares.
///
/// Only empty usernames are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustingAuthenticator;

impl Authenticator for TrustingAuthenticator {
    fn authenticate(&self, credentials: &Credentials) -> Option<Identity> {
        if credentials.username.is_empty() {
            return None;
        }
        Some(Identity {
            username: credentials.username.clone(),
            role: credentials.role,
        })
    }
}
