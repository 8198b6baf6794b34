//! Session data types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Authenticated identity held by the store.
///
/// Constructed only through [`SessionCandidate::validate`], so every value
/// has a non-empty name, email and token.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    name: String,
    email: String,
    token: String,
}

impl Session {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Opaque bearer token. Never log this.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    pub(crate) fn stored_user(&self) -> StoredUser {
        StoredUser { name: self.name.clone(), email: self.email.clone() }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Unvalidated `{name, email, token}` as produced by a login response.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionCandidate {
    pub name: String,
    pub email: String,
    pub token: String,
}

impl SessionCandidate {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, token: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into(), token: token.into() }
    }

    /// Check the candidate and turn it into a [`Session`].
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidSession`] when the token is empty or blank,
    /// [`SessionError::MissingUserInfo`] when name or email is empty. The
    /// token is checked first.
    pub fn validate(self) -> Result<Session, SessionError> {
        if self.token.trim().is_empty() {
            return Err(SessionError::InvalidSession);
        }
        if self.name.is_empty() || self.email.is_empty() {
            return Err(SessionError::MissingUserInfo);
        }
        Ok(Session { name: self.name, email: self.email, token: self.token })
    }
}

impl fmt::Debug for SessionCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.token.is_empty() { "<empty>" } else { "<redacted>" };
        f.debug_struct("SessionCandidate")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("token", &token)
            .finish()
    }
}

/// JSON shape of the `user` storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredUser {
    pub name: String,
    pub email: String,
}

/// Observable state of the store.
///
/// `loading` stays `true` until the startup restore has finished, so guards
/// rendered before hydration can tell "not yet known" from "logged out".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub session: Option<Session>,
    pub loading: bool,
}

impl AuthState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self { session: None, loading: true }
    }
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
