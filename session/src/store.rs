//! The session store: single source of truth for "who is logged in".
//!
//! DESIGN
//! ======
//! `SessionStore` is an explicit context object. A client constructs one at
//! startup, calls [`SessionStore::restore`] once, and hands it (usually in an
//! `Arc`) to whatever needs the session. State lives in a `watch` channel so
//! any component can read the latest [`AuthState`] or await changes.
//!
//! Three locations are written on login and cleared on logout, and this type
//! is their only writer:
//!
//! - storage key `user`: JSON `{name, email}`
//! - storage key `userToken`: raw token
//! - cookie `userToken`: token mirror read by the server-side route guard
//!
//! TRADE-OFFS
//! ==========
//! Logins are fenced by a generation counter. A login response that resolves
//! after a newer login or a logout is dropped with
//! [`SessionError::LoginSuperseded`] instead of overwriting newer state.
//! Writers (login commit, logout, restore) are serialized by an async mutex
//! so storage and memory never disagree mid-update. A commit whose writes
//! fail partway puts the storage keys back to their prior values before
//! reporting the error, so a later `restore` never sees a rejected login.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, watch};

use crate::client::AuthClient;
use crate::cookies::{TOKEN_COOKIE, expired_token_cookie, token_cookie};
use crate::error::{AuthApiError, SessionError, StorageError};
use crate::model::{AuthState, Session, SessionCandidate, StoredUser};
use crate::routes;
use crate::storage::{CookieStorage, KeyValueStorage};

/// Storage key holding `{name, email}` as JSON.
pub const USER_KEY: &str = "user";
/// Storage key holding the raw token.
pub const TOKEN_KEY: &str = "userToken";

/// Proof that a login was started at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginTicket {
    generation: u64,
}

pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    cookies: Arc<dyn CookieStorage>,
    state: watch::Sender<AuthState>,
    generation: AtomicU64,
    write_lock: Mutex<()>,
}

impl SessionStore {
    /// Empty store in the `loading` state. Call [`Self::restore`] next.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>, cookies: Arc<dyn CookieStorage>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { storage, cookies, state, generation: AtomicU64::new(0), write_lock: Mutex::new(()) }
    }

    /// Receiver observing every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Start a login. Any login started earlier becomes stale.
    pub fn begin_login(&self) -> LoginTicket {
        LoginTicket { generation: self.advance_generation() }
    }

    fn advance_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: LoginTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Validate `candidate` and make it the current session.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidSession`] or [`SessionError::MissingUserInfo`]
    /// for a bad candidate (the prior session is left untouched), or
    /// [`SessionError::Storage`] when persisting fails.
    pub async fn login(&self, candidate: SessionCandidate) -> Result<Session, SessionError> {
        let session = candidate.validate()?;
        let ticket = self.begin_login();
        self.commit(ticket, session).await
    }

    /// Finish a login started with [`Self::begin_login`].
    ///
    /// # Errors
    ///
    /// As [`Self::login`], plus [`SessionError::LoginSuperseded`] when a newer
    /// login or a logout happened since `ticket` was issued.
    pub async fn complete_login(
        &self,
        ticket: LoginTicket,
        candidate: SessionCandidate,
    ) -> Result<Session, SessionError> {
        let session = candidate.validate()?;
        self.commit(ticket, session).await
    }

    async fn commit(&self, ticket: LoginTicket, session: Session) -> Result<Session, SessionError> {
        let _guard = self.write_lock.lock().await;
        if !self.is_current(ticket) {
            tracing::info!("discarding stale login response");
            return Err(SessionError::LoginSuperseded);
        }

        let prior_user = self.storage.get_item(USER_KEY).await?;
        let prior_token = self.storage.get_item(TOKEN_KEY).await?;
        if let Err(e) = self.persist(&session).await {
            tracing::warn!(error = %e, "persisting session failed; restoring prior storage");
            self.rollback([(USER_KEY, prior_user), (TOKEN_KEY, prior_token)]).await;
            return Err(e.into());
        }

        self.state.send_replace(AuthState { session: Some(session.clone()), loading: false });
        tracing::info!(name = session.name(), email = session.email(), "session established");
        Ok(session)
    }

    async fn persist(&self, session: &Session) -> Result<(), StorageError> {
        let user = serde_json::to_string(&session.stored_user())?;
        self.storage.set_item(USER_KEY, &user).await?;
        self.storage.set_item(TOKEN_KEY, session.token()).await?;
        self.cookies.set_cookie(token_cookie(session.token())).await
    }

    /// Put each key back to its value from before a failed commit. The cookie
    /// is written last, so a failed commit never leaves it changed.
    async fn rollback(&self, prior: [(&'static str, Option<String>); 2]) {
        for (key, value) in prior {
            let result = match value {
                Some(value) => self.storage.set_item(key, &value).await,
                None => self.storage.remove_item(key).await,
            };
            if let Err(e) = result {
                tracing::warn!(error = %e, key, "failed to roll back stored session key");
            }
        }
    }

    /// Full login form flow: call the auth API, then commit the result
    /// unless something newer happened meanwhile.
    ///
    /// # Errors
    ///
    /// Any [`AuthApiError`]; session failures arrive as
    /// [`AuthApiError::Session`].
    pub async fn login_with(
        &self,
        client: &AuthClient,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthApiError> {
        let ticket = self.begin_login();
        let candidate = client.login(email, password).await?;
        Ok(self.complete_login(ticket, candidate).await?)
    }

    /// Clear the session everywhere and return the path the caller should
    /// navigate to. Never fails; storage errors are logged.
    pub async fn logout(&self) -> &'static str {
        self.advance_generation();
        let _guard = self.write_lock.lock().await;

        self.state.send_replace(AuthState { session: None, loading: false });

        for key in [USER_KEY, TOKEN_KEY] {
            if let Err(e) = self.storage.remove_item(key).await {
                tracing::warn!(error = %e, key, "failed to remove stored session key");
            }
        }
        if let Err(e) = self.cookies.set_cookie(expired_token_cookie()).await {
            tracing::warn!(error = %e, cookie = TOKEN_COOKIE, "failed to expire session cookie");
        }

        tracing::info!("session cleared");
        routes::LOGIN
    }

    /// Rehydrate the session from durable storage. Best effort: anything
    /// missing or unreadable leaves the store logged out. A session already
    /// committed in memory is kept.
    pub async fn restore(&self) {
        let _guard = self.write_lock.lock().await;

        let restored = match self.read_persisted().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "session restore failed");
                None
            }
        };

        self.state.send_modify(|state| {
            if state.session.is_none() {
                state.session = restored;
            }
            state.loading = false;
        });

        if let Some(session) = self.session() {
            tracing::debug!(name = session.name(), "session restored");
        }
    }

    async fn read_persisted(&self) -> Result<Option<Session>, SessionError> {
        let user = self.storage.get_item(USER_KEY).await?;
        let token = self.storage.get_item(TOKEN_KEY).await?;
        let (Some(user), Some(token)) = (user, token) else {
            return Ok(None);
        };

        let user: StoredUser = serde_json::from_str(&user).map_err(SessionError::StorageParse)?;
        let session = SessionCandidate { name: user.name, email: user.email, token }.validate()?;
        Ok(Some(session))
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
