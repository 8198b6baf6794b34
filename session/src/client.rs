//! HTTP client for the external auth API.

use std::time::Duration;

use serde_json::Value;

use crate::error::AuthApiError;
use crate::extract::{extract_session_candidate, rejection_message};
use crate::model::SessionCandidate;

/// Login endpoint relative to the API base URL.
pub const LOGIN_ENDPOINT: &str = "/api/v1/auth/login";

/// Thin wrapper around `reqwest` for the login call.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    /// Client for `base_url` with the transport's default timeouts.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Client with an explicit overall request timeout.
    ///
    /// # Errors
    ///
    /// Returns the builder error if the TLS backend cannot be initialized.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http(http, base_url))
    }

    #[must_use]
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_owned() }
    }

    #[must_use]
    pub fn login_url(&self) -> String {
        format!("{}{LOGIN_ENDPOINT}", self.base_url)
    }

    /// `POST /api/v1/auth/login` with `{email, password}`.
    ///
    /// # Errors
    ///
    /// - [`AuthApiError::Rejected`] for a non-success status, carrying the
    ///   body's `message` or `Login failed`.
    /// - [`AuthApiError::InvalidBody`] when a success body is not JSON.
    /// - [`AuthApiError::Session`] with `InvalidSession` when the body holds
    ///   no token.
    /// - [`AuthApiError::Http`] on transport failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionCandidate, AuthApiError> {
        let response = self
            .http
            .post(self.login_url())
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = serde_json::from_slice::<Value>(&bytes).ok();
            let message = rejection_message(body.as_ref());
            tracing::warn!(status = status.as_u16(), %message, "login rejected");
            return Err(AuthApiError::Rejected { status: status.as_u16(), message });
        }

        let body: Value = serde_json::from_slice(&bytes).map_err(AuthApiError::InvalidBody)?;
        Ok(extract_session_candidate(&body)?)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
