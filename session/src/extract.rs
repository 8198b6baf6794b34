//! Login-response field extraction.
//!
//! The auth API has returned the user under several shapes over time. Each
//! field is looked up through an ordered list of JSON pointers and the first
//! non-empty string wins. Adding a shape means adding a pointer here, never
//! another fallback at the call site.

use serde_json::Value;

use crate::error::SessionError;
use crate::model::SessionCandidate;

/// Ordered lookup paths for one field of the login response.
#[derive(Debug, Clone, Copy)]
pub struct FieldPaths {
    pub field: &'static str,
    pub pointers: &'static [&'static str],
}

pub const NAME_PATHS: FieldPaths = FieldPaths { field: "name", pointers: &["/data/user/name", "/user/name", "/name"] };

pub const EMAIL_PATHS: FieldPaths =
    FieldPaths { field: "email", pointers: &["/data/user/email", "/user/email", "/email"] };

pub const TOKEN_PATHS: FieldPaths =
    FieldPaths { field: "token", pointers: &["/data/token", "/token", "/access_token"] };

impl FieldPaths {
    /// First non-empty string found along the pointers, in order.
    #[must_use]
    pub fn lookup<'a>(&self, body: &'a Value) -> Option<&'a str> {
        self.pointers
            .iter()
            .filter_map(|pointer| body.pointer(pointer).and_then(Value::as_str))
            .find(|value| !value.is_empty())
    }
}

/// Build a candidate from a login response body. Missing fields come back
/// empty; validation is left to the store.
#[must_use]
pub fn extract_candidate(body: &Value) -> SessionCandidate {
    let field = |paths: FieldPaths| paths.lookup(body).unwrap_or_default().to_owned();
    SessionCandidate { name: field(NAME_PATHS), email: field(EMAIL_PATHS), token: field(TOKEN_PATHS) }
}

/// Like [`extract_candidate`] but rejects a response without a token.
///
/// # Errors
///
/// [`SessionError::InvalidSession`] when no pointer yields a non-empty token.
pub fn extract_session_candidate(body: &Value) -> Result<SessionCandidate, SessionError> {
    let candidate = extract_candidate(body);
    if candidate.token.is_empty() {
        tracing::warn!("login response carried no token");
        return Err(SessionError::InvalidSession);
    }
    Ok(candidate)
}

/// Error message of a rejected login: the body's `message`, else a default.
#[must_use]
pub fn rejection_message(body: Option<&Value>) -> String {
    body.and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or("Login failed")
        .to_owned()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
