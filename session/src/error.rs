//! Error taxonomy for the session lifecycle.
//!
//! Only login reports errors to callers. Restore and logout log storage
//! failures and degrade to "no session".

/// Failure of a durable storage or cookie backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// The backing file exists but does not hold the expected JSON shape.
    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    /// A persisted cookie could not be parsed back.
    #[error("stored cookie is invalid: {0}")]
    Cookie(#[from] cookie::ParseError),
}

/// Errors produced by the session store.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The candidate carried no usable token.
    #[error("Invalid or missing token")]
    InvalidSession,
    /// The candidate had a token but no name or no email.
    #[error("Missing required user information")]
    MissingUserInfo,
    /// A persisted `user` record could not be decoded. Never surfaced by
    /// `restore`, which logs and swallows it.
    #[error("stored user record is unreadable: {0}")]
    StorageParse(#[source] serde_json::Error),
    /// The storage backend failed while persisting a session.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A newer login or a logout happened while this login was in flight.
    #[error("login superseded by a newer session change")]
    LoginSuperseded,
}

/// Errors returned by [`crate::AuthClient`] and the combined login flow.
#[derive(Debug, thiserror::Error)]
pub enum AuthApiError {
    /// The auth API answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The request could not be sent or the body could not be read.
    #[error("login request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// A success response whose body is not JSON.
    #[error("login response is not valid JSON: {0}")]
    InvalidBody(#[source] serde_json::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}
