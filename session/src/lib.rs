//! Client-side session lifecycle for the backoffice front-end.
//!
//! SYSTEM CONTEXT
//! ==============
//! This crate owns "who is logged in" for a client process. A successful
//! login is persisted to durable key/value storage and mirrored into the
//! `userToken` cookie so the server's route guard can make navigation
//! decisions without sharing memory with the client.
//!
//! The route constants in [`routes`] are shared with the `server` crate so
//! both sides agree on what counts as an auth page or a protected page.

pub mod client;
pub mod cookies;
pub mod error;
pub mod extract;
pub mod model;
pub mod routes;
pub mod storage;
pub mod store;

pub use client::AuthClient;
pub use error::{AuthApiError, SessionError, StorageError};
pub use model::{AuthState, Session, SessionCandidate};
pub use storage::{CookieStorage, FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{LoginTicket, SessionStore};
