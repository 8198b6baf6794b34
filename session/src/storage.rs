//! Durable client-side storage backends.
//!
//! DESIGN
//! ======
//! The store talks to two seams: a string key/value store (the browser's
//! `localStorage` equivalent) and a cookie jar. Both are async so a backend
//! may suspend on I/O. Two backends ship here:
//!
//! - [`MemoryStorage`]: process-local maps, used by tests and embedders
//!   that bring their own persistence.
//! - [`FileStorage`]: two JSON files in a state directory. Survives process
//!   restarts; the CLI uses it.
//!
//! Cookie jars follow browser semantics: writing a cookie whose expiry is
//! already in the past deletes it, and expired cookies are never returned.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use cookie::Cookie;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::cookies::{expiry_at, is_live};
use crate::error::StorageError;

const VALUES_FILE: &str = "storage.json";
const COOKIES_FILE: &str = "cookies.json";

/// String key/value store surviving process restart.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Cookie jar the guard-visible token cookie is written into.
#[async_trait]
pub trait CookieStorage: Send + Sync {
    /// Store `cookie`, or delete the stored cookie of that name when it is
    /// already expired.
    async fn set_cookie(&self, cookie: Cookie<'static>) -> Result<(), StorageError>;
    /// Live cookie with `name`, if any.
    async fn get_cookie(&self, name: &str) -> Result<Option<Cookie<'static>>, StorageError>;
}

/// Cookie as kept by a jar: its percent-encoded header form plus the
/// absolute expiry computed at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredCookie {
    header: String,
    expires_at: Option<i64>,
}

impl StoredCookie {
    /// `None` when the cookie is already expired at `now`.
    fn from_cookie(cookie: &Cookie<'_>, now: OffsetDateTime) -> Option<Self> {
        let expires_at = expiry_at(cookie, now);
        if !is_live(expires_at, now) {
            return None;
        }
        Some(Self {
            header: cookie.encoded().to_string(),
            expires_at: expires_at.map(OffsetDateTime::unix_timestamp),
        })
    }

    fn live_cookie(&self, now: OffsetDateTime) -> Result<Option<Cookie<'static>>, StorageError> {
        if let Some(at) = self.expires_at {
            if at <= now.unix_timestamp() {
                return Ok(None);
            }
        }
        Ok(Some(Cookie::parse_encoded(self.header.clone())?))
    }
}

// =============================================================================
// MEMORY
// =============================================================================

/// In-process storage and cookie jar.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
    cookies: Mutex<HashMap<String, StoredCookie>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.values).get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.values).insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.values).remove(key);
        Ok(())
    }
}

#[async_trait]
impl CookieStorage for MemoryStorage {
    async fn set_cookie(&self, cookie: Cookie<'static>) -> Result<(), StorageError> {
        let mut cookies = lock(&self.cookies);
        match StoredCookie::from_cookie(&cookie, OffsetDateTime::now_utc()) {
            Some(stored) => cookies.insert(cookie.name().to_owned(), stored),
            None => cookies.remove(cookie.name()),
        };
        Ok(())
    }

    async fn get_cookie(&self, name: &str) -> Result<Option<Cookie<'static>>, StorageError> {
        let stored = lock(&self.cookies).get(name).cloned();
        match stored {
            Some(stored) => stored.live_cookie(OffsetDateTime::now_utc()),
            None => Ok(None),
        }
    }
}

// =============================================================================
// FILE
// =============================================================================

/// Storage persisted as JSON files under a state directory.
///
/// Writes go through a temp file and a rename so a crash never leaves a
/// half-written file behind. Writers are serialized by an async mutex.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), write_lock: tokio::sync::Mutex::new(()) }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read_map<T: DeserializeOwned>(&self, file: &str) -> Result<BTreeMap<String, T>, StorageError> {
        match tokio::fs::read(self.dir.join(file)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_map<T: Serialize>(&self, file: &str, map: &BTreeMap<String, T>) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{file}.tmp"));
        let bytes = serde_json::to_vec_pretty(map)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut values = self.read_map::<String>(VALUES_FILE).await?;
        Ok(values.remove(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.read_map::<String>(VALUES_FILE).await?;
        values.insert(key.to_owned(), value.to_owned());
        self.write_map(VALUES_FILE, &values).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.read_map::<String>(VALUES_FILE).await?;
        if values.remove(key).is_none() {
            return Ok(());
        }
        self.write_map(VALUES_FILE, &values).await
    }
}

#[async_trait]
impl CookieStorage for FileStorage {
    async fn set_cookie(&self, cookie: Cookie<'static>) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut cookies = self.read_map::<StoredCookie>(COOKIES_FILE).await?;
        match StoredCookie::from_cookie(&cookie, OffsetDateTime::now_utc()) {
            Some(stored) => cookies.insert(cookie.name().to_owned(), stored),
            None => cookies.remove(cookie.name()),
        };
        self.write_map(COOKIES_FILE, &cookies).await
    }

    async fn get_cookie(&self, name: &str) -> Result<Option<Cookie<'static>>, StorageError> {
        let cookies = self.read_map::<StoredCookie>(COOKIES_FILE).await?;
        match cookies.get(name) {
            Some(stored) => stored.live_cookie(OffsetDateTime::now_utc()),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
