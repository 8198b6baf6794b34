use super::*;
use crate::cookies::{expired_token_cookie, token_cookie};

// =============================================================================
// MemoryStorage
// =============================================================================

#[tokio::test]
async fn memory_set_get_remove() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get_item("user").await.unwrap(), None);

    storage.set_item("user", "{}").await.unwrap();
    assert_eq!(storage.get_item("user").await.unwrap().as_deref(), Some("{}"));

    storage.remove_item("user").await.unwrap();
    assert_eq!(storage.get_item("user").await.unwrap(), None);
}

#[tokio::test]
async fn memory_remove_missing_key_is_ok() {
    let storage = MemoryStorage::new();
    storage.remove_item("nope").await.unwrap();
}

#[tokio::test]
async fn memory_cookie_written_then_expired() {
    let storage = MemoryStorage::new();
    storage.set_cookie(token_cookie("abc")).await.unwrap();

    let cookie = storage.get_cookie("userToken").await.unwrap().unwrap();
    assert_eq!(cookie.value(), "abc");
    assert_eq!(cookie.path(), Some("/"));

    storage.set_cookie(expired_token_cookie()).await.unwrap();
    assert!(storage.get_cookie("userToken").await.unwrap().is_none());
}

#[tokio::test]
async fn memory_cookie_unknown_name_is_none() {
    let storage = MemoryStorage::new();
    storage.set_cookie(token_cookie("abc")).await.unwrap();
    assert!(storage.get_cookie("other").await.unwrap().is_none());
}

// =============================================================================
// StoredCookie
// =============================================================================

#[test]
fn stored_cookie_past_expiry_is_dropped_on_read() {
    let stored = StoredCookie { header: "userToken=abc; Path=/".into(), expires_at: Some(0) };
    assert!(stored.live_cookie(OffsetDateTime::now_utc()).unwrap().is_none());
}

#[test]
fn stored_cookie_rejects_expired_on_write() {
    assert!(StoredCookie::from_cookie(&expired_token_cookie(), OffsetDateTime::now_utc()).is_none());
}

// =============================================================================
// FileStorage
// =============================================================================

#[tokio::test]
async fn file_values_survive_new_instance() {
    let dir = tempfile::tempdir().unwrap();
    let first = FileStorage::new(dir.path());
    first.set_item("userToken", "tok").await.unwrap();
    first.set_item("user", r#"{"name":"A","email":"a@x"}"#).await.unwrap();

    let second = FileStorage::new(dir.path());
    assert_eq!(second.get_item("userToken").await.unwrap().as_deref(), Some("tok"));
    assert_eq!(second.get_item("user").await.unwrap().as_deref(), Some(r#"{"name":"A","email":"a@x"}"#));
}

#[tokio::test]
async fn file_missing_directory_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("not-created-yet"));
    assert_eq!(storage.get_item("user").await.unwrap(), None);
    assert!(storage.get_cookie("userToken").await.unwrap().is_none());
}

#[tokio::test]
async fn file_creates_directory_on_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let storage = FileStorage::new(&nested);
    storage.set_item("k", "v").await.unwrap();
    assert!(nested.join("storage.json").exists());
    assert!(!nested.join("storage.json.tmp").exists());
}

#[tokio::test]
async fn file_remove_item() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    storage.set_item("a", "1").await.unwrap();
    storage.set_item("b", "2").await.unwrap();
    storage.remove_item("a").await.unwrap();
    assert_eq!(storage.get_item("a").await.unwrap(), None);
    assert_eq!(storage.get_item("b").await.unwrap().as_deref(), Some("2"));
}

#[tokio::test]
async fn file_corrupt_values_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("storage.json"), b"not json").unwrap();
    let storage = FileStorage::new(dir.path());
    let err = storage.get_item("user").await.unwrap_err();
    assert!(matches!(err, StorageError::Corrupt(_)));
}

#[tokio::test]
async fn file_cookie_round_trip_and_expiry() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    storage.set_cookie(token_cookie("abc")).await.unwrap();

    let reopened = FileStorage::new(dir.path());
    let cookie = reopened.get_cookie("userToken").await.unwrap().unwrap();
    assert_eq!(cookie.value(), "abc");

    reopened.set_cookie(expired_token_cookie()).await.unwrap();
    assert!(storage.get_cookie("userToken").await.unwrap().is_none());
}

#[tokio::test]
async fn file_cookie_keeps_token_with_separators() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    storage.set_cookie(token_cookie("a;b c=d")).await.unwrap();

    let reopened = FileStorage::new(dir.path());
    let cookie = reopened.get_cookie("userToken").await.unwrap().unwrap();
    assert_eq!(cookie.value(), "a;b c=d");
    assert_eq!(cookie.path(), Some("/"));
}

#[tokio::test]
async fn memory_cookie_keeps_token_with_separators() {
    let storage = MemoryStorage::new();
    storage.set_cookie(token_cookie("a;b c")).await.unwrap();
    let cookie = storage.get_cookie("userToken").await.unwrap().unwrap();
    assert_eq!(cookie.value(), "a;b c");
}
