use client_lib::adapters::FileSessionStorage;
use icebreaker_core::{SessionStorage, SessionStore, UserId};
use std::sync::Arc;

#[test]
fn session_survives_a_new_storage_instance() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    let first = SessionStore::new(Arc::new(FileSessionStorage::new(&path)));
    assert_eq!(first.session_user_id().unwrap(), None);
    first.set_session_user_id(&UserId::new("alice")).unwrap();

    let second = SessionStore::new(Arc::new(FileSessionStorage::new(&path)));
    assert_eq!(second.session_user_id().unwrap(), Some(UserId::new("alice")));

    second.clear_session().unwrap();
    assert!(!first.is_authenticated().unwrap());
}

#[test]
fn unrelated_keys_are_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileSessionStorage::new(dir.path().join("session.json"));
    storage.set("theme", "dark").unwrap();
    storage.set("user_id", "bob").unwrap();
    storage.remove("user_id").unwrap();

    assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
    assert_eq!(storage.get("user_id").unwrap(), None);
    assert!(!dir.path().join("session.tmp").exists());
}

#[test]
fn corrupt_file_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{ not json").unwrap();

    let storage = FileSessionStorage::new(&path);
    assert!(matches!(
        storage.get("user_id"),
        Err(icebreaker_core::PortError::Storage(_))
    ));
}
