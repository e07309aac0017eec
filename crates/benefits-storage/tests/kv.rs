use benefits_storage::error::StorageError;
use benefits_storage::kv::{FileStore, KeyValueStore, MemoryStore};

#[test]
fn memory_store_clones_share_entries() {
    let store = MemoryStore::new();
    let handle = store.clone();

    store.set("benefits.session", "{}").unwrap();
    assert!(handle.contains("benefits.session"));
    assert_eq!(handle.get("benefits.session").unwrap().as_deref(), Some("{}"));

    handle.remove("benefits.session").unwrap();
    assert!(store.get("benefits.session").unwrap().is_none());
}

#[test]
fn memory_store_remove_missing_is_ok() {
    let store = MemoryStore::new();
    store.remove("nothing").unwrap();
    store.remove("nothing").unwrap();
}

#[test]
fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("nested"));

    assert!(store.get("benefits.session").unwrap().is_none());

    store.set("benefits.session", r#"{"is_authenticated":true}"#).unwrap();
    assert_eq!(
        store.get("benefits.session").unwrap().as_deref(),
        Some(r#"{"is_authenticated":true}"#)
    );
    assert!(dir.path().join("nested/benefits.session.json").exists());
    assert!(!dir.path().join("nested/benefits.session.json.tmp").exists());

    store.set("benefits.session", "second").unwrap();
    assert_eq!(store.get("benefits.session").unwrap().as_deref(), Some("second"));
}

#[test]
fn file_store_remove_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    store.set("benefits.session", "x").unwrap();
    store.remove("benefits.session").unwrap();
    store.remove("benefits.session").unwrap();
    assert!(store.get("benefits.session").unwrap().is_none());
}

#[cfg(unix)]
#[test]
fn file_store_writes_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    store.set("benefits.session", "x").unwrap();

    let mode = std::fs::metadata(dir.path().join("benefits.session.json"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn file_store_rejects_path_like_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    for key in ["", "../escape", "a/b", ".hidden"] {
        assert!(matches!(
            store.set(key, "x"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
