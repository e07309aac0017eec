use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use benefits_auth::directory::{EmployeeDirectory, MemoryDirectory};
use benefits_auth::error::AuthError;
use benefits_auth::session::{SessionStore, DEFAULT_LOOKUP_TIMEOUT};
use benefits_core::keys;
use benefits_core::models::employee::Employee;
use benefits_core::models::session::Session;
use benefits_storage::kv::{KeyValueStore, MemoryStore};

fn employee(id: &str, name: &str) -> Employee {
    Employee {
        employee_id: id.to_string(),
        name: name.to_string(),
        date_of_birth: Some(jiff::civil::date(1990, 5, 15)),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        hsa_eligible: true,
        fsa_eligible: false,
        cobra_status: "not_applicable".to_string(),
    }
}

fn directory() -> Arc<MemoryDirectory> {
    Arc::new(MemoryDirectory::new([
        employee("12345", "John Smith"),
        employee("emp001", "Emily Davis"),
    ]))
}

struct FailingDirectory;

#[async_trait]
impl EmployeeDirectory for FailingDirectory {
    async fn lookup(&self, _employee_id: &str) -> Result<Option<Employee>, AuthError> {
        Err(AuthError::Directory("connection refused".to_string()))
    }
}

struct SlowDirectory;

#[async_trait]
impl EmployeeDirectory for SlowDirectory {
    async fn lookup(&self, employee_id: &str) -> Result<Option<Employee>, AuthError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Some(employee(employee_id, "Too Late")))
    }
}

fn store_with(storage: &MemoryStore, dir: Arc<dyn EmployeeDirectory>) -> SessionStore {
    SessionStore::restore(Box::new(storage.clone()), dir, DEFAULT_LOOKUP_TIMEOUT)
}

#[tokio::test]
async fn login_with_known_employee_binds_session_and_persists() {
    let storage = MemoryStore::new();
    let mut store = store_with(&storage, directory());

    assert!(store.login("12345").await);
    assert!(store.is_authenticated());
    assert_eq!(store.employee_id(), Some("12345"));
    assert_eq!(store.employee().map(|e| e.name.as_str()), Some("John Smith"));

    let raw = storage.get(keys::SESSION).unwrap().unwrap();
    let snapshot: Session = serde_json::from_str(&raw).unwrap();
    assert_eq!(&snapshot, store.session());
}

#[tokio::test]
async fn login_trims_the_employee_id() {
    let storage = MemoryStore::new();
    let mut store = store_with(&storage, directory());

    assert!(store.login("  emp001 ").await);
    assert_eq!(store.employee_id(), Some("emp001"));
}

#[tokio::test]
async fn unknown_employee_leaves_state_unchanged() {
    let storage = MemoryStore::new();
    let mut store = store_with(&storage, directory());

    for id in ["99999", "nobody", "12345 6"] {
        assert!(!store.login(id).await);
        assert_eq!(store.session(), &Session::default());
        assert!(!storage.contains(keys::SESSION));
    }
}

#[tokio::test]
async fn failed_login_keeps_an_existing_session() {
    let storage = MemoryStore::new();
    let mut store = store_with(&storage, directory());

    assert!(store.login("12345").await);
    let before = store.session().clone();

    assert!(!store.login("99999").await);
    assert_eq!(store.session(), &before);
}

#[tokio::test]
async fn blank_id_skips_the_directory() {
    let storage = MemoryStore::new();
    let dir = directory();
    let mut store = store_with(&storage, dir.clone());

    assert!(!store.login("").await);
    assert!(!store.login("   ").await);
    assert_eq!(dir.lookups(), 0);
}

#[tokio::test]
async fn directory_failure_is_a_false_login() {
    let storage = MemoryStore::new();
    let mut store = store_with(&storage, Arc::new(FailingDirectory));

    assert!(!store.login("12345").await);
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn slow_directory_times_out() {
    let storage = MemoryStore::new();
    let mut store = SessionStore::restore(
        Box::new(storage.clone()),
        Arc::new(SlowDirectory),
        Duration::from_millis(20),
    );

    assert!(!store.login("12345").await);
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn logout_twice_matches_logout_once() {
    let storage = MemoryStore::new();
    let mut store = store_with(&storage, directory());
    assert!(store.login("12345").await);

    store.logout();
    let once = store.session().clone();
    assert!(!storage.contains(keys::SESSION));

    store.logout();
    assert_eq!(store.session(), &once);
    assert_eq!(store.session(), &Session::default());
    assert!(!storage.contains(keys::SESSION));
}

#[tokio::test]
async fn restore_picks_up_a_previous_login() {
    let storage = MemoryStore::new();
    {
        let mut store = store_with(&storage, directory());
        assert!(store.login("emp001").await);
    }

    let dir = directory();
    let restored = store_with(&storage, dir.clone());
    assert!(restored.is_authenticated());
    assert_eq!(restored.employee_id(), Some("emp001"));
    assert_eq!(dir.lookups(), 0);
}

#[test]
fn restore_discards_corrupt_snapshot() {
    let storage = MemoryStore::new();
    storage.set(keys::SESSION, "{not json").unwrap();

    let store = store_with(&storage, directory());
    assert_eq!(store.session(), &Session::default());
    assert!(!storage.contains(keys::SESSION));
}

#[test]
fn restore_discards_snapshot_without_employee_id() {
    let storage = MemoryStore::new();
    storage
        .set(
            keys::SESSION,
            r#"{"is_authenticated":true,"employee":{"employee_id":"","name":"Ghost"}}"#,
        )
        .unwrap();

    let store = store_with(&storage, directory());
    assert!(!store.is_authenticated());
    assert!(!storage.contains(keys::SESSION));

    storage
        .set(keys::SESSION, r#"{"is_authenticated":true,"employee":null}"#)
        .unwrap();
    let store = store_with(&storage, directory());
    assert!(!store.is_authenticated());
    assert!(!storage.contains(keys::SESSION));
}

#[test]
fn restore_with_nothing_stored_is_logged_out() {
    let storage = MemoryStore::new();
    let store = store_with(&storage, directory());
    assert_eq!(store.session(), &Session::default());
}
