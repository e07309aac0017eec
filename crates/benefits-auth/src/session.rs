//! Client-side session store.
//!
//! Owns the authenticated employee and mirrors it into local storage so a
//! restart picks the session back up. Every failure path degrades to
//! "not authenticated"; nothing here returns an error to the caller.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use benefits_core::keys;
use benefits_core::models::employee::Employee;
use benefits_core::models::session::Session;
use benefits_storage::kv::KeyValueStore;

use crate::directory::EmployeeDirectory;
use crate::error::AuthError;

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SessionStore {
    storage: Box<dyn KeyValueStore>,
    directory: Arc<dyn EmployeeDirectory>,
    lookup_timeout: Duration,
    session: Session,
}

impl SessionStore {
    /// Build the store and rehydrate any stored snapshot.
    ///
    /// A snapshot is accepted only if it parses and names a non-empty
    /// employee id. Anything else is removed from storage and the session
    /// starts empty.
    pub fn restore(
        storage: Box<dyn KeyValueStore>,
        directory: Arc<dyn EmployeeDirectory>,
        lookup_timeout: Duration,
    ) -> Self {
        let session = match read_snapshot(storage.as_ref()) {
            Ok(Some(employee)) => {
                info!(employee_id = %employee.employee_id, "session restored");
                Session::authenticated(employee)
            }
            Ok(None) => {
                debug!("no usable stored session");
                discard_snapshot(storage.as_ref());
                Session::default()
            }
            Err(e) => {
                warn!(error = %e, "discarding stored session");
                discard_snapshot(storage.as_ref());
                Session::default()
            }
        };

        Self {
            storage,
            directory,
            lookup_timeout,
            session,
        }
    }

    /// Look up `employee_id` and bind the session to it.
    ///
    /// Returns false, leaving the session untouched, when the id is blank,
    /// the employee does not exist, or the lookup fails or times out.
    pub async fn login(&mut self, employee_id: &str) -> bool {
        let employee_id = employee_id.trim();
        if employee_id.is_empty() {
            debug!("ignoring login with blank employee id");
            return false;
        }

        let employee = match self.lookup(employee_id).await {
            Ok(Some(employee)) => employee,
            Ok(None) => {
                info!(employee_id, "login rejected: employee not found");
                return false;
            }
            Err(e) => {
                warn!(employee_id, error = %e, "login failed: directory lookup error");
                return false;
            }
        };

        self.session = Session::authenticated(employee);

        // The in-memory session stands even if the snapshot write fails;
        // the next restart simply starts logged out.
        if let Err(e) = self.persist() {
            warn!(employee_id, error = %e, "failed to persist session snapshot");
        }

        info!(employee_id, "login succeeded");
        true
    }

    /// Clear the session and its stored snapshot. Safe to call repeatedly.
    pub fn logout(&mut self) {
        if let Some(employee_id) = self.session.employee_id() {
            info!(employee_id, "logging out");
        }
        self.session = Session::default();
        discard_snapshot(self.storage.as_ref());
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    pub fn employee(&self) -> Option<&Employee> {
        self.session.employee.as_ref()
    }

    pub fn employee_id(&self) -> Option<&str> {
        self.session.employee_id()
    }

    async fn lookup(&self, employee_id: &str) -> Result<Option<Employee>, AuthError> {
        tokio::time::timeout(self.lookup_timeout, self.directory.lookup(employee_id))
            .await
            .map_err(|_| AuthError::Timeout(self.lookup_timeout))?
    }

    fn persist(&self) -> Result<(), AuthError> {
        let json = serde_json::to_string(&self.session)?;
        self.storage.set(keys::SESSION, &json)?;
        Ok(())
    }
}

/// `Ok(None)` covers both a missing key and a snapshot with no usable
/// employee; `Err` covers unreadable storage and unparseable JSON.
fn read_snapshot(storage: &dyn KeyValueStore) -> Result<Option<Employee>, AuthError> {
    let Some(raw) = storage.get(keys::SESSION)? else {
        return Ok(None);
    };

    let session: Session = serde_json::from_str(&raw)?;
    if !session.is_restorable() {
        return Ok(None);
    }
    Ok(session.employee)
}

fn discard_snapshot(storage: &dyn KeyValueStore) {
    if let Err(e) = storage.remove(keys::SESSION) {
        warn!(error = %e, "failed to remove stored session");
    }
}
