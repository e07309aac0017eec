use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use aws_sdk_s3::Client;
use tracing::debug;

use benefits_core::keys;
use benefits_core::models::employee::Employee;
use benefits_storage::state;

use crate::error::AuthError;

/// Source of employee identity records.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// `Ok(None)` means the employee does not exist. `Err` means the
    /// directory could not answer.
    async fn lookup(&self, employee_id: &str) -> Result<Option<Employee>, AuthError>;
}

/// Fixed in-memory directory.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    employees: HashMap<String, Employee>,
    lookups: AtomicUsize,
}

impl MemoryDirectory {
    pub fn new(employees: impl IntoIterator<Item = Employee>) -> Self {
        Self {
            employees: employees
                .into_iter()
                .map(|e| (e.employee_id.clone(), e))
                .collect(),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Number of lookups served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EmployeeDirectory for MemoryDirectory {
    async fn lookup(&self, employee_id: &str) -> Result<Option<Employee>, AuthError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self.employees.get(employee_id).cloned())
    }
}

/// Directory backed by `employees/{employee_id}.json` objects in S3.
pub struct S3Directory {
    client: Client,
    bucket: String,
}

impl S3Directory {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl EmployeeDirectory for S3Directory {
    async fn lookup(&self, employee_id: &str) -> Result<Option<Employee>, AuthError> {
        let Ok(employee_id) = keys::validate_employee_id(employee_id) else {
            debug!(employee_id, "rejecting unusable employee id");
            return Ok(None);
        };

        let key = keys::employee(employee_id);
        let employee: Option<Employee> = state::try_load_state(&self.client, &self.bucket, &key)
            .await
            .map_err(|e| AuthError::Directory(format!("{key}: {e}")))?;

        // A record filed under the wrong key is treated as missing.
        Ok(employee.filter(|e| e.employee_id == employee_id))
    }
}
