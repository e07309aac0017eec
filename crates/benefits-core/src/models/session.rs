use serde::{Deserialize, Serialize};

use crate::models::employee::Employee;

/// Client-side authentication state.
///
/// The same shape is written to local storage as the session snapshot, so
/// a reload can pick the employee back up without another directory lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub employee: Option<Employee>,
}

impl Session {
    pub fn authenticated(employee: Employee) -> Self {
        Self {
            is_authenticated: true,
            employee: Some(employee),
        }
    }

    pub fn employee_id(&self) -> Option<&str> {
        self.employee.as_ref().map(|e| e.employee_id.as_str())
    }

    /// A stored snapshot is only trusted when it names an employee.
    pub fn is_restorable(&self) -> bool {
        self.employee_id().is_some_and(|id| !id.trim().is_empty())
    }
}
