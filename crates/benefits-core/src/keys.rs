//! Storage key conventions.
//!
//! Pure string functions. These define the canonical layout of objects in
//! the benefits bucket and the key used for the local session snapshot.

use crate::error::CoreError;

/// Local key-value key holding the serialized [`Session`](crate::models::session::Session).
pub const SESSION: &str = "benefits.session";

pub const EMPLOYEES_PREFIX: &str = "employees/";

pub const TRANSCRIPTS_PREFIX: &str = "transcripts/";

pub fn employee(employee_id: &str) -> String {
    format!("{EMPLOYEES_PREFIX}{employee_id}.json")
}

pub fn transcript(employee_id: &str) -> String {
    format!("{TRANSCRIPTS_PREFIX}{employee_id}.json")
}

/// Trim an employee id and reject values that cannot be used as a key segment.
pub fn validate_employee_id(employee_id: &str) -> Result<&str, CoreError> {
    let trimmed = employee_id.trim();
    if trimmed.is_empty() || trimmed.contains('/') || trimmed.contains("..") {
        return Err(CoreError::InvalidEmployeeId(employee_id.to_string()));
    }
    Ok(trimmed)
}
