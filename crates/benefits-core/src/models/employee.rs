use serde::{Deserialize, Serialize};

/// Identity record for an employee, as returned by the employee directory.
///
/// The client treats this as immutable: it is fetched once at login and
/// never edited locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,
    pub name: String,
    /// Stored as `dob` in the directory table.
    #[serde(default, alias = "dob", skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<jiff::civil::Date>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub hsa_eligible: bool,
    #[serde(default)]
    pub fsa_eligible: bool,
    #[serde(default = "default_cobra_status")]
    pub cobra_status: String,
}

fn default_cobra_status() -> String {
    "not_applicable".to_string()
}
