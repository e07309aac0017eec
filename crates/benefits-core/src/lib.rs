//! benefits-core
//!
//! Pure domain types, analysis-service wire types, and storage key conventions.
//! No network or AWS dependency. This is the shared vocabulary of the
//! benefits chat client.

pub mod error;
pub mod keys;
pub mod models;
