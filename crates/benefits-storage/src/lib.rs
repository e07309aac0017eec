//! benefits-storage
//!
//! Storage primitives: a local key-value store for the session snapshot,
//! and a thin wrapper around the AWS S3 SDK for JSON records.

pub mod client;
pub mod error;
pub mod kv;
pub mod objects;
pub mod state;
