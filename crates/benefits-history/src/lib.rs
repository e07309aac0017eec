//! benefits-history
//!
//! Durable per-employee conversation transcripts. The store layer talks to
//! a backend; [`sync::HistorySync`] wraps it with the best-effort contract
//! the chat controller relies on.

pub mod error;
pub mod store;
pub mod sync;
