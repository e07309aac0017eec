//! benefits-chat
//!
//! Conversation controller, analysis-service client and agent trace view.

pub mod controller;
pub mod error;
pub mod service;
pub mod trace;
