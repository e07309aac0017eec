//! benefits-widget
//!
//! Configuration, logging setup and assembly of the chat client. Library
//! only; the `chat_smoke` example drives it end to end.

pub mod config;
pub mod telemetry;
pub mod widget;
