pub mod analysis;
pub mod chat;
pub mod employee;
mod lenient;
pub mod session;
pub mod trace;
pub mod transcript;
