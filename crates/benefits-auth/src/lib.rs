//! benefits-auth
//!
//! Employee lookup and the client-side session store.

pub mod directory;
pub mod error;
pub mod session;
