//! Request extractors enforcing the Access Gate.
//!
//! - [`session::AdminSession`] -- requires a valid admin session token.

pub mod session;
