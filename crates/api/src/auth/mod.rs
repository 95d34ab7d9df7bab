//! Access Gate primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- admin session tokens and the `is_authorized` gate.

pub mod password;
pub mod session;
