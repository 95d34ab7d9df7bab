//! Florist order service library.
//!
//! Exposes the building blocks (config, state, error handling, engine,
//! routes) so integration tests and the binary entrypoint can both use them.

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod intake_link;
pub mod labels;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
