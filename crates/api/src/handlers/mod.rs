//! HTTP handlers, one module per resource.

pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod settings;
