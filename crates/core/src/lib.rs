//! Florist order-intake domain logic.
//!
//! Pure, I/O-free building blocks shared by the persistence, notification,
//! and HTTP crates:
//!
//! - [`status`] -- the closed order status enum and its transition graph.
//! - [`order`] -- intake draft validation.
//! - [`intake`] -- the hybrid-persistence acknowledgment policy.
//! - [`analytics`] -- monthly revenue, best seller, and status bucket folds.
//! - [`catalog`] -- product input validation.
//! - [`settings`] -- the StoreConfig key space.

pub mod analytics;
pub mod catalog;
pub mod error;
pub mod intake;
pub mod order;
pub mod settings;
pub mod status;
pub mod types;
