//! Route definitions for orders.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// Public intake mounted at `/orders`.
///
/// ```text
/// POST /  -> create_order
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(orders::create_order))
}

/// Public tracking mounted at `/track`.
///
/// ```text
/// GET /{id}  -> track_order
/// ```
pub fn track_router() -> Router<AppState> {
    Router::new().route("/{id}", get(orders::track_order))
}

/// Staff order routes mounted at `/admin/orders`.
///
/// ```text
/// GET   /                -> list_orders
/// GET   /pending-count   -> pending_count
/// GET   /{id}            -> get_order
/// PATCH /{id}/status     -> update_status
/// POST  /{id}/complete   -> complete_order
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_orders))
        .route("/pending-count", get(orders::pending_count))
        .route("/{id}", get(orders::get_order))
        .route("/{id}/status", patch(orders::update_status))
        .route("/{id}/complete", post(orders::complete_order))
}
