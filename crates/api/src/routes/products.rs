//! Route definitions for the product catalog.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// Public catalog routes mounted at `/products`.
///
/// ```text
/// GET /      -> list_products
/// GET /{id}  -> get_product
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list_products))
        .route("/{id}", get(products::get_product))
}

/// Catalog writes mounted at `/admin/products`.
///
/// ```text
/// POST   /                 -> create_product
/// PUT    /{id}             -> update_product
/// DELETE /{id}             -> delete_product
/// POST   /{id}/duplicate   -> duplicate_product
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", post(products::create_product))
        .route(
            "/{id}",
            put(products::update_product).delete(products::delete_product),
        )
        .route("/{id}/duplicate", post(products::duplicate_product))
}
