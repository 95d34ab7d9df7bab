pub mod auth;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod products;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /orders                                  create (public)
/// /track/{id}                              tracking read (public)
///
/// /products                                list (public)
/// /products/{id}                           get (public)
///
/// /settings/{key}                          non-secret read (public)
///
/// /auth/login                              login (public)
/// /auth/logout                             logout (public)
/// /auth/change-password                    change password (admin)
///
/// /admin/dashboard                         dashboard aggregates
/// /admin/analytics                         analytics aggregates
///
/// /admin/orders                            list
/// /admin/orders/pending-count              orders needing attention
/// /admin/orders/{id}                       detail
/// /admin/orders/{id}/status                transition (PATCH)
/// /admin/orders/{id}/complete              complete with proof (POST)
///
/// /admin/products                          create
/// /admin/products/{id}                     update, delete
/// /admin/products/{id}/duplicate           duplicate (POST)
///
/// /admin/settings                          list (secrets masked)
/// /admin/settings/{key}                    write
/// ```
///
/// Every `/admin` handler and `/auth/change-password` takes the
/// [`AdminSession`](crate::middleware::session::AdminSession) extractor.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/orders", orders::router())
        .nest("/track", orders::track_router())
        .nest("/products", products::router())
        .nest("/settings", settings::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin_routes())
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .merge(dashboard::router())
        .nest("/orders", orders::admin_router())
        .nest("/products", products::admin_router())
        .nest("/settings", settings::admin_router())
}
