//! Route definitions for StoreConfig settings.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Public reads mounted at `/settings`.
///
/// ```text
/// GET /{key}  -> get_setting
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{key}", get(settings::get_setting))
}

/// Admin routes mounted at `/admin/settings`.
///
/// ```text
/// GET /        -> list_settings
/// PUT /{key}   -> put_setting
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(settings::list_settings))
        .route("/{key}", put(settings::put_setting))
}
