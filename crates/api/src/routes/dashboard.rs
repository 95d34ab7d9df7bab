use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Aggregate reads merged into `/admin`.
///
/// ```text
/// GET /dashboard  -> dashboard
/// GET /analytics  -> analytics
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/analytics", get(dashboard::analytics))
}
