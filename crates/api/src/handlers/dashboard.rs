//! Handlers for the staff dashboard and analytics page.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use crate::error::AppResult;
use crate::middleware::session::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/dashboard
///
/// Monthly figures, status buckets, and the ten most recent orders.
pub async fn dashboard(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let data = state.analytics.dashboard(Utc::now()).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/admin/analytics
pub async fn analytics(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let data = state.analytics.analytics(Utc::now()).await?;
    Ok(Json(DataResponse { data }))
}
