//! Handlers for orders: public intake and tracking, staff listing and
//! fulfillment.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use florist_core::error::CoreError;
use florist_core::order::OrderDraft;
use florist_core::status::OrderStatus;
use florist_core::types::EntityId;
use florist_db::models::order::OrderDetail;
use florist_db::store::OrderStore;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::labels::status_label;
use crate::middleware::session::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of a successful `POST /orders`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub order_id: EntityId,
    pub redirect_url: String,
}

/// An order with its display label.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub detail: OrderDetail,
    pub status_label: &'static str,
}

impl From<OrderDetail> for OrderView {
    fn from(detail: OrderDetail) -> Self {
        let status_label = status_label(detail.order.status);
        Self {
            detail,
            status_label,
        }
    }
}

/// Query parameters for `GET /admin/orders`.
#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    pub limit: Option<i64>,
}

/// Body of `PATCH /admin/orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Body of `POST /admin/orders/{id}/complete`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    pub proof_photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PendingCount {
    pub count: usize,
}

/// Malformed JSON on the customer form is a validation failure, not a 400.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::Core(CoreError::Validation(rejection.body_text())))
}

// ---------------------------------------------------------------------------
// Public endpoints
// ---------------------------------------------------------------------------

/// POST /api/v1/orders
///
/// Accept an order from the customer form. Responds 201 with the order id and
/// the WhatsApp redirect even when the store is unavailable.
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<OrderDraft>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let draft = json_body(payload)?;
    let intake = state.engine.create(draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedOrder {
                order_id: intake.ack.order_id,
                redirect_url: intake.redirect_url,
            },
        }),
    ))
}

/// GET /api/v1/track/{id}
pub async fn track_order(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    let detail = state.engine.track(id).await?;
    Ok(Json(DataResponse {
        data: OrderView::from(detail),
    }))
}

// ---------------------------------------------------------------------------
// Admin endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/orders
pub async fn list_orders(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(params): Query<ListOrdersParams>,
) -> AppResult<impl IntoResponse> {
    let orders = state.store.list_orders(params.limit).await?;
    Ok(Json(DataResponse { data: orders }))
}

/// GET /api/v1/admin/orders/{id}
pub async fn get_order(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    let detail = state.engine.track(id).await?;
    Ok(Json(DataResponse {
        data: OrderView::from(detail),
    }))
}

/// GET /api/v1/admin/orders/pending-count
pub async fn pending_count(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let count = state.analytics.pending_count().await?;
    Ok(Json(DataResponse {
        data: PendingCount { count },
    }))
}

/// PATCH /api/v1/admin/orders/{id}/status
///
/// Move an order along the status graph. Leaving a terminal status is a 409.
pub async fn update_status(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let update = json_body(payload)?;
    let detail = state.engine.transition(id, update.status).await?;
    Ok(Json(DataResponse {
        data: OrderView::from(detail),
    }))
}

/// POST /api/v1/admin/orders/{id}/complete
///
/// Record delivery proof and mark the order `COMPLETED` in one step.
pub async fn complete_order(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    payload: Result<Json<CompleteRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let request = json_body(payload)?;
    let proof = request
        .proof_photo_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    let (detail, _dispatch) = state.engine.complete(id, proof).await?;
    Ok(Json(DataResponse {
        data: OrderView::from(detail),
    }))
}
