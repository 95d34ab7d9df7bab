//! Handlers for the product catalog.
//!
//! Reads are public; every write requires an admin session.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use florist_core::catalog::{duplicate_name, validate_product, ProductInput};
use florist_core::error::CoreError;
use florist_core::types::EntityId;
use florist_db::store::ProductStore;

use crate::error::{AppError, AppResult};
use crate::middleware::session::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;

fn product_not_found(id: EntityId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Product",
        id,
    })
}

// ---------------------------------------------------------------------------
// Public endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/products
///
/// All products, newest first.
pub async fn list_products(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let products = state.store.list_products().await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    let product = state
        .store
        .find_product(id)
        .await?
        .ok_or_else(|| product_not_found(id))?;
    Ok(Json(DataResponse { data: product }))
}

// ---------------------------------------------------------------------------
// Admin endpoints
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/products
pub async fn create_product(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> AppResult<impl IntoResponse> {
    let input = validate_product(input)?;
    let product = state.store.create_product(&input, Utc::now()).await?;

    tracing::info!(product_id = %product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// PUT /api/v1/admin/products/{id}
pub async fn update_product(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(input): Json<ProductInput>,
) -> AppResult<impl IntoResponse> {
    let input = validate_product(input)?;
    let product = state.store.update_product(id, &input, Utc::now()).await?;

    tracing::info!(product_id = %id, "Product updated");
    Ok(Json(DataResponse { data: product }))
}

/// DELETE /api/v1/admin/products/{id}
///
/// 409 while any order item still references the product.
pub async fn delete_product(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    state.store.delete_product(id).await?;

    tracing::info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/products/{id}/duplicate
///
/// Copy a product under the name `"<name> (Salinan)"`.
pub async fn duplicate_product(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    let original = state
        .store
        .find_product(id)
        .await?
        .ok_or_else(|| product_not_found(id))?;

    let mut input = original.to_input();
    input.name = duplicate_name(&original.name);
    let copy = state.store.create_product(&input, Utc::now()).await?;

    tracing::info!(product_id = %id, copy_id = %copy.id, "Product duplicated");
    Ok((StatusCode::CREATED, Json(DataResponse { data: copy })))
}
