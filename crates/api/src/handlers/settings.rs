//! Handlers for StoreConfig settings.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use florist_core::error::CoreError;
use florist_core::settings::{is_secret, validate_key, validate_write};
use florist_core::types::Timestamp;
use florist_db::store::SettingsStore;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::session::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;

/// Placeholder shown instead of secret values.
const MASK: &str = "********";

/// A single setting as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingView {
    pub key: String,
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

/// Body of `PUT /admin/settings/{key}`.
#[derive(Debug, Deserialize)]
pub struct SettingWrite {
    pub value: String,
}

/// GET /api/v1/settings/{key}
///
/// Public read of a non-secret setting. An unset key has a `null` value.
pub async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<impl IntoResponse> {
    validate_key(&key)?;
    if is_secret(&key) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Setting '{key}' is not readable"
        ))));
    }

    let value = state.store.get_setting(&key).await?;
    Ok(Json(DataResponse {
        data: SettingView {
            key,
            value,
            updated_at: None,
        },
    }))
}

/// GET /api/v1/admin/settings
///
/// Every stored setting. Secret values are masked.
pub async fn list_settings(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let settings: Vec<SettingView> = state
        .store
        .list_settings()
        .await?
        .into_iter()
        .map(|s| SettingView {
            value: Some(if is_secret(&s.key) {
                MASK.to_string()
            } else {
                s.value
            }),
            key: s.key,
            updated_at: Some(s.updated_at),
        })
        .collect();
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/admin/settings/{key}
///
/// Create or overwrite a setting. Secret keys have their own endpoints.
pub async fn put_setting(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(input): Json<SettingWrite>,
) -> AppResult<impl IntoResponse> {
    let value = input.value.trim();
    validate_write(&key, value)?;
    let setting = state.store.put_setting(&key, value, Utc::now()).await?;

    tracing::info!(key = %setting.key, "Setting updated");
    Ok(Json(DataResponse {
        data: SettingView {
            key: setting.key,
            value: Some(setting.value),
            updated_at: Some(setting.updated_at),
        },
    }))
}
