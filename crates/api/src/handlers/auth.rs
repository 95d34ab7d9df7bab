//! Handlers for the `/auth` resource (login, logout, password change).
//!
//! There is a single admin identity. Its password is the Argon2id hash
//! stored under `ADMIN_PASSWORD_HASH` once one has been set, and the
//! `ADMIN_PASSWORD` environment value before that.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use chrono::Utc;
use florist_core::error::CoreError;
use florist_core::settings::ADMIN_PASSWORD_HASH;
use florist_db::store::SettingsStore;
use serde::{Deserialize, Serialize};

use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::auth::session::{clear_session_cookie, issue_token, session_cookie};
use crate::error::{AppError, AppResult};
use crate::middleware::session::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Successful login response. The token is also set as a cookie.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Session lifetime in seconds.
    pub expires_in: i64,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_password() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid password".into()))
}

/// Check `password` against the stored hash, or the bootstrap password.
///
/// The bootstrap password only applies when the store confirms no hash is
/// set. A failed read checks nothing and surfaces as a store error.
async fn check_admin_password(state: &AppState, password: &str) -> AppResult<()> {
    let stored_hash = state.store.get_setting(ADMIN_PASSWORD_HASH).await?;

    let valid = match (stored_hash, state.config.admin_password.as_deref()) {
        (Some(hash), _) => verify_password(password, &hash)
            .map_err(|e| AppError::InternalError(format!("Stored password hash is invalid: {e}")))?,
        (None, Some(bootstrap)) => password == bootstrap,
        (None, None) => {
            tracing::warn!("Admin login attempted but no admin password is configured");
            false
        }
    };

    if valid {
        Ok(())
    } else {
        Err(invalid_password())
    }
}

/// Mark the cookie `Secure` when every allowed origin is HTTPS.
fn secure_cookies(state: &AppState) -> bool {
    !state.config.cors_origins.is_empty()
        && state
            .config
            .cors_origins
            .iter()
            .all(|origin| origin.starts_with("https://"))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Exchange the admin password for a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    if let Err(e) = check_admin_password(&state, &input.password).await {
        tracing::info!("Admin login failed");
        return Err(e);
    }

    let session = &state.config.session;
    let token = issue_token(Utc::now(), session)
        .map_err(|e| AppError::InternalError(format!("Failed to issue session token: {e}")))?;
    let cookie = session_cookie(&token, session, secure_cookies(&state));

    tracing::info!("Admin logged in");
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(DataResponse {
            data: LoginResponse {
                token,
                expires_in: session.ttl_secs,
            },
        }),
    ))
}

/// POST /api/v1/auth/logout
///
/// Clear the session cookie. Tokens are stateless, so nothing is revoked.
pub async fn logout() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
    )
}

/// POST /api/v1/auth/change-password
///
/// Replace the admin password. The new hash is stored in settings and takes
/// precedence over `ADMIN_PASSWORD` from then on.
pub async fn change_password(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    check_admin_password(&state, &input.current_password).await?;

    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {e}")))?;
    state
        .store
        .put_setting(ADMIN_PASSWORD_HASH, &hash, Utc::now())
        .await?;

    tracing::info!("Admin password changed");
    Ok(StatusCode::NO_CONTENT)
}
