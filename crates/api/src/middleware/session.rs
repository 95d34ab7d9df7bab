//! Admin session extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use chrono::Utc;
use florist_core::error::CoreError;

use crate::auth::session::{is_authorized, SESSION_COOKIE};
use crate::error::AppError;
use crate::state::AppState;

/// Proof that the caller holds a valid admin session.
///
/// The token is read from the `admin_session` cookie, falling back to an
/// `Authorization: Bearer` header for non-browser clients. Handlers that take
/// this extractor never run for public callers, so a rejected request leaves
/// the store untouched.
///
/// ```ignore
/// async fn my_handler(_admin: AdminSession) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts);
        if is_authorized(token.as_deref(), Utc::now(), &state.config.session) {
            Ok(AdminSession)
        } else {
            tracing::debug!(path = %parts.uri.path(), "Admin session rejected");
            Err(AppError::Core(CoreError::Unauthorized(
                "Admin session required".into(),
            )))
        }
    }
}

/// Session token from the cookie or the bearer header, cookie first.
fn session_token(parts: &Parts) -> Option<String> {
    let from_cookie = parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string());

    from_cookie.or_else(|| {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string)
    })
}
