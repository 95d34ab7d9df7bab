use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use florist_core::error::CoreError;
use florist_db::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence,
/// and adds HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `florist_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A store error. Domain refusals made inside the store map like
    /// [`AppError::Core`]; backend faults become a sanitized 500.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            msg.clone(),
        ),
        CoreError::InvalidFields(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            core.to_string(),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let core = match &self {
            AppError::Core(core) | AppError::Store(StoreError::Rejected(core)) => Some(core),
            _ => None,
        };

        let (status, code, message) = match (&self, core) {
            (_, Some(core)) => classify_core(core),
            (AppError::Store(err), None) => {
                tracing::error!(error = %err, "Store error");
                internal()
            }
            (AppError::InternalError(msg), None) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
            (AppError::Core(_), None) => internal(),
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(CoreError::InvalidFields(fields)) = core {
            body["fields"] = json!(fields);
        }

        (status, axum::Json(body)).into_response()
    }
}
