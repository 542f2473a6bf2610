use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tempo_core::error::CoreError;
use tempo_db::repositories::SurveyError;
use tempo_db::store::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`SurveyError`] and adds the request-level
/// `NotFound`/`BadRequest` cases. Internal failures arrive as
/// [`CoreError::Internal`] or a store error.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tempo_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A repository error from `tempo_db`.
    #[error(transparent)]
    Survey(#[from] SurveyError),

    /// A resource addressed by something other than a database id is missing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            AppError::Survey(SurveyError::Core(core)) => classify_core_error(core),
            AppError::Survey(SurveyError::Store { operation, source }) => {
                classify_store_error(*operation, source)
            }

            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Store failures never leak details to the client; they are logged with
/// the cascade step that failed.
fn classify_store_error(
    operation: &'static str,
    err: &StoreError,
) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Database(db_err) => classify_sqlx_error(operation, db_err),
        other => {
            tracing::error!(operation, error = %other, "Store error");
            internal()
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Foreign key violations (a parent removed mid-cascade) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(
    operation: &'static str,
    err: &sqlx::Error,
) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503") => {
            tracing::warn!(operation, error = %db_err, "Foreign key violation");
            (
                StatusCode::CONFLICT,
                "CONFLICT",
                "The survey was modified concurrently; reload and try again".to_string(),
            )
        }
        other => {
            tracing::error!(operation, error = %other, "Database error");
            internal()
        }
    }
}
