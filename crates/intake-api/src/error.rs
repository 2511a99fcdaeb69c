use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use intake_db::StorageError;
use intake_types::FieldErrors;
use intake_types::api::ErrorResponse;

/// Application-level error type for HTTP handlers.
///
/// Every variant renders as a JSON [`ErrorResponse`]. Storage and internal
/// failures are logged and reported with a generic message only.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// User-correctable problems with the submitted fields.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub(crate) fn join(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("spawn_blocking join error: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match self {
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Validation failed".to_string(),
                Some(fields),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
                None,
            ),
            ApiError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} not found"),
                None,
            ),
            ApiError::Storage(err) => {
                tracing::error!(error = %err, "Storage error");
                internal()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            fields,
        };

        (status, Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String, Option<FieldErrors>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}
