//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use blogdesk_core::error::{AppError, ErrorKind};

use crate::dto::response::ApiResponse;

/// Body shown to clients in place of internal error messages.
pub const INTERNAL_MESSAGE: &str = "Something went wrong";

/// HTTP-facing wrapper around [`AppError`].
///
/// Handlers return `ApiResult<T>`; `?` on any `AppResult` converts here.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result alias for handlers and extractors.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Status code and machine-readable code for an error kind.
pub fn status_and_code(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::Validation => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
        ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        ErrorKind::Authorization => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
        ErrorKind::BadRequest => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Storage
        | ErrorKind::Configuration
        | ErrorKind::Serialization => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, code) = status_and_code(err.kind);

        let body = if err.kind.is_internal() {
            error!(kind = %err.kind, error = %err.message, source = ?err.source, "Internal server error");
            ApiResponse::<()>::failure(code, INTERNAL_MESSAGE, None)
        } else {
            ApiResponse::<()>::failure(code, err.message, err.details)
        };

        (status, Json(body)).into_response()
    }
}
