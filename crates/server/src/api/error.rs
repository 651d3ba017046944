//! Mapping of classified failures to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fastmusic_core::ServiceError;
use serde::{Deserialize, Serialize};

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable category code, e.g. `blocked_by_platform`.
    pub error: String,
    pub detail: String,
    /// Whether repeating the same request later may succeed.
    pub retryable: bool,
}

/// A [`ServiceError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.category.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error: self.0.category.code().to_string(),
            detail: self.0.message(),
            retryable: self.0.category.is_retryable(),
        };
        (status, Json(body)).into_response()
    }
}
