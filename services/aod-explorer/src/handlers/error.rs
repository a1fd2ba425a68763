//! Mapping of data access errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use aeronet_common::{AeronetError, ErrorKind};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
    pub retryable: bool,
}

/// An [`AeronetError`] returned from a handler.
#[derive(Debug)]
pub struct ApiError(pub AeronetError);

impl From<AeronetError> for ApiError {
    fn from(e: AeronetError) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self.0.kind() {
            ErrorKind::Validation => tracing::debug!(error = %self.0, "Rejected request"),
            _ => tracing::error!(error = %self.0, status = status.as_u16(), "Request failed"),
        }

        let body = ErrorResponse {
            error: self.0.user_message(),
            kind: self.0.kind().as_str(),
            retryable: self.0.is_retryable(),
        };
        (status, Json(body)).into_response()
    }
}
