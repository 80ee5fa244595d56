//! HTTP error mapping. Every handler returns `Result<_, AppError>`; the
//! domain error carries its own status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use civix_core::error::CivicError;

pub struct AppError(pub CivicError);

impl From<CivicError> for AppError {
    fn from(err: CivicError) -> Self {
        Self(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(CivicError::Internal(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, "request rejected");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
