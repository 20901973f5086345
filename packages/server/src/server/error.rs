//! Mapping from workflow errors to HTTP responses.
//!
//! Storage errors are logged with full detail here and surfaced to callers
//! as a generic message only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::domains::review::ApprovalError;

pub struct ApiError(ApprovalError);

impl From<ApprovalError> for ApiError {
    fn from(error: ApprovalError) -> Self {
        Self(error)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        Self(ApprovalError::Persistence(error))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            ApprovalError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
            ApprovalError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("{} not found", what) })),
            )
                .into_response(),
            ApprovalError::ValidationFailed { errors } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Validation failed", "errors": errors })),
            )
                .into_response(),
            ApprovalError::InvalidTransition { from, to } => (
                StatusCode::CONFLICT,
                Json(json!({ "error": format!("Invalid transition from {} to {}", from, to) })),
            )
                .into_response(),
            ApprovalError::Persistence(err) => {
                error!(error = ?err, "Storage operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
