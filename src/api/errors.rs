use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::SchemaError;
use crate::services::GenerationError;

/// Request-level failure taxonomy. Every failure is terminal for its
/// request; retrying is always a manual re-submission by the user.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("User profile not found")]
    ProfileMissing,
    #[error("Active roadmap not found")]
    NoActivePlan,
    #[error("Invalid plan: {0}")]
    InvalidPlan(#[from] SchemaError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::ProfileMissing => (StatusCode::NOT_FOUND, "User profile not found"),
            ApiError::NoActivePlan => (StatusCode::NOT_FOUND, "Active roadmap not found"),
            ApiError::InvalidPlan(_) => (StatusCode::BAD_REQUEST, "Invalid plan"),
            // Model output problems surface as one generic message; nothing
            // partial was persisted
            ApiError::Generation(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate roadmap",
            ),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
