//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use core_kernel::PortError;
use domain_claims::{ClaimError, GENERIC_FAILURE_MESSAGE};

use crate::auth::AuthError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized".to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone()),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::ClaimNotFound(_)
            | ClaimError::PhotoNotFound(_)
            | ClaimError::DamageNotFound { .. } => ApiError::NotFound(err.to_string()),
            ClaimError::InvalidStatusTransition { .. }
            | ClaimError::EditNotAllowed(_)
            | ClaimError::InvalidIntakeStep { .. } => ApiError::Conflict(err.to_string()),
            ClaimError::Validation(_)
            | ClaimError::InvalidAdjustment(_)
            | ClaimError::NoPhotos
            | ClaimError::Money(_) => ApiError::Validation(err.to_string()),
            ClaimError::ClaimNumberUnavailable(_) => ApiError::Conflict(
                "Could not assign a claim number. Please try again.".to_string(),
            ),
            ClaimError::Store(PortError::Conflict { .. }) => ApiError::Conflict(
                "The claim was changed by someone else. Reload it and try again.".to_string(),
            ),
            // Store internals and assessor faults never reach the agent
            ClaimError::Store(_) | ClaimError::AssessmentShapeMismatch { .. } => {
                ApiError::Internal(GENERIC_FAILURE_MESSAGE.to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingPermission(_) => ApiError::Forbidden(err.to_string()),
            AuthError::InvalidToken | AuthError::TokenExpired => ApiError::Unauthorized,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = err.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort_unstable();
        ApiError::Validation(format!("invalid fields: {}", fields.join(", ")))
    }
}
