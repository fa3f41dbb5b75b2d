//! API error type and its JSON rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::ledger::TotalOverflow;

/// Every way a request can fail, rendered as `{"Error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("JWT token not provided")]
    MissingToken,

    #[error("Error verifying token: {0}")]
    InvalidToken(#[from] AuthError),

    #[error("Token ID does not match UserID")]
    UserMismatch,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Overflow(#[from] TotalOverflow),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Request timed out")]
    Timeout,

    #[error("Internal server error")]
    Internal(String),

    /// Registration keeps its historical 403 for storage failures.
    #[error("Error with database")]
    Registration(#[source] sqlx::Error),

    #[error("Error with database")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingToken | ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::UserMismatch
            | ApiError::BadRequest(_)
            | ApiError::NotFound(_)
            | ApiError::Overflow(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Registration(_) => StatusCode::FORBIDDEN,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Registration(e) | ApiError::Database(e) => {
                tracing::error!(error = %e, "Database operation failed");
            }
            ApiError::Internal(detail) => tracing::error!(error = %detail, "Request failed"),
            ApiError::Timeout => tracing::warn!("Request timed out"),
            other => tracing::debug!(error = %other, "Request rejected"),
        }

        (self.status(), Json(json!({ "Error": self.to_string() }))).into_response()
    }
}
