//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use budgein_core::budget::BudgetError;
use budgein_shared::AppError;
use budgein_store::StoreError;
use serde::Serialize;
use tracing::error;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable error code, e.g. `NOT_FOUND`.
    pub error: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Handler error that renders as `{ "error": CODE, "message": ... }`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Shorthand for a 400 response.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// Shorthand for a 401 response.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }

    /// Shorthand for a 500 response.
    pub fn internal(message: impl Into<String>) -> Self {
        Self(AppError::Internal(message.into()))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err.into())
    }
}

impl From<BudgetError> for ApiError {
    fn from(err: BudgetError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.0.is_internal() {
            error!(error = %self.0, "Request failed");
            "An internal error occurred".to_string()
        } else {
            message_of(&self.0)
        };

        (
            status,
            Json(ErrorBody {
                error: self.0.error_code(),
                message,
            }),
        )
            .into_response()
    }
}

fn message_of(err: &AppError) -> String {
    match err {
        AppError::Unauthorized(m)
        | AppError::NotFound(m)
        | AppError::Validation(m)
        | AppError::BusinessRule(m)
        | AppError::Conflict(m)
        | AppError::Storage(m)
        | AppError::Internal(m) => m.clone(),
    }
}
