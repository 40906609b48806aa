//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, OrderError};
use order_store::StoreError;
use thiserror::Error;
use user_directory::UserLookupError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A request field could not be parsed.
    #[error("{0}")]
    InvalidArgument(String),

    /// The order (or user) does not exist.
    #[error("{0}")]
    NotFound(String),

    /// An order with the same id already exists.
    #[error("{0}")]
    AlreadyExists(String),

    /// The status change is not allowed from the current status.
    #[error("{0}")]
    InvalidTransition(String),

    /// Well-formed input that violates a business rule.
    #[error("{0}")]
    Validation(String),

    /// Storage failed. The message names only the operation.
    #[error("{0}")]
    OperationFailed(String),

    /// The user service could not answer.
    #[error("{0}")]
    CollaboratorUnavailable(String),
}

impl ApiError {
    pub fn invalid_argument(field: &str, reason: impl std::fmt::Display) -> Self {
        ApiError::InvalidArgument(format!("invalid {field}: {reason}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AlreadyExists(_) | ApiError::InvalidTransition(_) => StatusCode::CONFLICT,
            ApiError::OperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::CollaboratorUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidArgument(_) => "invalid_argument",
            ApiError::NotFound(_) => "not_found",
            ApiError::AlreadyExists(_) => "already_exists",
            ApiError::InvalidTransition(_) => "invalid_transition",
            ApiError::Validation(_) => "validation",
            ApiError::OperationFailed(_) => "operation_failed",
            ApiError::CollaboratorUnavailable(_) => "collaborator_unavailable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "error": self.to_string(), "code": self.code() });
        (status, axum::Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidArgument(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Store(err) => err.into(),
            DomainError::Order(err @ OrderError::InvalidTransition { .. }) => {
                ApiError::InvalidTransition(err.to_string())
            }
            DomainError::Order(err) => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound(err.to_string()),
            StoreError::AlreadyExists(_) => ApiError::AlreadyExists(err.to_string()),
            StoreError::UnexpectedStatus { .. } => ApiError::InvalidTransition(err.to_string()),
            StoreError::OperationFailed { ref source, .. } => {
                tracing::error!(error = %err, cause = %source, "order storage failed");
                ApiError::OperationFailed(err.to_string())
            }
        }
    }
}

impl From<UserLookupError> for ApiError {
    fn from(err: UserLookupError) -> Self {
        match err {
            UserLookupError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserLookupError::Unavailable(_) | UserLookupError::InvalidResponse(_) => {
                tracing::error!(error = %err, "user service lookup failed");
                ApiError::CollaboratorUnavailable("user service unavailable".to_string())
            }
        }
    }
}
