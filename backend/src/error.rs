//! Error handling for the Wholesale Business Management Platform
//!
//! Every service failure maps to one consistent JSON error response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error(
        "Insufficient stock for {product} ({package_type}): only {available} available, \
         requested {requested}"
    )]
    InsufficientStock {
        product: String,
        package_type: String,
        available: i32,
        requested: i32,
    },

    #[error("Referential integrity violation: {0}")]
    ReferentialIntegrity(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid username or password".to_string(),
                    field: None,
                },
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "TOKEN_EXPIRED".to_string(),
                    message: "Token has expired".to_string(),
                    field: None,
                },
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_TOKEN".to_string(),
                    message: "Invalid token".to_string(),
                    field: None,
                },
            ),
            AppError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                ErrorDetail {
                    code: "INSUFFICIENT_PERMISSIONS".to_string(),
                    message: "You do not have permission to perform this action".to_string(),
                    field: None,
                },
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message: format!("A record with this {} already exists", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::InsufficientStock { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INSUFFICIENT_STOCK".to_string(),
                    message: self.to_string(),
                    field: None,
                },
            ),
            AppError::ReferentialIntegrity(msg) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "REFERENTIAL_INTEGRITY".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message: "A database error occurred".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
