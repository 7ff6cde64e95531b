use axum::{
    extract::rejection::{BytesRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Error codes for categorizing errors, sent in the `X-Error-Code` header
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation errors (3xxx)
    #[serde(rename = "VAL_3001")]
    InvalidInput,
    #[serde(rename = "VAL_3003")]
    InvalidFormat,
    #[serde(rename = "VAL_3009")]
    PayloadTooLarge,

    // Resource errors (4xxx)
    #[serde(rename = "RES_4001")]
    NotFound,

    // Storage errors (7xxx)
    #[serde(rename = "DB_7002")]
    QueryFailed,

    // Internal errors (9xxx)
    #[serde(rename = "INT_9999")]
    InternalServerError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "VAL_3001",
            ErrorCode::InvalidFormat => "VAL_3003",
            ErrorCode::PayloadTooLarge => "VAL_3009",
            ErrorCode::NotFound => "RES_4001",
            ErrorCode::QueryFailed => "DB_7002",
            ErrorCode::InternalServerError => "INT_9999",
        }
    }
}

/// Error body. Not-found responses carry only `message`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload exceeds the configured body limit")]
    PayloadTooLarge,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Helper: Resource not found
    pub fn not_found(resource: &str) -> Self {
        ApiError::NotFound(format!("{} not found", resource))
    }

    /// Create validation error for specific field
    pub fn validation_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            ApiError::NotFound(_) => ErrorCode::NotFound,
            ApiError::Validation { .. } => ErrorCode::InvalidInput,
            ApiError::BadRequest(_) => ErrorCode::InvalidFormat,
            ApiError::PayloadTooLarge => ErrorCode::PayloadTooLarge,
            ApiError::Store(_) => ErrorCode::QueryFailed,
            ApiError::Internal(_) => ErrorCode::InternalServerError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation { .. } | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the caller. Server-side causes stay in the logs.
    fn public_message(&self) -> String {
        match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::PayloadTooLarge => "Request body is too large".to_string(),
            ApiError::Store(_) | ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }

    fn log_error(&self) {
        match self.status_code() {
            status if status.is_server_error() => {
                error!(
                    error_code = self.error_code().as_str(),
                    error = %self,
                    "Server error occurred"
                );
            }
            status if status.is_client_error() => {
                warn!(
                    error_code = self.error_code().as_str(),
                    error = %self,
                    "Client error occurred"
                );
            }
            _ => {}
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_error();

        let body = ErrorResponse {
            message: self.public_message(),
            field: match &self {
                ApiError::Validation { field, .. } => Some(field.clone()),
                _ => None,
            },
        };

        let mut response = (self.status_code(), Json(body)).into_response();
        response.headers_mut().insert(
            "X-Error-Code",
            HeaderValue::from_static(self.error_code().as_str()),
        );
        response
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                ApiError::validation_field(field.to_string(), message)
            }
            None => ApiError::BadRequest("Invalid input provided".to_string()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}
