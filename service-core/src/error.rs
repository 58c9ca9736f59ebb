use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Response body shared by every failure. Mirrors the success envelope
/// (`message` plus payload) so callers can branch on status code alone.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub error: bool,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(anyhow::Error),

    #[error("Forbidden: {0}")]
    Forbidden(anyhow::Error),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Upstream service error: {0}")]
    UpstreamError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// The one externally visible authentication failure. Missing header,
    /// unknown token and dangling owner must be indistinguishable to callers.
    pub fn invalid_token() -> Self {
        AppError::Unauthorized(anyhow::anyhow!("invalid authentication token"))
    }

    /// Authorization failure for a valid token lacking the superuser flag.
    pub fn superuser_required() -> Self {
        AppError::Forbidden(anyhow::anyhow!("superuser privileges required"))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            AppError::DatabaseError(_) | AppError::ConfigError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(anyhow::Error::new(err))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Storage and internal causes are logged here and never echoed to the
        // caller; everything the caller sees is the taxonomy-level message.
        let message = match &self {
            AppError::ValidationError(err) => format!("validation error: {}", err),
            AppError::BadRequest(err) => err.to_string(),
            AppError::NotFound(err) => err.to_string(),
            AppError::Unauthorized(err) => err.to_string(),
            AppError::Forbidden(err) => err.to_string(),
            AppError::UpstreamError(err) => {
                tracing::error!(error = %err, "upstream service failure");
                "upstream service unavailable".to_string()
            }
            AppError::DatabaseError(err) => {
                tracing::error!(error = %err, "database failure");
                "internal server error".to_string()
            }
            AppError::ConfigError(err) | AppError::InternalError(err) => {
                tracing::error!(error = %err, "internal failure");
                "internal server error".to_string()
            }
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}
