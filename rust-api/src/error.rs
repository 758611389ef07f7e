use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

use crate::client::ClientError;
use crate::core::kelly::KellyInputError;
use crate::core::listing::ListError;
use crate::models::ErrorResponse;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Invalid request data
    ValidationError(String),
    /// Stats/odds backend failed or answered garbage
    UpstreamError(String),
    /// Internal server error
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::UpstreamError(msg) => write!(f, "Upstream error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            AppError::ValidationError(msg) => ("validation_error", msg.clone()),
            AppError::UpstreamError(msg) => ("upstream_error", msg.clone()),
            AppError::InternalError(msg) => ("internal_error", msg.clone()),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error_code.to_string(),
            message,
        })
    }
}

impl From<KellyInputError> for AppError {
    fn from(err: KellyInputError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<ListError> for AppError {
    fn from(err: ListError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::InvalidBaseUrl(_) => AppError::InternalError(err.to_string()),
            _ => AppError::UpstreamError(err.to_string()),
        }
    }
}

/// Validation functions
pub fn validate_bankroll(bankroll: f64) -> Result<(), AppError> {
    if !bankroll.is_finite() || bankroll < 0.0 {
        return Err(AppError::ValidationError(format!(
            "Bankroll must be non-negative, got {}",
            bankroll
        )));
    }
    Ok(())
}
