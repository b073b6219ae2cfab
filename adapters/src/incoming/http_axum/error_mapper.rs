use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error};

use photo_revive_application::error::AppError;

pub struct HttpError(pub AppError);

impl HttpError {
    /// Status, stable machine-readable reason and the message shown to clients.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        let app_error = &self.0;

        match app_error {
            AppError::Domain(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_input",
                app_error.to_string(),
            ),

            AppError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "bad_request", message.clone())
            }

            AppError::SignatureInvalid { .. } => (
                StatusCode::BAD_REQUEST,
                "invalid_signature",
                "Invalid signature".to_string(),
            ),

            AppError::JsonError(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_json",
                "Invalid JSON format".to_string(),
            ),

            AppError::ValidationError { message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                message.clone(),
            ),

            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized".to_string(),
            ),

            AppError::InsufficientCredits { .. } => (
                StatusCode::FORBIDDEN,
                "insufficient_credits",
                "Insufficient credits".to_string(),
            ),

            AppError::QuotaExceeded { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "upload_quota_exceeded",
                "Upload quota exceeded".to_string(),
            ),

            AppError::UserNotFound => (
                StatusCode::NOT_FOUND,
                "user_not_found",
                "User not found".to_string(),
            ),

            AppError::NotFound { message } => (StatusCode::NOT_FOUND, "not_found", message.clone()),

            AppError::StorageError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Storage error".to_string(),
            ),

            AppError::ProcessingError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "processing_failed",
                "Image processing failed".to_string(),
            ),

            AppError::GatewayError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "payment_gateway_error",
                "Payment gateway error".to_string(),
            ),

            AppError::DatabaseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "Database error".to_string(),
            ),

            AppError::ConfigError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "config_error",
                "Configuration error".to_string(),
            ),

            AppError::IoError(_) | AppError::TaskError { .. } | AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status_code, reason, message) = self.parts();

        if status_code.is_client_error() {
            debug!(reason, "Client error response generated: {}", self.0);
        } else {
            error!(reason, "Server error response generated: {}", self.0);
        }

        let error_response = json!({
            "ok": false,
            "error": message,
            "reason": reason,
            "status": status_code.as_u16()
        });

        (status_code, Json(error_response)).into_response()
    }
}

impl From<AppError> for HttpError {
    fn from(app_error: AppError) -> Self {
        HttpError(app_error)
    }
}
