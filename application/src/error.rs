use std::io;
use thiserror::Error;

use domain::error::DomainError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("User not found")]
    UserNotFound,

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Upload quota exceeded, retry in {retry_after_secs}s")]
    QuotaExceeded { retry_after_secs: u64 },

    #[error("Insufficient credits: {message}")]
    InsufficientCredits { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Image processing failed: {message}")]
    ProcessingError { message: String },

    #[error("Payment gateway error: {message}")]
    GatewayError { message: String },

    #[error("Invalid webhook signature: {message}")]
    SignatureInvalid { message: String },

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Task error: {message}")]
    TaskError { message: String },

    #[error("Internal server error")]
    InternalServerError,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
