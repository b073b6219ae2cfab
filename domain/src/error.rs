use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    #[error("Invalid image locator: {0}")]
    InvalidLocator(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("Invalid checkout request: {0}")]
    InvalidCheckout(String),

    #[error("Invalid payment status: {0}")]
    InvalidPaymentStatus(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
