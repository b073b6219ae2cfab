pub mod artifact;
pub mod auth;
pub mod credits;
pub mod error;
pub mod image;
pub mod payment;
