// keep public for OpenAPI docs
pub mod credits;
pub mod download;
pub mod health;
pub mod identity;
pub mod payments;
pub mod upload;
