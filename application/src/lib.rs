#[cfg(any(
    feature = "adapters",
    feature = "axum",
    feature = "sqlx",
    feature = "reqwest",
    feature = "image"
))]
compile_error!("application must not depend on adapters/framework crates");

pub mod config;
pub mod credits;
pub mod error;
pub mod identity;
pub mod infrastructure_config;
pub mod payments;
pub mod ports;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;
