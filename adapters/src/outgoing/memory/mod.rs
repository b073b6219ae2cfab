//! Process-local stores for development and tests. Nothing here survives a
//! restart.

pub mod artifact_store_memory;
pub mod credit_store_memory;
pub mod image_store_memory;
pub mod payment_session_store_memory;
