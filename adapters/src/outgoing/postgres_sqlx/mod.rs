pub mod artifact_store_postgres;
pub mod credit_store_postgres;
pub mod payment_session_store_postgres;
pub mod utils;
