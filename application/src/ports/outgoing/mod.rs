pub mod artifact_store;
pub mod credit_store;
pub mod enhancement;
pub mod identity_verifier;
pub mod image_codec;
pub mod image_store;
pub mod payment_gateway;
pub mod payment_session_store;
