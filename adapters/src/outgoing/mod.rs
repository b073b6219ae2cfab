pub mod image_rs;
pub mod jwt_identity;
pub mod local_fs;
pub mod memory;
pub mod postgres_sqlx;
pub mod replicate_reqwest;
pub mod stripe_reqwest;
pub mod tokio_spawn;
