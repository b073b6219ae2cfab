pub mod enhancement_timeout_tokio;
