use crate::infrastructure_config::Config;
use domain::credits::CreditConfig;

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub max_upload_bytes: usize,
}

impl UploadSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_upload_bytes: config.storage.max_upload_bytes,
        }
    }
}

#[must_use]
pub fn credit_config(config: &Config) -> CreditConfig {
    CreditConfig::new(config.credits.initial_credits)
}

