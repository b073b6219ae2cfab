use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use domain::credits::DEFAULT_INITIAL_CREDITS;

/// GFPGAN v1.4 on Replicate, the model the product was launched with.
pub const DEFAULT_ENHANCEMENT_MODEL_VERSION: &str =
    "0fbacf7afc6c144e5be9767cff80f25aff23e52b0708f17e20f9879b2f21516c";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub db: DbConfig,
    pub ledger: LedgerConfig,
    pub storage: StorageConfig,
    pub enhancement: EnhancementConfig,
    pub payments: PaymentsConfig,
    pub identity: IdentityConfig,
    pub credits: CreditConfig,
    pub upload_quota: UploadQuotaConfig,
    pub logging: LoggingConfig,
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
    pub public_base_url: String,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: SecretString,
    pub pool_size: u32,
    pub query_timeout_secs: u64,
}

impl Serialize for DbConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("DbConfig", 3)?;
        state.serialize_field("database_url", &redact(&self.database_url))?;
        state.serialize_field("pool_size", &self.pool_size)?;
        state.serialize_field("query_timeout_secs", &self.query_timeout_secs)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for DbConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct DbConfigHelper {
            database_url: String,
            pool_size: u32,
            query_timeout_secs: u64,
        }

        let helper = DbConfigHelper::deserialize(deserializer)?;
        Ok(DbConfig {
            database_url: SecretString::from(helper.database_url),
            pool_size: helper.pool_size,
            query_timeout_secs: helper.query_timeout_secs,
        })
    }
}

impl DbConfig {
    #[must_use]
    pub fn redacted_url(&self) -> String {
        let url_str = self.database_url.expose_secret();
        match url::Url::parse(url_str) {
            Ok(mut url) => {
                if url.password().is_some() {
                    url.set_password(Some("***")).ok();
                }
                url.to_string()
            }
            Err(_) => "[INVALID_URL]".to_string(),
        }
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        self.database_url.expose_secret()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LedgerBackend {
    #[serde(rename = "postgres")]
    Postgres,
    #[serde(rename = "memory")]
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub backend: LedgerBackend,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StorageBackend {
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "memory")]
    Memory,
}

impl StorageBackend {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub uploads_dir: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EnhancementBackend {
    #[serde(rename = "replicate")]
    Replicate,
    #[serde(rename = "local")]
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancementConfig {
    pub backend: EnhancementBackend,
    pub api_base_url: String,
    #[serde(with = "secret_string")]
    pub api_token: SecretString,
    pub model_version: String,
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub local_upscale_factor: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsConfig {
    pub api_base_url: String,
    #[serde(with = "secret_string")]
    pub secret_key: SecretString,
    #[serde(with = "secret_string")]
    pub webhook_secret: SecretString,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
    pub signature_tolerance_secs: i64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub jwt_public_key_pem: String,
    pub audience: Option<String>,
    pub issuer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditConfig {
    pub initial_credits: i64,
}

/// Caps how many uploads one caller may start inside a rolling window, so a
/// single account cannot monopolise the enhancement backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadQuotaConfig {
    pub enabled: bool,
    pub max_uploads: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_location: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "pretty")]
    Pretty,
}

fn redact(secret: &SecretString) -> &'static str {
    if secret.expose_secret().is_empty() {
        ""
    } else {
        "[REDACTED]"
    }
}

mod secret_string {
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(super::redact(secret))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString::from)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                cors_origin: None,
                public_base_url: "http://localhost:5000".to_string(),
            },
            db: DbConfig {
                database_url: SecretString::from(String::new()),
                pool_size: 10,
                query_timeout_secs: 5,
            },
            ledger: LedgerConfig {
                backend: LedgerBackend::Postgres,
            },
            storage: StorageConfig {
                backend: StorageBackend::Local,
                uploads_dir: "static/uploads".to_string(),
                max_upload_bytes: 10 * 1024 * 1024,
            },
            enhancement: EnhancementConfig {
                backend: EnhancementBackend::Replicate,
                api_base_url: "https://api.replicate.com".to_string(),
                api_token: SecretString::from(String::new()),
                model_version: DEFAULT_ENHANCEMENT_MODEL_VERSION.to_string(),
                timeout_secs: 60,
                poll_interval_ms: 1000,
                local_upscale_factor: 2,
            },
            payments: PaymentsConfig {
                api_base_url: "https://api.stripe.com".to_string(),
                secret_key: SecretString::from(String::new()),
                webhook_secret: SecretString::from(String::new()),
                currency: "usd".to_string(),
                success_url: "http://localhost:3000/success".to_string(),
                cancel_url: "http://localhost:3000/cancel".to_string(),
                signature_tolerance_secs: 300,
                request_timeout_secs: 15,
            },
            identity: IdentityConfig {
                jwt_public_key_pem: String::new(),
                audience: None,
                issuer: None,
            },
            credits: CreditConfig {
                initial_credits: DEFAULT_INITIAL_CREDITS,
            },
            upload_quota: UploadQuotaConfig {
                enabled: true,
                max_uploads: 30,
                window_secs: 3600,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
                include_location: false,
            },
            environment: EnvironmentConfig {
                env: "development".to_string(),
            },
        }
    }
}

impl Config {
    #[allow(clippy::too_many_lines)]
    pub fn validate(&self) -> AppResult<()> {
        if url::Url::parse(&self.server.public_base_url).is_err() {
            return Err(AppError::ConfigError {
                message: "server.public_base_url must be an absolute URL".to_string(),
            });
        }

        if self.ledger.backend == LedgerBackend::Postgres {
            if self.db.database_url.expose_secret().is_empty() {
                return Err(AppError::ConfigError {
                    message: "database_url cannot be empty when the ledger backend is postgres"
                        .to_string(),
                });
            }

            if self.db.pool_size == 0 {
                return Err(AppError::ConfigError {
                    message: "db pool_size must be greater than 0".to_string(),
                });
            }

            if self.db.query_timeout_secs == 0 {
                return Err(AppError::ConfigError {
                    message: "db query_timeout_secs must be greater than 0".to_string(),
                });
            }
        }

        if self.storage.backend == StorageBackend::Local
            && self.storage.uploads_dir.trim().is_empty()
        {
            return Err(AppError::ConfigError {
                message: "storage uploads_dir cannot be empty".to_string(),
            });
        }

        if self.storage.max_upload_bytes == 0 {
            return Err(AppError::ConfigError {
                message: "storage max_upload_bytes must be greater than 0".to_string(),
            });
        }

        if !(1..=600).contains(&self.enhancement.timeout_secs) {
            return Err(AppError::ConfigError {
                message: "enhancement timeout_secs must be between 1 and 600".to_string(),
            });
        }

        match self.enhancement.backend {
            EnhancementBackend::Replicate => {
                if self.enhancement.api_token.expose_secret().is_empty() {
                    return Err(AppError::ConfigError {
                        message: "enhancement api_token is required for the replicate backend"
                            .to_string(),
                    });
                }

                if self.enhancement.model_version.trim().is_empty() {
                    return Err(AppError::ConfigError {
                        message: "enhancement model_version cannot be empty".to_string(),
                    });
                }

                if self.enhancement.poll_interval_ms == 0 {
                    return Err(AppError::ConfigError {
                        message: "enhancement poll_interval_ms must be greater than 0".to_string(),
                    });
                }
            }
            EnhancementBackend::Local => {
                if !(1..=4).contains(&self.enhancement.local_upscale_factor) {
                    return Err(AppError::ConfigError {
                        message: "enhancement local_upscale_factor must be between 1 and 4"
                            .to_string(),
                    });
                }
            }
        }

        if self.payments.secret_key.expose_secret().is_empty() {
            return Err(AppError::ConfigError {
                message: "payments secret_key cannot be empty".to_string(),
            });
        }

        if self.payments.webhook_secret.expose_secret().is_empty() {
            return Err(AppError::ConfigError {
                message: "payments webhook_secret cannot be empty".to_string(),
            });
        }

        if self.payments.signature_tolerance_secs <= 0 {
            return Err(AppError::ConfigError {
                message: "payments signature_tolerance_secs must be greater than 0".to_string(),
            });
        }

        if self.payments.request_timeout_secs == 0 {
            return Err(AppError::ConfigError {
                message: "payments request_timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.identity.jwt_public_key_pem.trim().is_empty() {
            return Err(AppError::ConfigError {
                message: "identity jwt_public_key_pem cannot be empty".to_string(),
            });
        }

        if self.credits.initial_credits < 0 {
            return Err(AppError::ConfigError {
                message: "initial_credits must be greater than or equal to 0".to_string(),
            });
        }

        if self.upload_quota.enabled
            && (self.upload_quota.max_uploads == 0 || self.upload_quota.window_secs == 0)
        {
            return Err(AppError::ConfigError {
                message: "upload_quota values must be greater than 0 when enabled".to_string(),
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Externally fetchable URL for a stored image locator.
    #[must_use]
    pub fn download_url(&self, locator: &str) -> String {
        format!(
            "{}/download/{}",
            self.server.public_base_url.trim_end_matches('/'),
            locator
        )
    }
}
