use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use photo_revive_application::error::{AppError, AppResult};
use photo_revive_application::infrastructure_config::Config;
use std::fs;
use std::path::Path;
use tracing::info;

/// Unprefixed variable names the service has always been deployed with,
/// mapped onto their config paths. `PHOTOREVIVE_*` variables still win.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("DATABASE_URL", "db.database_url"),
    ("STRIPE_SECRET_KEY", "payments.secret_key"),
    ("STRIPE_ENDPOINT_SECRET", "payments.webhook_secret"),
    ("REPLICATE_API_TOKEN", "enhancement.api_token"),
    ("CLERK_JWT_PUBLIC_KEY", "identity.jwt_public_key_pem"),
];

fn legacy_env() -> Env {
    Env::raw().filter_map(|key| {
        LEGACY_ENV_KEYS
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, path)| (*path).into())
    })
}

pub fn build_figment() -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if Path::new("config.toml").exists() {
        figment = figment.merge(Toml::file("config.toml"));
    }

    if Path::new("config.json").exists() {
        figment = figment.merge(Json::file("config.json"));
    }

    figment
        .merge(legacy_env())
        .merge(Env::prefixed("PHOTOREVIVE_").split("__"))
}

pub fn load_config() -> AppResult<Config> {
    generate_env_template_if_missing()?;

    let config: Config = build_figment()
        .extract()
        .map_err(|e| AppError::ConfigError {
            message: format!("Failed to load configuration: {e}"),
        })?;

    config.validate()?;
    Ok(config)
}

fn generate_env_template_if_missing() -> AppResult<()> {
    let env_file = ".env";
    let template_file = ".env.example";

    if Path::new(env_file).exists() {
        return Ok(());
    }

    if !Path::new(template_file).exists() {
        return Ok(());
    }

    fs::copy(template_file, env_file).map_err(|e| AppError::ConfigError {
        message: format!("Failed to generate .env file from template: {e}"),
    })?;

    info!("Generated .env from template. Please configure your secrets!");
    info!("IMPORTANT: .env contains sensitive data and is gitignored.");

    Ok(())
}
