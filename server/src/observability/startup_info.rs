use photo_revive_application::infrastructure_config::{
    Config, EnhancementConfig, LedgerBackend, StorageBackend, UploadQuotaConfig,
};
use tracing::info;

pub fn print_api_info(config: &Config) {
    print_api_documentation_info(config);
    print_configuration_info(config);
    print_upload_quota_info(&config.upload_quota);
}

fn print_api_documentation_info(config: &Config) {
    if !cfg!(feature = "docs") {
        return;
    }
    let base_url = format!("http://{}", config.server_address());
    info!("📋 API Documentation:");
    info!("  📖 Swagger UI: {}/docs", base_url);
    info!("  📄 OpenAPI JSON: {}/api-docs/openapi.json", base_url);
}

fn print_configuration_info(config: &Config) {
    info!("⚙️  Configuration:");
    print_ledger_configuration(config);
    print_storage_configuration(config);
    print_enhancement_configuration(&config.enhancement);
    info!(
        "  💳 New accounts start with {} credits",
        config.credits.initial_credits
    );
    info!("  🔗 Public base URL: {}", config.server.public_base_url);
}

fn print_ledger_configuration(config: &Config) {
    match config.ledger.backend {
        LedgerBackend::Postgres => info!(
            "  🗄️  Ledger: PostgreSQL (pool {}, query timeout {}s)",
            config.db.pool_size, config.db.query_timeout_secs
        ),
        LedgerBackend::Memory => info!("  🗄️  Ledger: in-memory (not persisted)"),
    }
}

fn print_storage_configuration(config: &Config) {
    match config.storage.backend {
        StorageBackend::Local => info!(
            "  📦 Images: local directory {} (max upload {} bytes)",
            config.storage.uploads_dir, config.storage.max_upload_bytes
        ),
        StorageBackend::Memory => info!(
            "  📦 Images: in-memory (max upload {} bytes)",
            config.storage.max_upload_bytes
        ),
    }
}

fn print_enhancement_configuration(enhancement: &EnhancementConfig) {
    info!(
        "  ✨ Enhancement: {:?} (timeout {}s)",
        enhancement.backend, enhancement.timeout_secs
    );
}

fn print_upload_quota_info(quota: &UploadQuotaConfig) {
    if quota.enabled {
        info!(
            "  🚦 Upload quota: {} uploads per user every {}s",
            quota.max_uploads, quota.window_secs
        );
    } else {
        info!("  🚦 Upload quota: DISABLED");
    }
}
