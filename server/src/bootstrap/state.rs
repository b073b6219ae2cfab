use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use photo_revive_adapters::shared::app_state::AppState as AdaptersAppState;
use photo_revive_adapters::outgoing::{
    image_rs::{
        image_codec_image::ImageRsCodecAdapter,
        local_upscale_image::LocalUpscaleEnhancementAdapter,
    },
    jwt_identity::identity_verifier_jwt::JwtIdentityVerifierAdapter,
    local_fs::image_store_fs::LocalFsImageStoreAdapter,
    memory::{
        artifact_store_memory::MemoryArtifactStoreAdapter,
        credit_store_memory::MemoryCreditStoreAdapter,
        image_store_memory::MemoryImageStoreAdapter,
        payment_session_store_memory::MemoryPaymentSessionStoreAdapter,
    },
    postgres_sqlx::{
        artifact_store_postgres::PostgresArtifactStoreAdapter,
        credit_store_postgres::PostgresCreditStoreAdapter,
        payment_session_store_postgres::PostgresPaymentSessionStoreAdapter,
    },
    replicate_reqwest::enhancement_replicate::ReplicateEnhancementAdapter,
    stripe_reqwest::payment_gateway_stripe::StripePaymentGatewayAdapter,
    tokio_spawn::enhancement_timeout_tokio::TokioEnhancementTimeoutAdapter,
};
use photo_revive_application::error::{AppError, AppResult};
use photo_revive_application::infrastructure_config::{
    Config, EnhancementBackend, LedgerBackend, StorageBackend,
};
use photo_revive_application::ports::incoming::{
    payments::CheckoutUseCase, upload::UploadImageUseCase,
};
use photo_revive_application::ports::outgoing::{
    artifact_store::DynArtifactStorePort, credit_store::DynCreditStorePort,
    enhancement::DynEnhancementPort, image_store::DynImageStorePort,
    payment_session_store::DynPaymentSessionStorePort,
};
use photo_revive_application::{
    config::{UploadSettings, credit_config},
    credits::service::CreditService,
    identity::service::IdentityWebhookService,
    payments::service::PaymentService,
    upload::service::{UploadService, UploadServiceDeps},
};

/// The three ledger-side stores always share one backend so a purchase,
/// its session and the resulting balance never live in different places.
struct LedgerStores {
    credits: DynCreditStorePort,
    artifacts: DynArtifactStorePort,
    sessions: DynPaymentSessionStorePort,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    db_pool: Option<PgPool>,
    pub credit_service: Arc<CreditService>,
    pub upload_service: Arc<UploadService>,
    pub payment_service: Arc<PaymentService>,
    pub identity_service: Arc<IdentityWebhookService>,
    pub enhancement_backend: &'static str,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let config = Arc::new(config);

        let db_pool = match config.ledger.backend {
            LedgerBackend::Postgres => Some(Self::create_database_pool(&config).await?),
            LedgerBackend::Memory => None,
        };

        let ledger = Self::create_ledger_stores(&config, db_pool.as_ref());
        let image_store = Self::create_image_store(&config).await?;
        let enhancement = Self::create_enhancement(&config)?;
        let enhancement_backend = enhancement.backend_name();

        let credit_service = Arc::new(CreditService::new(
            Arc::clone(&ledger.credits),
            credit_config(&config),
        ));

        let upload_service = Arc::new(UploadService::new(
            UploadServiceDeps {
                credit_store: Arc::clone(&ledger.credits),
                image_store,
                image_codec: Arc::new(ImageRsCodecAdapter::new()),
                enhancement,
                artifact_store: ledger.artifacts,
            },
            UploadSettings::from_config(&config),
        ));

        let payment_service = Arc::new(PaymentService::new(
            Arc::new(StripePaymentGatewayAdapter::new(&config.payments)?),
            ledger.sessions,
            Arc::clone(&ledger.credits),
        ));

        let identity_service = Arc::new(IdentityWebhookService::new(
            Arc::new(JwtIdentityVerifierAdapter::new(&config.identity)?),
            ledger.credits,
            credit_config(&config),
        ));

        Ok(Self {
            config,
            db_pool,
            credit_service,
            upload_service,
            payment_service,
            identity_service,
            enhancement_backend,
        })
    }

    async fn create_database_pool(config: &Config) -> AppResult<PgPool> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db.pool_size)
            .connect(config.db.database_url())
            .await
            .map_err(|e| AppError::DatabaseError {
                message: format!("Failed to connect to database: {}", e),
            })?;

        sqlx::migrate!("../migrations")
            .run(&db_pool)
            .await
            .map_err(|e| AppError::DatabaseError {
                message: format!("Failed to run database migrations: {}", e),
            })?;
        info!("Database migrations applied");

        Ok(db_pool)
    }

    fn create_ledger_stores(config: &Config, db_pool: Option<&PgPool>) -> LedgerStores {
        let timeout = config.db.query_timeout_secs;
        match db_pool {
            Some(pool) => LedgerStores {
                credits: Arc::new(PostgresCreditStoreAdapter::new(pool.clone(), timeout)),
                artifacts: Arc::new(PostgresArtifactStoreAdapter::new(pool.clone(), timeout)),
                sessions: Arc::new(PostgresPaymentSessionStoreAdapter::new(
                    pool.clone(),
                    timeout,
                )),
            },
            None => LedgerStores {
                credits: Arc::new(MemoryCreditStoreAdapter::new()),
                artifacts: Arc::new(MemoryArtifactStoreAdapter::new()),
                sessions: Arc::new(MemoryPaymentSessionStoreAdapter::new()),
            },
        }
    }

    async fn create_image_store(config: &Config) -> AppResult<DynImageStorePort> {
        let store: DynImageStorePort = match config.storage.backend {
            StorageBackend::Local => {
                Arc::new(LocalFsImageStoreAdapter::new(&config.storage.uploads_dir).await?)
            }
            StorageBackend::Memory => Arc::new(MemoryImageStoreAdapter::new()),
        };
        Ok(store)
    }

    fn create_enhancement(config: &Config) -> AppResult<DynEnhancementPort> {
        let inner: DynEnhancementPort = match config.enhancement.backend {
            EnhancementBackend::Replicate => {
                Arc::new(ReplicateEnhancementAdapter::new(&config.enhancement)?)
            }
            EnhancementBackend::Local => Arc::new(LocalUpscaleEnhancementAdapter::new(
                config.enhancement.local_upscale_factor,
            )),
        };

        Ok(Arc::new(TokioEnhancementTimeoutAdapter::new(
            inner,
            Duration::from_secs(config.enhancement.timeout_secs),
        )))
    }

    pub fn db_pool(&self) -> Option<&PgPool> {
        self.db_pool.as_ref()
    }

    pub fn to_adapters_state(self) -> AdaptersAppState {
        AdaptersAppState::new(
            self.config,
            self.credit_service,
            Arc::clone(&self.upload_service) as Arc<dyn UploadImageUseCase>,
            self.upload_service,
            Arc::clone(&self.payment_service) as Arc<dyn CheckoutUseCase>,
            self.payment_service,
            self.identity_service,
            self.enhancement_backend,
        )
    }
}
