use std::sync::Arc;

use photo_revive_application::{
    infrastructure_config::Config,
    ports::incoming::{
        credits::CreditsQueryUseCase,
        identity::IdentityWebhookUseCase,
        payments::{CheckoutUseCase, PaymentWebhookUseCase},
        upload::{ImageQueryUseCase, UploadImageUseCase},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub credits_query_service: Arc<dyn CreditsQueryUseCase>,
    pub upload_service: Arc<dyn UploadImageUseCase>,
    pub image_query_service: Arc<dyn ImageQueryUseCase>,
    pub checkout_service: Arc<dyn CheckoutUseCase>,
    pub payment_webhook_service: Arc<dyn PaymentWebhookUseCase>,
    pub identity_webhook_service: Arc<dyn IdentityWebhookUseCase>,
    pub enhancement_backend: &'static str,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Arc<Config>,
        credits_query_service: Arc<dyn CreditsQueryUseCase>,
        upload_service: Arc<dyn UploadImageUseCase>,
        image_query_service: Arc<dyn ImageQueryUseCase>,
        checkout_service: Arc<dyn CheckoutUseCase>,
        payment_webhook_service: Arc<dyn PaymentWebhookUseCase>,
        identity_webhook_service: Arc<dyn IdentityWebhookUseCase>,
        enhancement_backend: &'static str,
    ) -> Self {
        Self {
            config,
            credits_query_service,
            upload_service,
            image_query_service,
            checkout_service,
            payment_webhook_service,
            identity_webhook_service,
            enhancement_backend,
        }
    }

    pub fn storage_backend(&self) -> &'static str {
        self.config.storage.backend.as_str()
    }
}
