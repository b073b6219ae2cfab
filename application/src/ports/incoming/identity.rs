use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityWebhookOutcome {
    AccountCreated,
    AccountExisted,
    Ignored,
}

#[async_trait::async_trait]
pub trait IdentityWebhookUseCase: Send + Sync {
    async fn handle_identity_webhook(
        &self,
        token: Option<&str>,
        payload: &[u8],
    ) -> AppResult<IdentityWebhookOutcome>;
}
