use crate::error::AppResult;
use domain::payment::PaymentSessionId;

#[async_trait::async_trait]
pub trait CheckoutUseCase: Send + Sync {
    async fn create_checkout_session(
        &self,
        product_name: &str,
        unit_amount: i64,
        user_id: Option<String>,
    ) -> AppResult<PaymentSessionId>;
}

#[async_trait::async_trait]
pub trait PaymentWebhookUseCase: Send + Sync {
    async fn handle_payment_webhook(&self, payload: &[u8], signature: Option<&str>)
    -> AppResult<()>;
}
