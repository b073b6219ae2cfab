use std::sync::Arc;

use crate::error::AppResult;
use domain::payment::{CheckoutRequest, PaymentEvent, PaymentSessionId};

#[derive(Debug, Clone)]
pub struct CreatedCheckout {
    pub session_id: PaymentSessionId,
    pub checkout_url: Option<String>,
}

#[async_trait::async_trait]
pub trait PaymentGatewayPort: Send + Sync {
    async fn create_checkout_session(&self, request: &CheckoutRequest)
    -> AppResult<CreatedCheckout>;

    /// Authenticate a raw webhook body against its signature header and decode
    /// it. Must fail with `AppError::SignatureInvalid` before anything is
    /// decoded when the signature does not match.
    fn verify_event(&self, payload: &[u8], signature_header: &str) -> AppResult<PaymentEvent>;

    /// Description of the first purchased line item of a completed session.
    async fn purchased_product_name(&self, session_id: &PaymentSessionId)
    -> AppResult<Option<String>>;
}

pub type DynPaymentGatewayPort = Arc<dyn PaymentGatewayPort>;
