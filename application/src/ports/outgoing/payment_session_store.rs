use std::sync::Arc;

use crate::error::AppResult;
use domain::payment::{PaymentSession, PaymentSessionId, PaymentStatus};

#[async_trait::async_trait]
pub trait PaymentSessionStorePort: Send + Sync {
    async fn create_session(&self, session: &PaymentSession) -> AppResult<()>;

    async fn find_session(&self, id: &PaymentSessionId) -> AppResult<Option<PaymentSession>>;

    /// Moves a pending session to `status`. Returns `false` when the session
    /// is unknown or already terminal.
    async fn update_status(&self, id: &PaymentSessionId, status: PaymentStatus) -> AppResult<bool>;
}

pub type DynPaymentSessionStorePort = Arc<dyn PaymentSessionStorePort>;
