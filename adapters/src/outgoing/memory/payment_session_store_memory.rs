use dashmap::DashMap;

use domain::payment::{PaymentSession, PaymentSessionId, PaymentStatus};
use photo_revive_application::{
    error::AppResult, ports::outgoing::payment_session_store::PaymentSessionStorePort,
};

#[derive(Debug, Default)]
pub struct MemoryPaymentSessionStoreAdapter {
    sessions: DashMap<PaymentSessionId, PaymentSession>,
}

impl MemoryPaymentSessionStoreAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PaymentSessionStorePort for MemoryPaymentSessionStoreAdapter {
    async fn create_session(&self, session: &PaymentSession) -> AppResult<()> {
        self.sessions
            .entry(session.id.clone())
            .or_insert_with(|| session.clone());
        Ok(())
    }

    async fn find_session(&self, id: &PaymentSessionId) -> AppResult<Option<PaymentSession>> {
        Ok(self.sessions.get(id).map(|entry| entry.value().clone()))
    }

    async fn update_status(&self, id: &PaymentSessionId, status: PaymentStatus) -> AppResult<bool> {
        let Some(mut session) = self.sessions.get_mut(id) else {
            return Ok(false);
        };

        if session.status.is_terminal() {
            return Ok(false);
        }

        session.status = status;
        Ok(true)
    }
}
