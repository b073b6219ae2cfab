use crate::error::{AppError, AppResult};
use crate::ports::incoming::credits::CreditsQueryUseCase;
use crate::ports::outgoing::credit_store::DynCreditStorePort;
use domain::auth::UserId;
use domain::credits::{CreditBalance, CreditConfig};

/// Parse the caller identity carried by the `Clerk-User-Id` header.
pub(crate) fn require_user_id(raw: Option<String>) -> AppResult<UserId> {
    let raw = raw.ok_or_else(|| AppError::bad_request("User ID is required"))?;
    Ok(UserId::parse(&raw)?)
}

pub struct CreditService {
    credit_store: DynCreditStorePort,
    credit_config: CreditConfig,
}

impl CreditService {
    pub fn new(credit_store: DynCreditStorePort, credit_config: CreditConfig) -> Self {
        Self {
            credit_store,
            credit_config,
        }
    }
}

#[async_trait::async_trait]
impl CreditsQueryUseCase for CreditService {
    #[tracing::instrument(skip(self))]
    async fn get_or_init_credits(&self, user_id: Option<String>) -> AppResult<CreditBalance> {
        let user_id = require_user_id(user_id)?;

        let balance = self
            .credit_store
            .get_or_init_balance(&user_id, self.credit_config.initial_balance())
            .await?;

        tracing::debug!(user_id = %user_id, credits = balance.available(), "Credits resolved");

        Ok(balance)
    }
}
