use dashmap::{DashMap, DashSet};
use tracing::{debug, instrument};

use domain::auth::UserId;
use domain::credits::CreditBalance;
use photo_revive_application::{
    error::AppResult, ports::outgoing::credit_store::CreditStorePort,
};

/// Ledger backed by a `DashMap`. Every mutation happens while holding the
/// shard lock for that user's entry, so concurrent debits serialize.
#[derive(Debug, Default)]
pub struct MemoryCreditStoreAdapter {
    balances: DashMap<UserId, i64>,
    applied_events: DashSet<String>,
}

impl MemoryCreditStoreAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CreditStorePort for MemoryCreditStoreAdapter {
    async fn find_balance(&self, user_id: &UserId) -> AppResult<Option<CreditBalance>> {
        Ok(self
            .balances
            .get(user_id)
            .map(|entry| CreditBalance::new(*entry)))
    }

    async fn get_or_init_balance(
        &self,
        user_id: &UserId,
        initial: CreditBalance,
    ) -> AppResult<CreditBalance> {
        let entry = self
            .balances
            .entry(user_id.clone())
            .or_insert(initial.available());
        Ok(CreditBalance::new(*entry))
    }

    #[instrument(skip(self))]
    async fn ensure_account(&self, user_id: &UserId, initial: CreditBalance) -> AppResult<bool> {
        let mut created = false;
        self.balances.entry(user_id.clone()).or_insert_with(|| {
            created = true;
            initial.available()
        });
        if created {
            debug!(user_id = %user_id, "Credit account created");
        }
        Ok(created)
    }

    async fn try_debit(&self, user_id: &UserId, cost: u32) -> AppResult<bool> {
        let Some(mut entry) = self.balances.get_mut(user_id) else {
            return Ok(false);
        };

        match CreditBalance::new(*entry).debit(cost) {
            Ok(next) => {
                *entry = next.available();
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    async fn credit(&self, user_id: &UserId, amount: u32) -> AppResult<CreditBalance> {
        let mut entry = self.balances.entry(user_id.clone()).or_insert(0);
        let next = CreditBalance::new(*entry).credit(amount);
        *entry = next.available();
        Ok(next)
    }

    async fn credit_for_event(
        &self,
        event_id: &str,
        user_id: &UserId,
        amount: u32,
    ) -> AppResult<Option<CreditBalance>> {
        if !self.applied_events.insert(event_id.to_string()) {
            return Ok(None);
        }
        self.credit(user_id, amount).await.map(Some)
    }
}
