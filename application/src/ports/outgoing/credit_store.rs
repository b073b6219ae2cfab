use std::sync::Arc;

use crate::error::AppResult;
use domain::auth::UserId;
use domain::credits::CreditBalance;

/// Per-user credit ledger.
///
/// `try_debit` and `credit_for_event` must be atomic in the backing store:
/// concurrent debits for one user can never drive the balance below zero, and
/// one gateway event id credits at most once.
#[async_trait::async_trait]
pub trait CreditStorePort: Send + Sync {
    async fn find_balance(&self, user_id: &UserId) -> AppResult<Option<CreditBalance>>;

    /// Returns the stored balance, creating the record with `initial` first if
    /// it does not exist.
    async fn get_or_init_balance(
        &self,
        user_id: &UserId,
        initial: CreditBalance,
    ) -> AppResult<CreditBalance>;

    /// Create-if-absent. Returns `true` when a record was created; an existing
    /// balance is never touched.
    async fn ensure_account(&self, user_id: &UserId, initial: CreditBalance) -> AppResult<bool>;

    /// Decrements by `cost` only when the balance covers it. Returns `false`
    /// without mutating otherwise (including when the user has no record).
    async fn try_debit(&self, user_id: &UserId, cost: u32) -> AppResult<bool>;

    /// Adds `amount`, treating a missing record as a zero balance.
    async fn credit(&self, user_id: &UserId, amount: u32) -> AppResult<CreditBalance>;

    /// Same as [`CreditStorePort::credit`], recorded under `event_id`. Returns
    /// `None` if that event was already applied.
    async fn credit_for_event(
        &self,
        event_id: &str,
        user_id: &UserId,
        amount: u32,
    ) -> AppResult<Option<CreditBalance>>;
}

pub type DynCreditStorePort = Arc<dyn CreditStorePort>;
