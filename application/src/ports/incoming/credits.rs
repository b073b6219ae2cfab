use crate::error::AppResult;
use domain::credits::CreditBalance;

#[async_trait::async_trait]
pub trait CreditsQueryUseCase: Send + Sync {
    /// Balance for the caller, creating the record with the initial grant if
    /// the user has never been seen.
    async fn get_or_init_credits(&self, user_id: Option<String>) -> AppResult<CreditBalance>;
}
