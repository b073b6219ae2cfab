use sqlx::PgPool;
use tracing::{debug, instrument};

use domain::auth::UserId;
use domain::credits::CreditBalance;
use photo_revive_application::{
    error::AppResult, ports::outgoing::credit_store::CreditStorePort,
};

use super::utils::PostgresExecutor;

pub struct PostgresCreditStoreAdapter {
    pool: PgPool,
    executor: PostgresExecutor,
}

impl PostgresCreditStoreAdapter {
    pub fn new(pool: PgPool, query_timeout_secs: u64) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
        }
    }
}

#[async_trait::async_trait]
impl CreditStorePort for PostgresCreditStoreAdapter {
    #[instrument(skip(self))]
    async fn find_balance(&self, user_id: &UserId) -> AppResult<Option<CreditBalance>> {
        let credits = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_scalar::<_, i64>(
                        r"
                    SELECT credits
                    FROM user_credits
                    WHERE user_id = $1
                    ",
                    )
                    .bind(user_id.as_str())
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to get credits for user {user_id}"),
            )
            .await?;

        Ok(credits.map(CreditBalance::new))
    }

    #[instrument(skip(self))]
    async fn get_or_init_balance(
        &self,
        user_id: &UserId,
        initial: CreditBalance,
    ) -> AppResult<CreditBalance> {
        self.ensure_account(user_id, initial).await?;

        let credits = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_scalar::<_, i64>(
                        "SELECT credits FROM user_credits WHERE user_id = $1",
                    )
                    .bind(user_id.as_str())
                    .fetch_one(&self.pool)
                },
                &format!("Failed to read credits for user {user_id}"),
            )
            .await?;

        Ok(CreditBalance::new(credits))
    }

    #[instrument(skip(self))]
    async fn ensure_account(&self, user_id: &UserId, initial: CreditBalance) -> AppResult<bool> {
        let result = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r"
                    INSERT INTO user_credits (user_id, credits)
                    VALUES ($1, $2)
                    ON CONFLICT (user_id) DO NOTHING
                    ",
                    )
                    .bind(user_id.as_str())
                    .bind(initial.available())
                    .execute(&self.pool)
                },
                &format!("Failed to create credit account for user {user_id}"),
            )
            .await?;

        let created = result.rows_affected() == 1;
        if created {
            debug!(user_id = %user_id, credits = initial.available(), "Credit account created");
        }

        Ok(created)
    }

    #[instrument(skip(self))]
    async fn try_debit(&self, user_id: &UserId, cost: u32) -> AppResult<bool> {
        let remaining = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_scalar::<_, i64>(
                        r"
                    UPDATE user_credits
                    SET credits = credits - $2, updated_at = NOW()
                    WHERE user_id = $1 AND credits >= $2
                    RETURNING credits
                    ",
                    )
                    .bind(user_id.as_str())
                    .bind(i64::from(cost))
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to debit credits for user {user_id}"),
            )
            .await?;

        if let Some(remaining) = remaining {
            debug!(user_id = %user_id, cost, remaining, "Credits debited");
        }

        Ok(remaining.is_some())
    }

    #[instrument(skip(self))]
    async fn credit(&self, user_id: &UserId, amount: u32) -> AppResult<CreditBalance> {
        let credits = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_scalar::<_, i64>(
                        r"
                    INSERT INTO user_credits (user_id, credits)
                    VALUES ($1, $2)
                    ON CONFLICT (user_id)
                    DO UPDATE SET credits = user_credits.credits + EXCLUDED.credits,
                                  updated_at = NOW()
                    RETURNING credits
                    ",
                    )
                    .bind(user_id.as_str())
                    .bind(i64::from(amount))
                    .fetch_one(&self.pool)
                },
                &format!("Failed to credit user {user_id}"),
            )
            .await?;

        Ok(CreditBalance::new(credits))
    }

    #[instrument(skip(self))]
    async fn credit_for_event(
        &self,
        event_id: &str,
        user_id: &UserId,
        amount: u32,
    ) -> AppResult<Option<CreditBalance>> {
        let mut tx = self.executor.begin(&self.pool).await?;

        let claimed = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r"
                    INSERT INTO processed_payment_events (event_id, user_id, credits)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (event_id) DO NOTHING
                    ",
                    )
                    .bind(event_id)
                    .bind(user_id.as_str())
                    .bind(i64::from(amount))
                    .execute(&mut *tx)
                },
                &format!("Failed to record payment event {event_id}"),
            )
            .await?;

        if claimed.rows_affected() == 0 {
            debug!(event_id, "Payment event already processed");
            return Ok(None);
        }

        let credits = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_scalar::<_, i64>(
                        r"
                    INSERT INTO user_credits (user_id, credits)
                    VALUES ($1, $2)
                    ON CONFLICT (user_id)
                    DO UPDATE SET credits = user_credits.credits + EXCLUDED.credits,
                                  updated_at = NOW()
                    RETURNING credits
                    ",
                    )
                    .bind(user_id.as_str())
                    .bind(i64::from(amount))
                    .fetch_one(&mut *tx)
                },
                &format!("Failed to credit user {user_id} for event {event_id}"),
            )
            .await?;

        self.executor.commit(tx).await?;

        Ok(Some(CreditBalance::new(credits)))
    }
}
