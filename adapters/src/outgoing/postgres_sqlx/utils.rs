use photo_revive_application::error::{AppError, AppResult};
use sqlx::{PgPool, Postgres, Transaction};
use std::{future::Future, time::Duration};
use tokio::time::timeout;

/// Runs sqlx futures under the configured query timeout and folds both
/// failure kinds into `AppError::DatabaseError`.
#[derive(Debug, Clone, Copy)]
pub struct PostgresExecutor {
    timeout: Duration,
}

impl PostgresExecutor {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub async fn execute_with_timeout<T, F, Fut>(
        &self,
        operation: F,
        error_context: &str,
    ) -> AppResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        timeout(self.timeout, operation())
            .await
            .map_err(|_| AppError::DatabaseError {
                message: format!("{error_context}: timed out after {:?}", self.timeout),
            })?
            .map_err(|e| AppError::DatabaseError {
                message: format!("{error_context}: {e}"),
            })
    }

    pub async fn begin(&self, pool: &PgPool) -> AppResult<Transaction<'static, Postgres>> {
        self.execute_with_timeout(|| pool.begin(), "Failed to begin transaction")
            .await
    }

    pub async fn commit(&self, tx: Transaction<'static, Postgres>) -> AppResult<()> {
        self.execute_with_timeout(|| tx.commit(), "Failed to commit transaction")
            .await
    }
}
