use sqlx::{PgPool, Row, postgres::PgRow};
use time::OffsetDateTime;
use tracing::instrument;

use domain::auth::UserId;
use domain::payment::{PaymentSession, PaymentSessionId, PaymentStatus};
use photo_revive_application::{
    error::{AppError, AppResult},
    ports::outgoing::payment_session_store::PaymentSessionStorePort,
};

use super::utils::PostgresExecutor;

pub struct PostgresPaymentSessionStoreAdapter {
    pool: PgPool,
    executor: PostgresExecutor,
}

impl PostgresPaymentSessionStoreAdapter {
    pub fn new(pool: PgPool, query_timeout_secs: u64) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
        }
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> AppResult<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name).map_err(|e| AppError::DatabaseError {
        message: format!("Failed to get {name}: {e}"),
    })
}

fn session_from_row(row: &PgRow) -> AppResult<PaymentSession> {
    let id: String = column(row, "id")?;
    let user_id: String = column(row, "user_id")?;
    let product_name: String = column(row, "product_name")?;
    let credits: i64 = column(row, "credits")?;
    let unit_amount: i64 = column(row, "unit_amount")?;
    let status: String = column(row, "status")?;
    let created_at: OffsetDateTime = column(row, "created_at")?;

    Ok(PaymentSession {
        id: PaymentSessionId::new(id),
        user_id: UserId::parse(&user_id)?,
        product_name,
        credits: u32::try_from(credits).unwrap_or(0),
        unit_amount,
        status: status.parse::<PaymentStatus>()?,
        created_at,
    })
}

#[async_trait::async_trait]
impl PaymentSessionStorePort for PostgresPaymentSessionStoreAdapter {
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    async fn create_session(&self, session: &PaymentSession) -> AppResult<()> {
        self.executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r"
                    INSERT INTO payment_sessions
                        (id, user_id, product_name, credits, unit_amount, status, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    ON CONFLICT (id) DO NOTHING
                    ",
                    )
                    .bind(session.id.as_str())
                    .bind(session.user_id.as_str())
                    .bind(&session.product_name)
                    .bind(i64::from(session.credits))
                    .bind(session.unit_amount)
                    .bind(session.status.as_str())
                    .bind(session.created_at)
                    .execute(&self.pool)
                },
                "Failed to create payment session",
            )
            .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_session(&self, id: &PaymentSessionId) -> AppResult<Option<PaymentSession>> {
        let row = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r"
                    SELECT id, user_id, product_name, credits, unit_amount, status, created_at
                    FROM payment_sessions
                    WHERE id = $1
                    ",
                    )
                    .bind(id.as_str())
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to get payment session {id}"),
            )
            .await?;

        row.as_ref().map(session_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: &PaymentSessionId, status: PaymentStatus) -> AppResult<bool> {
        let result = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r"
                    UPDATE payment_sessions
                    SET status = $2, updated_at = NOW()
                    WHERE id = $1 AND status = 'pending'
                    ",
                    )
                    .bind(id.as_str())
                    .bind(status.as_str())
                    .execute(&self.pool)
                },
                &format!("Failed to update payment session {id}"),
            )
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
