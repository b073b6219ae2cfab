use sqlx::PgPool;
use tracing::instrument;

use domain::artifact::UploadArtifact;
use photo_revive_application::{
    error::AppResult, ports::outgoing::artifact_store::ArtifactStorePort,
};

use super::utils::PostgresExecutor;

pub struct PostgresArtifactStoreAdapter {
    pool: PgPool,
    executor: PostgresExecutor,
}

impl PostgresArtifactStoreAdapter {
    pub fn new(pool: PgPool, query_timeout_secs: u64) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
        }
    }
}

#[async_trait::async_trait]
impl ArtifactStorePort for PostgresArtifactStoreAdapter {
    #[instrument(skip(self, artifact), fields(artifact_id = %artifact.id.as_uuid()))]
    async fn record_artifact(&self, artifact: &UploadArtifact) -> AppResult<()> {
        let original = artifact.original.to_string();
        let processed = artifact.processed.map(|locator| locator.to_string());

        self.executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r"
                    INSERT INTO upload_artifacts
                        (id, owner_id, original_locator, processed_locator, original_filename, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    ON CONFLICT (id) DO UPDATE SET processed_locator = EXCLUDED.processed_locator
                    ",
                    )
                    .bind(artifact.id.as_uuid())
                    .bind(artifact.owner.as_str())
                    .bind(&original)
                    .bind(processed.as_deref())
                    .bind(artifact.original_filename.as_deref())
                    .bind(artifact.created_at)
                    .execute(&self.pool)
                },
                "Failed to record upload artifact",
            )
            .await?;

        Ok(())
    }
}
