use std::sync::Arc;

use crate::error::AppResult;
use domain::artifact::UploadArtifact;

#[async_trait::async_trait]
pub trait ArtifactStorePort: Send + Sync {
    async fn record_artifact(&self, artifact: &UploadArtifact) -> AppResult<()>;
}

pub type DynArtifactStorePort = Arc<dyn ArtifactStorePort>;
