use dashmap::DashMap;

use domain::artifact::{ArtifactId, UploadArtifact};
use photo_revive_application::{
    error::AppResult, ports::outgoing::artifact_store::ArtifactStorePort,
};

#[derive(Debug, Default)]
pub struct MemoryArtifactStoreAdapter {
    artifacts: DashMap<ArtifactId, UploadArtifact>,
}

impl MemoryArtifactStoreAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ArtifactId) -> Option<UploadArtifact> {
        self.artifacts.get(id).map(|entry| entry.value().clone())
    }

    /// Artifacts whose original was stored but never enhanced.
    pub fn incomplete(&self) -> Vec<UploadArtifact> {
        self.artifacts
            .iter()
            .filter(|entry| !entry.is_complete())
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl ArtifactStorePort for MemoryArtifactStoreAdapter {
    async fn record_artifact(&self, artifact: &UploadArtifact) -> AppResult<()> {
        self.artifacts.insert(artifact.id, artifact.clone());
        Ok(())
    }
}
