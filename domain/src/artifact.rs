use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::UserId;
use crate::image::ImageLocator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactId(pub Uuid);

impl ArtifactId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ArtifactId {
    fn default() -> Self {
        Self::new()
    }
}

/// Record of one upload: the stored original and, when enhancement
/// succeeded, the stored result.
#[derive(Debug, Clone)]
pub struct UploadArtifact {
    pub id: ArtifactId,
    pub owner: UserId,
    pub original: ImageLocator,
    pub processed: Option<ImageLocator>,
    pub original_filename: Option<String>,
    pub created_at: OffsetDateTime,
}

impl UploadArtifact {
    pub fn new(owner: UserId, original: ImageLocator, original_filename: Option<String>) -> Self {
        Self {
            id: ArtifactId::new(),
            owner,
            original,
            processed: None,
            original_filename,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[must_use]
    pub fn with_processed(mut self, processed: ImageLocator) -> Self {
        self.processed = Some(processed);
        self
    }

    pub fn is_complete(&self) -> bool {
        self.processed.is_some()
    }
}
