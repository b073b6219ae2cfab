use crate::error::AppResult;
use domain::{artifact::ArtifactId, image::ImageLocator};

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub artifact_id: ArtifactId,
    pub original: ImageLocator,
    pub processed: ImageLocator,
}

#[derive(Debug, Clone)]
pub struct StoredImage {
    pub locator: ImageLocator,
    pub bytes: Vec<u8>,
}

#[async_trait::async_trait]
pub trait UploadImageUseCase: Send + Sync {
    async fn upload_image(
        &self,
        user_id: Option<String>,
        image: Option<ImageUpload>,
    ) -> AppResult<UploadOutcome>;
}

#[async_trait::async_trait]
pub trait ImageQueryUseCase: Send + Sync {
    async fn get_image(&self, locator: &str) -> AppResult<StoredImage>;
}
