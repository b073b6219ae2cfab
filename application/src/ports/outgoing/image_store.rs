use std::sync::Arc;

use crate::error::AppResult;
use domain::auth::UserId;
use domain::image::{ImageFormat, ImageKind, ImageLocator};

#[async_trait::async_trait]
pub trait ImageStorePort: Send + Sync {
    async fn put(
        &self,
        owner: &UserId,
        kind: ImageKind,
        format: ImageFormat,
        bytes: &[u8],
    ) -> AppResult<ImageLocator>;

    async fn get(&self, locator: &ImageLocator) -> AppResult<Option<Vec<u8>>>;
}

pub type DynImageStorePort = Arc<dyn ImageStorePort>;
