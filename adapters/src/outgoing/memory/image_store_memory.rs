use dashmap::DashMap;

use domain::auth::UserId;
use domain::image::{ImageFormat, ImageKind, ImageLocator};
use photo_revive_application::{error::AppResult, ports::outgoing::image_store::ImageStorePort};

#[derive(Debug, Default)]
pub struct MemoryImageStoreAdapter {
    images: DashMap<ImageLocator, Vec<u8>>,
}

impl MemoryImageStoreAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[async_trait::async_trait]
impl ImageStorePort for MemoryImageStoreAdapter {
    async fn put(
        &self,
        _owner: &UserId,
        kind: ImageKind,
        format: ImageFormat,
        bytes: &[u8],
    ) -> AppResult<ImageLocator> {
        let locator = ImageLocator::generate(kind, format);
        self.images.insert(locator, bytes.to_vec());
        Ok(locator)
    }

    async fn get(&self, locator: &ImageLocator) -> AppResult<Option<Vec<u8>>> {
        Ok(self.images.get(locator).map(|entry| entry.value().clone()))
    }
}
