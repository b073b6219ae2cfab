use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, instrument};

use domain::auth::UserId;
use domain::image::{ImageFormat, ImageKind, ImageLocator};
use photo_revive_application::{
    error::{AppError, AppResult},
    ports::outgoing::image_store::ImageStorePort,
};

/// Stores images as flat files named by their locator. Paths are built only
/// from parsed locators, never from client input.
#[derive(Debug, Clone)]
pub struct LocalFsImageStoreAdapter {
    root: PathBuf,
}

impl LocalFsImageStoreAdapter {
    pub async fn new(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| AppError::StorageError {
                message: format!("Failed to create uploads dir {}: {e}", root.display()),
            })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, locator: &ImageLocator) -> PathBuf {
        self.root.join(locator.to_string())
    }
}

#[async_trait::async_trait]
impl ImageStorePort for LocalFsImageStoreAdapter {
    #[instrument(skip(self, bytes), fields(owner = %owner, bytes = bytes.len()))]
    async fn put(
        &self,
        owner: &UserId,
        kind: ImageKind,
        format: ImageFormat,
        bytes: &[u8],
    ) -> AppResult<ImageLocator> {
        let locator = ImageLocator::generate(kind, format);
        let path = self.path_for(&locator);
        let tmp_path = self.root.join(format!(".{locator}.partial"));

        let storage_error = |e: std::io::Error| AppError::StorageError {
            message: format!("Failed to write {locator}: {e}"),
        };

        fs::write(&tmp_path, bytes).await.map_err(storage_error)?;
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            fs::remove_file(&tmp_path).await.ok();
            return Err(storage_error(e));
        }

        debug!(locator = %locator, "Image stored");
        Ok(locator)
    }

    #[instrument(skip(self))]
    async fn get(&self, locator: &ImageLocator) -> AppResult<Option<Vec<u8>>> {
        match fs::read(self.path_for(locator)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::StorageError {
                message: format!("Failed to read {locator}: {e}"),
            }),
        }
    }
}
