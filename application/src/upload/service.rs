use crate::config::UploadSettings;
use crate::credits::service::require_user_id;
use crate::error::{AppError, AppResult};
use crate::ports::incoming::upload::{
    ImageQueryUseCase, ImageUpload, StoredImage, UploadImageUseCase, UploadOutcome,
};
use crate::ports::outgoing::{
    artifact_store::DynArtifactStorePort, credit_store::DynCreditStorePort,
    enhancement::DynEnhancementPort, image_codec::DynImageCodecPort,
    image_store::DynImageStorePort,
};
use domain::artifact::UploadArtifact;
use domain::auth::UserId;
use domain::credits::UPLOAD_COST;
use domain::image::{ImageKind, ImageLocator, sanitize_filename};

pub struct UploadServiceDeps {
    pub credit_store: DynCreditStorePort,
    pub image_store: DynImageStorePort,
    pub image_codec: DynImageCodecPort,
    pub enhancement: DynEnhancementPort,
    pub artifact_store: DynArtifactStorePort,
}

/// Runs the paid enhancement flow: check the balance, store the original,
/// enhance, store the result and only then charge one credit.
pub struct UploadService {
    credit_store: DynCreditStorePort,
    image_store: DynImageStorePort,
    image_codec: DynImageCodecPort,
    enhancement: DynEnhancementPort,
    artifact_store: DynArtifactStorePort,
    settings: UploadSettings,
}

impl UploadService {
    pub fn new(deps: UploadServiceDeps, settings: UploadSettings) -> Self {
        Self {
            credit_store: deps.credit_store,
            image_store: deps.image_store,
            image_codec: deps.image_codec,
            enhancement: deps.enhancement,
            artifact_store: deps.artifact_store,
            settings,
        }
    }

    fn validate_image(&self, image: &ImageUpload) -> AppResult<()> {
        if image.bytes.is_empty() {
            return Err(AppError::bad_request("Image file is empty"));
        }

        if image.bytes.len() > self.settings.max_upload_bytes {
            return Err(AppError::bad_request(format!(
                "Image exceeds the {} byte upload limit",
                self.settings.max_upload_bytes
            )));
        }

        Ok(())
    }

    async fn record(&self, artifact: &UploadArtifact) {
        if let Err(e) = self.artifact_store.record_artifact(artifact).await {
            tracing::warn!(
                artifact_id = %artifact.id.as_uuid(),
                error = %e,
                "Failed to record upload artifact"
            );
        }
    }

    async fn ensure_can_afford(&self, user_id: &UserId) -> AppResult<()> {
        let balance = self
            .credit_store
            .find_balance(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !balance.can_afford(UPLOAD_COST) {
            return Err(AppError::InsufficientCredits {
                message: "No credits remaining".to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl UploadImageUseCase for UploadService {
    #[tracing::instrument(skip(self, image), fields(bytes = image.as_ref().map(|i| i.bytes.len())))]
    async fn upload_image(
        &self,
        user_id: Option<String>,
        image: Option<ImageUpload>,
    ) -> AppResult<UploadOutcome> {
        let user_id = require_user_id(user_id)?;
        let image = image.ok_or_else(|| AppError::bad_request("No image file provided"))?;
        self.validate_image(&image)?;

        let format = self
            .image_codec
            .detect_format(&image.bytes)
            .ok_or_else(|| AppError::bad_request("Uploaded file is not a supported image"))?;

        self.ensure_can_afford(&user_id).await?;

        let original = self
            .image_store
            .put(&user_id, ImageKind::Original, format, &image.bytes)
            .await?;

        let artifact = UploadArtifact::new(
            user_id.clone(),
            original,
            image.filename.as_deref().map(sanitize_filename),
        );

        let enhanced = match self.enhancement.enhance(&image.bytes, format).await {
            Ok(enhanced) => enhanced,
            Err(e) => {
                tracing::error!(
                    user_id = %user_id,
                    backend = self.enhancement.backend_name(),
                    error = %e,
                    "Image enhancement failed"
                );
                self.record(&artifact).await;
                return Err(match e {
                    AppError::ProcessingError { .. } => e,
                    other => AppError::ProcessingError {
                        message: other.to_string(),
                    },
                });
            }
        };

        let processed = match self
            .image_store
            .put(&user_id, ImageKind::Processed, enhanced.format, &enhanced.bytes)
            .await
        {
            Ok(locator) => locator,
            Err(e) => {
                self.record(&artifact).await;
                return Err(e);
            }
        };

        let artifact = artifact.with_processed(processed);
        self.record(&artifact).await;

        if !self.credit_store.try_debit(&user_id, UPLOAD_COST).await? {
            tracing::warn!(
                user_id = %user_id,
                artifact_id = %artifact.id.as_uuid(),
                "Balance emptied concurrently, withholding processed image"
            );
            return Err(AppError::InsufficientCredits {
                message: "No credits remaining".to_string(),
            });
        }

        tracing::info!(
            user_id = %user_id,
            artifact_id = %artifact.id.as_uuid(),
            original = %original,
            processed = %processed,
            "Image enhanced"
        );

        Ok(UploadOutcome {
            artifact_id: artifact.id,
            original,
            processed,
        })
    }
}

#[async_trait::async_trait]
impl ImageQueryUseCase for UploadService {
    async fn get_image(&self, locator: &str) -> AppResult<StoredImage> {
        let not_found = || AppError::NotFound {
            message: "File not found".to_string(),
        };

        let locator = ImageLocator::parse(locator).map_err(|_| not_found())?;
        let bytes = self.image_store.get(&locator).await?.ok_or_else(not_found)?;

        Ok(StoredImage { locator, bytes })
    }
}
