use std::time::Duration;

use tokio::time::timeout;
use tracing::warn;

use domain::image::ImageFormat;
use photo_revive_application::{
    error::{AppError, AppResult},
    ports::outgoing::enhancement::{DynEnhancementPort, EnhancedImage, EnhancementPort},
};

/// Bounds any enhancement backend by a wall-clock deadline. A timed out call
/// is reported as a processing failure and the inner future is dropped.
pub struct TokioEnhancementTimeoutAdapter {
    inner: DynEnhancementPort,
    deadline: Duration,
}

impl TokioEnhancementTimeoutAdapter {
    pub fn new(inner: DynEnhancementPort, deadline: Duration) -> Self {
        Self { inner, deadline }
    }
}

#[async_trait::async_trait]
impl EnhancementPort for TokioEnhancementTimeoutAdapter {
    async fn enhance(&self, image: &[u8], format: ImageFormat) -> AppResult<EnhancedImage> {
        if let Ok(result) = timeout(self.deadline, self.inner.enhance(image, format)).await {
            result
        } else {
            warn!(
                backend = self.inner.backend_name(),
                deadline_secs = self.deadline.as_secs_f64(),
                "Enhancement timed out"
            );
            Err(AppError::ProcessingError {
                message: format!("enhancement timed out after {:?}", self.deadline),
            })
        }
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}
