use std::sync::Arc;

use crate::error::AppResult;
use domain::image::ImageFormat;

#[derive(Debug, Clone)]
pub struct EnhancedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

/// Face-restoration backend. Implementations return the enhanced bytes
/// themselves (fetching remote results first) and report every failure as
/// `AppError::ProcessingError`. No retries.
#[async_trait::async_trait]
pub trait EnhancementPort: Send + Sync {
    async fn enhance(&self, image: &[u8], format: ImageFormat) -> AppResult<EnhancedImage>;

    fn backend_name(&self) -> &'static str;
}

pub type DynEnhancementPort = Arc<dyn EnhancementPort>;
