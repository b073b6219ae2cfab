use domain::image::ImageFormat;
use std::sync::Arc;

pub trait ImageCodecPort: Send + Sync {
    /// Identify the encoding from the leading bytes. `None` for anything that
    /// is not an accepted image format.
    fn detect_format(&self, bytes: &[u8]) -> Option<ImageFormat>;
}

pub type DynImageCodecPort = Arc<dyn ImageCodecPort>;
