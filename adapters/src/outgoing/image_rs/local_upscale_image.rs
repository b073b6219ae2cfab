use std::io::Cursor;

use image::{ImageReader, imageops::FilterType};
use tokio::task::spawn_blocking;
use tracing::{debug, instrument};

use domain::image::ImageFormat;
use photo_revive_application::{
    error::{AppError, AppResult},
    ports::outgoing::enhancement::{EnhancedImage, EnhancementPort},
};

use super::image_codec_image::to_image_rs;

const MAX_OUTPUT_PIXELS: u64 = 40_000_000;

/// Offline stand-in for the hosted restoration model: a Lanczos upscale
/// encoded as PNG, run on the blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct LocalUpscaleEnhancementAdapter {
    factor: u32,
}

impl LocalUpscaleEnhancementAdapter {
    pub fn new(factor: u32) -> Self {
        Self {
            factor: factor.max(1),
        }
    }

    /// Reads the header only, so oversized inputs are refused before any
    /// pixel buffer is allocated.
    fn output_dimensions(image: &[u8], format: ImageFormat, factor: u32) -> AppResult<(u32, u32)> {
        let (width, height) = ImageReader::with_format(Cursor::new(image), to_image_rs(format))
            .into_dimensions()
            .map_err(|e| AppError::ProcessingError {
                message: format!("Failed to read image header: {e}"),
            })?;

        let width = width.saturating_mul(factor);
        let height = height.saturating_mul(factor);
        if u64::from(width) * u64::from(height) > MAX_OUTPUT_PIXELS {
            return Err(AppError::ProcessingError {
                message: format!("Upscaled image {width}x{height} exceeds the pixel limit"),
            });
        }

        Ok((width, height))
    }

    fn upscale(image: &[u8], format: ImageFormat, factor: u32) -> AppResult<Vec<u8>> {
        let processing_error = |message: String| AppError::ProcessingError { message };

        let (width, height) = Self::output_dimensions(image, format, factor)?;

        let decoded = image::load_from_memory_with_format(image, to_image_rs(format))
            .map_err(|e| processing_error(format!("Failed to decode image: {e}")))?;

        let resized = decoded.resize_exact(width, height, FilterType::Lanczos3);

        let mut encoded = Vec::new();
        resized
            .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
            .map_err(|e| processing_error(format!("Failed to encode PNG: {e}")))?;

        Ok(encoded)
    }
}

#[async_trait::async_trait]
impl EnhancementPort for LocalUpscaleEnhancementAdapter {
    #[instrument(skip(self, image), fields(bytes = image.len(), factor = self.factor))]
    async fn enhance(&self, image: &[u8], format: ImageFormat) -> AppResult<EnhancedImage> {
        let input = image.to_vec();
        let factor = self.factor;

        let bytes = spawn_blocking(move || Self::upscale(&input, format, factor))
            .await
            .map_err(|e| AppError::ProcessingError {
                message: format!("Upscale task failed: {e}"),
            })??;

        debug!(output_bytes = bytes.len(), "Local upscale finished");

        Ok(EnhancedImage {
            bytes,
            format: ImageFormat::Png,
        })
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
