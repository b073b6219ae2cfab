use photo_revive_application::ports::outgoing::image_codec::ImageCodecPort;

use domain::image::ImageFormat;

/// Sniffs uploads by magic bytes via `image::guess_format`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRsCodecAdapter;

impl ImageRsCodecAdapter {
    pub fn new() -> Self {
        Self
    }
}

pub(crate) fn from_image_rs(format: image::ImageFormat) -> Option<ImageFormat> {
    match format {
        image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
        image::ImageFormat::Png => Some(ImageFormat::Png),
        image::ImageFormat::WebP => Some(ImageFormat::Webp),
        _ => None,
    }
}

pub(crate) fn to_image_rs(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Webp => image::ImageFormat::WebP,
    }
}

impl ImageCodecPort for ImageRsCodecAdapter {
    fn detect_format(&self, bytes: &[u8]) -> Option<ImageFormat> {
        image::guess_format(bytes).ok().and_then(from_image_rs)
    }
}
