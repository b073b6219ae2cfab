pub mod image_codec_image;
pub mod local_upscale_image;
