use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, instrument};

use domain::image::ImageFormat;
use photo_revive_application::{
    error::{AppError, AppResult},
    infrastructure_config::EnhancementConfig,
    ports::outgoing::enhancement::{EnhancedImage, EnhancementPort},
};

use crate::outgoing::image_rs::image_codec_image::from_image_rs;

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    version: &'a str,
    input: PredictionInput,
}

#[derive(Debug, Serialize)]
struct PredictionInput {
    img: String,
    scale: u32,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    status: String,
    #[serde(default)]
    output: Value,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: Option<String>,
}

fn processing_error(message: impl Into<String>) -> AppError {
    AppError::ProcessingError {
        message: message.into(),
    }
}

/// The restored image URL: either a bare string or the first entry of a
/// non-empty list of strings.
/// True when `url` lives under `base`, so the bearer token never leaves the
/// configured API host. `base` carries no trailing slash.
fn is_under_base(base: &str, url: &str) -> bool {
    url.strip_prefix(base)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn output_url(output: &Value) -> Option<&str> {
    match output {
        Value::String(url) => Some(url.as_str()),
        Value::Array(items) => items.first().and_then(Value::as_str),
        _ => None,
    }
}

/// GFPGAN face restoration hosted on Replicate.
pub struct ReplicateEnhancementAdapter {
    client: Client,
    api_base_url: String,
    api_token: SecretString,
    model_version: String,
    poll_interval: Duration,
}

impl ReplicateEnhancementAdapter {
    pub fn new(config: &EnhancementConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::ConfigError {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            model_version: config.model_version.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    async fn create_prediction(&self, image: &[u8], format: ImageFormat) -> AppResult<Prediction> {
        let body = PredictionRequest {
            version: &self.model_version,
            input: PredictionInput {
                img: format!(
                    "data:{};base64,{}",
                    format.content_type(),
                    STANDARD.encode(image)
                ),
                scale: 2,
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/predictions", self.api_base_url))
            .bearer_auth(self.api_token.expose_secret())
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await
            .map_err(|e| processing_error(format!("Prediction request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(processing_error(format!(
                "Prediction request returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| processing_error(format!("Unexpected prediction response: {e}")))
    }

    async fn poll(&self, url: &str) -> AppResult<Prediction> {
        if !is_under_base(&self.api_base_url, url) {
            return Err(processing_error(format!(
                "Prediction polling URL {url} is outside {}",
                self.api_base_url
            )));
        }

        sleep(self.poll_interval).await;

        let response = self
            .client
            .get(url)
            .bearer_auth(self.api_token.expose_secret())
            .send()
            .await
            .map_err(|e| processing_error(format!("Prediction poll failed: {e}")))?;

        if !response.status().is_success() {
            return Err(processing_error(format!(
                "Prediction poll returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| processing_error(format!("Unexpected prediction response: {e}")))
    }

    async fn wait_for_output(&self, mut prediction: Prediction) -> AppResult<String> {
        loop {
            match prediction.status.as_str() {
                "succeeded" => {
                    return output_url(&prediction.output)
                        .map(ToString::to_string)
                        .ok_or_else(|| processing_error("Prediction output carries no image URL"));
                }
                "failed" | "canceled" => {
                    let reason = prediction
                        .error
                        .as_ref()
                        .map_or_else(|| "no reason given".to_string(), ToString::to_string);
                    return Err(processing_error(format!(
                        "Prediction {}: {reason}",
                        prediction.status
                    )));
                }
                status => {
                    let Some(get_url) = prediction.urls.as_ref().and_then(|u| u.get.clone())
                    else {
                        return Err(processing_error(format!(
                            "Prediction is {status} and offers no polling URL"
                        )));
                    };
                    debug!(status, "Prediction still running");
                    prediction = self.poll(&get_url).await?;
                }
            }
        }
    }

    async fn fetch_output(&self, url: &str) -> AppResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| processing_error(format!("Result download failed: {e}")))?;

        if !response.status().is_success() {
            return Err(processing_error(format!(
                "Result download returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| processing_error(format!("Result download failed: {e}")))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl EnhancementPort for ReplicateEnhancementAdapter {
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    async fn enhance(&self, image: &[u8], format: ImageFormat) -> AppResult<EnhancedImage> {
        let prediction = self.create_prediction(image, format).await?;
        let url = self.wait_for_output(prediction).await?;
        let bytes = self.fetch_output(&url).await?;

        let format = image::guess_format(&bytes)
            .ok()
            .and_then(from_image_rs)
            .unwrap_or(ImageFormat::Png);

        debug!(output_bytes = bytes.len(), ?format, "Enhanced image fetched");

        Ok(EnhancedImage { bytes, format })
    }

    fn backend_name(&self) -> &'static str {
        "replicate"
    }
}
