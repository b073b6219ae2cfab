use serde::Serialize;
#[cfg(feature = "docs")]
use utoipa::ToSchema;

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Standard API response wrapper with success indicator, optional error message, and optional data payload",
    example = json!({
        "ok": true,
        "data": {
            "status": "healthy",
            "enhancement_backend": "replicate",
            "storage_backend": "local"
        }
    })
))]
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success_with_data(data: Option<T>) -> Self {
        Self {
            ok: true,
            error: None,
            data,
        }
    }
}

#[cfg(feature = "docs")]
#[derive(serde::Serialize, utoipa::ToSchema)]
#[schema(title = "ApiResponseValue")]
pub struct ApiResponseValue {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Error body returned by every failing endpoint",
    example = json!({
        "ok": false,
        "error": "Insufficient credits",
        "reason": "insufficient_credits",
        "status": 403
    })
))]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
    pub reason: String,
    pub status: u16,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Current credit balance of the caller",
    example = json!({ "credits": 5 })
))]
#[derive(Debug, Clone, Serialize)]
pub struct CreditsResponse {
    pub credits: i64,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Download URLs of the stored original and its enhanced counterpart",
    example = json!({
        "original_image_url": "http://localhost:5000/download/0f8e0c5c1b7f4e5a9b1e2d3c4b5a6978-original.jpg",
        "processed_image_url": "http://localhost:5000/download/7d1c2b3a4f5e6d7c8b9a0f1e2d3c4b5a-processed.png"
    })
))]
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub original_image_url: String,
    pub processed_image_url: String,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Opaque checkout session id; the frontend redirects with it",
    example = json!({ "id": "cs_test_a1B2c3" })
))]
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSessionResponse {
    pub id: String,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(example = json!({ "success": true })))]
#[derive(Debug, Clone, Serialize)]
pub struct PaymentWebhookAck {
    pub success: bool,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(example = json!({ "status": "success" })))]
#[derive(Debug, Clone, Serialize)]
pub struct IdentityWebhookAck {
    pub status: &'static str,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Liveness summary with the active backends",
    example = json!({
        "status": "healthy",
        "enhancement_backend": "replicate",
        "storage_backend": "local"
    })
))]
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub enhancement_backend: &'static str,
    pub storage_backend: &'static str,
}
