use crate::incoming::http_axum::{dto, handlers};
use dto::common_responses::{
    BadRequestResponse, ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse,
    QuotaExceededResponse, UnauthorizedResponse,
};
use dto::requests::{CheckoutMetadata, CreateCheckoutRequest};
use dto::responses::{
    ApiResponseValue, CheckoutSessionResponse, CreditsResponse, ErrorResponse, HealthResponse,
    IdentityWebhookAck, PaymentWebhookAck, UploadResponse,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::upload::upload_image,
        handlers::download::download_image,
        handlers::credits::get_user_credits,
        handlers::payments::create_checkout_session,
        handlers::payments::payment_webhook,
        handlers::identity::identity_webhook,
        handlers::health::health_check,
    ),
    components(
        schemas(
            CreateCheckoutRequest,
            CheckoutMetadata,
            ApiResponseValue,
            ErrorResponse,
            CreditsResponse,
            UploadResponse,
            CheckoutSessionResponse,
            PaymentWebhookAck,
            IdentityWebhookAck,
            HealthResponse
        ),
        responses(
            BadRequestResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            QuotaExceededResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "images", description = "Upload a portrait for enhancement (one credit each) and download stored originals and results"),
        (name = "credits", description = "Per-user credit balance; new users start with the configured initial grant"),
        (name = "payments", description = "Hosted checkout for credit packs and the signed payment webhook that grants them"),
        (name = "identity", description = "Identity provider webhook that opens a credit account on user.created"),
        (name = "system", description = "Liveness")
    ),
    info(
        title = "Photo Revive Backend API",
        description = "Photo enhancement backend with a per-user credit ledger. Errors share one body shape: {\"ok\": false, \"error\", \"reason\", \"status\"}. Uploads beyond the per-user quota get 429 with a Retry-After header.",
    ),
    servers(
        (url = "http://localhost:5000", description = "Development server"),
    )
)]
pub struct ApiDoc;
