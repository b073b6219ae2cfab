use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::JsonRejection},
};
use tracing::instrument;
use validator::Validate;

use crate::incoming::http_axum::{
    core::extractors::{StripeSignatureHeader, extract_stripe_signature},
    dto::{
        requests::CreateCheckoutRequest,
        responses::{CheckoutSessionResponse, PaymentWebhookAck},
    },
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;
use photo_revive_application::error::AppError;

#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::responses::ErrorResponse;

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/create-checkout-session",
    tag = "payments",
    request_body = CreateCheckoutRequest,
    responses(
        (status = 200, description = "Hosted checkout session created", body = CheckoutSessionResponse),
        (status = 400, description = "Malformed body, invalid amount or missing user id", body = ErrorResponse),
        (status = 500, description = "Payment gateway rejected or unreachable", body = ErrorResponse)
    )
))]
#[instrument(skip_all)]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateCheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutSessionResponse>, HttpError> {
    let Json(request) = payload
        .map_err(|rejection| HttpError(AppError::bad_request(rejection.body_text())))?;

    request
        .validate()
        .map_err(|e| HttpError(AppError::bad_request(e.to_string())))?;

    let session_id = state
        .checkout_service
        .create_checkout_session(&request.name, request.amount, request.metadata.user_id)
        .await?;

    Ok(Json(CheckoutSessionResponse {
        id: session_id.as_str().to_string(),
    }))
}

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/webhook",
    tag = "payments",
    params(
        ("Stripe-Signature" = String, Header, description = "`t=<unix>,v1=<hex hmac-sha256>` over `<t>.<raw body>`")
    ),
    request_body(content_type = "application/json", description = "Raw gateway event, verified byte for byte"),
    responses(
        (status = 200, description = "Event accepted (including ignored and redelivered events)", body = PaymentWebhookAck),
        (status = 400, description = "Missing or invalid signature, or undecodable event", body = ErrorResponse)
    )
))]
#[instrument(skip_all, fields(bytes = body.len()))]
pub async fn payment_webhook(
    State(state): State<AppState>,
    signature: StripeSignatureHeader,
    body: Bytes,
) -> Result<Json<PaymentWebhookAck>, HttpError> {
    let signature = extract_stripe_signature(signature);

    state
        .payment_webhook_service
        .handle_payment_webhook(&body, signature.as_deref())
        .await?;

    Ok(Json(PaymentWebhookAck { success: true }))
}
