use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use tracing::instrument;

use crate::incoming::http_axum::{
    core::extractors::extract_authorization, dto::responses::IdentityWebhookAck,
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;

#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::responses::ErrorResponse;

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/clerk/webhook",
    tag = "identity",
    params(
        ("Authorization" = String, Header, description = "RS256 token signed by the identity provider, with or without the `Bearer` prefix")
    ),
    request_body(content_type = "application/json", description = "`{\"type\": \"user.created\", \"data\": {\"id\": \"user_...\"}}`"),
    responses(
        (status = 200, description = "Event handled or acknowledged", body = IdentityWebhookAck),
        (status = 400, description = "Malformed event", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
))]
#[instrument(skip_all, fields(bytes = body.len()))]
pub async fn identity_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<IdentityWebhookAck>, HttpError> {
    let token = extract_authorization(&headers);

    let outcome = state
        .identity_webhook_service
        .handle_identity_webhook(token.as_deref(), &body)
        .await?;
    tracing::debug!(?outcome, "Identity webhook handled");

    Ok(Json(IdentityWebhookAck { status: "success" }))
}
