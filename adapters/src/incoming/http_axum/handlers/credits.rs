use axum::{Json, extract::State};
use tracing::instrument;

use crate::incoming::http_axum::{
    core::extractors::{ClerkUserIdHeader, extract_caller_id},
    dto::responses::CreditsResponse,
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;

#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::responses::ErrorResponse;

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/api/user-credits",
    tag = "credits",
    params(
        ("Clerk-User-Id" = String, Header, description = "Identity provider user id of the caller")
    ),
    responses(
        (status = 200, description = "Current balance; unknown users are created with the initial grant", body = CreditsResponse),
        (status = 400, description = "Missing or invalid Clerk-User-Id header", body = ErrorResponse),
        (status = 500, description = "Ledger unavailable", body = ErrorResponse)
    )
))]
#[instrument(skip(state, caller))]
pub async fn get_user_credits(
    State(state): State<AppState>,
    caller: ClerkUserIdHeader,
) -> Result<Json<CreditsResponse>, HttpError> {
    let user_id = extract_caller_id(caller)?;

    let balance = state
        .credits_query_service
        .get_or_init_credits(user_id)
        .await?;

    Ok(Json(CreditsResponse {
        credits: balance.available(),
    }))
}
