use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
#[cfg(feature = "docs")]
use utoipa::OpenApi;
#[cfg(feature = "docs")]
use utoipa_swagger_ui::SwaggerUi;

use crate::incoming::http_axum::{
    handlers::{
        credits::get_user_credits,
        download::download_image,
        health::health_check,
        identity::identity_webhook,
        payments::{create_checkout_session, payment_webhook},
        upload::upload_image,
    },
    middleware::upload_quota::UploadQuota,
    router_ext::RouterExt,
};
use crate::shared::app_state::AppState;

#[cfg(feature = "docs")]
use crate::incoming::http_axum::docs::ApiDoc;

/// Room for multipart boundaries and part headers on top of the image itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_application_router(state: &AppState) -> Router<AppState> {
    build_core_routes()
        .merge(build_upload_routes(state))
        .merge(build_api_routes())
        .with_request_id()
}

fn build_core_routes() -> Router<AppState> {
    let router = Router::new().route("/health", get(health_check));

    #[cfg(feature = "docs")]
    {
        router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
    }

    #[cfg(not(feature = "docs"))]
    {
        router
    }
}

fn build_upload_routes(state: &AppState) -> Router<AppState> {
    let body_limit = state
        .config
        .storage
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let upload_routes = Router::new()
        .route("/upload", post(upload_image))
        .layer(DefaultBodyLimit::max(body_limit));

    if state.config.upload_quota.enabled {
        upload_routes.with_upload_quota(UploadQuota::from_config(&state.config.upload_quota))
    } else {
        upload_routes
    }
}

fn build_api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/user-credits", get(get_user_credits))
        .route("/download/{locator}", get(download_image))
        .route("/create-checkout-session", post(create_checkout_session))
        .route("/webhook", post(payment_webhook))
        .route("/clerk/webhook", post(identity_webhook))
}
