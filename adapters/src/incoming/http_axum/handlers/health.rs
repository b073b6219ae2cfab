use axum::{Json, extract::State};

#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::responses::ApiResponseValue;
use crate::incoming::http_axum::dto::responses::{ApiResponse, HealthResponse};
use crate::shared::app_state::AppState;

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up; reports the configured backends", body = ApiResponseValue,
         example = json!({
             "ok": true,
             "data": {
                 "status": "healthy",
                 "enhancement_backend": "replicate",
                 "storage_backend": "local"
             }
         })
        )
    ),
    tag = "system",
    summary = "Liveness check",
    operation_id = "health_check"
))]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success_with_data(Some(HealthResponse {
        status: "healthy",
        enhancement_backend: state.enhancement_backend,
        storage_backend: state.storage_backend(),
    })))
}
