use axum::{
    extract::{Path, State},
    http::{
        HeaderMap, HeaderValue,
        header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS},
    },
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::incoming::http_axum::error_mapper::HttpError;
use crate::shared::app_state::AppState;

#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::responses::ErrorResponse;

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/download/{locator}",
    tag = "images",
    params(
        ("locator" = String, Path, description = "Locator returned by /upload, e.g. `<32 hex>-processed.png`")
    ),
    responses(
        (status = 200, description = "Stored image bytes as an attachment", content_type = "application/octet-stream"),
        (status = 404, description = "Unknown or malformed locator", body = ErrorResponse)
    )
))]
#[instrument(skip(state))]
pub async fn download_image(
    State(state): State<AppState>,
    Path(locator): Path<String>,
) -> Result<Response, HttpError> {
    let image = state.image_query_service.get_image(&locator).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static(image.locator.format().content_type()),
    );
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("private, max-age=86400, immutable"),
    );
    if let Ok(disposition) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", image.locator))
    {
        headers.insert(CONTENT_DISPOSITION, disposition);
    }

    Ok((headers, image.bytes).into_response())
}
