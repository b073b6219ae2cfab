use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
};
use tracing::{debug, instrument};

use crate::incoming::http_axum::{
    core::extractors::{ClerkUserIdHeader, extract_caller_id},
    dto::responses::UploadResponse,
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;
use photo_revive_application::{error::AppError, ports::incoming::upload::ImageUpload};

#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::{
    common_responses::QuotaExceededResponse, responses::ErrorResponse,
};

const IMAGE_FIELD: &str = "image";

fn multipart_error(err: &MultipartError) -> HttpError {
    HttpError(AppError::bad_request(format!(
        "Invalid multipart body: {}",
        err.body_text()
    )))
}

async fn read_image_field(mut multipart: Multipart) -> Result<Option<ImageUpload>, HttpError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(ToString::to_string);
        let bytes = field.bytes().await.map_err(|e| multipart_error(&e))?;

        return Ok(Some(ImageUpload {
            bytes: bytes.to_vec(),
            filename,
        }));
    }

    Ok(None)
}

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/upload",
    tag = "images",
    params(
        ("Clerk-User-Id" = String, Header, description = "Identity provider user id of the caller")
    ),
    request_body(content_type = "multipart/form-data", description = "Form with a single `image` file field (JPEG, PNG or WebP)"),
    responses(
        (status = 200, description = "Original stored, enhanced copy stored, one credit spent", body = UploadResponse),
        (status = 400, description = "Missing caller id, missing or unreadable image", body = ErrorResponse),
        (status = 403, description = "Insufficient credits", body = ErrorResponse),
        (status = 404, description = "Caller has no credit account", body = ErrorResponse),
        (status = 429, response = QuotaExceededResponse),
        (status = 500, description = "Storage or enhancement failure", body = ErrorResponse)
    )
))]
#[instrument(skip_all)]
pub async fn upload_image(
    State(state): State<AppState>,
    caller: ClerkUserIdHeader,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpError> {
    let user_id = extract_caller_id(caller)?;

    let image = match multipart {
        Ok(multipart) => read_image_field(multipart).await?,
        Err(rejection) => {
            debug!(error = %rejection, "Upload request is not multipart");
            None
        }
    };

    // Runs detached so a dropped connection cannot interrupt the debit.
    let service = Arc::clone(&state.upload_service);
    let outcome = tokio::spawn(async move { service.upload_image(user_id, image).await })
        .await
        .map_err(|e| {
            HttpError(AppError::TaskError {
                message: format!("Upload task failed: {e}"),
            })
        })??;

    Ok(Json(UploadResponse {
        original_image_url: state.config.download_url(&outcome.original.to_string()),
        processed_image_url: state.config.download_url(&outcome.processed.to_string()),
    }))
}
