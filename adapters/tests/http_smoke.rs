mod common;

use std::sync::Arc;

use axum::http::{
    StatusCode,
    header::{CONTENT_TYPE, RETRY_AFTER},
};
use tower::ServiceExt;

use common::{
    TestApp, get, multipart_body, read_bytes, read_json, sample_png, upload_request,
};
use domain::image::ImageFormat;
use photo_revive_application::{
    error::{AppError, AppResult},
    ports::outgoing::enhancement::{EnhancedImage, EnhancementPort},
};

struct UnavailableEnhancement;

#[async_trait::async_trait]
impl EnhancementPort for UnavailableEnhancement {
    async fn enhance(&self, _image: &[u8], _format: ImageFormat) -> AppResult<EnhancedImage> {
        Err(AppError::ProcessingError {
            message: "inference provider returned 503".to_string(),
        })
    }

    fn backend_name(&self) -> &'static str {
        "unavailable"
    }
}

fn locator_of(url: &str) -> &str {
    url.rsplit('/').next().unwrap()
}

#[tokio::test]
async fn health_reports_backends() {
    let app = TestApp::spawn().await;

    let response = app.router.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = read_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["data"]["enhancement_backend"], "local");
    assert_eq!(body["data"]["storage_backend"], "memory");
}

#[tokio::test]
async fn unknown_user_credit_query_creates_default_grant() {
    let app = TestApp::spawn().await;

    let request = axum::http::Request::builder()
        .uri("/api/user-credits")
        .header("Clerk-User-Id", "user_new")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["credits"], 5);
    assert_eq!(app.credits_of("user_new").await, Some(5));
}

#[tokio::test]
async fn credit_query_without_header_is_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/user-credits"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["reason"], "bad_request");
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn upload_with_one_credit_returns_two_downloadable_urls() {
    let app = TestApp::spawn().await;
    app.seed_credits("user_1", 1).await;
    let png = sample_png();

    let response = app
        .router
        .clone()
        .oneshot(upload_request(
            Some("user_1"),
            multipart_body("image", "../../face.png", &png),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let original_url = body["original_image_url"].as_str().unwrap().to_string();
    let processed_url = body["processed_image_url"].as_str().unwrap().to_string();
    assert_ne!(original_url, processed_url);
    assert!(original_url.starts_with("http://photos.test/download/"));
    assert!(processed_url.ends_with("-processed.png"));
    assert_eq!(app.credits_of("user_1").await, Some(0));
    assert_eq!(app.image_store.len(), 2);

    let download = app
        .router
        .clone()
        .oneshot(get(&format!("/download/{}", locator_of(&original_url))))
        .await
        .unwrap();
    assert_eq!(download.status(), StatusCode::OK);
    assert_eq!(download.headers()[CONTENT_TYPE], "image/png");
    assert!(
        download.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .starts_with("attachment")
    );
    assert_eq!(read_bytes(download).await, png);

    let processed = app
        .router
        .clone()
        .oneshot(get(&format!("/download/{}", locator_of(&processed_url))))
        .await
        .unwrap();
    let enhanced = image::load_from_memory(&read_bytes(processed).await).unwrap();
    assert_eq!((enhanced.width(), enhanced.height()), (16, 12));
}

#[tokio::test]
async fn upload_with_zero_credits_is_forbidden_and_stores_nothing() {
    let app = TestApp::spawn().await;
    app.seed_credits("user_broke", 0).await;

    let response = app
        .router
        .clone()
        .oneshot(upload_request(
            Some("user_broke"),
            multipart_body("image", "face.png", &sample_png()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(read_json(response).await["reason"], "insufficient_credits");
    assert!(app.image_store.is_empty());
    assert_eq!(app.credits_of("user_broke").await, Some(0));
}

#[tokio::test]
async fn upload_for_unknown_user_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .router
        .clone()
        .oneshot(upload_request(
            Some("user_ghost"),
            multipart_body("image", "face.png", &sample_png()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["error"], "User not found");
    assert_eq!(app.credits_of("user_ghost").await, None);
}

#[tokio::test]
async fn upload_without_image_field_is_bad_request_regardless_of_balance() {
    let app = TestApp::spawn().await;
    app.seed_credits("user_1", 3).await;

    let response = app
        .router
        .clone()
        .oneshot(upload_request(
            Some("user_1"),
            multipart_body("avatar", "face.png", &sample_png()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.credits_of("user_1").await, Some(3));
    assert!(app.image_store.is_empty());
}

#[tokio::test]
async fn non_image_payload_is_bad_request() {
    let app = TestApp::spawn().await;
    app.seed_credits("user_1", 3).await;

    let response = app
        .router
        .clone()
        .oneshot(upload_request(
            Some("user_1"),
            multipart_body("image", "notes.txt", b"just some text"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.credits_of("user_1").await, Some(3));
}

#[tokio::test]
async fn enhancement_failure_keeps_original_and_does_not_debit() {
    let app = TestApp::spawn_with_enhancement(Arc::new(UnavailableEnhancement)).await;
    app.seed_credits("user_1", 2).await;

    let response = app
        .router
        .clone()
        .oneshot(upload_request(
            Some("user_1"),
            multipart_body("image", "face.png", &sample_png()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Image processing failed");
    assert!(!body.to_string().contains("503"));
    assert_eq!(app.credits_of("user_1").await, Some(2));
    assert_eq!(app.image_store.len(), 1);
    assert_eq!(app.artifact_store.incomplete().len(), 1);
}

#[tokio::test]
async fn malformed_or_unknown_locator_is_not_found() {
    let app = TestApp::spawn().await;

    for uri in [
        "/download/..%2F..%2Fetc%2Fpasswd",
        "/download/user_1_face.png",
        "/download/0123456789abcdef0123456789abcdef-original.png",
    ] {
        let response = app.router.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(read_json(response).await["reason"], "not_found");
    }
}

#[tokio::test]
async fn upload_quota_is_tracked_per_user() {
    let app = TestApp::spawn_with(
        |config| {
            config.upload_quota.enabled = true;
            config.upload_quota.max_uploads = 1;
            config.upload_quota.window_secs = 3600;
        },
        None,
    )
    .await;
    app.seed_credits("user_busy", 5).await;
    app.seed_credits("user_other", 5).await;
    let png = sample_png();

    let first = app
        .router
        .clone()
        .oneshot(upload_request(
            Some("user_busy"),
            multipart_body("image", "a.png", &png),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .router
        .clone()
        .oneshot(upload_request(
            Some("user_busy"),
            multipart_body("image", "b.png", &png),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = second.headers()[RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=3600).contains(&retry_after));
    let body = read_json(second).await;
    assert_eq!(body["reason"], "upload_quota_exceeded");
    assert_eq!(body["status"], 429);
    assert_eq!(app.credits_of("user_busy").await, Some(4));

    let other = app
        .router
        .clone()
        .oneshot(upload_request(
            Some("user_other"),
            multipart_body("image", "c.png", &png),
        ))
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::OK);
}

#[tokio::test]
async fn upload_quota_ignores_requests_without_a_caller() {
    let app = TestApp::spawn_with(
        |config| {
            config.upload_quota.enabled = true;
            config.upload_quota.max_uploads = 1;
        },
        None,
    )
    .await;

    for _ in 0..3 {
        let response = app
            .router
            .clone()
            .oneshot(upload_request(None, Vec::new()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
