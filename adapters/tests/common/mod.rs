#![allow(dead_code)]

pub mod stub_gateway;

use std::io::Cursor;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, header::CONTENT_TYPE},
    response::Response,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use secrecy::SecretString;
use serde_json::{Value, json};
use time::OffsetDateTime;

use domain::auth::UserId;
use domain::credits::CreditBalance;
use photo_revive_adapters::{
    incoming::http_axum::routes::build_application_router,
    outgoing::{
        image_rs::{
            image_codec_image::ImageRsCodecAdapter,
            local_upscale_image::LocalUpscaleEnhancementAdapter,
        },
        jwt_identity::identity_verifier_jwt::JwtIdentityVerifierAdapter,
        memory::{
            artifact_store_memory::MemoryArtifactStoreAdapter,
            credit_store_memory::MemoryCreditStoreAdapter,
            image_store_memory::MemoryImageStoreAdapter,
            payment_session_store_memory::MemoryPaymentSessionStoreAdapter,
        },
        stripe_reqwest::{payment_gateway_stripe::StripePaymentGatewayAdapter, signature},
    },
    shared::app_state::AppState,
};
use photo_revive_application::{
    config::{UploadSettings, credit_config},
    credits::service::CreditService,
    identity::service::IdentityWebhookService,
    infrastructure_config::{Config, StorageBackend},
    payments::service::PaymentService,
    ports::outgoing::{credit_store::CreditStorePort, enhancement::DynEnhancementPort},
    upload::service::{UploadService, UploadServiceDeps},
};

use stub_gateway::StubGateway;

pub const WEBHOOK_SECRET: &str = "whsec_integration";
pub const PUBLIC_BASE_URL: &str = "http://photos.test";
pub const IDENTITY_PUBLIC_KEY: &str = include_str!("../fixtures/identity_public_key.pem");
pub const IDENTITY_SIGNING_KEY: &str = include_str!("../fixtures/identity_signing_key.pem");
pub const FOREIGN_SIGNING_KEY: &str = include_str!("../fixtures/foreign_signing_key.pem");

pub struct TestApp {
    pub router: Router,
    pub credit_store: Arc<MemoryCreditStoreAdapter>,
    pub image_store: Arc<MemoryImageStoreAdapter>,
    pub artifact_store: Arc<MemoryArtifactStoreAdapter>,
    pub sessions: Arc<MemoryPaymentSessionStoreAdapter>,
    pub gateway: StubGateway,
}

pub fn test_config(gateway_url: &str) -> Config {
    let mut config = Config::default();
    config.server.public_base_url = PUBLIC_BASE_URL.to_string();
    config.storage.backend = StorageBackend::Memory;
    config.upload_quota.enabled = false;
    config.payments.api_base_url = gateway_url.to_string();
    config.payments.secret_key = SecretString::from("sk_test_integration");
    config.payments.webhook_secret = SecretString::from(WEBHOOK_SECRET);
    config.identity.jwt_public_key_pem = IDENTITY_PUBLIC_KEY.to_string();
    config
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}, None).await
    }

    pub async fn spawn_with_enhancement(enhancement: DynEnhancementPort) -> Self {
        Self::spawn_with(|_| {}, Some(enhancement)).await
    }

    pub async fn spawn_with(
        tweak: impl FnOnce(&mut Config),
        enhancement: Option<DynEnhancementPort>,
    ) -> Self {
        let gateway = StubGateway::start().await;
        let mut config = test_config(&gateway.base_url);
        tweak(&mut config);
        let config = Arc::new(config);

        let credit_store = Arc::new(MemoryCreditStoreAdapter::new());
        let image_store = Arc::new(MemoryImageStoreAdapter::new());
        let artifact_store = Arc::new(MemoryArtifactStoreAdapter::new());
        let sessions = Arc::new(MemoryPaymentSessionStoreAdapter::new());
        let enhancement: DynEnhancementPort =
            enhancement.unwrap_or_else(|| Arc::new(LocalUpscaleEnhancementAdapter::new(2)));
        let enhancement_backend = enhancement.backend_name();

        let upload_service = Arc::new(UploadService::new(
            UploadServiceDeps {
                credit_store: credit_store.clone(),
                image_store: image_store.clone(),
                image_codec: Arc::new(ImageRsCodecAdapter::new()),
                enhancement,
                artifact_store: artifact_store.clone(),
            },
            UploadSettings::from_config(&config),
        ));
        let payment_service = Arc::new(PaymentService::new(
            Arc::new(StripePaymentGatewayAdapter::new(&config.payments).unwrap()),
            sessions.clone(),
            credit_store.clone(),
        ));
        let identity_service = Arc::new(IdentityWebhookService::new(
            Arc::new(JwtIdentityVerifierAdapter::new(&config.identity).unwrap()),
            credit_store.clone(),
            credit_config(&config),
        ));

        let state = AppState::new(
            Arc::clone(&config),
            Arc::new(CreditService::new(
                credit_store.clone(),
                credit_config(&config),
            )),
            upload_service.clone(),
            upload_service,
            payment_service.clone(),
            payment_service,
            identity_service,
            enhancement_backend,
        );

        let router = build_application_router(&state).with_state(state);

        Self {
            router,
            credit_store,
            image_store,
            artifact_store,
            sessions,
            gateway,
        }
    }

    pub async fn seed_credits(&self, user_id: &str, credits: i64) {
        self.credit_store
            .ensure_account(&UserId::parse(user_id).unwrap(), CreditBalance::new(credits))
            .await
            .unwrap();
    }

    pub async fn credits_of(&self, user_id: &str) -> Option<i64> {
        self.credit_store
            .find_balance(&UserId::parse(user_id).unwrap())
            .await
            .unwrap()
            .map(CreditBalance::available)
    }
}

pub async fn read_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn read_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn sample_png() -> Vec<u8> {
    let image = RgbImage::from_fn(8, 6, |x, y| Rgb([(x * 30) as u8, (y * 40) as u8, 90]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    bytes
}

const BOUNDARY: &str = "photo-revive-test-boundary";

pub fn multipart_body(field: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn upload_request(user_id: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(user_id) = user_id {
        builder = builder.header("Clerk-User-Id", user_id);
    }
    builder.body(Body::from(body)).expect("request")
}

pub fn signed_webhook(payload: &str) -> Request<Body> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let header = signature::sign(WEBHOOK_SECRET.as_bytes(), payload.as_bytes(), now).unwrap();
    webhook_with_signature(payload, Some(&header))
}

pub fn webhook_with_signature(payload: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(CONTENT_TYPE, "application/json");
    if let Some(signature) = signature {
        builder = builder.header("Stripe-Signature", signature);
    }
    builder
        .body(Body::from(payload.to_string()))
        .expect("request")
}

pub fn completed_event(event_id: &str, session_id: &str, user_id: &str) -> String {
    json!({
        "id": event_id,
        "type": "checkout.session.completed",
        "data": { "object": {
            "id": session_id,
            "metadata": { "user_id": user_id }
        }}
    })
    .to_string()
}

pub fn identity_token(signing_key: &str) -> String {
    let exp = OffsetDateTime::now_utc().unix_timestamp() + 300;
    encode(
        &Header::new(Algorithm::RS256),
        &json!({ "sub": "svix_webhooks", "exp": exp }),
        &EncodingKey::from_rsa_pem(signing_key.as_bytes()).unwrap(),
    )
    .unwrap()
}

pub fn identity_webhook(token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/clerk/webhook")
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}
