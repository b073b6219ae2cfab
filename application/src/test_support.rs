use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{AppError, AppResult};
use crate::ports::outgoing::{
    artifact_store::ArtifactStorePort,
    credit_store::CreditStorePort,
    enhancement::{EnhancedImage, EnhancementPort},
    identity_verifier::{IdentityClaims, IdentityVerifierPort},
    image_codec::ImageCodecPort,
    image_store::ImageStorePort,
    payment_gateway::{CreatedCheckout, PaymentGatewayPort},
    payment_session_store::PaymentSessionStorePort,
};
use domain::artifact::UploadArtifact;
use domain::auth::UserId;
use domain::credits::CreditBalance;
use domain::image::{ImageFormat, ImageKind, ImageLocator};
use domain::payment::{
    CheckoutRequest, PaymentEvent, PaymentSession, PaymentSessionId, PaymentStatus,
};

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n fake png body";

#[derive(Default)]
pub struct FakeCreditStore {
    balances: Mutex<HashMap<String, i64>>,
    applied_events: Mutex<HashSet<String>>,
    drain_before_debit: AtomicBool,
}

impl FakeCreditStore {
    pub fn with_balance(user_id: &str, credits: i64) -> Self {
        let store = Self::default();
        store
            .balances
            .lock()
            .unwrap()
            .insert(user_id.to_string(), credits);
        store
    }

    /// Simulate a concurrent request spending the balance right before the
    /// next debit.
    pub fn drain_before_debit(&self) {
        self.drain_before_debit.store(true, Ordering::SeqCst);
    }

    pub fn balance_of(&self, user_id: &str) -> Option<i64> {
        self.balances.lock().unwrap().get(user_id).copied()
    }

    pub fn total_accounts(&self) -> usize {
        self.balances.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl CreditStorePort for FakeCreditStore {
    async fn find_balance(&self, user_id: &UserId) -> AppResult<Option<CreditBalance>> {
        Ok(self.balance_of(user_id.as_str()).map(CreditBalance::new))
    }

    async fn get_or_init_balance(
        &self,
        user_id: &UserId,
        initial: CreditBalance,
    ) -> AppResult<CreditBalance> {
        let mut balances = self.balances.lock().unwrap();
        let value = *balances
            .entry(user_id.as_str().to_string())
            .or_insert(initial.available());
        Ok(CreditBalance::new(value))
    }

    async fn ensure_account(&self, user_id: &UserId, initial: CreditBalance) -> AppResult<bool> {
        let mut balances = self.balances.lock().unwrap();
        if balances.contains_key(user_id.as_str()) {
            return Ok(false);
        }
        balances.insert(user_id.as_str().to_string(), initial.available());
        Ok(true)
    }

    async fn try_debit(&self, user_id: &UserId, cost: u32) -> AppResult<bool> {
        let mut balances = self.balances.lock().unwrap();
        let Some(current) = balances.get_mut(user_id.as_str()) else {
            return Ok(false);
        };
        if self.drain_before_debit.swap(false, Ordering::SeqCst) {
            *current = 0;
        }
        match CreditBalance::new(*current).debit(cost) {
            Ok(next) => {
                *current = next.available();
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    async fn credit(&self, user_id: &UserId, amount: u32) -> AppResult<CreditBalance> {
        let mut balances = self.balances.lock().unwrap();
        let current = balances.entry(user_id.as_str().to_string()).or_insert(0);
        let next = CreditBalance::new(*current).credit(amount);
        *current = next.available();
        Ok(next)
    }

    async fn credit_for_event(
        &self,
        event_id: &str,
        user_id: &UserId,
        amount: u32,
    ) -> AppResult<Option<CreditBalance>> {
        if !self
            .applied_events
            .lock()
            .unwrap()
            .insert(event_id.to_string())
        {
            return Ok(None);
        }
        self.credit(user_id, amount).await.map(Some)
    }
}

#[derive(Default)]
pub struct FakeImageStore {
    images: Mutex<HashMap<ImageLocator, Vec<u8>>>,
}

impl FakeImageStore {
    pub fn len(&self) -> usize {
        self.images.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ImageStorePort for FakeImageStore {
    async fn put(
        &self,
        _owner: &UserId,
        kind: ImageKind,
        format: ImageFormat,
        bytes: &[u8],
    ) -> AppResult<ImageLocator> {
        let locator = ImageLocator::generate(kind, format);
        self.images.lock().unwrap().insert(locator, bytes.to_vec());
        Ok(locator)
    }

    async fn get(&self, locator: &ImageLocator) -> AppResult<Option<Vec<u8>>> {
        Ok(self.images.lock().unwrap().get(locator).cloned())
    }
}

pub struct MagicByteCodec;

impl ImageCodecPort for MagicByteCodec {
    fn detect_format(&self, bytes: &[u8]) -> Option<ImageFormat> {
        if bytes.starts_with(b"\x89PNG") {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }
}

pub struct FakeEnhancement {
    fail: bool,
}

impl FakeEnhancement {
    pub fn ok() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait::async_trait]
impl EnhancementPort for FakeEnhancement {
    async fn enhance(&self, image: &[u8], _format: ImageFormat) -> AppResult<EnhancedImage> {
        if self.fail {
            return Err(AppError::ProcessingError {
                message: "upstream returned 502".to_string(),
            });
        }
        let mut bytes = image.to_vec();
        bytes.extend_from_slice(b" enhanced");
        Ok(EnhancedImage {
            bytes,
            format: ImageFormat::Png,
        })
    }

    fn backend_name(&self) -> &'static str {
        "fake"
    }
}

#[derive(Default)]
pub struct FakeArtifactStore {
    artifacts: Mutex<Vec<UploadArtifact>>,
}

impl FakeArtifactStore {
    pub fn all(&self) -> Vec<UploadArtifact> {
        self.artifacts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ArtifactStorePort for FakeArtifactStore {
    async fn record_artifact(&self, artifact: &UploadArtifact) -> AppResult<()> {
        self.artifacts.lock().unwrap().push(artifact.clone());
        Ok(())
    }
}

/// Gateway double: any signature other than `"valid"` is rejected.
#[derive(Default)]
pub struct FakePaymentGateway {
    unavailable: bool,
    event: Option<PaymentEvent>,
    line_item: Option<String>,
    requests: Mutex<Vec<CheckoutRequest>>,
}

impl FakePaymentGateway {
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_event(mut self, event: PaymentEvent) -> Self {
        self.event = Some(event);
        self
    }

    pub fn with_line_item(mut self, name: &str) -> Self {
        self.line_item = Some(name.to_string());
        self
    }

    pub fn requests(&self) -> Vec<CheckoutRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PaymentGatewayPort for FakePaymentGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> AppResult<CreatedCheckout> {
        if self.unavailable {
            return Err(AppError::GatewayError {
                message: "connection refused".to_string(),
            });
        }
        self.requests.lock().unwrap().push(request.clone());
        Ok(CreatedCheckout {
            session_id: PaymentSessionId::new("cs_test_1"),
            checkout_url: Some("https://checkout.example/cs_test_1".to_string()),
        })
    }

    fn verify_event(&self, _payload: &[u8], signature_header: &str) -> AppResult<PaymentEvent> {
        if signature_header != "valid" {
            return Err(AppError::SignatureInvalid {
                message: "signature mismatch".to_string(),
            });
        }
        Ok(self.event.clone().unwrap_or(PaymentEvent::Ignored {
            event_id: "evt_none".to_string(),
            event_type: "ping".to_string(),
        }))
    }

    async fn purchased_product_name(
        &self,
        _session_id: &PaymentSessionId,
    ) -> AppResult<Option<String>> {
        Ok(self.line_item.clone())
    }
}

#[derive(Default)]
pub struct FakeSessionStore {
    sessions: Mutex<HashMap<PaymentSessionId, PaymentSession>>,
}

impl FakeSessionStore {
    pub fn get(&self, id: &PaymentSessionId) -> Option<PaymentSession> {
        self.sessions.lock().unwrap().get(id).cloned()
    }
}

#[async_trait::async_trait]
impl PaymentSessionStorePort for FakeSessionStore {
    async fn create_session(&self, session: &PaymentSession) -> AppResult<()> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn find_session(&self, id: &PaymentSessionId) -> AppResult<Option<PaymentSession>> {
        Ok(self.get(id))
    }

    async fn update_status(&self, id: &PaymentSessionId, status: PaymentStatus) -> AppResult<bool> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get_mut(id) {
            Some(session) if !session.status.is_terminal() => {
                session.status = status;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

pub struct FakeIdentityVerifier {
    accepted: String,
}

impl FakeIdentityVerifier {
    pub fn accepting(token: &str) -> Self {
        Self {
            accepted: token.to_string(),
        }
    }
}

impl IdentityVerifierPort for FakeIdentityVerifier {
    fn verify(&self, token: &str) -> AppResult<IdentityClaims> {
        if token == self.accepted {
            Ok(IdentityClaims {
                subject: Some("svc_identity".to_string()),
                issuer: None,
            })
        } else {
            Err(AppError::Unauthorized)
        }
    }
}
