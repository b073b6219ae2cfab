use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::ports::incoming::identity::{IdentityWebhookOutcome, IdentityWebhookUseCase};
use crate::ports::outgoing::{
    credit_store::DynCreditStorePort, identity_verifier::DynIdentityVerifierPort,
};
use domain::auth::{USER_CREATED_EVENT, UserId};
use domain::credits::CreditConfig;

#[derive(Debug, Deserialize)]
struct IdentityEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: Option<IdentityEventData>,
}

#[derive(Debug, Deserialize)]
struct IdentityEventData {
    id: Option<String>,
}

/// Accept a bare token or an `Authorization: Bearer <token>` value.
fn strip_bearer(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
        _ => raw,
    }
}

pub struct IdentityWebhookService {
    verifier: DynIdentityVerifierPort,
    credit_store: DynCreditStorePort,
    credit_config: CreditConfig,
}

impl IdentityWebhookService {
    pub fn new(
        verifier: DynIdentityVerifierPort,
        credit_store: DynCreditStorePort,
        credit_config: CreditConfig,
    ) -> Self {
        Self {
            verifier,
            credit_store,
            credit_config,
        }
    }
}

#[async_trait::async_trait]
impl IdentityWebhookUseCase for IdentityWebhookService {
    #[tracing::instrument(skip_all, fields(bytes = payload.len()))]
    async fn handle_identity_webhook(
        &self,
        token: Option<&str>,
        payload: &[u8],
    ) -> AppResult<IdentityWebhookOutcome> {
        let token = token.map(strip_bearer).filter(|t| !t.is_empty());
        let Some(token) = token else {
            tracing::debug!("Identity webhook without a token");
            return Err(AppError::Unauthorized);
        };

        let claims = self.verifier.verify(token)?;

        let event: IdentityEvent = serde_json::from_slice(payload)
            .map_err(|e| AppError::bad_request(format!("Invalid webhook payload: {e}")))?;

        if event.event_type != USER_CREATED_EVENT {
            tracing::debug!(event_type = %event.event_type, "Ignoring identity event");
            return Ok(IdentityWebhookOutcome::Ignored);
        }

        let raw_id = event
            .data
            .and_then(|data| data.id)
            .ok_or_else(|| AppError::bad_request("user.created event carries no user id"))?;
        let user_id = UserId::parse(&raw_id)?;

        let created = self
            .credit_store
            .ensure_account(&user_id, self.credit_config.initial_balance())
            .await?;

        tracing::info!(
            user_id = %user_id,
            created,
            token_subject = claims.subject.as_deref().unwrap_or_default(),
            "Identity user.created processed"
        );

        Ok(if created {
            IdentityWebhookOutcome::AccountCreated
        } else {
            IdentityWebhookOutcome::AccountExisted
        })
    }
}
