use crate::credits::service::require_user_id;
use crate::error::{AppError, AppResult};
use crate::ports::incoming::payments::{CheckoutUseCase, PaymentWebhookUseCase};
use crate::ports::outgoing::{
    credit_store::DynCreditStorePort, payment_gateway::DynPaymentGatewayPort,
    payment_session_store::DynPaymentSessionStorePort,
};
use domain::auth::UserId;
use domain::payment::{
    CheckoutRequest, PaymentEvent, PaymentSession, PaymentSessionId, PaymentStatus,
    credits_for_product,
};

pub struct PaymentService {
    gateway: DynPaymentGatewayPort,
    session_store: DynPaymentSessionStorePort,
    credit_store: DynCreditStorePort,
}

impl PaymentService {
    pub fn new(
        gateway: DynPaymentGatewayPort,
        session_store: DynPaymentSessionStorePort,
        credit_store: DynCreditStorePort,
    ) -> Self {
        Self {
            gateway,
            session_store,
            credit_store,
        }
    }

    async fn resolve_product_name(
        &self,
        session_id: &PaymentSessionId,
        metadata_product: Option<String>,
    ) -> AppResult<Option<String>> {
        let line_item = self
            .gateway
            .purchased_product_name(session_id)
            .await
            .map_err(|e| match e {
                AppError::GatewayError { .. } => e,
                other => AppError::GatewayError {
                    message: other.to_string(),
                },
            })?;

        if line_item.is_some() {
            return Ok(line_item);
        }

        if metadata_product.is_some() {
            return Ok(metadata_product);
        }

        Ok(self
            .session_store
            .find_session(session_id)
            .await?
            .map(|session| session.product_name))
    }

    async fn on_checkout_completed(
        &self,
        event_id: &str,
        session_id: &PaymentSessionId,
        user_id: Option<String>,
        metadata_product: Option<String>,
    ) -> AppResult<()> {
        let Some(user_id) = user_id.and_then(|raw| UserId::parse(&raw).ok()) else {
            tracing::warn!(
                event_id,
                session_id = %session_id,
                "Completed checkout carries no usable user id, nothing to credit"
            );
            return Ok(());
        };

        let product_name = self
            .resolve_product_name(session_id, metadata_product)
            .await?
            .unwrap_or_default();
        let credits = credits_for_product(&product_name);

        if credits == 0 {
            tracing::warn!(
                event_id,
                session_id = %session_id,
                product = %product_name,
                "Completed checkout for a product that grants no credits"
            );
            return Ok(());
        }

        match self
            .credit_store
            .credit_for_event(event_id, &user_id, credits)
            .await?
        {
            Some(balance) => tracing::info!(
                event_id,
                user_id = %user_id,
                credits,
                balance = balance.available(),
                "Credits purchased"
            ),
            None => tracing::info!(
                event_id,
                user_id = %user_id,
                "Payment event already applied, skipping"
            ),
        }

        self.mark_session(session_id, PaymentStatus::Completed).await;

        Ok(())
    }

    async fn mark_session(&self, session_id: &PaymentSessionId, status: PaymentStatus) {
        match self.session_store.update_status(session_id, status).await {
            Ok(true) => {
                tracing::debug!(
                    session_id = %session_id,
                    status = status.as_str(),
                    "Session updated"
                );
            }
            Ok(false) => {
                tracing::debug!(
                    session_id = %session_id,
                    status = status.as_str(),
                    "Session unknown or already settled"
                );
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "Failed to update session status"
                );
            }
        }
    }
}

#[async_trait::async_trait]
impl CheckoutUseCase for PaymentService {
    #[tracing::instrument(skip(self))]
    async fn create_checkout_session(
        &self,
        product_name: &str,
        unit_amount: i64,
        user_id: Option<String>,
    ) -> AppResult<PaymentSessionId> {
        let user_id = require_user_id(user_id)?;
        let request = CheckoutRequest::new(product_name, unit_amount, user_id)?;

        if request.credits() == 0 {
            tracing::warn!(
                product = %request.product_name,
                "Checkout opened for a product that grants no credits"
            );
        }

        let created = self
            .gateway
            .create_checkout_session(&request)
            .await
            .map_err(|e| match e {
                AppError::GatewayError { .. } => e,
                other => AppError::GatewayError {
                    message: other.to_string(),
                },
            })?;

        let session = PaymentSession::pending(created.session_id.clone(), &request);
        if let Err(e) = self.session_store.create_session(&session).await {
            tracing::warn!(
                session_id = %session.id,
                error = %e,
                "Failed to persist checkout session"
            );
        }

        tracing::info!(
            session_id = %session.id,
            user_id = %session.user_id,
            product = %session.product_name,
            credits = session.credits,
            "Checkout session created"
        );

        Ok(created.session_id)
    }
}

#[async_trait::async_trait]
impl PaymentWebhookUseCase for PaymentService {
    #[tracing::instrument(skip(self, payload, signature), fields(bytes = payload.len()))]
    async fn handle_payment_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> AppResult<()> {
        let signature = signature.ok_or_else(|| AppError::SignatureInvalid {
            message: "missing signature header".to_string(),
        })?;

        let event = self.gateway.verify_event(payload, signature)?;

        match event {
            PaymentEvent::CheckoutCompleted {
                event_id,
                session_id,
                user_id,
                product_name,
            } => {
                self.on_checkout_completed(&event_id, &session_id, user_id, product_name).await
            }
            PaymentEvent::CheckoutExpired {
                event_id,
                session_id,
            } => {
                tracing::info!(
                    event_id = %event_id,
                    session_id = %session_id,
                    "Checkout session expired"
                );
                self.mark_session(&session_id, PaymentStatus::Abandoned).await;
                Ok(())
            }
            PaymentEvent::Ignored {
                event_id,
                event_type,
            } => {
                tracing::debug!(
                    event_id = %event_id,
                    event_type = %event_type,
                    "Ignoring payment event"
                );
                Ok(())
            }
        }
    }
}
