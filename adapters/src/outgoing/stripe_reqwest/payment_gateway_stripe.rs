use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use time::OffsetDateTime;
use tracing::{debug, instrument, warn};

use domain::payment::{CheckoutRequest, PaymentEvent, PaymentSessionId};
use photo_revive_application::{
    error::{AppError, AppResult},
    infrastructure_config::PaymentsConfig,
    ports::outgoing::payment_gateway::{CreatedCheckout, PaymentGatewayPort},
};

use super::signature;
use super::wire::{CreatedSession, ErrorEnvelope, LineItemList, StripeEvent};

/// Checkout sessions and webhook verification against the Stripe REST API.
#[derive(Clone)]
pub struct StripePaymentGatewayAdapter {
    client: Client,
    api_base_url: String,
    secret_key: SecretString,
    webhook_secret: SecretString,
    currency: String,
    success_url: String,
    cancel_url: String,
    tolerance_secs: i64,
}

impl Debug for StripePaymentGatewayAdapter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StripePaymentGatewayAdapter")
            .field("api_base_url", &self.api_base_url)
            .field("secret_key", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .field("currency", &self.currency)
            .finish_non_exhaustive()
    }
}

fn gateway_error(message: impl Into<String>) -> AppError {
    AppError::GatewayError {
        message: message.into(),
    }
}

impl StripePaymentGatewayAdapter {
    pub fn new(config: &PaymentsConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| gateway_error(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
            webhook_secret: config.webhook_secret.clone(),
            currency: config.currency.clone(),
            success_url: config.success_url.clone(),
            cancel_url: config.cancel_url.clone(),
            tolerance_secs: config.signature_tolerance_secs,
        })
    }

    async fn error_from(response: Response) -> AppError {
        let status = response.status();
        let detail = response
            .json::<ErrorEnvelope>()
            .await
            .ok()
            .and_then(|envelope| envelope.error.message)
            .unwrap_or_else(|| "no error detail".to_string());
        gateway_error(format!("Stripe returned {status}: {detail}"))
    }
}

#[async_trait::async_trait]
impl PaymentGatewayPort for StripePaymentGatewayAdapter {
    #[instrument(skip(self, request), fields(product = %request.product_name, user_id = %request.user_id))]
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> AppResult<CreatedCheckout> {
        let unit_amount = request.unit_amount.to_string();
        let form = [
            ("mode", "payment"),
            ("success_url", self.success_url.as_str()),
            ("cancel_url", self.cancel_url.as_str()),
            ("client_reference_id", request.user_id.as_str()),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price_data][currency]", self.currency.as_str()),
            ("line_items[0][price_data][unit_amount]", unit_amount.as_str()),
            (
                "line_items[0][price_data][product_data][name]",
                request.product_name.as_str(),
            ),
            ("metadata[user_id]", request.user_id.as_str()),
            ("metadata[product_name]", request.product_name.as_str()),
        ];

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_base_url))
            .bearer_auth(self.secret_key.expose_secret())
            .form(&form)
            .send()
            .await
            .map_err(|e| gateway_error(format!("Checkout request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let created: CreatedSession = response
            .json()
            .await
            .map_err(|e| gateway_error(format!("Unexpected checkout response: {e}")))?;

        debug!(session_id = %created.id, "Stripe checkout session created");

        Ok(CreatedCheckout {
            session_id: PaymentSessionId::new(created.id),
            checkout_url: created.url,
        })
    }

    fn verify_event(&self, payload: &[u8], signature_header: &str) -> AppResult<PaymentEvent> {
        signature::verify(
            self.webhook_secret.expose_secret().as_bytes(),
            payload,
            signature_header,
            self.tolerance_secs,
            OffsetDateTime::now_utc().unix_timestamp(),
        )
        .inspect_err(|e| warn!(error = %e, "Rejected payment webhook"))?;

        let event: StripeEvent = serde_json::from_slice(payload)?;
        Ok(event.into_payment_event()?)
    }

    #[instrument(skip(self))]
    async fn purchased_product_name(
        &self,
        session_id: &PaymentSessionId,
    ) -> AppResult<Option<String>> {
        let response = self
            .client
            .get(format!(
                "{}/v1/checkout/sessions/{}/line_items",
                self.api_base_url, session_id
            ))
            .query(&[("limit", "1")])
            .bearer_auth(self.secret_key.expose_secret())
            .send()
            .await
            .map_err(|e| gateway_error(format!("Line item lookup failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let items: LineItemList = response
            .json()
            .await
            .map_err(|e| gateway_error(format!("Unexpected line item response: {e}")))?;

        Ok(items
            .data
            .into_iter()
            .next()
            .and_then(|item| item.description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn adapter() -> StripePaymentGatewayAdapter {
        let config = PaymentsConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            secret_key: SecretString::from("sk_test"),
            webhook_secret: SecretString::from("whsec_test"),
            currency: "usd".to_string(),
            success_url: "http://localhost/success".to_string(),
            cancel_url: "http://localhost/cancel".to_string(),
            signature_tolerance_secs: 300,
            request_timeout_secs: 5,
        };
        StripePaymentGatewayAdapter::new(&config).unwrap()
    }

    fn signed(body: &str) -> String {
        signature::sign(
            b"whsec_test",
            body.as_bytes(),
            OffsetDateTime::now_utc().unix_timestamp(),
        )
        .unwrap()
    }

    #[test]
    fn completed_event_carries_metadata() {
        let body = r#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{"id":"cs_1","metadata":{"user_id":"user_1","product_name":"Pro"}}}}"#;

        let event = adapter().verify_event(body.as_bytes(), &signed(body)).unwrap();

        assert_eq!(
            event,
            PaymentEvent::CheckoutCompleted {
                event_id: "evt_1".to_string(),
                session_id: PaymentSessionId::new("cs_1"),
                user_id: Some("user_1".to_string()),
                product_name: Some("Pro".to_string()),
            }
        );
    }

    #[test]
    fn expired_and_unrelated_events_decode() {
        let expired = r#"{"id":"evt_2","type":"checkout.session.expired","data":{"object":{"id":"cs_2"}}}"#;
        assert!(matches!(
            adapter().verify_event(expired.as_bytes(), &signed(expired)).unwrap(),
            PaymentEvent::CheckoutExpired { .. }
        ));

        let other = r#"{"id":"evt_3","type":"invoice.paid","data":{"object":{}}}"#;
        assert!(matches!(
            adapter().verify_event(other.as_bytes(), &signed(other)).unwrap(),
            PaymentEvent::Ignored { .. }
        ));
    }

    #[test]
    fn signature_is_checked_before_decoding() {
        let err = adapter()
            .verify_event(b"not json at all", "t=1,v1=00")
            .unwrap_err();
        assert!(matches!(err, AppError::SignatureInvalid { .. }));
    }

    #[test]
    fn authentic_but_malformed_payload_is_a_json_error() {
        let body = "not json at all";
        let err = adapter().verify_event(body.as_bytes(), &signed(body)).unwrap_err();
        assert!(matches!(err, AppError::JsonError(_)));
    }
}
