use std::collections::HashMap;

use serde::Deserialize;

use domain::payment::{PaymentEvent, PaymentSessionId};

pub(super) const CHECKOUT_COMPLETED: &str = "checkout.session.completed";
pub(super) const CHECKOUT_EXPIRED: &str = "checkout.session.expired";

#[derive(Debug, Deserialize)]
pub(super) struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub(super) struct StripeEventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(super) struct CheckoutSessionObject {
    pub id: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatedSession {
    pub id: String,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LineItemList {
    #[serde(default)]
    pub data: Vec<LineItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LineItem {
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub message: Option<String>,
}

impl StripeEvent {
    pub(super) fn into_payment_event(self) -> Result<PaymentEvent, serde_json::Error> {
        match self.event_type.as_str() {
            CHECKOUT_COMPLETED => {
                let mut session: CheckoutSessionObject = serde_json::from_value(self.data.object)?;
                Ok(PaymentEvent::CheckoutCompleted {
                    event_id: self.id,
                    session_id: PaymentSessionId::new(session.id),
                    user_id: session.metadata.remove("user_id"),
                    product_name: session.metadata.remove("product_name"),
                })
            }
            CHECKOUT_EXPIRED => {
                let session: CheckoutSessionObject = serde_json::from_value(self.data.object)?;
                Ok(PaymentEvent::CheckoutExpired {
                    event_id: self.id,
                    session_id: PaymentSessionId::new(session.id),
                })
            }
            _ => Ok(PaymentEvent::Ignored {
                event_id: self.id,
                event_type: self.event_type,
            }),
        }
    }
}
