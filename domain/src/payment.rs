use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use time::OffsetDateTime;

use crate::auth::UserId;
use crate::error::{DomainError, DomainResult};

pub const STANDARD_PACK: &str = "Standard";
pub const PRO_PACK: &str = "Pro";

const STANDARD_PACK_CREDITS: u32 = 200;
const PRO_PACK_CREDITS: u32 = 500;

/// Credits granted by a purchased product. Unknown products grant nothing.
pub fn credits_for_product(product_name: &str) -> u32 {
    match product_name.trim() {
        STANDARD_PACK => STANDARD_PACK_CREDITS,
        PRO_PACK => PRO_PACK_CREDITS,
        _ => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymentSessionId(String);

impl PaymentSessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PaymentSessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Abandoned,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "abandoned" => Ok(Self::Abandoned),
            other => Err(DomainError::InvalidPaymentStatus(other.to_string())),
        }
    }
}

/// A validated request to open a checkout for a credit pack.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub product_name: String,
    pub unit_amount: i64,
    pub user_id: UserId,
}

impl CheckoutRequest {
    pub fn new(product_name: &str, unit_amount: i64, user_id: UserId) -> DomainResult<Self> {
        let product_name = product_name.trim();
        if product_name.is_empty() {
            return Err(DomainError::InvalidCheckout(
                "product name cannot be empty".to_string(),
            ));
        }

        if unit_amount <= 0 {
            return Err(DomainError::InvalidCheckout(
                "amount must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            product_name: product_name.to_string(),
            unit_amount,
            user_id,
        })
    }

    pub fn credits(&self) -> u32 {
        credits_for_product(&self.product_name)
    }
}

#[derive(Debug, Clone)]
pub struct PaymentSession {
    pub id: PaymentSessionId,
    pub user_id: UserId,
    pub product_name: String,
    pub credits: u32,
    pub unit_amount: i64,
    pub status: PaymentStatus,
    pub created_at: OffsetDateTime,
}

impl PaymentSession {
    pub fn pending(id: PaymentSessionId, request: &CheckoutRequest) -> Self {
        Self {
            id,
            user_id: request.user_id.clone(),
            product_name: request.product_name.clone(),
            credits: request.credits(),
            unit_amount: request.unit_amount,
            status: PaymentStatus::Pending,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Verified payment-gateway notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    CheckoutCompleted {
        event_id: String,
        session_id: PaymentSessionId,
        user_id: Option<String>,
        product_name: Option<String>,
    },
    CheckoutExpired {
        event_id: String,
        session_id: PaymentSessionId,
    },
    Ignored {
        event_id: String,
        event_type: String,
    },
}

impl PaymentEvent {
    pub fn event_id(&self) -> &str {
        match self {
            Self::CheckoutCompleted { event_id, .. }
            | Self::CheckoutExpired { event_id, .. }
            | Self::Ignored { event_id, .. } => event_id,
        }
    }
}
