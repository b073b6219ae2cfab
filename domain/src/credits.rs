use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

pub const DEFAULT_INITIAL_CREDITS: i64 = 5;
pub const UPLOAD_COST: u32 = 1;

#[derive(Debug, Clone)]
pub struct CreditConfig {
    pub initial_credits: i64,
}

impl CreditConfig {
    pub fn new(initial_credits: i64) -> Self {
        Self { initial_credits }
    }

    pub fn initial_balance(&self) -> CreditBalance {
        CreditBalance::new(self.initial_credits)
    }
}

impl Default for CreditConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_CREDITS)
    }
}

/// A user's credit balance. Never negative: construction clamps at zero and
/// debits that would go below zero are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CreditBalance {
    available: i64,
}

impl CreditBalance {
    pub const ZERO: Self = Self { available: 0 };

    pub fn new(available: i64) -> Self {
        Self {
            available: available.max(0),
        }
    }

    pub fn available(self) -> i64 {
        self.available
    }

    pub fn has_credits(self) -> bool {
        self.available > 0
    }

    pub fn can_afford(self, cost: u32) -> bool {
        self.available >= i64::from(cost)
    }

    pub fn debit(self, cost: u32) -> Result<Self, InsufficientCreditsError> {
        if !self.can_afford(cost) {
            return Err(InsufficientCreditsError {
                required: cost,
                available: self.available,
            });
        }

        Ok(Self {
            available: self.available - i64::from(cost),
        })
    }

    #[must_use]
    pub fn credit(self, amount: u32) -> Self {
        Self {
            available: self.available.saturating_add(i64::from(amount)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsufficientCreditsError {
    pub required: u32,
    pub available: i64,
}

impl Display for InsufficientCreditsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "Insufficient credits: required {}, available {}",
            self.required, self.available
        )
    }
}

impl Error for InsufficientCreditsError {}
