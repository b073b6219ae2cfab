use std::sync::Arc;

use crate::error::AppResult;

#[derive(Debug, Clone, Default)]
pub struct IdentityClaims {
    pub subject: Option<String>,
    pub issuer: Option<String>,
}

pub trait IdentityVerifierPort: Send + Sync {
    /// Verify a signed token from the identity provider. Any failure is
    /// `AppError::Unauthorized`.
    fn verify(&self, token: &str) -> AppResult<IdentityClaims>;
}

pub type DynIdentityVerifierPort = Arc<dyn IdentityVerifierPort>;
