use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use tracing::debug;

use photo_revive_application::{
    error::{AppError, AppResult},
    infrastructure_config::IdentityConfig,
    ports::outgoing::identity_verifier::{IdentityClaims, IdentityVerifierPort},
};

#[derive(Debug, Deserialize)]
struct WebhookClaims {
    sub: Option<String>,
    iss: Option<String>,
}

/// Verifies RS256 tokens issued by the identity provider against its PEM
/// public key. `exp` is always required.
pub struct JwtIdentityVerifierAdapter {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifierAdapter {
    pub fn new(config: &IdentityConfig) -> AppResult<Self> {
        let key = DecodingKey::from_rsa_pem(config.jwt_public_key_pem.as_bytes()).map_err(|e| {
            AppError::ConfigError {
                message: format!("identity jwt_public_key_pem is not a usable RSA key: {e}"),
            }
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Ok(Self { key, validation })
    }
}

impl IdentityVerifierPort for JwtIdentityVerifierAdapter {
    fn verify(&self, token: &str) -> AppResult<IdentityClaims> {
        let data = decode::<WebhookClaims>(token, &self.key, &self.validation).map_err(|e| {
            debug!(error = %e, "Identity token rejected");
            AppError::Unauthorized
        })?;

        Ok(IdentityClaims {
            subject: data.claims.sub,
            issuer: data.claims.iss,
        })
    }
}
