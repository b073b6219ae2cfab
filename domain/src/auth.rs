use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::error::{DomainError, DomainResult};

pub const MAX_USER_ID_LEN: usize = 255;

/// Opaque user identifier issued by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidUserId(
                "user id cannot be empty".to_string(),
            ));
        }

        if trimmed.len() > MAX_USER_ID_LEN {
            return Err(DomainError::InvalidUserId(format!(
                "user id exceeds {MAX_USER_ID_LEN} bytes"
            )));
        }

        if trimmed.chars().any(char::is_control) {
            return Err(DomainError::InvalidUserId(
                "user id contains control characters".to_string(),
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Event type emitted by the identity provider when an account is created.
pub const USER_CREATED_EVENT: &str = "user.created";
