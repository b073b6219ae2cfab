use axum::http::{HeaderMap, HeaderName, HeaderValue, header::AUTHORIZATION};
use axum_extra::{
    TypedHeader,
    headers::{Error as HeaderError, Header},
    typed_header::TypedHeaderRejection,
};
use std::iter;

use crate::incoming::http_axum::error_mapper::HttpError;
use photo_revive_application::error::AppError;

static CLERK_USER_ID: HeaderName = HeaderName::from_static("clerk-user-id");
static STRIPE_SIGNATURE: HeaderName = HeaderName::from_static("stripe-signature");

fn decode_text<'i, I>(values: &mut I) -> Result<String, HeaderError>
where
    I: Iterator<Item = &'i HeaderValue>,
{
    let value = values.next().ok_or_else(HeaderError::invalid)?;
    value
        .to_str()
        .map(ToString::to_string)
        .map_err(|_| HeaderError::invalid())
}

fn encode_text<E: Extend<HeaderValue>>(raw: &str, values: &mut E) {
    if let Ok(value) = HeaderValue::from_str(raw) {
        values.extend(iter::once(value));
    }
}

/// Caller identity asserted by the frontend after it authenticated the user.
#[derive(Debug, Clone)]
pub struct ClerkUserId(pub String);

impl Header for ClerkUserId {
    fn name() -> &'static HeaderName {
        &CLERK_USER_ID
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, HeaderError>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        decode_text(values).map(Self)
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        encode_text(&self.0, values);
    }
}

/// Raw `Stripe-Signature` header, parsed by the payment gateway adapter.
#[derive(Debug, Clone)]
pub struct StripeSignature(pub String);

impl Header for StripeSignature {
    fn name() -> &'static HeaderName {
        &STRIPE_SIGNATURE
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, HeaderError>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        decode_text(values).map(Self)
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        encode_text(&self.0, values);
    }
}

pub type ClerkUserIdHeader = Result<TypedHeader<ClerkUserId>, TypedHeaderRejection>;
pub type StripeSignatureHeader = Result<TypedHeader<StripeSignature>, TypedHeaderRejection>;

/// A missing header is left for the use case to reject; an unreadable one is a
/// bad request here.
pub fn extract_caller_id(header: ClerkUserIdHeader) -> Result<Option<String>, HttpError> {
    match header {
        Ok(TypedHeader(ClerkUserId(id))) => Ok(Some(id)),
        Err(rejection) if rejection.is_missing() => Ok(None),
        Err(_) => Err(HttpError(AppError::bad_request(
            "Clerk-User-Id header is not valid text",
        ))),
    }
}

pub fn extract_stripe_signature(header: StripeSignatureHeader) -> Option<String> {
    header.ok().map(|TypedHeader(StripeSignature(raw))| raw)
}

/// Raw caller id for middleware that runs before the typed extractor.
pub fn caller_id_hint(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(&CLERK_USER_ID)
        .and_then(|value| value.to_str().ok())
}

/// The identity provider sends either `Bearer <jwt>` or the bare token.
pub fn extract_authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}
