//! `Stripe-Signature` verification: `t=<unix>,v1=<hex>[,v1=<hex>...]` where
//! each `v1` is HMAC-SHA256 over `"<t>.<raw body>"` keyed by the endpoint
//! secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use photo_revive_application::error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

fn invalid(message: &str) -> AppError {
    AppError::SignatureInvalid {
        message: message.to_string(),
    }
}

struct ParsedHeader<'a> {
    timestamp: i64,
    signatures: Vec<&'a str>,
}

fn parse_header(header: &str) -> AppResult<ParsedHeader<'_>> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => {
                timestamp = Some(
                    value
                        .parse::<i64>()
                        .map_err(|_| invalid("malformed timestamp"))?,
                );
            }
            "v1" => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| invalid("missing timestamp"))?;
    if signatures.is_empty() {
        return Err(invalid("no v1 signature"));
    }

    Ok(ParsedHeader {
        timestamp,
        signatures,
    })
}

fn mac_for(secret: &[u8], timestamp: i64, payload: &[u8]) -> AppResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| invalid("unusable secret"))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Checks `header` against `payload` at time `now` (unix seconds).
pub fn verify(
    secret: &[u8],
    payload: &[u8],
    header: &str,
    tolerance_secs: i64,
    now: i64,
) -> AppResult<()> {
    let parsed = parse_header(header)?;

    let outside_tolerance = now
        .checked_sub(parsed.timestamp)
        .and_then(i64::checked_abs)
        .is_none_or(|drift| drift > tolerance_secs);
    if outside_tolerance {
        return Err(invalid("timestamp outside tolerance"));
    }

    let mac = mac_for(secret, parsed.timestamp, payload)?;
    let matched = parsed.signatures.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });

    if matched {
        Ok(())
    } else {
        Err(invalid("signature mismatch"))
    }
}

/// Builds a header value the way the gateway does. Used to exercise webhook
/// handling end to end.
pub fn sign(secret: &[u8], payload: &[u8], timestamp: i64) -> AppResult<String> {
    let mac = mac_for(secret, timestamp, payload)?;
    Ok(format!(
        "t={timestamp},v1={}",
        hex::encode(mac.finalize().into_bytes())
    ))
}
