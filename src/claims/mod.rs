//! Unsigned bearer-token claims validation.
//!
//! Decodes the token payload without verifying any cryptographic signature:
//! the mock environment has no trusted issuer keys, so the decode is
//! claims-only and must never be mistaken for real verification. Production
//! use requires signature verification against the issuer's published keys.
//!
//! Only `aud` and `exp` are inspected.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::error::TokenError;
use crate::helpers::time::now_i64;

#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub aud: String,
    pub exp: i64,
}

/// Extract claims from the payload segment of a JWT-shaped token.
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Malformed("expected three segments".into()));
    }

    let decoded = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| TokenError::Malformed(format!("base64 decode error: {}", e)))?;

    serde_json::from_slice::<Claims>(&decoded)
        .map_err(|e| TokenError::Malformed(format!("invalid payload: {}", e)))
}

/// Decode and check audience and expiry against the configured expectation.
pub fn validate_claims(token: &str, expected_audience: &str) -> Result<Claims, TokenError> {
    let claims = decode_claims(token)?;

    if claims.aud != expected_audience {
        return Err(TokenError::InvalidAudience {
            expected: expected_audience.to_owned(),
            got: claims.aud,
        });
    }

    let now = now_i64();
    if claims.exp <= now {
        return Err(TokenError::Expired {
            exp: claims.exp,
            now,
        });
    }

    Ok(claims)
}
