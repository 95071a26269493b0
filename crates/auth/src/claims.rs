use std::collections::HashSet;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT claims the client relies on.
///
/// The client never holds the signing secret, so these claims are read
/// *unverified*: they only decide when to stop presenting a token. The backend
/// remains the authority on whether a token is acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (the backend issues the account email here).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Role embedded by the backend, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Issued-at, seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration, seconds since the Unix epoch.
    pub exp: i64,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token has expired")]
    Expired,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Decode the claims segment of a JWT without checking its signature.
///
/// A token without an `exp` claim is malformed.
pub fn decode_unverified(token: &str) -> Result<TokenClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    jsonwebtoken::decode::<TokenClaims>(token.trim(), &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| TokenError::Malformed(e.to_string()))
}

/// Deterministically validate decoded claims against `now`.
///
/// A token is expired from the second named by `exp` onwards.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if let Some(iat) = claims.iat {
        if claims.exp <= iat {
            return Err(TokenError::InvalidTimeWindow);
        }
    }
    if now.timestamp() >= claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(())
}

/// `true` when `token` is still usable at `now`.
///
/// Never fails: anything that cannot be decoded counts as expired.
pub fn check_expiry(token: &str, now: DateTime<Utc>) -> bool {
    match decode_unverified(token).and_then(|claims| validate_claims(&claims, now)) {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(error = %err, "stored token is not usable");
            false
        }
    }
}
