use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AuthError, Role};

/// Signed token payload.
///
/// Serialized as a flat JSON object with NumericDate (whole seconds) `iat`/`exp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the principal's login identifier.
    pub sub: String,

    /// Role the principal held at issuance.
    pub role: Role,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,
}

impl Claims {
    /// True iff `now >= exp`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.exp
    }
}

/// Check the time-bound part of already-verified claims.
///
/// Signature verification happens in [`crate::TokenCodec::decode`]; a
/// successfully decoded token may still be unusable.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), AuthError> {
    if claims.is_expired(now) {
        return Err(AuthError::Expired);
    }
    Ok(())
}
