//! Compact signed token codec (HS256).
//!
//! Tokens are stateless: nothing is stored server-side and the only way a
//! token stops working is passive expiry.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{AuthError, AuthResult, Claims, Role};

/// An issued token string (`header.payload.signature`, base64url segments).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Display for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues and verifies tokens with one process-wide symmetric key.
///
/// Built once at startup and shared read-only between requests.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by the caller against its own clock.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Sign a token for `subject` valid from `now` until `now + ttl`.
    pub fn issue(&self, subject: &str, role: &Role, now: DateTime<Utc>) -> AuthResult<Token> {
        let claims = Claims {
            sub: subject.to_string(),
            role: role.clone(),
            iat: now,
            exp: now + self.ttl,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(Token)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))
    }

    /// Verify the signature and structure of `token` and return its claims.
    ///
    /// Does not check expiry; see [`Claims::is_expired`].
    pub fn decode(&self, token: &str) -> AuthResult<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::InvalidSignature
                }
                _ => AuthError::Malformed,
            })
    }

    pub fn is_expired(claims: &Claims, now: DateTime<Utc>) -> bool {
        claims.is_expired(now)
    }
}

impl core::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::TimeZone;

    use super::*;

    const SECRET: &[u8] = b"test-secret-that-is-long-enough-for-hs256";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, Duration::hours(1))
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, h, m, s).unwrap()
    }

    #[test]
    fn issue_then_decode_returns_same_subject_and_role() {
        let codec = codec();
        let token = codec.issue("admin1", &Role::ADMIN, at(9, 0, 0)).unwrap();

        assert_eq!(token.as_str().split('.').count(), 3);

        let claims = codec.decode(token.as_str()).unwrap();
        assert_eq!(claims.sub, "admin1");
        assert_eq!(claims.role, Role::ADMIN);
        assert_eq!(claims.iat, at(9, 0, 0));
        assert_eq!(claims.exp, at(10, 0, 0));
    }

    #[test]
    fn decode_does_not_check_expiry() {
        let codec = codec();
        let token = codec.issue("E1001", &Role::EMPLOYEE, at(0, 0, 0)).unwrap();

        let claims = codec.decode(token.as_str()).unwrap();
        assert!(TokenCodec::is_expired(&claims, Utc::now()));
        assert!(!TokenCodec::is_expired(&claims, at(0, 59, 59)));
        assert!(TokenCodec::is_expired(&claims, at(1, 0, 0)));
    }

    #[test]
    fn token_from_other_key_is_rejected() {
        let other = TokenCodec::new(b"another-secret-that-is-long-enough!!", Duration::hours(1));
        let token = other.issue("admin1", &Role::ADMIN, Utc::now()).unwrap();

        assert_eq!(codec().decode(token.as_str()), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn every_single_bit_flip_in_signature_is_rejected() {
        let codec = codec();
        let token = codec.issue("admin1", &Role::ADMIN, Utc::now()).unwrap();
        let (signing_input, signature) = token.as_str().rsplit_once('.').unwrap();
        let signature = URL_SAFE_NO_PAD.decode(signature).unwrap();

        for byte in 0..signature.len() {
            for bit in 0..8 {
                let mut tampered = signature.clone();
                tampered[byte] ^= 1 << bit;
                let forged = format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(&tampered));

                assert_eq!(
                    codec.decode(&forged),
                    Err(AuthError::InvalidSignature),
                    "bit {bit} of byte {byte}"
                );
            }
        }
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let codec = codec();
        let token = codec.issue("E1001", &Role::EMPLOYEE, Utc::now()).unwrap();
        let parts: Vec<&str> = token.as_str().split('.').collect();

        let mut payload: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        payload["role"] = serde_json::json!("ADMIN");
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap());

        let forged = format!("{}.{}.{}", parts[0], payload, parts[2]);
        assert_eq!(codec.decode(&forged), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn structurally_invalid_tokens_are_malformed() {
        let codec = codec();
        assert_eq!(codec.decode("garbage"), Err(AuthError::Malformed));
        assert_eq!(codec.decode(""), Err(AuthError::Malformed));
        assert_eq!(codec.decode("a.b.c"), Err(AuthError::Malformed));
    }

    #[test]
    fn debug_output_hides_key_material() {
        let rendered = format!("{:?}", codec());
        assert!(rendered.contains("TokenCodec"));
        assert!(!rendered.contains("test-secret"));
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: issue/decode round-trips subject and role exactly.
            #[test]
            fn round_trip(
                subject in "[A-Za-z0-9_@.-]{1,32}",
                role in prop_oneof![Just(Role::ADMIN), Just(Role::EMPLOYEE), "[A-Z]{1,12}".prop_map(Role::new)],
                issued_at in 1_000_000_000i64..4_000_000_000i64,
            ) {
                let codec = codec();
                let now = Utc.timestamp_opt(issued_at, 0).unwrap();
                let token = codec.issue(&subject, &role, now).unwrap();
                let claims = codec.decode(token.as_str()).unwrap();

                prop_assert_eq!(claims.sub, subject);
                prop_assert_eq!(claims.role, role);
                prop_assert_eq!(claims.iat, now);
            }

            /// Property: expired iff `now >= exp`.
            #[test]
            fn expiry_is_exact(
                issued_at in 1_000_000_000i64..4_000_000_000i64,
                offset in -7_200i64..7_200i64,
            ) {
                let codec = codec();
                let issued = Utc.timestamp_opt(issued_at, 0).unwrap();
                let token = codec.issue("E1001", &Role::EMPLOYEE, issued).unwrap();
                let claims = codec.decode(token.as_str()).unwrap();

                let now = claims.exp + Duration::seconds(offset);
                prop_assert_eq!(TokenCodec::is_expired(&claims, now), offset >= 0);
            }
        }
    }
}
