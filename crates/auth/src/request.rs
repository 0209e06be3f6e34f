//! Per-request bearer token authentication.
//!
//! Progression for one request:
//! `NoToken -> TokenPresent -> Decoded -> IdentityResolved -> Authenticated`,
//! short-circuiting to `Unauthenticated` at the first failing step. Nothing
//! here fails the request: an unauthenticated request simply proceeds without
//! an [`AuthenticationContext`] and the authorization policy decides.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{AuthError, AuthenticationContext, IdentityResolver, TokenCodec, validate_claims};

/// Why a request ended up without an authentication context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    /// No `Authorization` header.
    NoToken,
    /// Header present but not a non-empty `Bearer` credential.
    NotBearer,
    Malformed,
    InvalidSignature,
    Expired,
    /// Token subject no longer exists in either namespace.
    UnknownPrincipal,
    /// Token role or subject disagrees with the principal's current record.
    ClaimsMismatch,
    /// Identity lookup failed; authentication was abandoned for this request.
    StoreUnavailable,
}

/// Result of authenticating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationOutcome {
    Authenticated(AuthenticationContext),
    /// The request already carried a context; nothing was re-done.
    AlreadyAuthenticated,
    Unauthenticated(UnauthenticatedReason),
}

impl AuthenticationOutcome {
    pub fn into_context(self) -> Option<AuthenticationContext> {
        match self {
            AuthenticationOutcome::Authenticated(ctx) => Some(ctx),
            _ => None,
        }
    }
}

/// Extract the credential from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

/// Turns an inbound bearer token into an [`AuthenticationContext`].
#[derive(Clone)]
pub struct RequestAuthenticator {
    codec: Arc<TokenCodec>,
    resolver: IdentityResolver,
}

impl RequestAuthenticator {
    pub fn new(codec: Arc<TokenCodec>, resolver: IdentityResolver) -> Self {
        Self { codec, resolver }
    }

    /// Authenticate a request given its raw `Authorization` header value and
    /// any context an earlier pass already attached.
    pub fn authenticate(
        &self,
        authorization: Option<&str>,
        existing: Option<&AuthenticationContext>,
        now: DateTime<Utc>,
    ) -> AuthenticationOutcome {
        use AuthenticationOutcome::Unauthenticated;

        let Some(header) = authorization else {
            return Unauthenticated(UnauthenticatedReason::NoToken);
        };
        let Some(token) = bearer_token(header) else {
            tracing::debug!("authorization header is not a bearer credential");
            return Unauthenticated(UnauthenticatedReason::NotBearer);
        };

        let claims = match self.codec.decode(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!(error = %e, "bearer token rejected");
                let reason = match e {
                    AuthError::InvalidSignature => UnauthenticatedReason::InvalidSignature,
                    _ => UnauthenticatedReason::Malformed,
                };
                return Unauthenticated(reason);
            }
        };

        if existing.is_some() {
            tracing::debug!(subject = %claims.sub, "request already authenticated; skipping");
            return AuthenticationOutcome::AlreadyAuthenticated;
        }

        if let Err(e) = validate_claims(&claims, now) {
            tracing::debug!(subject = %claims.sub, exp = %claims.exp, error = %e, "bearer token rejected");
            return Unauthenticated(UnauthenticatedReason::Expired);
        }

        let principal = match self.resolver.resolve(&claims.sub) {
            Ok(principal) => principal,
            Err(AuthError::NotFound) => {
                tracing::warn!(subject = %claims.sub, "token subject no longer exists");
                return Unauthenticated(UnauthenticatedReason::UnknownPrincipal);
            }
            Err(e) => {
                tracing::error!(subject = %claims.sub, error = %e, "identity lookup failed");
                return Unauthenticated(UnauthenticatedReason::StoreUnavailable);
            }
        };

        if principal.identifier() != claims.sub || principal.role() != claims.role {
            tracing::warn!(
                subject = %claims.sub,
                token_role = %claims.role,
                current_role = %principal.role(),
                "token claims do not match current principal"
            );
            return Unauthenticated(UnauthenticatedReason::ClaimsMismatch);
        }

        let ctx = AuthenticationContext::new(principal);
        tracing::debug!(subject = ctx.identifier(), roles = ?ctx.roles(), "request authenticated");
        AuthenticationOutcome::Authenticated(ctx)
    }
}

impl core::fmt::Debug for RequestAuthenticator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RequestAuthenticator")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}
