//! Authentication/authorization error model.

use thiserror::Error;

/// Result type used across the auth layer.
pub type AuthResult<T> = Result<T, AuthError>;

/// Every failure the auth boundary can produce.
///
/// Token and identity failures that happen while authenticating an inbound
/// request never leave [`crate::RequestAuthenticator`]; they collapse into an
/// unauthenticated request and are only logged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The token is not a well-formed compact signed token.
    #[error("malformed token")]
    Malformed,

    /// The token was tampered with or signed with another key/algorithm.
    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    /// No principal exists for the identifier in any namespace.
    #[error("principal not found")]
    NotFound,

    /// Bad credentials at login. Deliberately identical for unknown
    /// identifiers and wrong passwords.
    #[error("invalid credentials")]
    AuthenticationFailure,

    /// Authenticated, but lacking the required role or ownership.
    #[error("forbidden")]
    Forbidden,

    /// The credential store could not be read or written.
    #[error("credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token could not be issued: {0}")]
    TokenIssue(String),
}

impl AuthError {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
