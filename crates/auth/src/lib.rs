//! `hrms-auth`: stateless authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP: it issues and verifies
//! signed tokens, resolves principals across the administrator and employee
//! namespaces, and evaluates the ordered authorization rule table.

pub mod authorize;
pub mod claims;
pub mod error;
pub mod login;
pub mod password;
pub mod principal;
pub mod request;
pub mod resolver;
pub mod roles;
pub mod store;
pub mod token;

pub use authorize::{
    Access, AuthorizationExplanation, AuthorizationPolicy, AuthorizationRule, Decision,
    DenyReason, HttpMethod, PathParams, PathPattern,
};
pub use claims::{Claims, validate_claims};
pub use error::{AuthError, AuthResult};
pub use login::{Authenticator, LoginOutcome};
pub use password::{BcryptHasher, PasswordHasher};
pub use principal::{AuthenticationContext, Principal, PrincipalKind};
pub use request::{AuthenticationOutcome, RequestAuthenticator, UnauthenticatedReason, bearer_token};
pub use resolver::IdentityResolver;
pub use roles::Role;
pub use store::{CredentialStore, InMemoryCredentialStore};
pub use token::{Token, TokenCodec};
