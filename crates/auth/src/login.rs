//! Authentication entry point: credentials in, signed token out.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    AuthError, AuthResult, IdentityResolver, PasswordHasher, Principal, Role, Token, TokenCodec,
};

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: Token,
    pub role: Role,
    pub identifier: String,
    pub principal: Principal,
}

/// Verified against when the identifier is unknown, so both login failure
/// paths pay the same hashing cost.
const UNKNOWN_PRINCIPAL_PASSWORD: &str = "hrms-unknown-principal";

/// Verifies credentials and issues tokens. Also owns credential changes,
/// since those must hash with the same algorithm login verifies against.
#[derive(Clone)]
pub struct Authenticator {
    resolver: IdentityResolver,
    hasher: Arc<dyn PasswordHasher>,
    codec: Arc<TokenCodec>,
    unknown_principal_hash: Arc<str>,
}

impl Authenticator {
    /// Hashes a fixed placeholder password once with `hasher`'s work factor.
    pub fn new(
        resolver: IdentityResolver,
        hasher: Arc<dyn PasswordHasher>,
        codec: Arc<TokenCodec>,
    ) -> AuthResult<Self> {
        let unknown_principal_hash = hasher.hash(UNKNOWN_PRINCIPAL_PASSWORD)?.into();
        Ok(Self {
            resolver,
            hasher,
            codec,
            unknown_principal_hash,
        })
    }

    /// Authenticate `identifier`/`password` and issue a token valid from `now`.
    ///
    /// Unknown identifier and wrong password both yield
    /// [`AuthError::AuthenticationFailure`] after one password verification
    /// each. Store outages are reported as such.
    pub fn login(
        &self,
        identifier: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<LoginOutcome> {
        let principal = match self.resolver.resolve(identifier) {
            Ok(principal) => principal,
            Err(AuthError::NotFound) => {
                // Only the time spent matters here.
                let _ = self.hasher.verify(password, &self.unknown_principal_hash);
                tracing::info!(identifier, "login rejected: bad credentials");
                return Err(AuthError::AuthenticationFailure);
            }
            Err(e) => return Err(e),
        };

        if !self.hasher.verify(password, principal.credential_hash()) {
            tracing::info!(identifier, "login rejected: bad credentials");
            return Err(AuthError::AuthenticationFailure);
        }

        let role = principal.role();
        let token = self.codec.issue(principal.identifier(), &role, now)?;

        tracing::info!(
            identifier = principal.identifier(),
            role = %role,
            "login succeeded"
        );

        Ok(LoginOutcome {
            token,
            role,
            identifier: principal.identifier().to_string(),
            principal,
        })
    }

    /// Replace the caller's own password with a fresh hash of `new_password`.
    ///
    /// Tokens issued before the change stay valid until they expire.
    pub fn change_password(&self, principal: &Principal, new_password: &str) -> AuthResult<()> {
        if new_password.is_empty() {
            return Err(AuthError::invalid_input("password must not be empty"));
        }

        let hash = self.hasher.hash(new_password)?;
        let store = self.resolver.store();
        match principal {
            Principal::Admin(admin) => store.set_admin_password_hash(&admin.username, hash)?,
            Principal::Employee(employee) => {
                store.set_employee_password_hash(&employee.emp_id, hash)?
            }
        }

        tracing::info!(identifier = principal.identifier(), "password changed");
        Ok(())
    }
}

impl core::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Authenticator")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}
