use serde::{Deserialize, Serialize};

use hrms_auth::{AuthenticationContext, LoginOutcome, Principal, PrincipalKind};

// -------------------------
// Request DTOs
// -------------------------

/// `identifier` is an admin username or an employee number. Older clients
/// send it as `username`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "username")]
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminChangePasswordRequest {
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Lowercase role name (`admin`, `employee`).
    pub role: String,
    pub identifier: String,
    pub principal: Principal,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            token: outcome.token.into_string(),
            role: outcome.role.to_lowercase(),
            identifier: outcome.identifier,
            principal: outcome.principal,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub identifier: String,
    pub role: String,
    pub kind: PrincipalKind,
    pub principal: Principal,
}

impl From<&AuthenticationContext> for MeResponse {
    fn from(ctx: &AuthenticationContext) -> Self {
        let principal = ctx.principal().clone();
        Self {
            identifier: ctx.identifier().to_string(),
            role: principal.role().to_lowercase(),
            kind: principal.kind(),
            principal,
        }
    }
}
