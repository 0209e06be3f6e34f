use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use hrms_auth::{
    AuthenticationContext, AuthenticationOutcome, AuthorizationPolicy, DenyReason,
    RequestAuthenticator,
};

use crate::app::errors::json_error;

#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<RequestAuthenticator>,
    pub policy: Arc<AuthorizationPolicy>,
}

/// Attach an [`AuthenticationContext`] when the request carries a valid
/// bearer token. Never rejects; [`enforce_policy`] decides what an
/// unauthenticated request may reach.
pub async fn authenticate_request(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let outcome = state.authenticator.authenticate(
        authorization_header(req.headers()),
        req.extensions().get::<AuthenticationContext>(),
        Utc::now(),
    );

    match outcome {
        AuthenticationOutcome::Authenticated(ctx) => {
            req.extensions_mut().insert(ctx);
        }
        AuthenticationOutcome::AlreadyAuthenticated => {}
        AuthenticationOutcome::Unauthenticated(reason) => {
            tracing::debug!(?reason, path = %req.uri().path(), "continuing unauthenticated");
        }
    }

    next.run(req).await
}

/// Apply the route rule table to the (possibly unauthenticated) request.
pub async fn enforce_policy(
    State(state): State<AuthState>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let explanation = state.policy.explain(
        req.method().as_str(),
        req.uri().path(),
        req.extensions().get::<AuthenticationContext>(),
    );

    let Some(reason) = explanation.denial else {
        return next.run(req).await;
    };

    tracing::info!(
        method = %explanation.method,
        path = %explanation.path,
        rule = %explanation.rule,
        principal = ?explanation.principal,
        denial = ?reason,
        "request denied"
    );
    match reason {
        DenyReason::Unauthenticated => json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "authentication required",
        ),
        DenyReason::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", "access denied"),
    }
}

/// Raw `Authorization` header value; non-UTF-8 values count as absent.
fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}
