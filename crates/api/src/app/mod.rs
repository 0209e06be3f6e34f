//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: credential store, token codec and policy wiring
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::middleware::{self, AuthState};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
///
/// Every request, including ones that hit no route, passes authentication
/// and then the rule table, so unmounted paths still answer 401/403 before 404.
pub fn build_app(services: Arc<services::AppServices>) -> Router {
    let auth_state = AuthState {
        authenticator: services.request_authenticator.clone(),
        policy: services.policy.clone(),
    };

    routes::router()
        .fallback(routes::system::not_found)
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    auth_state.clone(),
                    middleware::authenticate_request,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth_state,
                    middleware::enforce_policy,
                )),
        )
}
