use axum::{routing::get, Router};

pub mod admins;
pub mod auth;
pub mod employees;
pub mod system;

/// Router for every mounted endpoint. Authentication and the rule table are
/// layered on by [`crate::app::build_app`], so handlers here may assume the
/// policy already admitted the request.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/error", get(system::error))
        .nest("/auth", auth::router())
        .nest("/employees", employees::router())
        .merge(admins::router())
}
