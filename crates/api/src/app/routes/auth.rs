use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use hrms_auth::AuthenticationContext;

use crate::app::{
    dto::{LoginRequest, LoginResponse, MeResponse},
    errors,
    services::AppServices,
};

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                rejection.body_text(),
            )
        }
    };

    // bcrypt verification is deliberately slow; keep it off the async workers.
    let authenticator = services.authenticator.clone();
    let result = tokio::task::spawn_blocking(move || {
        authenticator.login(&req.identifier, &req.password, Utc::now())
    })
    .await;

    match result {
        Ok(Ok(outcome)) => (StatusCode::OK, Json(LoginResponse::from(outcome))).into_response(),
        Ok(Err(e)) => errors::auth_error_to_response(e),
        Err(join_error) => {
            tracing::error!(error = %join_error, "login task failed");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            )
        }
    }
}

pub async fn me(Extension(ctx): Extension<AuthenticationContext>) -> axum::response::Response {
    (StatusCode::OK, Json(MeResponse::from(&ctx))).into_response()
}
