use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde_json::json;

use hrms_auth::{AuthError, AuthenticationContext, PrincipalKind};

use crate::app::{dto::AdminChangePasswordRequest, errors, services::AppServices};

/// Mounted with full paths: `/admins` itself is a route, not just a prefix.
pub fn router() -> Router {
    Router::new()
        .route("/admins", get(list))
        .route("/admins/change-password", put(change_password))
}

pub async fn list(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.store.list_admins() {
        Ok(admins) => (StatusCode::OK, Json(admins)).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

/// Change the calling administrator's own password.
pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthenticationContext>,
    payload: Result<Json<AdminChangePasswordRequest>, JsonRejection>,
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

    if ctx.principal().kind() != PrincipalKind::Admin {
        return errors::auth_error_to_response(AuthError::Forbidden);
    }

    let authenticator = services.authenticator.clone();
    let principal = ctx.principal().clone();
    let result = tokio::task::spawn_blocking(move || {
        authenticator.change_password(&principal, &req.new_password)
    })
    .await;

    match result {
        Ok(Ok(())) => (
            StatusCode::OK,
            Json(json!({ "message": "password updated" })),
        )
            .into_response(),
        Ok(Err(e)) => errors::auth_error_to_response(e),
        Err(join_error) => {
            tracing::error!(error = %join_error, "password change task failed");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            )
        }
    }
}
