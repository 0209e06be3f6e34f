use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde_json::json;

use hrms_auth::{AuthError, AuthenticationContext};

use crate::app::{dto::ChangePasswordRequest, errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/byEmpId/:emp_id", get(by_emp_id))
        .route("/change-password/:emp_id", put(change_password))
}

/// Public record of one employee. Callers other than the employee themself
/// must be administrators; the rule table enforces that before we get here.
pub async fn by_emp_id(
    Extension(services): Extension<Arc<AppServices>>,
    Path(emp_id): Path<String>,
) -> axum::response::Response {
    match services.store.find_employee(&emp_id) {
        Ok(Some(employee)) => (StatusCode::OK, Json(employee)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "employee not found"),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthenticationContext>,
    Path(emp_id): Path<String>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
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

    if ctx.identifier() != emp_id {
        return errors::auth_error_to_response(AuthError::Forbidden);
    }

    let authenticator = services.authenticator.clone();
    let principal = ctx.principal().clone();
    let result = tokio::task::spawn_blocking(move || {
        authenticator.change_password(&principal, &req.password)
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
