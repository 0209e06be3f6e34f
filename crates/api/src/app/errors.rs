use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use hrms_auth::AuthError;

pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::AuthenticationFailure => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid identifier or password",
        ),
        AuthError::Malformed | AuthError::InvalidSignature | AuthError::Expired => json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "authentication required",
        ),
        AuthError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", "access denied"),
        AuthError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        AuthError::InvalidInput(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        AuthError::StoreUnavailable(msg) => {
            tracing::error!(error = %msg, "credential store unavailable");
            json_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "store_unavailable",
                "credential store unavailable",
            )
        }
        AuthError::Hashing(msg) | AuthError::TokenIssue(msg) => {
            tracing::error!(error = %msg, "internal authentication failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
