use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::app::errors;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Generic error display target. Public so that error redirects never
/// bounce through authentication.
pub async fn error() -> axum::response::Response {
    errors::json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "an error occurred",
    )
}

/// Fallback for every path without a mounted handler.
pub async fn not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found")
}
