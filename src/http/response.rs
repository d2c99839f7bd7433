//! JSON response helpers shared by the built-in endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `200 OK` with `body` serialized as JSON.
pub fn respond_json<T: Serialize>(body: T) -> Response {
    Json(body).into_response()
}

/// `status` with `{"error": message}`.
pub fn respond_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Fallback for requests no route matched.
pub async fn not_found() -> Response {
    respond_error(StatusCode::NOT_FOUND, "no route matched")
}
