// ABOUTME: Endpoint handlers for probed, one function per route.
// ABOUTME: All JSON responses go through `respond`, which writes status and envelope exactly once.

pub mod health;
pub mod inspect;
pub mod metrics;
pub mod sleep;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use probed_core::Envelope;

/// Build the response for an envelope: JSON content type, the given status, one body.
pub fn respond(status: StatusCode, envelope: Envelope) -> Response {
    (status, Json(envelope)).into_response()
}

/// Fallback for paths with no route.
pub async fn not_found() -> Response {
    tracing::warn!(status = StatusCode::NOT_FOUND.as_u16(), "not found");
    respond(StatusCode::NOT_FOUND, Envelope::message("not found"))
}

/// Fallback for known paths requested with a method other than GET.
pub async fn method_not_allowed() -> Response {
    tracing::warn!(status = StatusCode::METHOD_NOT_ALLOWED.as_u16(), "method not allowed");
    respond(StatusCode::METHOD_NOT_ALLOWED, Envelope::message("method not allowed"))
}
