// ABOUTME: Liveness and clock endpoints.
// ABOUTME: /healthz always answers "ok"; /time echoes the server's local wall-clock time.

use axum::http::StatusCode;
use axum::response::Response;
use chrono::Local;
use probed_core::Envelope;

use super::respond;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f %z";

/// GET /healthz - constant liveness check.
pub async fn status() -> Response {
    let resp = respond(StatusCode::OK, Envelope::message("ok"));
    tracing::info!(status = StatusCode::OK.as_u16(), "ok");
    resp
}

/// GET /time - current local time, e.g. `2024-05-01 13:04:05.123456789 +0900`.
pub async fn time() -> Response {
    let now = Local::now().format(TIME_FORMAT).to_string();

    let resp = respond(StatusCode::OK, Envelope::message(now.clone()));
    tracing::info!(status = StatusCode::OK.as_u16(), "{}", now);
    resp
}
