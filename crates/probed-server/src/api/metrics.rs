// ABOUTME: Prometheus scrape endpoint.
// ABOUTME: Renders the shared registry as text, answering with an envelope if encoding fails.

use axum::body::Body;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use probed_core::Envelope;

use super::respond;
use crate::app_state::SharedState;

const TEXT_FORMAT: &str = "text/plain; version=0.0.4";

/// GET /metrics - registry in the Prometheus text exposition format.
pub async fn render(State(state): State<SharedState>) -> Response {
    match state.metrics.render() {
        Ok(body) => ([(CONTENT_TYPE, TEXT_FORMAT)], Body::from(body)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to render metrics");
            respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                Envelope::message("failed to render metrics"),
            )
        }
    }
}
