// ABOUTME: Delayed-response endpoint. Waits for the duration given in `?d=` before answering.
// ABOUTME: The wait suspends only this request's task; other requests keep being served.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::Response;
use probed_core::{Envelope, parse_duration};

use super::respond;

pub const DURATION_BLANK: &str = "duration is blank";
pub const DURATION_UNPARSABLE: &str = "could not parse query";

/// GET /sleep?d=<duration> - sleep, then echo `d` back.
///
/// A missing or unparsable `d` answers 500 rather than 400, matching what
/// existing clients of this endpoint expect.
pub async fn sleep(Query(params): Query<Vec<(String, String)>>) -> Response {
    let raw = params
        .into_iter()
        .find_map(|(key, value)| (key == "d").then_some(value))
        .unwrap_or_default();

    if raw.is_empty() {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let resp = respond(status, Envelope::message(DURATION_BLANK));
        tracing::warn!(status = status.as_u16(), "{}", DURATION_BLANK);
        return resp;
    }

    let duration = match parse_duration(&raw) {
        Ok(duration) => duration,
        Err(err) => {
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            let resp = respond(status, Envelope::message(DURATION_UNPARSABLE));
            tracing::warn!(status = status.as_u16(), "{}", err);
            return resp;
        }
    };

    tokio::time::sleep(duration).await;

    let resp = respond(StatusCode::OK, Envelope::message(raw.clone()));
    tracing::info!(status = StatusCode::OK.as_u16(), "{}", raw);
    resp
}
