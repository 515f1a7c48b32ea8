// ABOUTME: Caller-address and process-environment endpoints, optionally behind Basic auth.
// ABOUTME: /ip prefers X-Forwarded-For over the peer address; /env dumps every process variable.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use probed_core::Envelope;

use super::respond;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// GET /ip - the caller's address as reported by a proxy, else the socket peer.
pub async fn remote_addr(
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let addr = forwarded_for(&headers).unwrap_or_else(|| peer.to_string());

    let resp = respond(StatusCode::OK, Envelope::message(addr.clone()));
    tracing::info!(status = StatusCode::OK.as_u16(), "{}", addr);
    resp
}

/// GET /env - every environment variable of the server process.
pub async fn environment() -> Response {
    let vars = process_environment();
    let count = vars.len();

    let resp = respond(StatusCode::OK, Envelope::with_environment("ok", vars));
    tracing::info!(count, "ok");
    resp
}

/// The forwarded-for header value, trusted as sent.
fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Snapshot the process environment.
pub fn process_environment() -> BTreeMap<String, String> {
    environment_map(std::env::vars_os())
}

/// Build the name/value mapping from OS-provided pairs. The OS has already
/// split each entry at its first `=`, so values keep any further `=`.
/// Non-UTF-8 bytes are replaced rather than dropped.
fn environment_map<I>(vars: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .map(|(name, value)| {
            (
                name.to_string_lossy().into_owned(),
                value.to_string_lossy().into_owned(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> ConnectInfo<SocketAddr> {
        ConnectInfo("192.0.2.10:53412".parse().unwrap())
    }

    async fn envelope(resp: Response) -> Envelope {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn remote_addr_falls_back_to_peer() {
        let resp = remote_addr(peer(), HeaderMap::new()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(envelope(resp).await.message, "192.0.2.10:53412");
    }

    #[tokio::test]
    async fn remote_addr_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR, "203.0.113.7, 10.0.0.1".parse().unwrap());

        let resp = remote_addr(peer(), headers).await;

        assert_eq!(envelope(resp).await.message, "203.0.113.7, 10.0.0.1");
    }

    #[tokio::test]
    async fn remote_addr_ignores_blank_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR, " ".parse().unwrap());

        let resp = remote_addr(peer(), headers).await;

        assert_eq!(envelope(resp).await.message, "192.0.2.10:53412");
    }

    #[test]
    fn environment_map_keeps_values_after_first_equals() {
        let vars = [
            (OsString::from("QUERY"), OsString::from("a=b==c")),
            (OsString::from("EMPTY"), OsString::new()),
            (OsString::from("PLAIN"), OsString::from("value")),
        ];

        let map = environment_map(vars);

        assert_eq!(map.len(), 3);
        assert_eq!(map["QUERY"], "a=b==c");
        assert_eq!(map["EMPTY"], "");
        assert_eq!(map["PLAIN"], "value");
    }

    #[tokio::test]
    async fn environment_matches_process() {
        let resp = environment().await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = envelope(resp).await;

        assert_eq!(body.message, "ok");
        assert_eq!(body.environment, environment_map(std::env::vars_os()));
    }
}
