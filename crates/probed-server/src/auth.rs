// ABOUTME: HTTP Basic authentication middleware for the sensitive probed routes.
// ABOUTME: Compares the request's Basic credentials against one configured pair and rejects with 401.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::{HeaderMap, HeaderValue, Request, Response, StatusCode};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use probed_core::Envelope;
use tower::{Layer, Service};

use crate::api::respond;
use crate::config::Credentials;

pub const NOT_AUTHORIZED: &str = "Not Authorized";

const CHALLENGE: &str = r#"Basic realm="probed", charset="UTF-8""#;

/// A tower Layer that gates the wrapped service behind HTTP Basic auth.
#[derive(Clone)]
pub struct BasicAuthLayer {
    credentials: Arc<Credentials>,
}

impl BasicAuthLayer {
    /// Create a new BasicAuthLayer accepting exactly the given pair.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: Arc::new(credentials),
        }
    }
}

impl<S> Layer<S> for BasicAuthLayer {
    type Service = BasicAuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BasicAuthMiddleware {
            inner,
            credentials: Arc::clone(&self.credentials),
        }
    }
}

/// The middleware service that checks Basic credentials before calling `inner`.
#[derive(Clone)]
pub struct BasicAuthMiddleware<S> {
    inner: S,
    credentials: Arc<Credentials>,
}

impl<S> Service<Request<Body>> for BasicAuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let rejection = match basic_credentials(req.headers()) {
            Some((username, password)) if self.credentials.matches(&username, &password) => None,
            Some(_) => Some("credentials do not match"),
            None => Some("missing or malformed Basic credentials"),
        };

        let Some(reason) = rejection else {
            let mut inner = self.inner.clone();
            return Box::pin(async move { inner.call(req).await });
        };

        tracing::error!(
            status = StatusCode::UNAUTHORIZED.as_u16(),
            path = %req.uri().path(),
            reason,
            "{}",
            NOT_AUTHORIZED
        );
        Box::pin(async move {
            let mut resp = respond(StatusCode::UNAUTHORIZED, Envelope::message(NOT_AUTHORIZED));
            resp.headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE));
            Ok(resp)
        })
    }
}

/// Extract `(username, password)` from an `Authorization: Basic ...` header.
///
/// The scheme is matched case-insensitively and the decoded payload is split
/// at its first `:`, so passwords may themselves contain colons.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::routing::get;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    fn basic(user_pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(user_pass))
    }

    /// Router whose protected handler counts how often it runs and echoes a request header.
    fn test_router(hits: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/env",
                get(move |headers: HeaderMap| {
                    let hits = Arc::clone(&hits);
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        headers
                            .get("x-probe")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default()
                            .to_string()
                    }
                }),
            )
            .route_layer(BasicAuthLayer::new(Credentials::new("admin", "pa:ss")))
            .route("/healthz", get(|| async { "ok" }))
    }

    async fn send(app: Router, authorization: Option<&str>) -> Response<Body> {
        let mut builder = Request::get("/env").header("x-probe", "untouched");
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn envelope(resp: Response<Body>) -> Envelope {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn basic_auth_allows_matching_credentials() {
        let hits = Arc::new(AtomicUsize::new(0));
        let header = basic("admin:pa:ss");
        let resp = send(test_router(Arc::clone(&hits)), Some(header.as_str())).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"untouched", "request should reach handler unchanged");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn basic_auth_accepts_lowercase_scheme() {
        let hits = Arc::new(AtomicUsize::new(0));
        let header = format!("basic {}", STANDARD.encode("admin:pa:ss"));
        let resp = send(test_router(Arc::clone(&hits)), Some(header.as_str())).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn basic_auth_rejects_bad_requests_without_calling_handler() {
        let wrong_user = basic("root:pa:ss");
        let wrong_pass = basic("admin:nope");
        let no_colon = basic("adminpa");
        let cases: [(&str, Option<&str>); 6] = [
            ("missing header", None),
            ("wrong username", Some(wrong_user.as_str())),
            ("wrong password", Some(wrong_pass.as_str())),
            ("not base64", Some("Basic !!!not-base64!!!")),
            ("no colon", Some(no_colon.as_str())),
            ("bearer scheme", Some("Bearer admin:pa:ss")),
        ];

        for (name, header) in cases {
            let hits = Arc::new(AtomicUsize::new(0));
            let resp = send(test_router(Arc::clone(&hits)), header).await;

            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{name}");
            assert_eq!(
                resp.headers().get(WWW_AUTHENTICATE).unwrap(),
                CHALLENGE,
                "{name}"
            );
            assert_eq!(envelope(resp).await, Envelope::message(NOT_AUTHORIZED), "{name}");
            assert_eq!(hits.load(Ordering::SeqCst), 0, "{name}: handler must not run");
        }
    }

    #[tokio::test]
    async fn basic_auth_leaves_ungated_routes_open() {
        let app = test_router(Arc::new(AtomicUsize::new(0)));

        let resp = app
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn basic_credentials_splits_on_first_colon() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, basic("user:a:b:c").parse().unwrap());

        assert_eq!(
            basic_credentials(&headers),
            Some(("user".to_string(), "a:b:c".to_string()))
        );
    }
}
