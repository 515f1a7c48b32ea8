// ABOUTME: Route definitions for the probed HTTP API.
// ABOUTME: Mounts the public endpoints, gates /ip and /env when credentials are configured, adds metrics and tracing layers.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;
use crate::auth::BasicAuthLayer;
use crate::config::ServerConfig;
use crate::telemetry::HttpMetricsLayer;

/// Build the complete Axum router.
///
/// `/ip` and `/env` are wrapped in [`BasicAuthLayer`] only when the
/// configuration carries credentials. Without credentials they are served
/// openly, which suits deployments where the network already restricts access.
pub fn create_router(config: &ServerConfig, state: SharedState) -> Router {
    let sensitive = Router::new()
        .route("/ip", get(api::inspect::remote_addr))
        .route("/env", get(api::inspect::environment));
    let sensitive = match &config.credentials {
        Some(credentials) => sensitive.route_layer(BasicAuthLayer::new(credentials.clone())),
        None => sensitive,
    };

    Router::new()
        .route("/healthz", get(api::health::status))
        .route("/time", get(api::health::time))
        .route("/sleep", get(api::sleep::sleep))
        .route("/metrics", get(api::metrics::render))
        .merge(sensitive)
        .method_not_allowed_fallback(api::method_not_allowed)
        .fallback(api::not_found)
        .layer(HttpMetricsLayer::new(state.metrics.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
