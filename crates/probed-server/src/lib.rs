// ABOUTME: HTTP server for probed, exposing health, time, sleep, caller address and environment endpoints.
// ABOUTME: Uses Axum with an optional Basic auth layer on the sensitive routes and Prometheus metrics.

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod telemetry;

pub use app_state::{AppState, SharedState};
pub use auth::BasicAuthLayer;
pub use config::{ConfigError, Credentials, ServerConfig};
pub use metrics::{Metrics, MetricsError};
pub use routes::create_router;
pub use server::{serve, shutdown_signal};
