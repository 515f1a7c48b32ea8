// ABOUTME: Shared application state for the probed HTTP server.
// ABOUTME: Holds the read-only Prometheus registry handle used by the metrics layer and endpoint.

use std::sync::Arc;

use crate::metrics::{Metrics, MetricsError};

/// Shared application state accessible by all Axum handlers.
pub struct AppState {
    pub metrics: Metrics,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create a new AppState with a freshly registered metrics registry.
    pub fn new() -> Result<Self, MetricsError> {
        Ok(Self {
            metrics: Metrics::new()?,
        })
    }
}
