// ABOUTME: Prometheus registry for probed, counting requests and timing them per route.
// ABOUTME: Rendered in the text exposition format by the /metrics endpoint.

use std::string::FromUtf8Error;
use std::sync::Arc;
use std::time::Duration;

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use thiserror::Error;

/// Errors raised while registering or encoding collectors.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus collector error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("metrics output was not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// Prometheus-backed metrics registry shared by the router layers.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
}

impl Metrics {
    /// Construct a registry with the HTTP collectors registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests served"),
            &["route", "code"],
        )?;
        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "Time spent serving HTTP requests",
            ),
            &["route"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
            }),
        })
    }

    /// Record one served request for the given route and status code.
    pub fn observe_http_request(&self, route: &str, status: u16, elapsed: Duration) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
        self.inner
            .http_request_duration_seconds
            .with_label_values(&[route])
            .observe(elapsed.as_secs_f64());
    }

    /// Render the registry using the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
