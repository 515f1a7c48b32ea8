// ABOUTME: Entry point for the probed binary.
// ABOUTME: Parses flags (with environment overrides), initializes tracing, and serves the diagnostic endpoints.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use probed_server::{AppState, ServerConfig, create_router, serve, shutdown_signal};
use tokio::net::TcpListener;

/// Diagnostic HTTP server: health, time, sleep, caller address and environment endpoints.
#[derive(Debug, Parser)]
#[command(name = "probed", version, about)]
struct Cli {
    /// Listen address; a bare ":port" binds every interface.
    #[arg(long, env = "ADDR", default_value = ":8080")]
    addr: String,

    /// Basic auth username for /ip and /env.
    #[arg(long, env = "USERNAME")]
    username: Option<String>,

    /// Basic auth password for /ip and /env.
    #[arg(long, env = "PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "probed={level},probed_server={level},tower_http={level}"
        ))
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().flatten_event(true).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    let config = ServerConfig::new(&cli.addr, cli.username, cli.password)
        .context("invalid configuration")?;
    let state = Arc::new(AppState::new().context("failed to register metrics")?);
    let router = create_router(&config, state);

    if config.auth_enabled() {
        tracing::info!("basic auth enabled for /ip and /env");
    } else {
        tracing::warn!("no credentials configured; /ip and /env are served without authentication");
    }

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!(addr = %config.addr, "probed listening");

    serve(listener, router, shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("probed stopped");
    Ok(())
}
