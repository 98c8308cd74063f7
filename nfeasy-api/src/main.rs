//! nfeasy-api - NF-e workflow tracking service
//!
//! Serves the invoice/workflow JSON API and the dashboard page over an
//! in-memory record store seeded with demonstration fixtures.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use nfeasy_api::store::{MemoryStore, RecordStore};
use nfeasy_api::{build_router, AppState};
use nfeasy_common::config::load_config;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for nfeasy-api
#[derive(Parser, Debug)]
#[command(name = "nfeasy-api")]
#[command(about = "NF-e workflow tracking service")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "NFEASY_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides the config file)
    #[arg(long, env = "NFEASY_HOST")]
    host: Option<String>,

    /// TOML configuration file
    #[arg(short, long, env = "NFEASY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Resolved before tracing init so the configured level applies; the
    // source is logged once the subscriber is installed
    let (mut config, source) =
        load_config(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting NF-easy API (nfeasy-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    source.log();
    info!(
        "Validation: delay {} ms, failure rate {}; EDAP success rate {}",
        config.validation.delay_ms, config.validation.failure_rate, config.edap.success_rate
    );

    let store: Arc<dyn RecordStore> =
        Arc::new(MemoryStore::seeded().context("Failed to seed record store")?);
    info!("✓ Record store seeded");

    let state = AppState::from_config(&config, store);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.server.host, config.server.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("nfeasy-api listening on http://{}", addr);
    info!("Health check: http://{}/api/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
