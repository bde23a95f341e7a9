//! Emergency Medicine Locator - API bootstrap
//!
//! Runs the expiry sweep, then serves the HTTP API.

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medicine_locator::config::Config;
use medicine_locator::startup::{build_store, prepare, Startup};

/// Main entry point for the API server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the record store (hosted, or in-memory fallback)
/// 4. Run the expiry sweep and wait for it to finish or fail
/// 5. Start the periodic sweep if an interval is configured
/// 6. Bind and serve until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medicine_locator=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Emergency Medicine Locator API");

    let config = Config::from_env();
    info!(
        "Configuration loaded: host={}, port={}, table={}, sweep_timeout={}s, sweep_interval={}s",
        config.api_host,
        config.api_port,
        config.records_table,
        config.sweep_timeout_secs,
        config.sweep_interval_secs
    );

    let store = build_store(&config).context("failed to initialize hosted record store")?;

    // Must finish before the listener is bound; failures are contained
    let Startup {
        router,
        sweep_handle,
        ..
    } = prepare(&config, store).await;

    let addr = format!("{}:{}", config.api_host, config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the periodic sweep if one is running.
async fn shutdown_signal(sweep_handle: Option<tokio::task::JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = sweep_handle {
        handle.abort();
        warn!("Periodic expiry sweep aborted");
    }
}
