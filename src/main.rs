//! QrLink Server
//!
//! Main entry point that wires the record store, object store and link
//! services together and starts the HTTP server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use qrlink_core::config::AppConfig;
use qrlink_core::error::AppError;
use qrlink_core::traits::{Clock, SystemClock};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay and `QRLINK__*` vars.
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("QRLINK_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("QRLINK_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load_from(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting QrLink v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Record store ─────────────────────────────────────
    tracing::info!(provider = %config.database.provider, "Initializing record store...");
    let (records, db_pool) = qrlink_database::build_record_store(&config.database).await?;

    // ── Step 2: Object store ─────────────────────────────────────
    tracing::info!(provider = %config.storage.provider, "Initializing object store...");
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = qrlink_storage::build_object_store(&config.storage, Arc::clone(&clock)).await?;

    // ── Step 3: Services + router ────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = qrlink_api::AppState::new(config, records, store, clock);
    let app = qrlink_api::build_router(state);

    // ── Step 4: Serve ────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("QrLink server listening on {}", addr);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, draining in-flight requests...");
            let _ = shutdown_tx.send(true);
        })
        .into_future();
    tokio::pin!(server);

    let served = tokio::select! {
        res = &mut server => res,
        _ = shutdown_rx.changed() => {
            match tokio::time::timeout(grace, &mut server).await {
                Ok(res) => res,
                Err(_) => {
                    tracing::warn!(
                        grace_seconds = grace.as_secs(),
                        "Grace period elapsed with requests still in flight"
                    );
                    Ok(())
                }
            }
        }
    };

    if let Some(pool) = db_pool {
        pool.close().await;
    }

    served.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
    tracing::info!("QrLink server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
