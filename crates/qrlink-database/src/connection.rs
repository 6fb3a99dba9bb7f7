//! PostgreSQL pool setup for the record store.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use qrlink_core::config::DatabaseConfig;
use qrlink_core::error::AppError;

use crate::error::map_sqlx_error;

/// Pool sizing and timeouts taken from `[database]`.
pub fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
}

/// Open the record store pool. Failure to reach the server is a
/// `StoreUnavailable` error.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    info!(
        url = %mask_password(&config.url),
        max_connections = config.max_connections,
        "Opening record store pool"
    );
    pool_options(config)
        .connect(&config.url)
        .await
        .map_err(|e| map_sqlx_error("Failed to connect to record store", e))
}

/// Replace the password in a database URL with `****`.
pub fn mask_password(url: &str) -> String {
    let Some((credentials, host)) = url.rsplit_once('@') else {
        return url.to_string();
    };
    let user_start = credentials.find("://").map_or(0, |p| p + 3);
    match credentials[user_start..].split_once(':') {
        Some((user, _)) => format!("{}{user}:****@{host}", &credentials[..user_start]),
        None => url.to_string(),
    }
}
