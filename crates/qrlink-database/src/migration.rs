//! Embedded schema migrations.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use qrlink_core::error::{AppError, ErrorKind};

/// Migrations under `migrations/`, compiled into the binary.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply any migrations the database has not seen yet.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::StoreUnavailable,
            format!("Failed to apply migrations: {e}"),
            e,
        )
    })?;
    info!(known = MIGRATOR.iter().count(), "Schema is up to date");
    Ok(())
}
