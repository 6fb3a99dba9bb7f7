//! Mapping from `sqlx` failures to [`AppError`].

use qrlink_core::error::{AppError, ErrorKind};

/// Translate a driver error into the application taxonomy.
///
/// Unique violations become `DuplicateViolation`; everything else the
/// driver can report (pool timeouts, I/O, protocol errors) is treated as
/// the record store being unavailable.
pub fn map_sqlx_error(context: &str, err: sqlx::Error) -> AppError {
    let unique_violation = matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation());
    if unique_violation {
        AppError::with_source(
            ErrorKind::DuplicateViolation,
            format!("{context}: duplicate key"),
            err,
        )
    } else {
        AppError::with_source(
            ErrorKind::StoreUnavailable,
            format!("{context}: {err}"),
            err,
        )
    }
}
