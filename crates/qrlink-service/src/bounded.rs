//! Time-bounded store calls.

use std::future::Future;
use std::time::Duration;

use qrlink_core::error::AppError;
use qrlink_core::result::AppResult;

/// Await a store call, failing with `StoreUnavailable` once `limit` elapses.
pub async fn bounded<T, F>(limit: Duration, operation: &str, call: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(AppError::store_unavailable(format!(
            "{operation} timed out after {}ms",
            limit.as_millis()
        ))),
    }
}
