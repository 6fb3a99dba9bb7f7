//! Convenience result type alias for QrLink.

use crate::error::AppError;

/// A specialized `Result` type for QrLink operations.
pub type AppResult<T> = Result<T, AppError>;
