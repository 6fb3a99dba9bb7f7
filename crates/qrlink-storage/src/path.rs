//! Storage path validation.

use qrlink_core::error::AppError;
use qrlink_core::result::AppResult;

/// Reject paths that could escape the provider root.
///
/// Paths are relative, `/`-separated and made of non-empty segments
/// other than `.` and `..`.
pub fn validate(path: &str) -> AppResult<()> {
    if path.is_empty() {
        return Err(AppError::invalid_input("Storage path must not be empty"));
    }
    if path.starts_with('/') || path.contains('\\') || path.contains('\0') {
        return Err(AppError::invalid_input(format!(
            "Invalid storage path: {path}"
        )));
    }
    for segment in path.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(AppError::invalid_input(format!(
                "Invalid storage path segment in: {path}"
            )));
        }
    }
    Ok(())
}
