//! Unified application error types for QrLink.
//!
//! Every adapter and service maps its failures into [`AppError`] so that
//! the HTTP layer can render a stable, structured outcome for each
//! category instead of a generic failure.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The id has no live record (never existed or was deleted).
    NotFound,
    /// The requester does not own the record.
    Forbidden,
    /// Input was rejected before any store I/O. See [`ValidationReason`].
    Validation,
    /// The record store reported an id collision.
    DuplicateViolation,
    /// The object store or record store is unreachable or erroring.
    StoreUnavailable,
    /// A configuration error occurred.
    Configuration,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::DuplicateViolation => write!(f, "DUPLICATE_VIOLATION"),
            Self::StoreUnavailable => write!(f, "STORE_UNAVAILABLE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Reason code attached to [`ErrorKind::Validation`] errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationReason {
    /// The declared MIME type is not in the allow-list.
    UnsupportedType,
    /// The declared or actual size exceeds the upload ceiling.
    TooLarge,
    /// The request itself is malformed (missing field, unusable owner id).
    InvalidInput,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedType => write!(f, "UNSUPPORTED_TYPE"),
            Self::TooLarge => write!(f, "TOO_LARGE"),
            Self::InvalidInput => write!(f, "INVALID_INPUT"),
        }
    }
}

/// The unified application error used throughout QrLink.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// Reason code, present only for validation errors.
    pub reason: Option<ValidationReason>,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            reason: None,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            reason: None,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a validation error carrying a reason code.
    pub fn validation(reason: ValidationReason, message: impl Into<String>) -> Self {
        Self {
            reason: Some(reason),
            ..Self::new(ErrorKind::Validation, message)
        }
    }

    /// Create a validation error for a malformed request.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::validation(ValidationReason::InvalidInput, message)
    }

    /// Create a duplicate-id error.
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateViolation, message)
    }

    /// Create a store-unavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether a caller may retry the operation with backoff.
    ///
    /// Only store outages qualify; validation, authorization and
    /// not-found outcomes are definitive.
    pub fn is_transient(&self) -> bool {
        self.kind == ErrorKind::StoreUnavailable
    }

    /// Re-tag this error as a store outage, keeping its message.
    pub fn into_store_unavailable(self) -> Self {
        Self {
            kind: ErrorKind::StoreUnavailable,
            reason: None,
            ..self
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            reason: self.reason,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::StoreUnavailable, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
