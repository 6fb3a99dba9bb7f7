//! # qrlink-core
//!
//! Core crate for QrLink. Contains configuration schemas, typed
//! identifiers, the object/record store traits, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other QrLink crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind, ValidationReason};
pub use result::AppResult;
