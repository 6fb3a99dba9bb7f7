//! # qrlink-storage
//!
//! Object store providers for QrLink. The local filesystem provider
//! signs its own access URLs; the S3 provider (behind the `s3` feature)
//! delegates to native presigning.

pub mod factory;
pub mod mime;
pub mod path;
pub mod providers;
pub mod signing;

pub use factory::{ConfiguredStore, build_object_store};
pub use providers::LocalStorageProvider;
