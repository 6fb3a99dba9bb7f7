//! # qrlink-database
//!
//! Record store adapters for QrLink: a PostgreSQL-backed repository
//! for deployments and an in-memory one for development and tests.

pub mod connection;
pub mod error;
pub mod migration;
pub mod provider;
pub mod repositories;

pub use provider::{ImageStore, build_record_store};
pub use repositories::{MemoryImageRepository, PgImageRepository};
