//! # qrlink-api
//!
//! HTTP API layer for QrLink built on Axum.
//!
//! Exposes upload, listing, deletion and link lookup under `/api`, the
//! public `/i/{id}` redirect that QR codes point at, and `/blobs/...`
//! for locally stored images behind signed URLs.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
