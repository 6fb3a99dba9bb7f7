//! # qrlink-service
//!
//! The short-link core: the registry that owns the id → blob mapping,
//! the resolution path that mints signed URLs, and the upload
//! orchestrator that writes blob and record in order.
//!
//! Services take their collaborators at construction time as `Arc`
//! trait objects, and the acting owner as an explicit [`RequestContext`].

pub mod bounded;
pub mod context;
pub mod link;
pub mod retry;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

pub use context::RequestContext;
pub use link::{LinkBuilder, LinkRegistry, Resolution, ResolutionService};
pub use retry::RetryPolicy;
pub use upload::{UploadOrchestrator, UploadPolicy, UploadRequest};
