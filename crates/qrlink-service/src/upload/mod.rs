//! Validated image upload.

pub mod orchestrator;
pub mod policy;

pub use orchestrator::{UploadOrchestrator, UploadRequest};
pub use policy::UploadPolicy;
