//! Short-link lifecycle: registry, resolution and link derivation.

pub mod payload;
pub mod registry;
pub mod resolve;

pub use payload::{LinkBuilder, link_for};
pub use registry::LinkRegistry;
pub use resolve::{Resolution, ResolutionService};
