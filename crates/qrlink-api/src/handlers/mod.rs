//! Request handlers.

pub mod blob;
pub mod health;
pub mod image;
pub mod resolve;
