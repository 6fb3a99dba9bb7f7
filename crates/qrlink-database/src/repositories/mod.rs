//! Record store implementations for image records.

pub mod image;
pub mod memory;

pub use image::PgImageRepository;
pub use memory::MemoryImageRepository;
