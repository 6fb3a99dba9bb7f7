//! # qrlink-entity
//!
//! Domain entity models for QrLink. Every struct in this crate
//! represents a database table row. Entities derive `Debug`, `Clone`,
//! `Serialize`, `Deserialize` and `sqlx::FromRow`.

pub mod image;

pub use image::ImageRecord;
