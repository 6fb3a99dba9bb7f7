//! Core traits defined in `qrlink-core` and implemented by other crates.

pub mod clock;
pub mod record;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use record::RecordStore;
pub use storage::{ObjectStore, SignedUrl};
