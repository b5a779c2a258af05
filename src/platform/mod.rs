//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (held thrust keys)
//! - Storage (LocalStorage on web, in-memory natively)
//! - Frame timing

pub mod input;
pub mod storage;
pub mod time;

pub use input::{HeldKeys, Thruster};
pub use storage::{KeyValueStore, MemoryStorage, StorageError, default_storage};
pub use time::FrameClock;
