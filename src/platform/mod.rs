//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key/mouse state folded into per-frame snapshots)
//! - Storage (LocalStorage on web, nothing on native)

pub mod input;
pub mod storage;

pub use input::InputState;
