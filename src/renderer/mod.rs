//! Scene hand-off
//!
//! The 3D scene itself is drawn on the JavaScript side. Each frame the game
//! packs every visible entity's transform into flat buffers it can upload
//! as-is.

pub mod instance;

pub use instance::{CameraTransform, EntityInstance, EntityKind, SceneFrame};
