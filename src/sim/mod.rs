//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Input arrives as a per-frame snapshot
//! - No rendering dependencies; the only side effect is saving a new best score

pub mod effects;
pub mod enemy;
pub mod pickup;
pub mod player;
pub mod sphere;
pub mod state;
pub mod tick;

pub use effects::{ActiveEffects, EffectKind, StatusEffect};
pub use enemy::{Enemy, EnemyController, HitResult};
pub use pickup::{Pickup, PickupController};
pub use player::Player;
pub use sphere::{Ray, ray_sphere_intersect};
pub use state::{GameEvent, GamePhase, GameState, LockRequest};
pub use tick::{TickInput, tick};
