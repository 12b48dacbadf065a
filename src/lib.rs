//! Sphere Runner - an arcade shooter on the surface of a tiny planet
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement on the sphere, enemies, pickups, session)
//! - `renderer`: Transform hand-off to the browser scene graph
//! - `platform`: Browser/native platform abstraction (input, storage)
//! - `ui`: HUD snapshot, flash feedback and panel visibility
//! - `highscores`: Persisted best score
//! - `settings`: Persisted user preferences

pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use highscores::HighScore;
pub use settings::Settings;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Planet dimensions
    pub const PLANET_RADIUS: f32 = 40.0;
    /// Player walks slightly above the ground
    pub const PLAYER_SURFACE_RADIUS: f32 = PLANET_RADIUS + 1.2;
    /// Enemies and pickups hover at this radius
    pub const ENTITY_SURFACE_RADIUS: f32 = PLANET_RADIUS + 1.0;

    /// Player movement
    pub const PLAYER_WALK_SPEED: f32 = 12.0;
    pub const PLAYER_SPRINT_SPEED: f32 = 18.0;
    pub const DASH_MULTIPLIER: f32 = 3.2;
    pub const DASH_COOLDOWN: f32 = 1.0;
    pub const MAX_STAMINA: f32 = 100.0;
    pub const STAMINA_DRAIN: f32 = 22.0;
    pub const STAMINA_REGEN: f32 = 12.0;
    /// Pitch stays this far away from straight up/down
    pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.1;
    /// Camera sits this far above the player origin along local up
    pub const CAMERA_HEIGHT: f32 = 1.0;
    /// Equator spawn band (radians either side of the equator)
    pub const EQUATOR_JITTER: f32 = 0.2;

    /// Player combat
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const SHOT_COOLDOWN: f32 = 0.12;
    pub const MUZZLE_FLASH_TIME: f32 = 0.05;
    /// Score trickle per second of movement
    pub const MOVE_SCORE_RATE: f32 = 1.0;

    /// Enemy defaults
    pub const ENEMY_HEALTH: f32 = 30.0;
    pub const ENEMY_BASE_SPEED: f32 = 8.0;
    pub const ENEMY_SPEED_JITTER: f32 = 2.0;
    pub const ENEMY_SPEED_PER_DIFFICULTY: f32 = 0.3;
    pub const ENEMY_FIRE_COOLDOWN: f32 = 1.0;
    pub const ENEMY_KILL_SCORE: u32 = 15;
    pub const ENEMY_HIT_SCORE: u32 = 5;
    pub const ENEMY_HIT_RADIUS: f32 = 1.5;
    /// Minimum spawn distance from the player
    pub const ENEMY_SPAWN_CLEARANCE: f32 = 25.0;
    pub const ENEMY_SPAWN_ATTEMPTS: usize = 20;
    /// Per-frame facing interpolation factor
    pub const ENEMY_TURN_RATE: f32 = 0.2;
    /// Largest angular step an enemy takes in one frame (radians)
    pub const ENEMY_MAX_STEP: f32 = 1.0;

    /// Enemy attacks
    pub const ENEMY_ENGAGE_RANGE: f32 = 20.0;
    pub const ENEMY_POINT_BLANK_RANGE: f32 = 10.0;
    pub const ENEMY_HIT_CHANCE: f32 = 0.6;
    pub const ENEMY_DAMAGE_NEAR: f32 = 12.0;
    pub const ENEMY_DAMAGE_FAR: f32 = 6.0;

    /// Damage dealt by one player shot
    pub const PLAYER_SHOT_DAMAGE: f32 = 20.0;

    /// Enemy spawn pacing
    pub const INITIAL_DIFFICULTY: f32 = 1.0;
    pub const DIFFICULTY_STEP: f32 = 0.05;
    pub const SPAWN_INTERVAL_BASE: f32 = 2.2;
    pub const SPAWN_INTERVAL_PER_DIFFICULTY: f32 = 0.08;
    pub const SPAWN_INTERVAL_MIN: f32 = 0.4;

    /// Pickups
    pub const PICKUP_FIRST_SPAWN: f32 = 1.5;
    pub const PICKUP_SPAWN_INTERVAL: f32 = 4.0;
    pub const PICKUP_COLLECT_RADIUS: f32 = 2.2;
    pub const PICKUP_BOB_AMPLITUDE: f32 = 0.1;
    pub const PICKUP_BOB_FREQUENCY: f32 = 2.0;
    pub const PICKUP_SPIN_RATE: f32 = 1.2;

    /// Status effects
    pub const HEAL_PER_MAGNITUDE: f32 = 30.0;
    pub const SHIELD_REDUCTION_PER_MAGNITUDE: f32 = 0.5;
    pub const FIRERATE_BONUS_PER_MAGNITUDE: f32 = 0.5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert spherical (r, polar angle from +Y, azimuth) to cartesian
///
/// Matches the usual "Y is up" convention: polar 0 is the north pole and the
/// azimuth is measured in the XZ plane starting at +Z.
#[inline]
pub fn spherical_to_cartesian(r: f32, polar: f32, azimuth: f32) -> Vec3 {
    let sin_polar = polar.sin();
    Vec3::new(
        r * sin_polar * azimuth.sin(),
        r * polar.cos(),
        r * sin_polar * azimuth.cos(),
    )
}

/// Clamp a raw frame delta into the range the simulation accepts
#[inline]
pub fn clamp_frame_dt(raw: f32) -> f32 {
    if raw.is_finite() {
        raw.clamp(0.0, consts::MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Format elapsed seconds as `m:ss`
pub fn format_time(seconds: f32) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
