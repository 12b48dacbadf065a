//! The player character
//!
//! Walks on the planet surface, looks around with pitch/yaw, sprints, dashes
//! and fires a hitscan gun from the camera.

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::effects::{ActiveEffects, Applied, EffectKind};
use super::sphere::{
    Ray, move_along_surface, random_equator_point, surface_up, upright_with_yaw, yaw_toward,
};
use super::tick::TickInput;
use crate::consts::*;
use crate::normalize_angle;

/// Player state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Always exactly `PLAYER_SURFACE_RADIUS` from the planet centre
    pub pos: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub health: f32,
    pub max_health: f32,
    pub stamina: f32,
    pub dash_cooldown: f32,
    pub shoot_cooldown: f32,
    /// Muzzle flash stays visible while positive
    pub muzzle_timer: f32,
    pub effects: ActiveEffects,
    /// Body orientation (local +Y = surface normal)
    pub orientation: Quat,
    /// Camera orientation (pitch applied on top of the body)
    pub camera_rotation: Quat,
    /// Whether the last update moved the player
    pub moving: bool,
}

impl Default for Player {
    fn default() -> Self {
        let pos = Vec3::new(0.0, 0.0, PLAYER_SURFACE_RADIUS);
        let orientation = upright_with_yaw(surface_up(pos), 0.0);
        Self {
            pos,
            yaw: 0.0,
            pitch: 0.0,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            stamina: MAX_STAMINA,
            dash_cooldown: 0.0,
            shoot_cooldown: 0.0,
            muzzle_timer: 0.0,
            effects: ActiveEffects::new(),
            orientation,
            camera_rotation: orientation,
            moving: false,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the player somewhere near the equator with full health
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.pos = random_equator_point(rng, PLAYER_SURFACE_RADIUS, EQUATOR_JITTER);
        // Face north along the local meridian
        self.yaw = yaw_toward(surface_up(self.pos), Vec3::Y);
        self.pitch = 0.0;

        self.health = self.max_health;
        self.stamina = MAX_STAMINA;
        self.dash_cooldown = 0.0;
        self.shoot_cooldown = 0.0;
        self.muzzle_timer = 0.0;
        self.effects.clear();
        self.moving = false;
        self.update_orientation();
    }

    /// Local up (surface normal)
    #[inline]
    pub fn up(&self) -> Vec3 {
        surface_up(self.pos)
    }

    /// Forward direction in the tangent plane
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Right direction in the tangent plane
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    /// Advance one frame. Returns the score earned for moving.
    pub fn update(&mut self, input: &TickInput, dt: f32) -> f32 {
        self.shoot_cooldown = (self.shoot_cooldown - dt).max(0.0);

        // Mouse look
        self.yaw = normalize_angle(self.yaw + input.look.x);
        self.pitch = (self.pitch + input.look.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_orientation();

        let mut speed = PLAYER_WALK_SPEED;
        if input.sprint && self.stamina > 0.0 {
            speed = PLAYER_SPRINT_SPEED;
            self.stamina = (self.stamina - dt * STAMINA_DRAIN).max(0.0);
        } else {
            self.stamina = (self.stamina + dt * STAMINA_REGEN).min(MAX_STAMINA);
        }

        // Dash is a one-frame burst
        if input.dash && self.dash_cooldown <= 0.0 {
            self.dash_cooldown = DASH_COOLDOWN;
            speed *= DASH_MULTIPLIER;
        }
        self.dash_cooldown = (self.dash_cooldown - dt).max(0.0);

        let forward_axis = input.forward.clamp(-1.0, 1.0);
        let right_axis = input.right.clamp(-1.0, 1.0);
        let move_dir = (self.forward() * forward_axis + self.right() * right_axis).normalize_or_zero();
        self.moving = move_dir != Vec3::ZERO;

        if self.moving {
            self.pos = move_along_surface(self.pos, move_dir * speed * dt, PLAYER_SURFACE_RADIUS);
        } else {
            self.pos = self.pos.normalize_or(Vec3::Z) * PLAYER_SURFACE_RADIUS;
        }
        self.update_orientation();

        if self.muzzle_timer > 0.0 {
            self.muzzle_timer -= dt;
        }

        for expired in self.effects.tick(dt) {
            self.on_effect_expired(expired.kind);
        }

        if self.moving { MOVE_SCORE_RATE * dt } else { 0.0 }
    }

    /// Re-derive body and camera orientation from position, yaw and pitch
    fn update_orientation(&mut self) {
        self.orientation = upright_with_yaw(self.up(), self.yaw);
        let pitch = Quat::from_axis_angle(self.right(), self.pitch);
        self.camera_rotation = pitch * self.orientation;
    }

    /// Try to fire. Returns false while the gun is cooling down.
    pub fn shoot(&mut self) -> bool {
        if self.shoot_cooldown > 0.0 {
            return false;
        }
        self.muzzle_timer = MUZZLE_FLASH_TIME;
        let bonus = self.effect_level(EffectKind::FireRate) * FIRERATE_BONUS_PER_MAGNITUDE;
        self.shoot_cooldown = SHOT_COOLDOWN / (1.0 + bonus);
        true
    }

    /// Whether the muzzle flash should be drawn
    pub fn muzzle_visible(&self) -> bool {
        self.muzzle_timer > 0.0
    }

    /// Camera position in world space
    pub fn camera_position(&self) -> Vec3 {
        self.pos + self.up() * CAMERA_HEIGHT
    }

    /// Aim ray from the camera, recomputed on every call
    pub fn shoot_ray(&self) -> Ray {
        Ray::new(self.camera_position(), self.camera_rotation * Vec3::NEG_Z)
    }

    /// Take damage, reduced by a flat amount per shield level
    pub fn apply_damage(&mut self, amount: f32) {
        let shield = self.effect_level(EffectKind::Shield);
        let taken = (amount - shield * SHIELD_REDUCTION_PER_MAGNITUDE).max(0.0);
        self.health = (self.health - taken).clamp(0.0, self.max_health);
    }

    /// Grant a status effect. Re-applying a kind extends it instead of stacking.
    pub fn add_effect(&mut self, kind: EffectKind, duration: f32, magnitude: f32) {
        if self.effects.apply(kind, duration, magnitude) == Applied::Extended {
            return;
        }
        match kind {
            EffectKind::Heal => {
                self.health = (self.health + HEAL_PER_MAGNITUDE * magnitude).clamp(0.0, self.max_health);
            }
            EffectKind::Speed | EffectKind::Shield | EffectKind::FireRate => {}
        }
        log::debug!("Effect {} applied ({:.1}s x{})", kind.as_str(), duration, magnitude);
    }

    /// Active magnitude of an effect kind, 0 when absent
    pub fn effect_level(&self, kind: EffectKind) -> f32 {
        self.effects.level(kind)
    }

    fn on_effect_expired(&mut self, kind: EffectKind) {
        match kind {
            EffectKind::Heal => {}
            EffectKind::Speed | EffectKind::Shield | EffectKind::FireRate => {
                log::debug!("Effect {} expired", kind.as_str());
            }
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}
