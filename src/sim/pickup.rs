//! Collectible power-ups
//!
//! Pickups appear at random spots on the planet on a fixed timer, bob and
//! spin in place, and grant a status effect when the player walks into them.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::effects::EffectKind;
use super::player::Player;
use super::sphere::{random_surface_point, surface_up};
use crate::consts::*;

/// A pickup entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: EffectKind,
    /// Resting point on the surface
    pub anchor: Vec3,
    /// Bob animation accumulator (seconds, randomized start)
    pub phase: f32,
    /// Spin about the local vertical axis (radians)
    pub spin: f32,
    pub alive: bool,
}

impl Pickup {
    /// Displayed position: the anchor pushed along local up by the bob offset
    pub fn pos(&self) -> Vec3 {
        let bob = (self.phase * PICKUP_BOB_FREQUENCY).sin() * PICKUP_BOB_AMPLITUDE;
        self.anchor + surface_up(self.anchor) * bob
    }
}

/// Effect granted by a pickup: (duration seconds, magnitude)
pub fn grant_for(kind: EffectKind) -> (f32, f32) {
    match kind {
        // Heal is instant, the duration only keeps the entry around briefly
        EffectKind::Heal => (0.1, 1.0),
        EffectKind::Speed => (8.0, 1.0),
        EffectKind::Shield => (10.0, 1.0),
        EffectKind::FireRate => (8.0, 1.0),
    }
}

/// Owns every pickup plus the spawn timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupController {
    pub pickups: Vec<Pickup>,
    pub spawn_timer: f32,
    next_id: u32,
}

impl Default for PickupController {
    fn default() -> Self {
        Self {
            pickups: Vec::new(),
            spawn_timer: PICKUP_FIRST_SPAWN,
            next_id: 1,
        }
    }
}

impl PickupController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.pickups.clear();
        self.spawn_timer = PICKUP_FIRST_SPAWN;
    }

    pub fn alive(&self) -> impl Iterator<Item = &Pickup> {
        self.pickups.iter().filter(|p| p.alive)
    }

    /// Spawn a random pickup at a random spot
    pub fn spawn_pickup(&mut self, rng: &mut impl Rng) -> u32 {
        let anchor = random_surface_point(rng, ENTITY_SURFACE_RADIUS);
        let kind = EffectKind::ALL[rng.random_range(0..EffectKind::ALL.len())];
        let phase = rng.random::<f32>() * std::f32::consts::TAU;

        let id = self.next_id;
        self.next_id += 1;
        self.pickups.push(Pickup {
            id,
            kind,
            anchor,
            phase,
            spin: 0.0,
            alive: true,
        });
        log::debug!("Pickup {} ({}) spawned", id, kind.as_str());
        id
    }

    /// Advance the spawn timer and animations, then drop collected pickups
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        self.spawn_timer -= dt;
        if self.spawn_timer <= 0.0 {
            self.spawn_pickup(rng);
            self.spawn_timer = PICKUP_SPAWN_INTERVAL;
        }

        for pickup in self.pickups.iter_mut().filter(|p| p.alive) {
            pickup.phase += dt;
            pickup.spin = crate::normalize_angle(pickup.spin + dt * PICKUP_SPIN_RATE);
        }

        self.pickups.retain(|p| p.alive);
    }

    /// Collect every pickup in reach of the player
    ///
    /// All of them grant their effect, but only the first one found is
    /// reported back for UI feedback.
    pub fn collect_if_possible(&mut self, player: &mut Player) -> Option<EffectKind> {
        let mut first = None;
        for pickup in self.pickups.iter_mut().filter(|p| p.alive) {
            if pickup.pos().distance(player.pos) >= PICKUP_COLLECT_RADIUS {
                continue;
            }
            pickup.alive = false;
            let (duration, magnitude) = grant_for(pickup.kind);
            player.add_effect(pickup.kind, duration, magnitude);
            log::debug!("Pickup {} ({}) collected", pickup.id, pickup.kind.as_str());
            first.get_or_insert(pickup.kind);
        }
        first
    }
}
