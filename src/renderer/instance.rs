//! Instance buffers for the scene graph

use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};

use crate::sim::sphere::upright_with_yaw;
use crate::sim::{EffectKind, GameState};

/// Floats per entity instance
pub const INSTANCE_STRIDE: usize = std::mem::size_of::<EntityInstance>() / 4;

/// Muzzle position relative to the player body
const MUZZLE_OFFSET: Vec3 = Vec3::new(0.4, 0.6, -0.6);

/// Starfield drift (radians per second about X and Y)
const SKY_SPIN: [f32; 2] = [0.005, 0.01];

/// What a scene instance represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EntityKind {
    Player = 0,
    MuzzleFlash = 1,
    Enemy = 2,
    PickupHeal = 3,
    PickupSpeed = 4,
    PickupShield = 5,
    PickupFireRate = 6,
}

impl EntityKind {
    pub fn pickup(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Heal => EntityKind::PickupHeal,
            EffectKind::Speed => EntityKind::PickupSpeed,
            EffectKind::Shield => EntityKind::PickupShield,
            EffectKind::FireRate => EntityKind::PickupFireRate,
        }
    }
}

/// One entity transform, laid out as 8 floats
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct EntityInstance {
    pub position: [f32; 3],
    /// `EntityKind` as a float so the whole buffer is one Float32Array
    pub kind: f32,
    /// Quaternion (x, y, z, w)
    pub rotation: [f32; 4],
}

impl EntityInstance {
    pub fn new(kind: EntityKind, position: Vec3, rotation: Quat) -> Self {
        Self {
            position: position.to_array(),
            kind: kind as u8 as f32,
            rotation: rotation.to_array(),
        }
    }
}

/// Camera transform, laid out as 8 floats
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraTransform {
    pub position: [f32; 3],
    _pad: f32,
    /// Quaternion (x, y, z, w)
    pub rotation: [f32; 4],
}

impl CameraTransform {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position: position.to_array(),
            _pad: 0.0,
            rotation: rotation.to_array(),
        }
    }
}

/// Everything the scene needs for one frame
#[derive(Debug, Clone)]
pub struct SceneFrame {
    pub instances: Vec<EntityInstance>,
    pub camera: CameraTransform,
    /// Starfield rotation about X and Y (radians)
    pub sky_rotation: [f32; 2],
}

impl SceneFrame {
    /// Snapshot the live entities. `world_time` drives the sky drift and keeps
    /// running outside of play.
    pub fn capture(state: &GameState, world_time: f32) -> Self {
        let player = &state.player;
        let mut instances = Vec::with_capacity(
            2 + state.enemies.enemies.len() + state.pickups.pickups.len(),
        );

        instances.push(EntityInstance::new(EntityKind::Player, player.pos, player.orientation));
        if player.muzzle_visible() {
            let muzzle = player.pos + player.orientation * MUZZLE_OFFSET;
            instances.push(EntityInstance::new(EntityKind::MuzzleFlash, muzzle, player.orientation));
        }

        for enemy in state.enemies.alive() {
            instances.push(EntityInstance::new(EntityKind::Enemy, enemy.pos, enemy.orientation));
        }

        for pickup in state.pickups.alive() {
            let rotation = upright_with_yaw(pickup.anchor.normalize_or_zero(), pickup.spin);
            instances.push(EntityInstance::new(EntityKind::pickup(pickup.kind), pickup.pos(), rotation));
        }

        Self {
            instances,
            camera: CameraTransform::new(player.camera_position(), player.camera_rotation),
            sky_rotation: [world_time * SKY_SPIN[0], world_time * SKY_SPIN[1]],
        }
    }

    /// Instance buffer as raw floats
    pub fn instance_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Camera as raw floats
    pub fn camera_floats(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(&self.camera))
    }
}
