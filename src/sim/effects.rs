//! Timed status effects granted by pickups
//!
//! At most one effect per kind is active. Re-applying a kind merges into the
//! existing entry, taking the larger remaining time and the larger magnitude.

use serde::{Deserialize, Serialize};

/// Status effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Instant health restoration when applied
    Heal,
    /// Movement boost (no gameplay hook yet)
    Speed,
    /// Flat reduction of incoming damage
    Shield,
    /// Shorter shot cooldown
    FireRate,
}

impl EffectKind {
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Heal,
        EffectKind::Speed,
        EffectKind::Shield,
        EffectKind::FireRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Heal => "heal",
            EffectKind::Speed => "speed",
            EffectKind::Shield => "shield",
            EffectKind::FireRate => "firerate",
        }
    }
}

/// An active effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: EffectKind,
    /// Seconds until expiry
    pub time_left: f32,
    pub magnitude: f32,
}

/// What happened when an effect was applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Applied {
    /// New entry
    Inserted,
    /// Merged into an existing entry of the same kind
    Extended,
}

/// The player's effect set, keyed by kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    effects: Vec<StatusEffect>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an effect, merging with an existing one of the same kind
    pub fn apply(&mut self, kind: EffectKind, duration: f32, magnitude: f32) -> Applied {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.time_left = existing.time_left.max(duration);
            existing.magnitude = existing.magnitude.max(magnitude);
            return Applied::Extended;
        }
        self.effects.push(StatusEffect {
            kind,
            time_left: duration,
            magnitude,
        });
        Applied::Inserted
    }

    /// Active magnitude for a kind, 0 when absent
    pub fn level(&self, kind: EffectKind) -> f32 {
        self.get(kind).map(|e| e.magnitude).unwrap_or(0.0)
    }

    pub fn get(&self, kind: EffectKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Age all effects by `dt`, returning the ones that expired
    pub fn tick(&mut self, dt: f32) -> Vec<StatusEffect> {
        let mut expired = Vec::new();
        self.effects.retain_mut(|effect| {
            effect.time_left -= dt;
            if effect.time_left <= 0.0 {
                expired.push(*effect);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
