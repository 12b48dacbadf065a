//! Per-frame simulation step
//!
//! Runs the playing-phase update in a fixed order: player, enemies, aim
//! ray, damage, pickups.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState};
use crate::clamp_frame_dt;

/// Input snapshot for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Forward/back axis (-1..1)
    pub forward: f32,
    /// Strafe axis (-1..1)
    pub right: f32,
    pub sprint: bool,
    pub dash: bool,
    /// Yaw/pitch change this frame (radians)
    pub look: Vec2,
    /// Fire pressed this frame
    pub fire: bool,
    /// Pause pressed this frame
    pub pause: bool,
}

/// Advance the session by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause && state.phase == GamePhase::Playing {
        state.pause();
        return;
    }
    if state.phase != GamePhase::Playing {
        return;
    }

    let dt = clamp_frame_dt(dt);
    state.elapsed += dt;

    let gained = state.player.update(input, dt);
    state.score += gained as f64;

    state.enemies.update(dt, state.player.pos, &mut state.rng);

    // Firing only drives the cooldown and muzzle flash
    if input.fire {
        state.player.shoot();
    }

    // The aim ray is live every frame
    let ray = state.player.shoot_ray();
    if let Some(hit) = state.enemies.handle_player_ray(&ray) {
        state.score += hit.score as f64;
        state.events.push(GameEvent::ScoreUp { amount: hit.score });
        if hit.killed {
            state.kills += 1;
            state.events.push(GameEvent::EnemyKilled { id: hit.enemy_id });
        }
    }

    let damage = state.enemies.deal_damage_to_player();
    if damage > 0.0 {
        state.player.apply_damage(damage);
        state.events.push(GameEvent::DamageTaken { amount: damage });
        if state.player.is_dead() {
            state.end_game(true);
            return;
        }
    }

    state.pickups.update(dt, &mut state.rng);
    if let Some(kind) = state.pickups.collect_if_possible(&mut state.player) {
        state.events.push(GameEvent::PickupCollected { kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HighScore;
    use crate::consts::*;
    use crate::sim::effects::EffectKind;
    use crate::sim::enemy::Enemy;
    use crate::sim::pickup::Pickup;

    const DT: f32 = 1.0 / 60.0;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, HighScore::default());
        state.request_start();
        state.pointer_lock_acquired();
        state
    }

    /// Stationary enemy a few steps ahead, with the player aiming down at it
    fn enemy_in_sights(state: &mut GameState, id: u32) -> Enemy {
        let player = &mut state.player;
        let target = (player.pos + player.forward() * 6.0).normalize() * ENTITY_SURFACE_RADIUS;
        let aim = (target - player.camera_position()).normalize();
        player.pitch = aim.dot(player.up()).asin();

        let mut enemy = Enemy::new(id, target, ENEMY_BASE_SPEED);
        enemy.attack_timer = 100.0;
        enemy.speed = 0.0;
        enemy
    }

    #[test]
    fn test_menu_does_not_tick() {
        let mut state = GameState::new(1, HighScore::default());
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.elapsed, 0.0);
        assert!(state.enemies.enemies.is_empty());
    }

    #[test]
    fn test_playing_advances_time_and_spawns() {
        let mut state = playing_state(2);
        tick(&mut state, &TickInput::default(), DT);
        assert!((state.elapsed - DT).abs() < 1e-6);
        assert_eq!(state.enemies.enemies.len(), 1);
    }

    #[test]
    fn test_frame_delta_is_clamped() {
        let mut state = playing_state(3);
        tick(&mut state, &TickInput::default(), 5.0);
        assert!((state.elapsed - MAX_FRAME_DT).abs() < 1e-6);
    }

    #[test]
    fn test_pause_input_stops_updates() {
        let mut state = playing_state(4);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.elapsed, 0.0);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.elapsed, 0.0);
    }

    #[test]
    fn test_aim_ray_hits_without_firing() {
        let mut state = playing_state(5);
        state.enemies.spawn_timer = 100.0;
        let enemy = enemy_in_sights(&mut state, 77);
        state.enemies.enemies.push(enemy);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.enemies.enemies[0].health, ENEMY_HEALTH - PLAYER_SHOT_DAMAGE);
        assert!(state.drain_events().contains(&GameEvent::ScoreUp { amount: ENEMY_HIT_SCORE }));
        assert!(!state.player.muzzle_visible());

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.kills, 1);
        assert!(state.enemies.enemies.iter().all(|e| !e.alive));
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::EnemyKilled { id: 77 }));
        assert!(state.score >= (ENEMY_HIT_SCORE + ENEMY_KILL_SCORE) as f64);

        // Cleanup pass removes the corpse
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.enemies.enemies.is_empty());
    }

    #[test]
    fn test_fire_starts_cooldown_and_muzzle_flash() {
        let mut state = playing_state(6);
        state.enemies.spawn_timer = 100.0;
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, DT);
        assert!(state.player.muzzle_visible());
        assert!(state.player.shoot_cooldown > 0.0);
    }

    #[test]
    fn test_aim_away_misses() {
        let mut state = playing_state(6);
        state.enemies.spawn_timer = 100.0;
        let mut enemy = enemy_in_sights(&mut state, 1);
        enemy.pos = -enemy.pos;
        state.enemies.enemies.push(enemy);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.enemies.enemies[0].health, ENEMY_HEALTH);
    }

    #[test]
    fn test_pending_damage_reaches_player() {
        let mut state = playing_state(7);
        state.enemies.spawn_timer = 100.0;
        let mut enemy = enemy_in_sights(&mut state, 1);
        enemy.pending_damage = 12.0;
        state.enemies.enemies.push(enemy);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - 12.0);
        assert!(state.drain_events().contains(&GameEvent::DamageTaken { amount: 12.0 }));
    }

    #[test]
    fn test_death_ends_game() {
        let mut state = playing_state(8);
        state.enemies.spawn_timer = 100.0;
        state.player.health = 5.0;
        let mut enemy = enemy_in_sights(&mut state, 1);
        enemy.pending_damage = 6.0;
        state.enemies.enemies.push(enemy);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.health, 0.0);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
        );
    }

    #[test]
    fn test_no_pickup_after_death() {
        let mut state = playing_state(8);
        state.enemies.spawn_timer = 100.0;
        state.pickups.spawn_timer = 100.0;
        state.player.health = 5.0;
        let mut enemy = enemy_in_sights(&mut state, 1);
        enemy.pending_damage = 6.0;
        state.enemies.enemies.push(enemy);
        state.pickups.pickups.push(Pickup {
            id: 1,
            kind: EffectKind::Heal,
            anchor: state.player.pos.normalize() * ENTITY_SURFACE_RADIUS,
            phase: 0.0,
            spin: 0.0,
            alive: true,
        });

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.health, 0.0);
        assert!(state.pickups.pickups[0].alive);
        let events = state.drain_events();
        assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_pickup_collected_in_frame() {
        let mut state = playing_state(9);
        state.enemies.spawn_timer = 100.0;
        state.pickups.spawn_timer = 100.0;
        state.pickups.pickups.push(Pickup {
            id: 1,
            kind: EffectKind::Shield,
            anchor: state.player.pos.normalize() * ENTITY_SURFACE_RADIUS,
            phase: 0.0,
            spin: 0.0,
            alive: true,
        });

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player.effect_level(EffectKind::Shield), 1.0);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::PickupCollected { kind: EffectKind::Shield })
        );
    }

    #[test]
    fn test_score_never_decreases_while_playing() {
        let mut state = playing_state(10);
        let input = TickInput {
            forward: 1.0,
            right: 1.0,
            fire: true,
            ..Default::default()
        };
        let mut last = state.score;
        for _ in 0..600 {
            tick(&mut state, &input, DT);
            assert!(state.score >= last);
            last = state.score;
            if state.phase != GamePhase::Playing {
                break;
            }
        }
    }

    #[test]
    fn test_determinism() {
        let mut a = playing_state(99999);
        let mut b = playing_state(99999);
        let inputs = [
            TickInput {
                forward: 1.0,
                ..Default::default()
            },
            TickInput {
                fire: true,
                look: Vec2::new(0.1, 0.0),
                ..Default::default()
            },
            TickInput::default(),
        ];
        for _ in 0..100 {
            for input in &inputs {
                tick(&mut a, input, DT);
                tick(&mut b, input, DT);
            }
        }
        assert_eq!(a.enemies.enemies.len(), b.enemies.enemies.len());
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.score, b.score);
    }
}
