//! Enemy spawning, pursuit and hitscan attacks
//!
//! Enemies hover just above the ground and slide along great circles toward
//! the player. Their attacks land instantly; damage is parked in a per-enemy
//! accumulator and drained once per frame by the session.

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::sphere::{
    Ray, random_surface_point, ray_sphere_intersect, rotate_toward, surface_up, tangent_component,
    upright_facing,
};
use crate::consts::*;

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec3,
    pub orientation: Quat,
    pub health: f32,
    pub speed: f32,
    pub fire_cooldown: f32,
    pub attack_timer: f32,
    pub alive: bool,
    /// Score awarded on kill
    pub value: u32,
    /// Damage dealt to the player, not yet applied
    pub pending_damage: f32,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec3, speed: f32) -> Self {
        Self {
            id,
            pos,
            orientation: Quat::from_rotation_arc(Vec3::Y, surface_up(pos)),
            health: ENEMY_HEALTH,
            speed,
            fire_cooldown: ENEMY_FIRE_COOLDOWN,
            attack_timer: 0.0,
            alive: true,
            value: ENEMY_KILL_SCORE,
            pending_damage: 0.0,
        }
    }

    /// Slide toward `target` along the surface and turn to face the way we go
    fn pursue(&mut self, target: Vec3, dt: f32) {
        let up = surface_up(self.pos);
        let heading = tangent_component(target - self.pos, up).normalize_or_zero();
        if heading == Vec3::ZERO {
            return;
        }

        let step = (self.speed * dt / PLANET_RADIUS).min(ENEMY_MAX_STEP);
        let axis = up.cross(heading).normalize();
        self.pos = rotate_toward(self.pos, axis, step, ENTITY_SURFACE_RADIUS);

        let facing = upright_facing(surface_up(self.pos), heading);
        self.orientation = self.orientation.slerp(facing, ENEMY_TURN_RATE);
    }

    /// Count down the attack timer and maybe land a hit on the player
    fn try_attack(&mut self, target: Vec3, dt: f32, rng: &mut impl Rng) {
        self.attack_timer -= dt;
        if self.attack_timer > 0.0 {
            return;
        }
        let distance = self.pos.distance(target);
        if distance >= ENEMY_ENGAGE_RANGE {
            return;
        }
        if rng.random::<f32>() < ENEMY_HIT_CHANCE {
            self.pending_damage += if distance < ENEMY_POINT_BLANK_RANGE {
                ENEMY_DAMAGE_NEAR
            } else {
                ENEMY_DAMAGE_FAR
            };
        }
        self.attack_timer = self.fire_cooldown;
    }
}

/// Outcome of a player shot that connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitResult {
    pub enemy_id: u32,
    pub score: u32,
    pub killed: bool,
}

/// Owns every enemy plus the spawn pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyController {
    pub enemies: Vec<Enemy>,
    pub spawn_timer: f32,
    /// Grows with every spawn, never capped
    pub difficulty: f32,
    next_id: u32,
}

impl Default for EnemyController {
    fn default() -> Self {
        Self {
            enemies: Vec::new(),
            spawn_timer: 0.0,
            difficulty: INITIAL_DIFFICULTY,
            next_id: 1,
        }
    }
}

impl EnemyController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.enemies.clear();
        self.spawn_timer = 0.0;
        self.difficulty = INITIAL_DIFFICULTY;
    }

    /// Live (not yet killed) enemies
    pub fn alive(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.alive)
    }

    /// Spawn one enemy away from the player
    pub fn spawn_enemy(&mut self, player_pos: Vec3, rng: &mut impl Rng) -> u32 {
        let pos = pick_spawn_point(player_pos, || {
            random_surface_point(&mut *rng, ENTITY_SURFACE_RADIUS)
        });
        let speed = ENEMY_BASE_SPEED
            + rng.random::<f32>() * ENEMY_SPEED_JITTER
            + self.difficulty * ENEMY_SPEED_PER_DIFFICULTY;

        let id = self.next_id;
        self.next_id += 1;
        self.enemies.push(Enemy::new(id, pos, speed));
        log::debug!("Enemy {} spawned (speed {:.2}, difficulty {:.2})", id, speed, self.difficulty);
        id
    }

    /// Advance spawning, movement and attacks, then drop dead enemies
    pub fn update(&mut self, dt: f32, player_pos: Vec3, rng: &mut impl Rng) {
        self.spawn_timer -= dt;
        if self.spawn_timer <= 0.0 {
            self.spawn_enemy(player_pos, rng);
            self.spawn_timer = (SPAWN_INTERVAL_BASE - self.difficulty * SPAWN_INTERVAL_PER_DIFFICULTY)
                .max(SPAWN_INTERVAL_MIN);
            self.difficulty += DIFFICULTY_STEP;
        }

        for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
            enemy.pursue(player_pos, dt);
            enemy.try_attack(player_pos, dt, rng);
        }

        self.enemies.retain(|e| e.alive);
    }

    /// Resolve a player shot against the nearest enemy on the ray
    pub fn handle_player_ray(&mut self, ray: &Ray) -> Option<HitResult> {
        let (index, _) = self
            .enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.alive)
            .filter_map(|(i, e)| ray_sphere_intersect(ray, e.pos, ENEMY_HIT_RADIUS).map(|t| (i, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        let enemy = &mut self.enemies[index];
        enemy.health -= PLAYER_SHOT_DAMAGE;
        if enemy.health <= 0.0 {
            enemy.alive = false;
            log::debug!("Enemy {} destroyed", enemy.id);
            return Some(HitResult {
                enemy_id: enemy.id,
                score: enemy.value,
                killed: true,
            });
        }
        Some(HitResult {
            enemy_id: enemy.id,
            score: ENEMY_HIT_SCORE,
            killed: false,
        })
    }

    /// Drain and sum every enemy's pending damage
    pub fn deal_damage_to_player(&mut self) -> f32 {
        self.enemies
            .iter_mut()
            .map(|e| std::mem::take(&mut e.pending_damage))
            .sum()
    }
}

/// Sample spawn candidates until one is clear of the player
///
/// Gives up after `ENEMY_SPAWN_ATTEMPTS` tries and uses the last sample.
pub fn pick_spawn_point(player_pos: Vec3, mut sample: impl FnMut() -> Vec3) -> Vec3 {
    let mut pos = sample();
    for _ in 1..ENEMY_SPAWN_ATTEMPTS {
        if pos.distance(player_pos) > ENEMY_SPAWN_CLEARANCE {
            break;
        }
        pos = sample();
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy_at(id: u32, pos: Vec3) -> Enemy {
        Enemy::new(id, pos, ENEMY_BASE_SPEED)
    }

    fn controller_with(enemies: Vec<Enemy>) -> EnemyController {
        EnemyController {
            enemies,
            ..Default::default()
        }
    }

    #[test]
    fn test_two_hits_kill() {
        let mut ctl = controller_with(vec![enemy_at(1, Vec3::new(0.0, 0.0, -10.0))]);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let first = ctl.handle_player_ray(&ray).unwrap();
        assert_eq!((first.score, first.killed), (ENEMY_HIT_SCORE, false));
        assert_eq!(ctl.enemies[0].health, 10.0);

        let second = ctl.handle_player_ray(&ray).unwrap();
        assert_eq!((second.score, second.killed), (15, true));
        assert!(!ctl.enemies[0].alive);

        // Dead enemies are no longer targetable
        assert!(ctl.handle_player_ray(&ray).is_none());
    }

    #[test]
    fn test_nearest_enemy_takes_the_shot() {
        let mut ctl = controller_with(vec![
            enemy_at(1, Vec3::new(0.0, 0.0, -20.0)),
            enemy_at(2, Vec3::new(0.0, 0.0, -8.0)),
            enemy_at(3, Vec3::new(0.0, 0.0, 5.0)),
        ]);
        let hit = ctl.handle_player_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).unwrap();
        assert_eq!(hit.enemy_id, 2);
    }

    #[test]
    fn test_miss_returns_none() {
        let mut ctl = controller_with(vec![enemy_at(1, Vec3::new(10.0, 0.0, -10.0))]);
        assert!(ctl.handle_player_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).is_none());
        assert!(EnemyController::new().handle_player_ray(&Ray::new(Vec3::ZERO, Vec3::X)).is_none());
    }

    #[test]
    fn test_damage_is_drained_once() {
        let mut a = enemy_at(1, Vec3::X * ENTITY_SURFACE_RADIUS);
        let mut b = enemy_at(2, Vec3::Y * ENTITY_SURFACE_RADIUS);
        a.pending_damage = 12.0;
        b.pending_damage = 6.0;
        let mut ctl = controller_with(vec![a, b]);
        assert_eq!(ctl.deal_damage_to_player(), 18.0);
        assert_eq!(ctl.deal_damage_to_player(), 0.0);
    }

    #[test]
    fn test_dead_enemies_are_compacted_and_frozen() {
        let player = Vec3::Z * PLAYER_SURFACE_RADIUS;
        let near = (Vec3::Z * 5.0 + Vec3::X).normalize() * ENTITY_SURFACE_RADIUS;
        let mut dead = enemy_at(1, near);
        dead.alive = false;
        let mut ctl = controller_with(vec![dead, enemy_at(2, -near)]);
        ctl.spawn_timer = 100.0;

        let mut rng = Pcg32::seed_from_u64(1);
        ctl.update(0.05, player, &mut rng);
        assert_eq!(ctl.enemies.len(), 1);
        assert_eq!(ctl.enemies[0].id, 2);
        assert_eq!(ctl.deal_damage_to_player(), 0.0);
    }

    #[test]
    fn test_spawn_timer_drives_difficulty() {
        let mut ctl = EnemyController::new();
        let mut rng = Pcg32::seed_from_u64(2);
        let player = Vec3::Z * PLAYER_SURFACE_RADIUS;

        ctl.update(0.016, player, &mut rng);
        assert_eq!(ctl.enemies.len(), 1);
        assert!((ctl.difficulty - (INITIAL_DIFFICULTY + DIFFICULTY_STEP)).abs() < 1e-6);
        assert!((ctl.spawn_timer - (SPAWN_INTERVAL_BASE - INITIAL_DIFFICULTY * SPAWN_INTERVAL_PER_DIFFICULTY)).abs() < 1e-6);

        // Interval bottoms out at the floor
        ctl.difficulty = 100.0;
        ctl.spawn_timer = 0.0;
        ctl.update(0.016, player, &mut rng);
        assert_eq!(ctl.spawn_timer, SPAWN_INTERVAL_MIN);
    }

    #[test]
    fn test_spawned_enemy_is_on_surface_and_clear_of_player() {
        let mut ctl = EnemyController::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let player = Vec3::Y * PLAYER_SURFACE_RADIUS;
        for _ in 0..50 {
            ctl.spawn_enemy(player, &mut rng);
        }
        for e in &ctl.enemies {
            assert!((e.pos.length() - ENTITY_SURFACE_RADIUS).abs() < 1e-3);
            assert_eq!(e.health, ENEMY_HEALTH);
            assert!(e.speed >= ENEMY_BASE_SPEED + INITIAL_DIFFICULTY * ENEMY_SPEED_PER_DIFFICULTY);
        }
    }

    #[test]
    fn test_spawn_falls_back_to_last_sample() {
        let player = Vec3::Z * PLAYER_SURFACE_RADIUS;
        let mut calls = 0;
        let pos = pick_spawn_point(player, || {
            calls += 1;
            Vec3::Z * ENTITY_SURFACE_RADIUS + Vec3::X * calls as f32 * 0.01
        });
        assert_eq!(calls, ENEMY_SPAWN_ATTEMPTS);
        assert!((pos.x - ENEMY_SPAWN_ATTEMPTS as f32 * 0.01).abs() < 1e-5);
    }

    #[test]
    fn test_spawn_stops_at_first_clear_sample() {
        let player = Vec3::Z * PLAYER_SURFACE_RADIUS;
        let mut calls = 0;
        let pos = pick_spawn_point(player, || {
            calls += 1;
            if calls < 3 { player } else { -player }
        });
        assert_eq!(calls, 3);
        assert_eq!(pos, -player);
    }

    #[test]
    fn test_enemy_closes_in_along_surface() {
        let player = Vec3::Z * PLAYER_SURFACE_RADIUS;
        let start = Vec3::X * ENTITY_SURFACE_RADIUS;
        let mut ctl = controller_with(vec![enemy_at(1, start)]);
        ctl.spawn_timer = 100.0;
        let mut rng = Pcg32::seed_from_u64(4);

        let before = start.distance(player);
        for _ in 0..20 {
            ctl.update(0.05, player, &mut rng);
            assert!((ctl.enemies[0].pos.length() - ENTITY_SURFACE_RADIUS).abs() < 1e-3);
        }
        assert!(ctl.enemies[0].pos.distance(player) < before);
    }

    #[test]
    fn test_step_is_capped_at_one_radian() {
        let player = Vec3::Z * PLAYER_SURFACE_RADIUS;
        let start = -Vec3::Z * ENTITY_SURFACE_RADIUS + Vec3::X * 0.5;
        let mut enemy = Enemy::new(1, start.normalize() * ENTITY_SURFACE_RADIUS, 10_000.0);
        let before = enemy.pos;
        enemy.pursue(player, 1.0);
        let angle = before.angle_between(enemy.pos);
        assert!((angle - ENEMY_MAX_STEP).abs() < 1e-3);
    }

    #[test]
    fn test_attacks_only_in_range() {
        let player = Vec3::Z * PLAYER_SURFACE_RADIUS;
        let mut rng = Pcg32::seed_from_u64(5);

        // Far away: timer runs out but nothing happens
        let mut far = enemy_at(1, -Vec3::Z * ENTITY_SURFACE_RADIUS);
        for _ in 0..100 {
            far.try_attack(player, 0.05, &mut rng);
        }
        assert_eq!(far.pending_damage, 0.0);

        // Point blank: every landed hit is worth the near damage
        let mut near = enemy_at(2, Vec3::Z * ENTITY_SURFACE_RADIUS);
        let mut attacks = 0;
        for _ in 0..200 {
            let before = near.attack_timer;
            near.try_attack(player, 0.05, &mut rng);
            if near.attack_timer > before {
                attacks += 1;
            }
        }
        assert!(attacks > 0);
        assert!(near.pending_damage > 0.0);
        assert_eq!(near.pending_damage % ENEMY_DAMAGE_NEAR, 0.0);
        assert!(near.pending_damage <= attacks as f32 * ENEMY_DAMAGE_NEAR);
    }
}
