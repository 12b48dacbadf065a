//! Session state and phase transitions
//!
//! The session owns the player and both entity controllers, tracks score and
//! time, and moves between the menu, play, pause and game-over phases.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::EffectKind;
use super::enemy::EnemyController;
use super::pickup::PickupController;
use super::player::Player;
use crate::highscores::HighScore;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title menu (also the how-to panel)
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// A session change waiting for the pointer lock to be granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockRequest {
    Start,
    Resume,
}

/// Discrete events for transient UI feedback, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A shot connected
    ScoreUp { amount: u32 },
    EnemyKilled { id: u32 },
    DamageTaken { amount: f32 },
    PickupCollected { kind: EffectKind },
    /// The run ended by death
    GameOver { score: u64, new_best: bool },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub phase: GamePhase,
    /// Accumulated score (fractional trickle from movement)
    pub score: f64,
    pub kills: u32,
    /// Seconds of play this run
    pub elapsed: f32,
    pub high_score: HighScore,
    /// Menu sub-panel
    pub show_how_to: bool,
    pub pending_lock: Option<LockRequest>,
    pub player: Player,
    pub enemies: EnemyController,
    pub pickups: PickupController,
    /// UI events produced since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new session sitting in the menu
    pub fn new(seed: u64, high_score: HighScore) -> Self {
        Self {
            seed,
            phase: GamePhase::Menu,
            score: 0.0,
            kills: 0,
            elapsed: 0.0,
            high_score,
            show_how_to: false,
            pending_lock: None,
            player: Player::new(),
            enemies: EnemyController::new(),
            pickups: PickupController::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Score as shown to the player
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    /// Zero the run and put everyone back in place
    pub fn reset_run(&mut self) {
        self.score = 0.0;
        self.kills = 0;
        self.elapsed = 0.0;
        self.events.clear();
        self.player.reset(&mut self.rng);
        self.enemies.reset();
        self.pickups.reset();
    }

    /// Reset everything and wait for the pointer lock before playing
    pub fn request_start(&mut self) {
        self.reset_run();
        self.pending_lock = Some(LockRequest::Start);
        log::info!("New run requested");
    }

    /// Ask to resume from the pause menu
    pub fn request_resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.pending_lock = Some(LockRequest::Resume);
        }
    }

    /// The browser granted the pointer lock
    pub fn pointer_lock_acquired(&mut self) {
        match self.pending_lock.take() {
            Some(LockRequest::Start) => {
                self.phase = GamePhase::Playing;
                self.show_how_to = false;
                log::info!("Run started");
            }
            Some(LockRequest::Resume) if self.phase == GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            _ => {}
        }
    }

    /// The lock was denied or timed out. Nothing changes.
    pub fn pointer_lock_failed(&mut self) {
        if let Some(request) = self.pending_lock.take() {
            log::warn!("Pointer lock not granted ({:?}), staying in {:?}", request, self.phase);
        }
    }

    /// The browser dropped the lock (usually Escape)
    pub fn pointer_lock_released(&mut self) {
        if self.phase == GamePhase::Playing {
            self.pause();
        }
    }

    pub fn pause(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::Paused;
        log::info!("Paused at {:.1}s", self.elapsed);
    }

    /// End the run. A death records the score against the best.
    pub fn end_game(&mut self, death: bool) {
        self.pending_lock = None;
        if death {
            let score = self.display_score();
            let new_best = self.high_score.record(score);
            if new_best {
                self.high_score.save();
            }
            self.events.push(GameEvent::GameOver { score, new_best });
            log::info!(
                "Game over: score {}, kills {}, time {:.1}s{}",
                score,
                self.kills,
                self.elapsed,
                if new_best { " (new best)" } else { "" }
            );
        }
        self.phase = GamePhase::GameOver;
    }

    /// Abandon the current run and start again
    pub fn restart(&mut self) {
        self.end_game(false);
        self.request_start();
    }

    /// Abandon the current run and go back to the title menu
    pub fn quit_to_menu(&mut self) {
        self.end_game(false);
        self.phase = GamePhase::Menu;
        self.show_how_to = false;
    }

    /// Toggle the how-to panel (menu only)
    pub fn set_show_how_to(&mut self, show: bool) {
        if self.phase == GamePhase::Menu {
            self.show_how_to = show;
        }
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
