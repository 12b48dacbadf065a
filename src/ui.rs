//! HUD data and panel layout
//!
//! Everything the DOM layer needs, computed from the session without touching
//! the DOM: text for the HUD, which panels are visible, and the flash
//! feedback to play for this frame's events.

use crate::format_time;
use crate::settings::Settings;
use crate::sim::{EffectKind, GameEvent, GamePhase, GameState};

/// Ammo never runs out
pub const AMMO_TEXT: &str = "∞";

/// Per-frame HUD values
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub score: u64,
    pub high_score: u64,
    /// `m:ss`
    pub time: String,
    pub ammo: &'static str,
    /// 0..=100
    pub health_percent: f32,
    /// 0..=100
    pub stamina_percent: f32,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        Self {
            score: state.display_score(),
            high_score: state.high_score.best(),
            time: format_time(state.elapsed),
            ammo: AMMO_TEXT,
            health_percent: (player.health / player.max_health * 100.0).clamp(0.0, 100.0),
            stamina_percent: player.stamina.clamp(0.0, 100.0),
        }
    }
}

/// Stats line for the pause panel
pub fn pause_stats(state: &GameState) -> String {
    format!(
        "Score: {} • Time: {} • Kills: {}",
        state.display_score(),
        format_time(state.elapsed),
        state.kills
    )
}

/// Stats line for the game-over panel
pub fn game_over_stats(state: &GameState) -> String {
    format!(
        "Score: {} • Best: {} • Kills: {}",
        state.display_score(),
        state.high_score.best(),
        state.kills
    )
}

/// DOM panels, by element id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Menu,
    HowTo,
    Hud,
    Corner,
    Pause,
    GameOver,
}

impl Panel {
    pub const ALL: [Panel; 6] = [
        Panel::Menu,
        Panel::HowTo,
        Panel::Hud,
        Panel::Corner,
        Panel::Pause,
        Panel::GameOver,
    ];

    pub fn element_id(&self) -> &'static str {
        match self {
            Panel::Menu => "menu",
            Panel::HowTo => "how",
            Panel::Hud => "hud",
            Panel::Corner => "corner",
            Panel::Pause => "pause",
            Panel::GameOver => "gameover",
        }
    }
}

/// Which panels are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelVisibility {
    pub menu: bool,
    pub how_to: bool,
    pub hud: bool,
    pub corner: bool,
    pub pause: bool,
    pub game_over: bool,
}

impl PanelVisibility {
    pub fn for_phase(phase: GamePhase, show_how_to: bool) -> Self {
        match phase {
            GamePhase::Menu => Self {
                menu: !show_how_to,
                how_to: show_how_to,
                corner: true,
                ..Default::default()
            },
            GamePhase::Playing => Self {
                hud: true,
                ..Default::default()
            },
            GamePhase::Paused => Self {
                hud: true,
                pause: true,
                ..Default::default()
            },
            GamePhase::GameOver => Self {
                hud: true,
                game_over: true,
                ..Default::default()
            },
        }
    }

    pub fn of(state: &GameState) -> Self {
        Self::for_phase(state.phase, state.show_how_to)
    }

    pub fn is_visible(&self, panel: Panel) -> bool {
        match panel {
            Panel::Menu => self.menu,
            Panel::HowTo => self.how_to,
            Panel::Hud => self.hud,
            Panel::Corner => self.corner,
            Panel::Pause => self.pause,
            Panel::GameOver => self.game_over,
        }
    }
}

/// Transient HUD feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    /// Score counter pops
    Score,
    /// Screen tints red
    Damage,
    /// Ammo readout tints with the pickup colour
    Pickup(EffectKind),
}

impl Flash {
    /// How long the flash lasts (milliseconds)
    pub fn duration_ms(&self) -> i32 {
        match self {
            Flash::Score | Flash::Damage => 120,
            Flash::Pickup(_) => 200,
        }
    }
}

/// Colour used for a pickup in the HUD and in the scene
pub fn pickup_color(kind: EffectKind) -> &'static str {
    match kind {
        EffectKind::Heal => "#7bffbd",
        EffectKind::Speed => "#6dd6ff",
        EffectKind::Shield => "#ffe06d",
        EffectKind::FireRate => "#ff7a7a",
    }
}

/// Turn this frame's events into flashes, at most one of each kind
pub fn flashes_for(events: &[GameEvent], settings: &Settings) -> Vec<Flash> {
    let mut flashes = Vec::new();
    for event in events {
        let flash = match *event {
            GameEvent::ScoreUp { .. } => Flash::Score,
            GameEvent::DamageTaken { .. } if settings.effective_damage_flash() => Flash::Damage,
            GameEvent::PickupCollected { kind } => Flash::Pickup(kind),
            _ => continue,
        };
        if !flashes.contains(&flash) {
            flashes.push(flash);
        }
    }
    flashes
}
