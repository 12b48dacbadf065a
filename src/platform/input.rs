//! Keyboard and mouse state
//!
//! Browser event handlers feed this struct; once per frame the game takes a
//! `TickInput` snapshot from it. Key names are `KeyboardEvent.code` values.

use std::collections::HashSet;

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::TickInput;

/// Accumulated input between frames
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down
    held: HashSet<String>,
    /// Mouse movement since the last snapshot (pixels)
    look_accum: Vec2,
    /// Fire pressed since the last snapshot
    fire: bool,
    /// Pause pressed since the last snapshot
    pause: bool,
    /// Mouse look only counts while the pointer is locked
    pointer_locked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, code: &str) {
        if code == "Escape" {
            self.pause = true;
        }
        self.held.insert(code.to_string());
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.remove(code);
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    /// Relative mouse movement (`movementX`/`movementY`)
    pub fn mouse_move(&mut self, dx: f32, dy: f32) {
        if self.pointer_locked {
            self.look_accum += Vec2::new(dx, dy);
        }
    }

    /// Mouse button press; the primary button fires
    pub fn mouse_down(&mut self, button: i16) {
        if button == 0 {
            self.fire = true;
        }
    }

    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.pointer_locked = locked;
        if !locked {
            self.look_accum = Vec2::ZERO;
        }
    }

    /// Forget held keys (window lost focus, keyups will never arrive)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    fn axis(&self, positive: &str, negative: &str) -> f32 {
        let mut value = 0.0;
        if self.is_held(positive) {
            value += 1.0;
        }
        if self.is_held(negative) {
            value -= 1.0;
        }
        value
    }

    /// Build this frame's input and clear the one-shot state
    pub fn take_tick_input(&mut self, settings: &Settings) -> TickInput {
        let sens = settings.mouse_sensitivity;
        let pitch_sign = if settings.invert_y { 1.0 } else { -1.0 };
        let look = Vec2::new(-self.look_accum.x * sens, pitch_sign * self.look_accum.y * sens);

        let input = TickInput {
            forward: self.axis("KeyW", "KeyS"),
            right: self.axis("KeyD", "KeyA"),
            sprint: self.is_held("ShiftLeft") || self.is_held("ShiftRight"),
            dash: self.is_held("Space"),
            look,
            fire: self.fire,
            pause: self.pause,
        };

        self.look_accum = Vec2::ZERO;
        self.fire = false;
        self.pause = false;
        input
    }
}
