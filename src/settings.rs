//! Player preferences
//!
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// Default look speed (radians per pixel of mouse movement)
pub const DEFAULT_MOUSE_SENSITIVITY: f32 = 0.0025;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Controls ===
    /// Radians of look per pixel of mouse movement
    pub mouse_sensitivity: f32,
    /// Mouse up looks down
    pub invert_y: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no full-screen damage flash)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mouse_sensitivity: DEFAULT_MOUSE_SENSITIVITY,
            invert_y: false,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "sr_settings";

    /// Effective damage flash (respects reduced_motion)
    pub fn effective_damage_flash(&self) -> bool {
        !self.reduced_motion
    }

    /// Clamp values that came from storage into a usable range
    pub fn sanitized(mut self) -> Self {
        if !self.mouse_sensitivity.is_finite() || self.mouse_sensitivity <= 0.0 {
            self.mouse_sensitivity = DEFAULT_MOUSE_SENSITIVITY;
        }
        self.mouse_sensitivity = self.mouse_sensitivity.min(0.05);
        self
    }

    /// Load settings from storage, falling back to defaults
    pub fn load() -> Self {
        match storage::load_json::<Settings>(Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings from LocalStorage");
                settings.sanitized()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to storage
    pub fn save(&self) {
        if storage::store_json(Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}
