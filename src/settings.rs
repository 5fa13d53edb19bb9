//! Game settings
//!
//! The tunables a host exposes as sliders (spawn rate, particle speed and
//! size, cart color), loadable from a JSON file. Missing fields take their
//! defaults; out-of-range values are clamped rather than rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{CART_PALETTE, GameState, Rgb};

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid screen size {width}x{height}")]
    InvalidScreen { width: f32, height: f32 },
}

/// Game settings/tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Tunables ===
    /// 1..=100, higher spawns more often
    pub spawn_rate: u32,
    /// Fall distance per tick
    pub particle_speed: u32,
    /// Particle diameter (capped to half the cart width)
    pub particle_size: u32,

    // === Cosmetic ===
    /// Index into the cart palette
    pub cart_color: usize,

    /// Fixed RNG seed; a time-based seed is used when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            spawn_rate: DEFAULT_SPAWN_RATE,
            particle_speed: DEFAULT_PARTICLE_SPEED,
            particle_size: DEFAULT_PARTICLE_SIZE,
            cart_color: 0,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let ok = |v: f32| v.is_finite() && v >= 1.0;
        if ok(self.screen_width) && ok(self.screen_height) {
            Ok(())
        } else {
            Err(SettingsError::InvalidScreen {
                width: self.screen_width,
                height: self.screen_height,
            })
        }
    }

    /// Cart body color (falls back to the first swatch)
    pub fn cart_rgb(&self) -> Rgb {
        CART_PALETTE
            .get(self.cart_color)
            .copied()
            .unwrap_or(CART_PALETTE[0])
    }

    /// Push the tunables into a running game (clamping as needed)
    pub fn apply(&self, state: &mut GameState) {
        state.set_spawn_rate(self.spawn_rate);
        state.set_particle_speed(self.particle_speed);
        state.set_particle_size(self.particle_size);
        state.set_cart_color(self.cart_rgb());
    }

    /// Start a game with these settings; `fallback_seed` is used when no seed is set
    pub fn new_game(&self, fallback_seed: u64) -> GameState {
        let seed = self.seed.unwrap_or(fallback_seed);
        let mut state = GameState::with_screen(seed, self.screen_width, self.screen_height);
        self.apply(&mut state);
        state
    }
}
