//! Cart Catch - a falling-particle arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, effects)
//! - `settings`: Tunables loaded from JSON

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};
pub use sim::{GameEvent, GameState};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (one tick per ~16 ms frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Default playfield dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Cart defaults - sits 50 units above the bottom edge
    pub const CART_BASE_WIDTH: f32 = 60.0;
    pub const CART_HEIGHT: f32 = 30.0;
    pub const CART_BOTTOM_OFFSET: f32 = 50.0;
    /// Wheel spin per unit of horizontal travel (degrees)
    pub const WHEEL_SPIN_FACTOR: f32 = 0.5;

    /// Starting lives for a session
    pub const START_LIVES: u32 = 3;

    /// Spawn y (above the visible area)
    pub const SPAWN_Y: f32 = -20.0;
    /// Particles are dropped once this far below the cart top
    pub const FALL_MARGIN: f32 = 100.0;
    /// Number of trail points kept per particle
    pub const TRAIL_LENGTH: usize = 5;

    /// Effect durations (seconds)
    pub const SIZE_EFFECT_SECS: f32 = 5.0;
    pub const FREEZE_SECS: f32 = 2.0;
    pub const INVULNERABILITY_SECS: f32 = 5.0;

    /// Score awards
    pub const NEUTRAL_POINTS: u64 = 1;
    pub const BONUS_POINTS: u64 = 5;

    /// Explosion lifetime (ticks)
    pub const EXPLOSION_LIFETIME: i32 = 10;

    /// Steam emission
    pub const STEAM_MOVE_THRESHOLD: f32 = 0.1;
    pub const STEAM_CHANCE_TENTHS: u32 = 3;
    pub const STEAM_DECAY: f32 = 0.1;

    /// Tunable defaults
    pub const DEFAULT_SPAWN_RATE: u32 = 50;
    pub const DEFAULT_PARTICLE_SPEED: u32 = 3;
    pub const DEFAULT_PARTICLE_SIZE: u32 = 10;

    /// Tunable ranges (slider limits)
    pub const SPAWN_RATE_MIN: u32 = 1;
    pub const SPAWN_RATE_MAX: u32 = 100;
    pub const PARTICLE_SPEED_MIN: u32 = 1;
    pub const PARTICLE_SPEED_MAX: u32 = 15;
    pub const PARTICLE_SIZE_MIN: u32 = 5;
    pub const PARTICLE_SIZE_MAX: u32 = 30;
}

/// Convert a duration in seconds to whole simulation ticks
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    (secs.max(0.0) * consts::TICKS_PER_SECOND as f32).round() as u64
}

/// Convert a tick count back to seconds
#[inline]
pub fn ticks_to_secs(ticks: u64) -> f32 {
    ticks as f32 / consts::TICKS_PER_SECOND as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secs_to_ticks() {
        assert_eq!(secs_to_ticks(5.0), 300);
        assert_eq!(secs_to_ticks(2.0), 120);
        assert_eq!(secs_to_ticks(-1.0), 0);
        assert!((ticks_to_secs(90) - 1.5).abs() < 1e-6);
    }
}
