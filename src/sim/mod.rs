//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed tick only (timers count ticks, not wall-clock time)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use state::{
    ActiveEffects, CART_PALETTE, Cart, Explosion, GameEvent, GameState, Particle, ParticleColor,
    ParticleEffect, Rgb, SPAWN_TABLE, Snapshot,
};
pub use tick::{roll_color, tick};
