//! Demo autopilot
//!
//! Picks a pointer x the way an attract-mode player would: chase the lowest
//! particle worth catching, and step aside from hazards when there is
//! nothing to chase. Reads state only; the host forwards the result through
//! [`GameState::cart_move_to`].

use std::cmp::Ordering;

use super::state::GameState;

/// How far above the cart a hazard has to be before it is dodged
const DODGE_RANGE: f32 = 150.0;

/// Suggested pointer x for this tick, or `None` to hold position
pub fn target_x(state: &GameState) -> Option<f32> {
    if state.game_over || state.cart.frozen {
        return None;
    }

    let cart = &state.cart;
    let invulnerable = state.effects.invulnerable;
    // Anything whose top is past this line has already been missed
    let catch_line = cart.pos.y + cart.height;

    let target = state
        .particles
        .iter()
        .filter(|p| !p.collected && p.pos.y < catch_line)
        .filter(|p| invulnerable || !p.is_hazard())
        .max_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(Ordering::Equal));

    if let Some(particle) = target {
        return Some(particle.center().x);
    }

    let bounds = cart.bounds();
    let threat = state.particles.iter().find(|p| {
        p.is_hazard()
            && p.pos.y < catch_line
            && p.pos.y > cart.pos.y - DODGE_RANGE
            && p.pos.x < bounds.right()
            && bounds.x < p.pos.x + p.size
    })?;

    // Dodge toward the roomier side of the screen
    let center = threat.center().x;
    let clearance = cart.width + threat.size;
    if center > state.screen_width / 2.0 {
        Some(center - clearance)
    } else {
        Some(center + clearance)
    }
}
