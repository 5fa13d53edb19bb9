//! Fixed timestep simulation tick
//!
//! One call advances the game by one step: expire timers, spawn, move and
//! collide particles, then update the decorative steam and explosions.

use glam::Vec2;
use rand::Rng;

use super::state::{Explosion, GameEvent, GameState, Particle, ParticleColor, ParticleEffect};
use crate::consts::*;
use crate::secs_to_ticks;

/// Advance the game state by one tick and return the events it raised
pub fn tick(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Frozen until reset
    if state.game_over {
        return events;
    }

    state.time_ticks += 1;

    check_effects(state, &mut events);
    spawn_particles(state);
    update_particles(state, &mut events);
    generate_steam(state);
    update_steam(state);
    update_explosions(state);

    // Width may have grown this tick
    state.cart.clamp_to(state.screen_width);
    // Wheels stop until the pointer moves again
    state.cart.settle();

    events
}

/// Draw a particle color from the weighted spawn table
pub fn roll_color<R: Rng>(rng: &mut R) -> ParticleColor {
    ParticleColor::from_roll(rng.random_range(0..100))
}

/// Expire the cart effect and invulnerability, independently
fn check_effects(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let now = state.time_ticks;

    let current = state.effects.current;
    if current != ParticleEffect::None && now >= state.effects.effect_end_tick {
        state.clear_current_effect();
        log::debug!("{:?} expired at tick {}", current, now);
        events.push(GameEvent::EffectExpired(current));
    }

    if state.effects.invulnerable && now >= state.effects.invulnerable_until {
        state.effects.invulnerable = false;
        log::debug!("Invulnerability expired at tick {}", now);
        events.push(GameEvent::InvulnerabilityExpired);
    }
}

fn spawn_particles(state: &mut GameState) {
    state.spawn_counter += 1;
    if state.spawn_counter >= state.spawn_interval() {
        create_particle(state);
        state.spawn_counter = 0;
    }
}

fn create_particle(state: &mut GameState) {
    let span = (state.screen_width as u32).max(1);
    let x = state.rng.random_range(0..span) as f32;
    let color = roll_color(&mut state.rng);

    state.particles.push(Particle::new(
        Vec2::new(x, SPAWN_Y),
        state.particle_size as f32,
        state.particle_speed as f32,
        color,
    ));
}

fn update_particles(state: &mut GameState, events: &mut Vec<GameEvent>) {
    // Taken out so collisions can mutate the rest of the state
    let mut particles = std::mem::take(&mut state.particles);

    for particle in particles.iter_mut() {
        if state.game_over {
            break;
        }

        particle.advance();

        // Cart bounds are re-read: an earlier catch this tick may have resized it
        if particle.bounds().intersects(&state.cart.bounds()) {
            handle_collision(state, particle, events);
        }
    }

    let limit = state.cart.pos.y + FALL_MARGIN;
    particles.retain(|p| !p.collected && p.pos.y <= limit);
    state.particles = particles;
}

fn handle_collision(state: &mut GameState, particle: &mut Particle, events: &mut Vec<GameEvent>) {
    particle.collected = true;
    state.explosions.push(Explosion::from_particle(particle));
    events.push(GameEvent::Collected(particle.color));

    if particle.is_hazard() && !state.effects.invulnerable {
        state.lives = state.lives.saturating_sub(1);
        log::debug!("Hit at tick {}, {} lives left", state.time_ticks, state.lives);
        events.push(GameEvent::Hit);

        if state.lives == 0 {
            state.game_over = true;
            log::info!("Game over at tick {} with score {}", state.time_ticks, state.score);
            events.push(GameEvent::GameOver { score: state.score });
            return;
        }
    }

    apply_effect(state, particle.effect, events);
}

/// Apply a caught particle's effect to the cart and session
fn apply_effect(state: &mut GameState, effect: ParticleEffect, events: &mut Vec<GameEvent>) {
    let now = state.time_ticks;

    match effect {
        ParticleEffect::DoubleSize | ParticleEffect::HalfSize => {
            state.clear_current_effect();
            state.cart.width = if effect == ParticleEffect::DoubleSize {
                state.cart.base_width * 2.0
            } else {
                state.cart.base_width / 2.0
            };
            state.effects.current = effect;
            state.effects.effect_end_tick = now.saturating_add(secs_to_ticks(SIZE_EFFECT_SECS));
        }
        ParticleEffect::Freeze => {
            state.clear_current_effect();
            state.cart.frozen = true;
            state.effects.current = effect;
            state.effects.effect_end_tick = now.saturating_add(secs_to_ticks(FREEZE_SECS));
        }
        ParticleEffect::BonusPoints => {
            state.score += BONUS_POINTS;
        }
        ParticleEffect::Invulnerability => {
            state.activate_invulnerability(INVULNERABILITY_SECS);
        }
        ParticleEffect::None => {
            state.score += NEUTRAL_POINTS;
            return;
        }
        // Steam never reaches the cart
        ParticleEffect::Steam => return,
    }

    log::debug!("{:?} applied at tick {}", effect, now);
    events.push(GameEvent::EffectApplied(effect));
}

fn generate_steam(state: &mut GameState) {
    if !state.cart.is_moving() {
        return;
    }
    if state.rng.random_range(0..10) >= STEAM_CHANCE_TENTHS {
        return;
    }

    let jitter = state.rng.random_range(-10..10) as f32;
    let size = 5 + state.rng.random_range(0..10);
    let speed = -1 - state.rng.random_range(0..3);

    let cart = &state.cart;
    let pos = Vec2::new(cart.pos.x + cart.width / 2.0 + jitter, cart.pos.y);
    state.steam.push(Particle::steam(pos, size as f32, speed as f32));
}

fn update_steam(state: &mut GameState) {
    for puff in state.steam.iter_mut() {
        puff.rise();
    }
    state.steam.retain(|p| p.size > 0.0);
}

fn update_explosions(state: &mut GameState) {
    for explosion in state.explosions.iter_mut() {
        explosion.lifetime -= 1;
    }
    state.explosions.retain(|e| e.lifetime > 0);
}
