//! Game state and core simulation types
//!
//! Everything a renderer needs to draw a frame lives here, owned by
//! [`GameState`]. Mutation happens in [`super::tick`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::{secs_to_ticks, ticks_to_secs};

/// 8-bit RGB triple for renderers
pub type Rgb = [u8; 3];

/// Swatches offered for the cart body (cosmetic only)
pub const CART_PALETTE: [Rgb; 9] = [
    [255, 69, 0],    // OrangeRed
    [70, 130, 180],  // SteelBlue
    [34, 139, 34],   // ForestGreen
    [218, 165, 32],  // Goldenrod
    [147, 112, 219], // MediumPurple
    [0, 128, 128],   // Teal
    [255, 127, 80],  // Coral
    [255, 105, 180], // HotPink
    [50, 205, 50],   // LimeGreen
];

/// Gameplay effect carried by a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParticleEffect {
    #[default]
    None,
    DoubleSize,
    Freeze,
    HalfSize,
    BonusPoints,
    Steam,
    Invulnerability,
}

impl ParticleEffect {
    /// Effects that occupy the single timed cart-effect slot
    pub fn is_timed(&self) -> bool {
        matches!(
            self,
            ParticleEffect::DoubleSize | ParticleEffect::Freeze | ParticleEffect::HalfSize
        )
    }
}

/// Particle color. Bound one-to-one to an effect at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleColor {
    /// Hazard - costs a life unless invulnerable
    Red,
    Purple,
    Green,
    Yellow,
    Blue,
    Pink,
    Turquoise,
    /// Steam puffs
    WhiteSmoke,
}

/// Cumulative spawn thresholds over a roll in `[0, 100)`
pub const SPAWN_TABLE: [(u32, ParticleColor); 7] = [
    (15, ParticleColor::Red),
    (30, ParticleColor::Purple),
    (45, ParticleColor::Green),
    (60, ParticleColor::Yellow),
    (75, ParticleColor::Blue),
    (90, ParticleColor::Pink),
    (100, ParticleColor::Turquoise),
];

impl ParticleColor {
    /// Map a uniform roll in `[0, 100)` to a color (inverse CDF over [`SPAWN_TABLE`])
    pub fn from_roll(roll: u32) -> Self {
        SPAWN_TABLE
            .iter()
            .find(|(threshold, _)| roll < *threshold)
            .map(|&(_, color)| color)
            .unwrap_or(ParticleColor::Turquoise)
    }

    /// Effect bound to this color
    pub fn effect(&self) -> ParticleEffect {
        match self {
            ParticleColor::Red | ParticleColor::Green => ParticleEffect::None,
            ParticleColor::Purple => ParticleEffect::Invulnerability,
            ParticleColor::Yellow => ParticleEffect::DoubleSize,
            ParticleColor::Blue => ParticleEffect::Freeze,
            ParticleColor::Pink => ParticleEffect::HalfSize,
            ParticleColor::Turquoise => ParticleEffect::BonusPoints,
            ParticleColor::WhiteSmoke => ParticleEffect::Steam,
        }
    }

    pub fn is_hazard(&self) -> bool {
        *self == ParticleColor::Red
    }

    pub fn rgb(&self) -> Rgb {
        match self {
            ParticleColor::Red => [255, 0, 0],
            ParticleColor::Purple => [128, 0, 128],
            ParticleColor::Green => [0, 128, 0],
            ParticleColor::Yellow => [255, 255, 0],
            ParticleColor::Blue => [0, 0, 255],
            ParticleColor::Pink => [255, 192, 203],
            ParticleColor::Turquoise => [64, 224, 208],
            ParticleColor::WhiteSmoke => [245, 245, 245],
        }
    }
}

/// The player's cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Top-left corner
    pub pos: Vec2,
    pub base_width: f32,
    /// Current width (base, base x2 or base / 2)
    pub width: f32,
    pub height: f32,
    /// Frozen carts ignore pointer input
    pub frozen: bool,
    /// Signed x displacement from the last pointer move
    pub last_movement: f32,
    /// Accumulated wheel angle in degrees (visual only)
    pub wheel_rotation: f32,
    pub color: Rgb,
}

impl Cart {
    /// Create a cart centered near the bottom of the screen
    pub fn new(screen_width: f32, screen_height: f32) -> Self {
        Self {
            pos: Vec2::new(
                ((screen_width - CART_BASE_WIDTH) / 2.0).max(0.0),
                screen_height - CART_BOTTOM_OFFSET,
            ),
            base_width: CART_BASE_WIDTH,
            width: CART_BASE_WIDTH,
            height: CART_HEIGHT,
            frozen: false,
            last_movement: 0.0,
            wheel_rotation: 0.0,
            color: CART_PALETTE[0],
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    /// Center the cart on `pointer_x`, clamped to the screen
    pub fn set_target_x(&mut self, pointer_x: f32, screen_width: f32) {
        if !pointer_x.is_finite() {
            return;
        }
        if self.frozen {
            self.last_movement = 0.0;
            return;
        }

        let old_x = self.pos.x;
        self.pos.x = clamp_x(pointer_x - self.width / 2.0, self.width, screen_width);
        self.last_movement = self.pos.x - old_x;
        self.wheel_rotation += self.last_movement * WHEEL_SPIN_FACTOR;
    }

    /// Re-apply the screen bounds (after a width change)
    pub fn clamp_to(&mut self, screen_width: f32) {
        self.pos.x = clamp_x(self.pos.x, self.width, screen_width);
    }

    /// Whether the last move was large enough to kick up steam
    pub fn is_moving(&self) -> bool {
        self.last_movement.abs() > STEAM_MOVE_THRESHOLD
    }

    /// Wheels stop until the next pointer move
    pub fn settle(&mut self) {
        self.last_movement = 0.0;
    }

    /// Restore base width and unfreeze
    pub fn reset_size(&mut self) {
        self.width = self.base_width;
        self.frozen = false;
    }
}

fn clamp_x(x: f32, width: f32, screen_width: f32) -> f32 {
    let max_x = (screen_width - width).max(0.0);
    x.max(0.0).min(max_x)
}

/// A falling (or, for steam, rising) particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    /// Top-left corner of the bounding square
    pub pos: Vec2,
    pub size: f32,
    /// Vertical speed per tick (negative rises)
    pub speed: f32,
    pub color: ParticleColor,
    pub effect: ParticleEffect,
    pub collected: bool,
    /// Recent centers for trail rendering (newest first)
    pub trail: Vec<Vec2>,
}

impl Particle {
    pub fn new(pos: Vec2, size: f32, speed: f32, color: ParticleColor) -> Self {
        Self {
            pos,
            size,
            speed,
            color,
            effect: color.effect(),
            collected: false,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    /// A decorative steam puff
    pub fn steam(pos: Vec2, size: f32, speed: f32) -> Self {
        Self::new(pos, size, speed, ParticleColor::WhiteSmoke)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    pub fn is_hazard(&self) -> bool {
        self.color.is_hazard()
    }

    /// Record current center to trail
    pub fn record_trail(&mut self) {
        let center = self.center();
        self.trail.insert(0, center);
        self.trail.truncate(TRAIL_LENGTH);
    }

    /// One tick of fall
    pub fn advance(&mut self) {
        self.record_trail();
        self.pos.y += self.speed;
    }

    /// One tick of steam: rise and shrink
    pub fn rise(&mut self) {
        self.pos.y += self.speed;
        self.size = (self.size - STEAM_DECAY).max(0.0);
    }
}

/// Radial fade-out left behind by a collected particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub center: Vec2,
    pub radius: f32,
    /// Remaining ticks
    pub lifetime: i32,
    pub color: ParticleColor,
}

impl Explosion {
    pub fn from_particle(particle: &Particle) -> Self {
        Self {
            center: particle.center(),
            radius: particle.size,
            lifetime: EXPLOSION_LIFETIME,
            color: particle.color,
        }
    }

    /// Opacity in [0, 1] for the fade
    pub fn alpha(&self) -> f32 {
        (self.lifetime as f32 / EXPLOSION_LIFETIME as f32).clamp(0.0, 1.0)
    }
}

/// Timed effects: one cart-effect slot plus an independent invulnerability timer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    /// None, DoubleSize, Freeze or HalfSize
    pub current: ParticleEffect,
    /// Tick at which `current` expires
    pub effect_end_tick: u64,
    pub invulnerable: bool,
    /// Tick at which invulnerability expires
    pub invulnerable_until: u64,
}

/// Notifications raised during a tick, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A particle touched the cart
    Collected(ParticleColor),
    /// A life was lost (hosts shake the screen)
    Hit,
    /// Last life lost
    GameOver { score: u64 },
    EffectApplied(ParticleEffect),
    EffectExpired(ParticleEffect),
    InvulnerabilityExpired,
}

/// Read-only view of the game for one rendered frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub time_ticks: u64,
    pub score: u64,
    pub lives: u32,
    pub game_over: bool,
    pub current_effect: ParticleEffect,
    pub effect_secs_left: f32,
    pub invulnerable: bool,
    pub invulnerable_secs_left: f32,
    pub cart: Cart,
    pub particles: Vec<Particle>,
    pub steam: Vec<Particle>,
    pub explosions: Vec<Explosion>,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Simulation tick counter (the effect clock)
    pub time_ticks: u64,
    pub screen_width: f32,
    pub screen_height: f32,
    pub score: u64,
    pub lives: u32,
    pub game_over: bool,
    /// 1..=100, higher spawns more often
    pub spawn_rate: u32,
    pub particle_speed: u32,
    pub particle_size: u32,
    pub(crate) spawn_counter: u32,
    pub effects: ActiveEffects,
    pub cart: Cart,
    /// Falling particles
    pub particles: Vec<Particle>,
    /// Decorative steam (not gameplay-affecting)
    pub steam: Vec<Particle>,
    pub explosions: Vec<Explosion>,
}

impl GameState {
    /// Create a new game state with the given seed on the default screen
    pub fn new(seed: u64) -> Self {
        Self::with_screen(seed, SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    /// Create a new game state for a specific playfield size
    pub fn with_screen(seed: u64, screen_width: f32, screen_height: f32) -> Self {
        let (screen_width, screen_height) =
            if screen_width.is_finite() && screen_width >= 1.0 && screen_height.is_finite() {
                (screen_width, screen_height)
            } else {
                log::warn!(
                    "Invalid screen {}x{}, using {}x{}",
                    screen_width,
                    screen_height,
                    SCREEN_WIDTH,
                    SCREEN_HEIGHT
                );
                (SCREEN_WIDTH, SCREEN_HEIGHT)
            };

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            screen_width,
            screen_height,
            score: 0,
            lives: START_LIVES,
            game_over: false,
            spawn_rate: DEFAULT_SPAWN_RATE,
            particle_speed: DEFAULT_PARTICLE_SPEED,
            particle_size: DEFAULT_PARTICLE_SIZE,
            spawn_counter: 0,
            effects: ActiveEffects::default(),
            cart: Cart::new(screen_width, screen_height),
            particles: Vec::new(),
            steam: Vec::new(),
            explosions: Vec::new(),
        }
    }

    /// Advance one tick; returns the events raised
    pub fn update(&mut self) -> Vec<GameEvent> {
        super::tick::tick(self)
    }

    /// Forward a pointer move to the cart
    pub fn cart_move_to(&mut self, pointer_x: f32, screen_width: f32) {
        self.cart.set_target_x(pointer_x, screen_width);
    }

    pub fn set_spawn_rate(&mut self, rate: u32) {
        self.spawn_rate = clamp_tunable("spawn rate", rate, SPAWN_RATE_MIN, SPAWN_RATE_MAX);
    }

    pub fn set_particle_speed(&mut self, speed: u32) {
        self.particle_speed =
            clamp_tunable("particle speed", speed, PARTICLE_SPEED_MIN, PARTICLE_SPEED_MAX);
    }

    /// Particle size is further capped to half the cart's base width
    pub fn set_particle_size(&mut self, size: u32) {
        let max = PARTICLE_SIZE_MAX.min((self.cart.base_width / 2.0) as u32);
        self.particle_size = clamp_tunable("particle size", size, PARTICLE_SIZE_MIN, max);
    }

    pub fn set_cart_color(&mut self, color: Rgb) {
        self.cart.color = color;
    }

    /// Ticks between spawns
    pub fn spawn_interval(&self) -> u32 {
        100u32.saturating_sub(self.spawn_rate).max(1)
    }

    pub fn current_effect(&self) -> ParticleEffect {
        self.effects.current
    }

    pub fn is_invulnerable(&self) -> bool {
        self.effects.invulnerable
    }

    /// Grant invulnerability; leaves the cart-effect slot alone
    pub fn activate_invulnerability(&mut self, secs: f32) {
        self.effects.invulnerable = true;
        self.effects.invulnerable_until = self.time_ticks.saturating_add(secs_to_ticks(secs));
    }

    /// Restore the cart and empty the effect slot
    pub fn clear_current_effect(&mut self) {
        self.cart.reset_size();
        self.effects.current = ParticleEffect::None;
    }

    /// Start a fresh session (the only way out of game over)
    pub fn reset(&mut self) {
        self.particles.clear();
        self.steam.clear();
        self.explosions.clear();
        self.score = 0;
        self.lives = START_LIVES;
        self.game_over = false;
        self.spawn_counter = 0;
        self.effects = ActiveEffects::default();
        self.cart.reset_size();
        self.cart.settle();
        log::info!("Session reset");
    }

    pub fn snapshot(&self) -> Snapshot {
        let left = |end: u64| ticks_to_secs(end.saturating_sub(self.time_ticks));
        Snapshot {
            time_ticks: self.time_ticks,
            score: self.score,
            lives: self.lives,
            game_over: self.game_over,
            current_effect: self.effects.current,
            effect_secs_left: if self.effects.current.is_timed() {
                left(self.effects.effect_end_tick)
            } else {
                0.0
            },
            invulnerable: self.effects.invulnerable,
            invulnerable_secs_left: if self.effects.invulnerable {
                left(self.effects.invulnerable_until)
            } else {
                0.0
            },
            cart: self.cart.clone(),
            particles: self.particles.clone(),
            steam: self.steam.clone(),
            explosions: self.explosions.clone(),
        }
    }
}

fn clamp_tunable(name: &str, value: u32, min: u32, max: u32) -> u32 {
    let clamped = value.max(min).min(max.max(min));
    if clamped != value {
        log::warn!("{} {} out of range, clamped to {}", name, value, clamped);
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_centers_on_pointer() {
        let mut cart = Cart::new(800.0, 600.0);
        cart.set_target_x(400.0, 800.0);
        assert_eq!(cart.pos.x, 370.0);
        assert!(cart.pos.x >= 0.0 && cart.pos.x <= 800.0 - cart.width);
    }

    #[test]
    fn test_cart_clamps_at_edges() {
        let mut cart = Cart::new(800.0, 600.0);
        cart.set_target_x(-50.0, 800.0);
        assert_eq!(cart.pos.x, 0.0);
        cart.set_target_x(10_000.0, 800.0);
        assert_eq!(cart.pos.x, 740.0);

        // Wider than the screen pins to the left edge
        cart.width = 1000.0;
        cart.set_target_x(400.0, 800.0);
        assert_eq!(cart.pos.x, 0.0);
    }

    #[test]
    fn test_cart_wheels_follow_movement() {
        let mut cart = Cart::new(800.0, 600.0);
        let start = cart.pos.x;
        cart.set_target_x(start + 30.0 + 20.0, 800.0);
        assert_eq!(cart.last_movement, 20.0);
        assert_eq!(cart.wheel_rotation, 10.0);
        assert!(cart.is_moving());

        cart.set_target_x(start + 30.0, 800.0);
        assert_eq!(cart.last_movement, -20.0);
        assert_eq!(cart.wheel_rotation, 0.0);
    }

    #[test]
    fn test_frozen_cart_stays_put() {
        let mut cart = Cart::new(800.0, 600.0);
        cart.set_target_x(200.0, 800.0);
        cart.frozen = true;
        cart.set_target_x(600.0, 800.0);
        assert_eq!(cart.pos.x, 170.0);
        assert_eq!(cart.last_movement, 0.0);
        assert!(!cart.is_moving());

        cart.reset_size();
        assert!(!cart.frozen);
        cart.set_target_x(600.0, 800.0);
        assert_eq!(cart.pos.x, 570.0);
    }

    #[test]
    fn test_cart_ignores_nan_pointer() {
        let mut cart = Cart::new(800.0, 600.0);
        let x = cart.pos.x;
        cart.set_target_x(f32::NAN, 800.0);
        assert_eq!(cart.pos.x, x);
    }

    #[test]
    fn test_spawn_table_boundaries() {
        assert_eq!(ParticleColor::from_roll(0), ParticleColor::Red);
        assert_eq!(ParticleColor::from_roll(14), ParticleColor::Red);
        assert_eq!(ParticleColor::from_roll(15), ParticleColor::Purple);
        assert_eq!(ParticleColor::from_roll(29), ParticleColor::Purple);
        assert_eq!(ParticleColor::from_roll(30), ParticleColor::Green);
        assert_eq!(ParticleColor::from_roll(45), ParticleColor::Yellow);
        assert_eq!(ParticleColor::from_roll(60), ParticleColor::Blue);
        assert_eq!(ParticleColor::from_roll(75), ParticleColor::Pink);
        assert_eq!(ParticleColor::from_roll(89), ParticleColor::Pink);
        assert_eq!(ParticleColor::from_roll(90), ParticleColor::Turquoise);
        assert_eq!(ParticleColor::from_roll(99), ParticleColor::Turquoise);
    }

    #[test]
    fn test_color_effect_mapping() {
        assert_eq!(ParticleColor::Red.effect(), ParticleEffect::None);
        assert!(ParticleColor::Red.is_hazard());
        assert!(!ParticleColor::Green.is_hazard());
        assert_eq!(ParticleColor::Purple.effect(), ParticleEffect::Invulnerability);
        assert_eq!(ParticleColor::Turquoise.effect(), ParticleEffect::BonusPoints);
        assert_eq!(ParticleColor::WhiteSmoke.effect(), ParticleEffect::Steam);
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut p = Particle::new(Vec2::new(10.0, 0.0), 10.0, 2.0, ParticleColor::Green);
        for _ in 0..20 {
            p.advance();
        }
        assert_eq!(p.trail.len(), TRAIL_LENGTH);
        // Newest first
        assert!(p.trail[0].y > p.trail[1].y);
        assert_eq!(p.pos.y, 40.0);
    }

    #[test]
    fn test_explosion_fades() {
        let p = Particle::new(Vec2::new(10.0, 20.0), 10.0, 2.0, ParticleColor::Blue);
        let mut e = Explosion::from_particle(&p);
        assert_eq!(e.center, Vec2::new(15.0, 25.0));
        assert_eq!(e.radius, 10.0);
        assert_eq!(e.alpha(), 1.0);
        e.lifetime = 5;
        assert!((e.alpha() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_tunables_are_clamped() {
        let mut state = GameState::new(1);
        state.set_spawn_rate(0);
        assert_eq!(state.spawn_rate, 1);
        state.set_spawn_rate(500);
        assert_eq!(state.spawn_rate, 100);
        assert_eq!(state.spawn_interval(), 1);

        state.set_particle_speed(99);
        assert_eq!(state.particle_speed, PARTICLE_SPEED_MAX);

        // Capped to half the base cart width
        state.set_particle_size(30);
        assert_eq!(state.particle_size, 30);
        state.set_particle_size(1);
        assert_eq!(state.particle_size, PARTICLE_SIZE_MIN);
    }

    #[test]
    fn test_invalid_screen_falls_back() {
        let state = GameState::with_screen(1, f32::NAN, 0.0);
        assert_eq!(state.screen_width, SCREEN_WIDTH);
        assert_eq!(state.cart.pos.y, SCREEN_HEIGHT - CART_BOTTOM_OFFSET);
    }

    #[test]
    fn test_endless_invulnerability_saturates() {
        let mut state = GameState::new(1);
        state.update();
        state.activate_invulnerability(f32::INFINITY);
        assert!(state.is_invulnerable());
        assert_eq!(state.effects.invulnerable_until, u64::MAX);

        // Still ticks normally and never expires
        state.particles.clear();
        state.update();
        assert!(state.is_invulnerable());
    }

    #[test]
    fn test_snapshot_reports_timers() {
        let mut state = GameState::new(3);
        state.activate_invulnerability(2.0);
        let snap = state.snapshot();
        assert!(snap.invulnerable);
        assert!((snap.invulnerable_secs_left - 2.0).abs() < 1e-6);
        assert_eq!(snap.current_effect, ParticleEffect::None);
        assert_eq!(snap.effect_secs_left, 0.0);
        assert_eq!(snap.lives, START_LIVES);
    }
}
