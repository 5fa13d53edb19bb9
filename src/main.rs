//! Cart Catch - headless driver
//!
//! Runs the simulation at a fixed 60 Hz of simulated time with the demo
//! autopilot steering the cart, then prints the final snapshot as JSON.
//!
//! Usage: `cart-catch [settings.json] [ticks]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use cart_catch::consts::TICKS_PER_SECOND;
    use cart_catch::sim::autopilot;
    use cart_catch::{GameEvent, Settings};

    env_logger::init();
    log::info!("Cart Catch (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    let max_ticks: u64 = args
        .next()
        .and_then(|t| t.parse().ok())
        .unwrap_or(60 * TICKS_PER_SECOND as u64);

    let fallback_seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut state = settings.new_game(fallback_seed);
    log::info!("Game initialized with seed: {}", state.seed);

    for _ in 0..max_ticks {
        if let Some(x) = autopilot::target_x(&state) {
            let screen_width = state.screen_width;
            state.cart_move_to(x, screen_width);
        }

        for event in state.update() {
            match event {
                GameEvent::Hit => log::warn!("Hit! {} lives left", state.lives),
                GameEvent::GameOver { score } => log::info!("Game over, final score {}", score),
                GameEvent::EffectApplied(effect) => log::info!("{:?} collected", effect),
                GameEvent::EffectExpired(effect) => log::info!("{:?} wore off", effect),
                GameEvent::InvulnerabilityExpired => log::info!("Invulnerability wore off"),
                GameEvent::Collected(_) => {}
            }
        }

        if state.game_over {
            break;
        }
    }

    log::info!(
        "Finished at tick {}: score {}, lives {}",
        state.time_ticks,
        state.score,
        state.lives
    );
    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; hosts drive `GameState` directly
}
