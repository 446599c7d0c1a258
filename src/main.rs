//! Flappy Box entry point
//!
//! Headless driver: runs the fixed 60 Hz loop without a window. Presses from
//! the autopilot go through the same input queue a platform layer would fill.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use flappy_box::consts::SIM_DT;
use flappy_box::settings::Settings;
use flappy_box::sim::{Game, GameEvent, InputEvent, InputQueue, autopilot};

fn main() {
    env_logger::init();
    log::info!("Flappy Box (headless) starting...");

    // An explicit settings path must be valid; the env var path may fall back
    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load_from(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("{err}");
                eprintln!("flappy-box: {err}");
                std::process::exit(1);
            }
        },
        None => Settings::load(),
    };

    let seed = settings.seed.unwrap_or_else(wall_clock_seed);
    let mut game = Game::new(seed);
    let mut inputs = InputQueue::new();
    let tick_len = Duration::from_secs_f32(SIM_DT);
    let mut best_score = 0;
    let mut rounds = 1u32;

    loop {
        let started = Instant::now();

        if settings.autopilot && autopilot::wants_jump(&game) {
            inputs.push(InputEvent::Jump);
        }
        if settings.max_ticks.is_some_and(|max| game.time_ticks() >= max) {
            inputs.push(InputEvent::Quit);
        }
        game.apply_inputs(inputs.drain());
        if game.quit_requested() {
            break;
        }

        // Render-then-step: the drawn frame lags physics by one tick
        if log::log_enabled!(log::Level::Trace) {
            match serde_json::to_string(&game.frame()) {
                Ok(json) => log::trace!("frame {}: {json}", game.time_ticks()),
                Err(err) => log::warn!("frame serialization failed: {err}"),
            }
        }
        game.tick(SIM_DT);

        for event in game.drain_events() {
            match event {
                GameEvent::Scored { score } => best_score = best_score.max(score),
                GameEvent::Collided => log::info!("Hit at {}", game.score_text()),
                GameEvent::Restarted => rounds += 1,
                GameEvent::RowSpawned { .. } | GameEvent::CollisionIgnored => {}
            }
        }

        if settings.realtime {
            if let Some(rest) = tick_len.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    log::info!(
        "Stopped after {} ticks: {rounds} rounds, best score {best_score}",
        game.time_ticks()
    );
    println!("ticks={} rounds={rounds} best={best_score}", game.time_ticks());
}

/// Gap placement only needs variety, not security
fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
