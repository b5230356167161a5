//! Headless runner: plays one run with the autopilot and logs the outcome.
//!
//! Usage: `brick-breaker [normal|endless|rogue|levels] [seconds]`

use brick_breaker::audio::{AudioManager, NullAudio};
use brick_breaker::platform::SIM_DT;
use brick_breaker::sim::{Autopilot, GameState, GameType, Mode, tick};
use brick_breaker::{FileScoreStore, GameConfig};

/// Tuning overrides looked up next to the binary's working directory
const CONFIG_PATH: &str = "brick_breaker.json";
const DEFAULT_SECONDS: f32 = 120.0;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let game_type = match args.next() {
        Some(arg) => GameType::from_str(&arg).unwrap_or_else(|| {
            log::warn!("Unknown game type '{}', playing Normal", arg);
            GameType::Normal
        }),
        None => GameType::Normal,
    };
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(DEFAULT_SECONDS);

    let cfg = GameConfig::load_or_default(CONFIG_PATH);
    let mut store = FileScoreStore::in_home_dir();
    let mut state = GameState::new(&cfg);
    let mut pilot = Autopilot::new(game_type);
    let mut audio = AudioManager::new(NullAudio);

    log::info!("Brick Breaker headless run: {} for {:.0}s", game_type.name(), seconds);

    let steps = (seconds / SIM_DT) as u64;
    let mut event_count = 0usize;
    for _ in 0..steps {
        let input = pilot.input(&state, &cfg, SIM_DT);
        tick(&mut state, &cfg, &input, &mut store, SIM_DT);
        let events = state.drain_events();
        event_count += events.len();
        audio.handle_events(&events);
        audio.update(SIM_DT);
        if matches!(state.mode, Mode::GameOver | Mode::Win) {
            break;
        }
    }

    log::info!(
        "Finished in {:?}: score {}, lives {}, wave {}, {} events",
        state.mode,
        state.score,
        state.lives,
        state.wave,
        event_count
    );
}
