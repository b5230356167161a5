//! Rogue run rules
//!
//! Wave curves are pure functions of the wave index. Row injection is metered
//! so new rows slide in one at a time after a wave advance.

use glam::Vec3;
use rand::Rng;

use super::cards::{deal_offer, init_pools, offer_after_wave_clear};
use super::scoring::{commit_streak, settle_run};
use super::state::{Brick, GameEvent, GameState, MAX_BRICK_HP, Mode, RogueModifiers};
use crate::persistence::{ROGUE_BEST_KEY, ScoreStore};
use crate::tuning::GameConfig;

/// Seconds after an advance before the next one may trigger
pub const WAVE_ADVANCE_COOLDOWN: f32 = 0.5;

/// Bricks to break before a wave can end early
pub fn required_bricks(wave: i32) -> i32 {
    match wave {
        i32::MIN..=2 => 22,
        3..=5 => 26,
        6..=8 => 30,
        _ => 34,
    }
}

/// Minimum seconds a wave lasts even when the quota is met
pub fn min_time_before_advance(wave: i32) -> f32 {
    match wave {
        i32::MIN..=2 => 12.0,
        3..=5 => 13.0,
        6..=8 => 14.0,
        _ => 15.0,
    }
}

/// Seconds after which the wave ends regardless of the quota
pub fn time_limit(wave: i32) -> f32 {
    match wave {
        i32::MIN..=2 => 54.0,
        3..=5 => 52.0,
        6..=8 => 50.0,
        _ => 48.0,
    }
}

/// Rows inserted after advancing to `wave`, before the card delta
fn base_rows_for_wave(wave: i32) -> i32 {
    match wave {
        i32::MIN..=2 => 2,
        3..=10 => 3,
        _ => 4,
    }
}

/// Rows to insert for `wave` with the run's row delta applied (at least one)
pub fn rows_to_insert(wave: i32, delta: i32) -> i32 {
    (base_rows_for_wave(wave) + delta).max(1)
}

/// HP weights for 1..=6 by wave band; front rows lean softer
fn hp_weights(wave: i32, front_half: bool) -> [u32; 6] {
    match (wave, front_half) {
        (i32::MIN..=2, true) => [80, 20, 0, 0, 0, 0],
        (i32::MIN..=2, false) => [60, 30, 10, 0, 0, 0],
        (3..=5, true) => [60, 30, 10, 0, 0, 0],
        (3..=5, false) => [35, 35, 20, 10, 0, 0],
        (6..=8, true) => [45, 35, 15, 5, 0, 0],
        (6..=8, false) => [20, 30, 25, 15, 10, 0],
        (_, true) => [30, 35, 20, 10, 5, 0],
        (_, false) => [10, 20, 30, 20, 15, 5],
    }
}

/// Pick a brick HP for `wave`
pub fn pick_brick_hp<R: Rng>(rng: &mut R, wave: i32, front_half: bool) -> i32 {
    let weights = hp_weights(wave, front_half);
    let total: u32 = weights.iter().sum();
    let mut roll = rng.random_range(0..total);
    let mut hp = 1;
    for (i, w) in weights.iter().enumerate() {
        if roll < *w {
            hp = i as i32 + 1;
            break;
        }
        roll -= w;
    }
    // Past the last band difficulty creeps up one step per three waves
    let creep = if wave >= 11 { (wave - 8) / 3 } else { 0 };
    (hp + creep).min(MAX_BRICK_HP)
}

pub fn should_offer_cards_after_clearing_wave(cleared_wave: i32, reward_every: i32) -> bool {
    reward_every > 0 && cleared_wave % reward_every == 0
}

pub fn should_win_after_clearing_wave(cleared_wave: i32, max_waves: i32) -> bool {
    cleared_wave >= max_waves
}

pub fn load_best_score(store: &mut dyn ScoreStore) -> i64 {
    store.load_int(ROGUE_BEST_KEY)
}

pub fn save_best_score(store: &mut dyn ScoreStore, score: i64) {
    store.save_int(ROGUE_BEST_KEY, score);
}

/// Reset the run layer and open the starting draft
pub fn start_run(state: &mut GameState, cfg: &GameConfig) {
    let rogue = &mut state.rogue;
    rogue.max_waves = cfg.rogue_max_waves;
    rogue.mods = RogueModifiers::default();
    rogue.drop_deck.clear();
    rogue.draft_rounds_left = cfg.rogue_initial_draft_rounds;
    rogue.bricks_broken_this_wave = 0;
    rogue.wave_timer = 0.0;
    rogue.wave_cooldown = 0.0;
    rogue.pending_rows = 0;
    rogue.row_spawn_timer = 0.0;
    rogue.random_wind_timer = 0.0;
    init_pools(state);

    log::info!("Rogue run started ({} draft rounds)", cfg.rogue_initial_draft_rounds);
    if state.rogue.draft_rounds_left == 0 || !deal_offer(state, false, 1) {
        state.rogue.draft_rounds_left = 0;
        state.mode = Mode::Playing;
    }
}

pub fn on_wave_advanced(state: &mut GameState) {
    state.rogue.bricks_broken_this_wave = 0;
    state.rogue.wave_timer = 0.0;
    state.rogue.wave_cooldown = WAVE_ADVANCE_COOLDOWN;
}

/// Push the field toward the paddle by `rows` and fill the far edge
pub fn spawn_wave_rows(state: &mut GameState, cfg: &GameConfig, rows: i32, wave: i32) {
    if rows <= 0 {
        return;
    }
    let shift = rows as f32 * cfg.brick_row_step;
    for brick in state.bricks.iter_mut().filter(|b| b.alive) {
        brick.pos.z += shift;
    }
    state.bricks.retain(|b| b.alive);

    for row in 0..rows as usize {
        for col in 0..cfg.brick_cols {
            let hp = pick_brick_hp(&mut state.rng, wave, false);
            let pos = Vec3::new(cfg.brick_col_x(col), 0.0, cfg.brick_row_z(row));
            state.bricks.push(Brick::new(pos, cfg.brick_size, hp));
        }
    }
    log::debug!("Injected {} row(s) at wave {}", rows, wave);
}

/// Meter queued rows in one at a time
pub fn update_row_injection(state: &mut GameState, cfg: &GameConfig, dt: f32) {
    if state.rogue.pending_rows <= 0 {
        state.rogue.row_spawn_timer = 0.0;
        return;
    }
    state.rogue.row_spawn_timer += dt;
    if state.rogue.row_spawn_timer >= cfg.rogue_row_spawn_interval {
        state.rogue.row_spawn_timer = 0.0;
        state.rogue.pending_rows -= 1;
        let wave = state.wave;
        spawn_wave_rows(state, cfg, 1, wave);
    }
}

/// True once the current wave may end
pub fn wave_complete(state: &GameState) -> bool {
    let wave = state.wave;
    let r = &state.rogue;
    let quota_met = r.bricks_broken_this_wave >= required_bricks(wave)
        && r.wave_timer >= min_time_before_advance(wave);
    quota_met || r.wave_timer >= time_limit(wave)
}

/// Finish the current wave: bank, then win or move to the next wave
pub fn advance_wave(state: &mut GameState, cfg: &GameConfig, store: &mut dyn ScoreStore) {
    let cleared = state.wave;

    if should_win_after_clearing_wave(cleared, state.rogue.max_waves) {
        settle_run(state, store);
        state.mode = Mode::Win;
        state.push_event(GameEvent::Win);
        log::info!("Rogue run won after wave {} with {}", cleared, state.score);
        return;
    }
    commit_streak(state, store);

    state.wave = cleared + 1;
    on_wave_advanced(state);
    state.rogue.pending_rows = rows_to_insert(state.wave, state.rogue.mods.rows_per_wave_delta);
    state.rogue.row_spawn_timer = 0.0;
    state.push_event(GameEvent::WaveAdvanced { wave: state.wave });
    log::info!("Rogue wave {} (rows queued: {})", state.wave, state.rogue.pending_rows);

    if should_offer_cards_after_clearing_wave(cleared, cfg.rogue_reward_every) {
        let next = state.wave;
        offer_after_wave_clear(state, next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryScoreStore;
    use crate::sim::state::GameType;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rogue_state() -> (GameState, GameConfig) {
        let cfg = GameConfig::default();
        let mut state = GameState::new(&cfg);
        state.game_type = GameType::Rogue;
        state.mode = Mode::Playing;
        (state, cfg)
    }

    #[test]
    fn test_curves() {
        assert_eq!(required_bricks(1), 22);
        assert_eq!(required_bricks(5), 26);
        assert_eq!(required_bricks(8), 30);
        assert_eq!(required_bricks(9), 34);
        assert_eq!(min_time_before_advance(2), 12.0);
        assert_eq!(min_time_before_advance(10), 15.0);
        assert_eq!(time_limit(1), 54.0);
        assert_eq!(time_limit(7), 50.0);
        assert_eq!(rows_to_insert(2, 0), 2);
        assert_eq!(rows_to_insert(3, 0), 3);
        assert_eq!(rows_to_insert(11, 0), 4);
        assert_eq!(rows_to_insert(2, -5), 1);
    }

    #[test]
    fn test_hp_in_range_and_front_softer() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut front = 0;
        let mut back = 0;
        for _ in 0..2000 {
            let f = pick_brick_hp(&mut rng, 7, true);
            let b = pick_brick_hp(&mut rng, 7, false);
            assert!((1..=MAX_BRICK_HP).contains(&f));
            assert!((1..=MAX_BRICK_HP).contains(&b));
            front += f;
            back += b;
        }
        assert!(front < back);
    }

    #[test]
    fn test_late_waves_creep() {
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..200 {
            assert!(pick_brick_hp(&mut rng, 14, false) >= 3);
            assert!(pick_brick_hp(&mut rng, 40, true) <= MAX_BRICK_HP);
        }
    }

    #[test]
    fn test_reward_and_win_schedule() {
        assert!(should_offer_cards_after_clearing_wave(4, 1));
        assert!(!should_offer_cards_after_clearing_wave(3, 2));
        assert!(!should_win_after_clearing_wave(9, 10));
        assert!(should_win_after_clearing_wave(10, 10));
    }

    #[test]
    fn test_spawn_rows_pushes_field() {
        let (mut state, cfg) = rogue_state();
        state
            .bricks
            .push(Brick::new(Vec3::new(0.0, 0.0, cfg.brick_row_z(0)), cfg.brick_size, 1));
        spawn_wave_rows(&mut state, &cfg, 2, 3);
        assert_eq!(state.bricks.len(), 1 + 2 * cfg.brick_cols);
        assert!((state.bricks[0].pos.z - cfg.brick_row_z(2)).abs() < 1e-4);
    }

    #[test]
    fn test_row_injection_is_metered() {
        let (mut state, cfg) = rogue_state();
        state.rogue.pending_rows = 2;
        update_row_injection(&mut state, &cfg, 0.2);
        assert_eq!(state.rogue.pending_rows, 2);
        update_row_injection(&mut state, &cfg, 0.2);
        assert_eq!(state.rogue.pending_rows, 1);
        assert_eq!(state.bricks.len(), cfg.brick_cols);
    }

    #[test]
    fn test_start_run_opens_draft() {
        let (mut state, cfg) = rogue_state();
        start_run(&mut state, &cfg);
        assert_eq!(state.mode, Mode::RogueCards);
        assert_eq!(state.rogue.draft_rounds_left, 3);
        assert_eq!(state.rogue.offers.len(), 3);
        assert!(state.rogue.offers.iter().all(|c| !c.is_op()));
    }

    #[test]
    fn test_final_wave_wins() {
        let (mut state, cfg) = rogue_state();
        let mut store = MemoryScoreStore::new();
        state.wave = 10;
        state.streak.points = 300;
        state.streak.pos = 300;
        advance_wave(&mut state, &cfg, &mut store);
        assert_eq!(state.mode, Mode::Win);
        assert_eq!(state.score, 300);
        assert_eq!(store.get(ROGUE_BEST_KEY), Some(300));
    }
}
