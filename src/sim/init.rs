//! Run setup and brick generation

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::levels::level_bricks;
use super::physics::reset_ball_to_paddle;
use super::rogue;
use super::state::{
    Ball, Brick, EndlessState, FxQueues, GameEvent, GameState, GameType, MAX_BRICK_HP, Mode,
    PowerUpTimers, RogueModifiers, StreakBank, WinFinisher,
};
use crate::persistence::{ENDLESS_BEST_KEY, ScoreStore};
use crate::tuning::GameConfig;

/// Rows in the Normal layout
pub const NORMAL_ROWS: usize = 6;
/// Normal HP by row, far row first
const NORMAL_ROW_HP: [i32; NORMAL_ROWS] = [4, 3, 2, 2, 1, 1];
/// Row of the debug single brick
const ONE_BRICK_ROW: usize = 3;
/// Incremental HP weights for 1..=4
const INCREMENTAL_HP_WEIGHTS: [u32; 4] = [50, 30, 15, 5];
/// Spawned rows per point of incremental difficulty bonus
const ROWS_PER_HP_BONUS: u32 = 12;

/// Reset every per-run field and build the opening board.
///
/// The game type and level selection are read from `state`; everything
/// else is overwritten.
pub fn init_game(state: &mut GameState, cfg: &GameConfig, store: &mut dyn ScoreStore) {
    state.rng = Pcg32::seed_from_u64(state.seed.wrapping_add(state.runs_started));
    state.runs_started += 1;

    state.mode = Mode::Playing;
    state.lives = cfg.starting_lives;
    state.score = 0;
    state.wave = 1;
    state.timers = PowerUpTimers::default();
    state.fx = FxQueues::default();
    state.streak = StreakBank::default();
    state.finisher = WinFinisher::default();
    state.pending_respawn_after_fireball = false;
    state.last_brick_destroyed_pos = None;
    state.power_ups.clear();
    state.events.clear();

    state.endless = EndlessState {
        best_score: store.load_int(ENDLESS_BEST_KEY),
        ..Default::default()
    };
    state.rogue.mods = RogueModifiers::default();
    state.rogue.offers.clear();
    state.rogue.chosen.clear();
    state.rogue.drop_deck.clear();
    state.rogue.draft_rounds_left = 0;
    state.rogue.bricks_broken_this_wave = 0;
    state.rogue.wave_timer = 0.0;
    state.rogue.wave_cooldown = 0.0;
    state.rogue.pending_rows = 0;
    state.rogue.row_spawn_timer = 0.0;
    state.rogue.random_wind_timer = 0.0;
    state.rogue.best_score = rogue::load_best_score(store);

    state.paddle = Vec3::new(0.0, 0.0, cfg.paddle_start_z);
    state.balls.clear();
    let mut ball = Ball::new(state.paddle, Vec3::ZERO);
    reset_ball_to_paddle(&mut ball, state.paddle, cfg);
    state.balls.push(ball);

    generate_bricks(state, cfg);

    log::info!(
        "Started {} run ({} bricks, seed {})",
        state.game_type.name(),
        state.bricks.len(),
        state.seed.wrapping_add(state.runs_started - 1)
    );
    state.push_event(GameEvent::RunStarted(state.game_type));

    if state.game_type == GameType::Rogue {
        rogue::start_run(state, cfg);
    }
}

/// Build the opening board for the current game type
pub fn generate_bricks(state: &mut GameState, cfg: &GameConfig) {
    state.bricks.clear();

    if cfg.test_one_brick {
        let pos = Vec3::new(0.0, 0.0, cfg.brick_row_z(ONE_BRICK_ROW));
        state.bricks.push(Brick::new(pos, cfg.brick_size, 1));
        return;
    }

    match state.game_type {
        GameType::Levels => {
            state.bricks = level_bricks(state.levels.current_level, cfg);
        }
        GameType::Normal => {
            for (row, hp) in NORMAL_ROW_HP.iter().enumerate() {
                for col in 0..cfg.brick_cols {
                    let pos = Vec3::new(cfg.brick_col_x(col), 0.0, cfg.brick_row_z(row));
                    state.bricks.push(Brick::new(pos, cfg.brick_size, *hp));
                }
            }
        }
        GameType::Endless | GameType::Rogue => {
            let wave = state.wave;
            let rows = (9 + wave / 2) as usize;
            for row in 0..rows {
                // Rows nearer the paddle are the front half
                let front_half = row >= rows / 2;
                for col in 0..cfg.brick_cols {
                    let hp = if state.game_type == GameType::Rogue {
                        rogue::pick_brick_hp(&mut state.rng, wave, front_half)
                    } else {
                        endless_brick_hp(&mut state.rng, wave, front_half)
                    };
                    let pos = Vec3::new(cfg.brick_col_x(col), 0.0, cfg.brick_row_z(row));
                    state.bricks.push(Brick::new(pos, cfg.brick_size, hp));
                }
            }
        }
    }
}

/// Opening Endless HP: soft front rows, back rows scale with the wave
fn endless_brick_hp<R: Rng>(rng: &mut R, wave: i32, front_half: bool) -> i32 {
    if front_half {
        return rng.random_range(1..=2);
    }
    let spread = (1 + wave / 2).min(4);
    (1 + rng.random_range(0..=spread)).min(MAX_BRICK_HP)
}

/// HP for an incrementally spawned brick
fn incremental_brick_hp<R: Rng>(rng: &mut R, rows_spawned: u32) -> i32 {
    let total: u32 = INCREMENTAL_HP_WEIGHTS.iter().sum();
    let mut roll = rng.random_range(0..total);
    let mut hp = 1;
    for (i, w) in INCREMENTAL_HP_WEIGHTS.iter().enumerate() {
        if roll < *w {
            hp = i as i32 + 1;
            break;
        }
        roll -= w;
    }
    let bonus = (rows_spawned / ROWS_PER_HP_BONUS) as i32;
    (hp + bonus).min(MAX_BRICK_HP)
}

/// Push the field toward the paddle and add `count` bricks at the far edge
pub fn spawn_incremental_bricks(state: &mut GameState, cfg: &GameConfig, count: usize, wave: i32) {
    if count == 0 || cfg.brick_cols == 0 {
        return;
    }
    let rows = count.div_ceil(cfg.brick_cols);
    let shift = rows as f32 * cfg.brick_row_step;
    for brick in state.bricks.iter_mut().filter(|b| b.alive) {
        brick.pos.z += shift;
    }
    state.bricks.retain(|b| b.alive);

    for i in 0..count {
        let row = i / cfg.brick_cols;
        let col = i % cfg.brick_cols;
        let hp = incremental_brick_hp(&mut state.rng, state.endless.rows_spawned);
        let pos = Vec3::new(cfg.brick_col_x(col), 0.0, cfg.brick_row_z(row));
        state.bricks.push(Brick::new(pos, cfg.brick_size, hp));
    }
    state.endless.rows_spawned += rows as u32;
    log::debug!("Spawned {} bricks ({} rows) at wave {}", count, rows, wave);
}

pub fn any_bricks_alive(state: &GameState) -> bool {
    state.bricks.iter().any(|b| b.alive)
}
