//! Brick scoring and the streak bank
//!
//! Endless and Rogue collect points into a signed streak that is committed to
//! the score after an idle period and a short banking animation. Normal and
//! Levels score directly.

use super::rogue::save_best_score;
use super::state::{GameEvent, GameState, GameType, ScorePopup};
use crate::persistence::{ENDLESS_BEST_KEY, ScoreStore};
use crate::tuning::GameConfig;

/// Points per wave added to every brick in Endless/Rogue
pub const WAVE_BONUS_PER_WAVE: i64 = 25;

/// Base points for breaking a brick with the given max HP
pub fn brick_points(max_hp: i32) -> i64 {
    match max_hp {
        i32::MIN..=1 => 50,
        2 => 120,
        3 => 220,
        4 => 350,
        5 => 500,
        _ => 700,
    }
}

/// Full award for a broken brick in the current mode
pub fn brick_award(state: &GameState, max_hp: i32) -> i64 {
    let mut points = brick_points(max_hp);
    if state.game_type.uses_bank() {
        points += state.wave.max(0) as i64 * WAVE_BONUS_PER_WAVE;
    }
    if state.is_rogue() {
        points = (points as f32 * state.rogue.mods.brick_points_mult).round() as i64;
    }
    points
}

/// Add directly to the score, never below zero
pub fn add_score(state: &mut GameState, points: i64) {
    state.score = (state.score + points).max(0);
}

/// Queue a floating score label
pub fn push_popup(state: &mut GameState, points: i64) {
    state.fx.popups.push(ScorePopup { points, t: 0.0 });
}

/// Contribute to the streak bank; any contribution restarts the idle clock
pub fn bank_points(state: &mut GameState, points: i64) {
    let streak = &mut state.streak;
    streak.points += points;
    if points >= 0 {
        streak.pos += points;
    } else {
        streak.neg -= points;
    }
    streak.idle = 0.0;
    streak.banking = false;
    streak.bank_timer = 0.0;
}

/// Route points to the bank or the score depending on the mode
pub fn award_points(state: &mut GameState, points: i64) {
    if state.game_type.uses_bank() {
        bank_points(state, points);
    } else {
        add_score(state, points);
    }
}

/// Charge the life-loss penalty
pub fn apply_life_loss_penalty(state: &mut GameState, cfg: &GameConfig) {
    let mut penalty = cfg.life_loss_penalty;
    if state.is_rogue() {
        penalty += state.rogue.mods.life_loss_penalty_bonus;
    }
    award_points(state, -penalty);
}

/// Move the streak into the score and refresh bests.
///
/// An empty streak leaves the score and the store untouched.
pub fn commit_streak(state: &mut GameState, store: &mut dyn ScoreStore) {
    let points = state.streak.points;
    state.streak = Default::default();
    if points == 0 {
        return;
    }
    add_score(state, points);
    state.push_event(GameEvent::BankCommitted { points });
    log::debug!("Banked {} (score {})", points, state.score);
    update_bests(state, store);
}

/// End-of-run bookkeeping: commit the streak, then check the best.
///
/// Fireball points skip the bank, so the best is checked even when the
/// streak is empty.
pub fn settle_run(state: &mut GameState, store: &mut dyn ScoreStore) {
    commit_streak(state, store);
    update_bests(state, store);
}

/// Persist a new best for the active mode
pub fn update_bests(state: &mut GameState, store: &mut dyn ScoreStore) {
    let best = match state.game_type {
        GameType::Endless => &mut state.endless.best_score,
        GameType::Rogue => &mut state.rogue.best_score,
        _ => return,
    };
    if state.score > *best {
        *best = state.score;
        if state.game_type == GameType::Rogue {
            save_best_score(store, state.score);
        } else {
            store.save_int(ENDLESS_BEST_KEY, state.score);
        }
        log::info!("New {} best: {}", state.game_type.name(), state.score);
        let score = state.score;
        state.push_event(GameEvent::NewBest { score });
    }
}

/// Advance the idle clock and banking animation
pub fn update_streak_bank(
    state: &mut GameState,
    cfg: &GameConfig,
    store: &mut dyn ScoreStore,
    dt: f32,
) {
    if state.streak.is_empty() {
        return;
    }

    if !state.streak.banking {
        let mut threshold = cfg.streak_idle_seconds;
        if state.is_rogue() {
            threshold *= state.rogue.mods.bank_idle_mult;
        }
        state.streak.idle += dt;
        if state.streak.idle >= threshold {
            state.streak.banking = true;
            state.streak.bank_timer = 0.0;
            state.push_event(GameEvent::BankStarted);
        }
        return;
    }

    state.streak.bank_timer += dt;
    if state.streak.bank_timer >= cfg.streak_bank_anim_seconds {
        commit_streak(state, store);
    }
}
