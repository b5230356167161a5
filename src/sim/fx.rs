//! Visual effect timers and the win finisher
//!
//! Nothing here feeds back into gameplay except the finisher, which ends the
//! run once its real-time clock runs out.

use super::levels::record_level_clear;
use super::state::{GameEvent, GameState, GameType, Mode};
use crate::tuning::GameConfig;
use crate::{smoothstep, tick_down};

/// Shards below this height are gone
const SHARD_FLOOR_Y: f32 = -0.25;

/// Finisher length in unscaled seconds
pub const FINISHER_DURATION: f32 = 1.05;
/// Full stop at the start of the finisher
const FINISHER_FREEZE: f32 = 0.045;
/// Slow-motion phase end and its time scale
const FINISHER_SLOW_END: f32 = 0.245;
const FINISHER_SLOW_SCALE: f32 = 0.25;
/// Ramp back to full speed ends here
const FINISHER_RAMP_END: f32 = 0.425;

/// Advance explosion, shard, shake and popup timers
pub fn update_fx(state: &mut GameState, cfg: &GameConfig, dt: f32) {
    let fx = &mut state.fx;

    let explosion_life = cfg.fireball_explosion_fx_duration.max(0.001);
    for e in fx.explosions.iter_mut() {
        e.t += dt;
    }
    fx.explosions.retain(|e| e.t < explosion_life);

    let drag = (-cfg.fireball_shard_drag * dt).exp();
    for s in fx.shards.iter_mut() {
        s.vel.x *= drag;
        s.vel.z *= drag;
        s.vel.y -= cfg.fireball_shard_gravity * dt;
        s.pos += s.vel * dt;
        s.t += dt;
    }
    fx.shards
        .retain(|s| s.t < cfg.fireball_shard_life && s.pos.y >= SHARD_FLOOR_Y);

    tick_down(&mut fx.shake_timer, dt);

    for p in fx.popups.iter_mut() {
        p.t += dt;
    }
    fx.popups.retain(|p| p.t < cfg.score_popup_life);
}

/// Screen flash opacity from the freshest explosion
pub fn flash_alpha(state: &GameState, cfg: &GameConfig) -> f32 {
    let life = cfg.fireball_explosion_fx_duration.max(0.001);
    state
        .fx
        .explosions
        .iter()
        .map(|e| cfg.fireball_flash_max_alpha * (1.0 - e.t / life).clamp(0.0, 1.0))
        .fold(0.0, f32::max)
}

/// Camera shake offset magnitude, fading with the timer
pub fn shake_amplitude(state: &GameState, cfg: &GameConfig) -> f32 {
    if state.fx.shake_timer <= 0.0 || cfg.fireball_shake_duration <= 0.0 {
        return 0.0;
    }
    let k = (state.fx.shake_timer / cfg.fireball_shake_duration).clamp(0.0, 1.0);
    cfg.fireball_shake_strength * k
}

/// Freeze, slow motion, then a smooth ramp back to 1.0
pub fn finisher_time_scale(real_t: f32) -> f32 {
    if real_t < FINISHER_FREEZE {
        0.0
    } else if real_t < FINISHER_SLOW_END {
        FINISHER_SLOW_SCALE
    } else if real_t < FINISHER_RAMP_END {
        let k = smoothstep((real_t - FINISHER_SLOW_END) / (FINISHER_RAMP_END - FINISHER_SLOW_END));
        FINISHER_SLOW_SCALE + (1.0 - FINISHER_SLOW_SCALE) * k
    } else {
        1.0
    }
}

/// Begin the post-clear cinematic
pub fn start_win_finisher(state: &mut GameState) {
    let anchor = state
        .last_brick_destroyed_pos
        .or(state.finisher.hold_brick.map(|b| b.pos))
        .unwrap_or(state.paddle);

    state.finisher.active = true;
    state.finisher.real_t = 0.0;
    state.finisher.cine_t = 0.0;
    state.finisher.time_scale = finisher_time_scale(0.0);
    state.finisher.anchor = anchor;
    state.balls.clear();
    state.power_ups.clear();
    state.push_event(GameEvent::WinFinisherStarted);
    log::info!("Board cleared, finisher at {:?}", anchor);
}

/// Mark the run won, recording Levels progress
pub fn finish_win(state: &mut GameState) {
    state.mode = Mode::Win;
    if state.game_type == GameType::Levels {
        let lives = state.lives;
        record_level_clear(&mut state.levels, lives);
    }
    state.push_event(GameEvent::Win);
    log::info!("{} run won with {}", state.game_type.name(), state.score);
}

/// Advance the finisher; true once it has handed over to the win screen
pub fn update_win_finisher(state: &mut GameState, dt: f32) -> bool {
    if !state.finisher.active {
        return false;
    }
    let f = &mut state.finisher;
    f.real_t += dt;
    f.time_scale = finisher_time_scale(f.real_t);
    f.cine_t += dt * f.time_scale;

    if f.real_t >= FINISHER_DURATION {
        f.active = false;
        finish_win(state);
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::spawn_explosion;
    use crate::sim::state::{HeldBrick, ScorePopup};
    use glam::Vec3;

    fn setup() -> (GameState, GameConfig) {
        let cfg = GameConfig::default();
        let mut state = GameState::new(&cfg);
        state.mode = Mode::Playing;
        (state, cfg)
    }

    #[test]
    fn test_explosion_expires() {
        let (mut state, cfg) = setup();
        spawn_explosion(&mut state, &cfg, Vec3::ZERO);
        assert!(flash_alpha(&state, &cfg) > 0.19);
        assert!((shake_amplitude(&state, &cfg) - cfg.fireball_shake_strength).abs() < 1e-5);
        for _ in 0..30 {
            update_fx(&mut state, &cfg, 0.02);
        }
        assert!(state.fx.explosions.is_empty());
        assert!(state.fx.shards.is_empty());
        assert_eq!(state.fx.shake_timer, 0.0);
        assert_eq!(flash_alpha(&state, &cfg), 0.0);
    }

    #[test]
    fn test_shards_slow_down() {
        let (mut state, cfg) = setup();
        spawn_explosion(&mut state, &cfg, Vec3::ZERO);
        let before: f32 = state.fx.shards[0].vel.x.hypot(state.fx.shards[0].vel.z);
        update_fx(&mut state, &cfg, 0.05);
        let after: f32 = state.fx.shards[0].vel.x.hypot(state.fx.shards[0].vel.z);
        assert!(after < before);
    }

    #[test]
    fn test_popup_lifetime() {
        let (mut state, cfg) = setup();
        state.fx.popups.push(ScorePopup { points: 50, t: 0.0 });
        update_fx(&mut state, &cfg, 2.0);
        assert_eq!(state.fx.popups.len(), 1);
        update_fx(&mut state, &cfg, 0.2);
        assert!(state.fx.popups.is_empty());
    }

    #[test]
    fn test_time_scale_envelope() {
        assert_eq!(finisher_time_scale(0.01), 0.0);
        assert_eq!(finisher_time_scale(0.1), 0.25);
        let mid = finisher_time_scale(0.335);
        assert!(mid > 0.25 && mid < 1.0);
        assert_eq!(finisher_time_scale(0.5), 1.0);
    }

    #[test]
    fn test_finisher_ends_in_win() {
        let (mut state, _) = setup();
        state.finisher.hold_brick = Some(HeldBrick {
            pos: Vec3::new(0.0, 0.0, -7.4),
            size: Vec3::ONE,
            max_hp: 1,
        });
        start_win_finisher(&mut state);
        assert_eq!(state.finisher.anchor, Vec3::new(0.0, 0.0, -7.4));
        let mut done = false;
        for _ in 0..40 {
            done = update_win_finisher(&mut state, 0.05);
            if done {
                break;
            }
        }
        assert!(done);
        assert_eq!(state.mode, Mode::Win);
        assert!(state.finisher.real_t >= FINISHER_DURATION);
        assert!(state.finisher.cine_t < state.finisher.real_t);
    }

    #[test]
    fn test_levels_win_records_stars() {
        let (mut state, _) = setup();
        state.game_type = GameType::Levels;
        state.lives = 2;
        finish_win(&mut state);
        assert_eq!(state.levels.stars[0], 2);
        assert_eq!(state.levels.best_level_reached, 2);
    }
}
