//! Paddle and ball integration
//!
//! Motion, Rogue wind, the shield barrier and out-of-play removal. Contact
//! response lives in `collision`.

use glam::Vec3;
use rand::Rng;

use super::cards::{base_paddle_scale_x, paddle_speed_mult};
use super::state::{Ball, GameState};
use crate::tuning::GameConfig;
use crate::{horizontal_speed, renormalize_horizontal};

/// Seconds between random-wind gusts
pub const GUST_INTERVAL: f32 = 0.3;
/// Gust strength range (sign chosen at random)
pub const GUST_MIN: f32 = 2.8;
pub const GUST_MAX: f32 = 4.4;
/// Gap between the paddle front and an attached ball
const ATTACH_GAP: f32 = 0.15;

/// Current paddle half width after every scale factor
pub fn paddle_half_width(state: &GameState, cfg: &GameConfig) -> f32 {
    let mut half = cfg.paddle_size.x / 2.0;
    if state.is_rogue() {
        half *= base_paddle_scale_x(state);
    }
    if state.timers.expand > 0.0 {
        half *= cfg.expand_scale_factor;
    }
    if state.timers.tiny > 0.0 {
        half *= cfg.tiny_scale_factor;
    }
    half
}

/// Where an attached ball sits relative to the paddle
pub fn attach_point(paddle: Vec3, cfg: &GameConfig) -> Vec3 {
    paddle - Vec3::Z * (cfg.paddle_size.z / 2.0 + cfg.ball_radius + ATTACH_GAP)
}

/// Glue a ball to the paddle
pub fn reset_ball_to_paddle(ball: &mut Ball, paddle: Vec3, cfg: &GameConfig) {
    ball.attached = true;
    ball.alive = true;
    ball.vel = Vec3::ZERO;
    ball.pos = attach_point(paddle, cfg);
}

/// Allowed paddle center range for the current width
pub fn paddle_x_range(state: &GameState, cfg: &GameConfig) -> (f32, f32) {
    let half = paddle_half_width(state, cfg);
    let margin = if state.is_rogue() {
        state.rogue.mods.paddle_clamp_margin
    } else {
        0.0
    };
    let lo = cfg.arena_min_x + half + margin;
    let hi = cfg.arena_max_x - half - margin;
    if lo > hi {
        // Paddle wider than the allowed span: pin to the middle
        let mid = (cfg.arena_min_x + cfg.arena_max_x) / 2.0;
        (mid, mid)
    } else {
        (lo, hi)
    }
}

/// Move the paddle by `dir` (-1, 0, +1) and clamp it inside the arena
pub fn update_paddle(state: &mut GameState, cfg: &GameConfig, dir: f32, dt: f32) {
    let mut speed = cfg.paddle_speed;
    if state.is_rogue() {
        speed *= paddle_speed_mult(state);
    }
    if state.timers.slow > 0.0 {
        speed *= cfg.slow_speed_factor;
    }

    let dir = dir.clamp(-1.0, 1.0);
    state.paddle.x += dir * speed * dt;

    let (lo, hi) = paddle_x_range(state, cfg);
    state.paddle.x = state.paddle.x.clamp(lo, hi);
}

/// Integrate every ball for one frame
pub fn update_balls(state: &mut GameState, cfg: &GameConfig, dt: f32) {
    let rogue = state.is_rogue();
    let wind_x = if rogue { state.rogue.mods.wind_x } else { 0.0 };

    // One gust per interval, shared by all balls
    let mut gust = None;
    if rogue && state.rogue.mods.random_wind {
        state.rogue.random_wind_timer += dt;
        if state.rogue.random_wind_timer >= GUST_INTERVAL {
            state.rogue.random_wind_timer -= GUST_INTERVAL;
            let strength = state.rng.random_range(GUST_MIN..=GUST_MAX);
            let sign = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
            gust = Some(strength * sign);
        }
    }

    let shield_active = state.timers.shield > 0.0;
    let barrier_z = (state.paddle.z + cfg.shield_offset_z).min(cfg.shield_max_z);
    let r = cfg.ball_radius;
    let paddle = state.paddle;

    for ball in state.balls.iter_mut().filter(|b| b.alive) {
        if ball.attached {
            reset_ball_to_paddle(ball, paddle, cfg);
            continue;
        }

        ball.pos += ball.vel * dt;

        if wind_x != 0.0 {
            let before = horizontal_speed(ball.vel);
            ball.vel.x += wind_x * dt;
            renormalize_horizontal(&mut ball.vel, before);
        }

        if let Some(g) = gust {
            let before = horizontal_speed(ball.vel);
            ball.vel.x += g;
            renormalize_horizontal(&mut ball.vel, before);
        }

        if shield_active && ball.vel.z > 0.0 && ball.pos.z + r >= barrier_z {
            ball.pos.z = barrier_z - r;
            ball.vel.z = -ball.vel.z;
        }

        if ball.pos.z - r > cfg.out_of_play_z {
            ball.alive = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameType;

    fn playing_state(cfg: &GameConfig) -> GameState {
        let mut state = GameState::new(cfg);
        state.game_type = GameType::Normal;
        state
    }

    #[test]
    fn test_paddle_clamps_right() {
        let cfg = GameConfig::default();
        let mut state = playing_state(&cfg);
        for _ in 0..200 {
            update_paddle(&mut state, &cfg, 1.0, 0.05);
        }
        let half = paddle_half_width(&state, &cfg);
        assert!((state.paddle.x - (cfg.arena_max_x - half)).abs() < 1e-4);
    }

    #[test]
    fn test_slow_halves_paddle_speed() {
        let cfg = GameConfig::default();
        let mut state = playing_state(&cfg);
        state.timers.slow = 1.0;
        update_paddle(&mut state, &cfg, -1.0, 0.1);
        assert!((state.paddle.x - (-0.7)).abs() < 1e-4);
    }

    #[test]
    fn test_rogue_margin_and_scale() {
        let cfg = GameConfig::default();
        let mut state = playing_state(&cfg);
        state.game_type = GameType::Rogue;
        state.rogue.mods.base_paddle_scale_x = 1.35;
        state.rogue.mods.paddle_clamp_margin = 3.0;
        state.timers.expand = 1.0;
        let half = paddle_half_width(&state, &cfg);
        assert!((half - 1.8 * 1.35 * 1.6).abs() < 1e-4);
        for _ in 0..200 {
            update_paddle(&mut state, &cfg, -1.0, 0.05);
        }
        assert!((state.paddle.x - (cfg.arena_min_x + half + 3.0)).abs() < 1e-4);
    }

    #[test]
    fn test_attached_ball_follows_paddle() {
        let cfg = GameConfig::default();
        let mut state = playing_state(&cfg);
        let mut ball = Ball::new(Vec3::ZERO, Vec3::ZERO);
        reset_ball_to_paddle(&mut ball, state.paddle, &cfg);
        state.balls.push(ball);
        state.paddle.x = 4.0;
        update_balls(&mut state, &cfg, 0.016);
        assert_eq!(state.balls[0].pos, attach_point(state.paddle, &cfg));
        assert_eq!(state.balls[0].vel, Vec3::ZERO);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let cfg = GameConfig::default();
        let paddle = Vec3::new(2.0, 0.0, 11.0);
        let mut ball = Ball::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, -3.0));
        reset_ball_to_paddle(&mut ball, paddle, &cfg);
        let once = ball.clone();
        reset_ball_to_paddle(&mut ball, paddle, &cfg);
        assert_eq!(ball, once);
        assert!(ball.attached);
    }

    #[test]
    fn test_wind_preserves_horizontal_speed() {
        let cfg = GameConfig::default();
        let mut state = playing_state(&cfg);
        state.game_type = GameType::Rogue;
        state.rogue.mods.wind_x = 2.0;
        state.rogue.mods.random_wind = true;
        state
            .balls
            .push(Ball::new(Vec3::ZERO, Vec3::new(3.0, 0.0, -9.0)));
        let before = horizontal_speed(state.balls[0].vel);
        for _ in 0..40 {
            update_balls(&mut state, &cfg, 0.02);
        }
        let after = horizontal_speed(state.balls[0].vel);
        assert!((before - after).abs() < 1e-3);
    }

    #[test]
    fn test_shield_reflects() {
        let cfg = GameConfig::default();
        let mut state = playing_state(&cfg);
        state.timers.shield = 3.0;
        let barrier = state.paddle.z + cfg.shield_offset_z;
        let eps = 0.01;
        state.balls.push(Ball::new(
            Vec3::new(0.0, 0.0, barrier - cfg.ball_radius + eps),
            Vec3::new(0.0, 0.0, 8.0),
        ));
        update_balls(&mut state, &cfg, 0.016);
        let ball = &state.balls[0];
        assert!(ball.vel.z < 0.0);
        assert!((ball.pos.z - (barrier - cfg.ball_radius)).abs() < 1e-4);
    }

    #[test]
    fn test_ball_removed_past_back_line() {
        let cfg = GameConfig::default();
        let mut state = playing_state(&cfg);
        state
            .balls
            .push(Ball::new(Vec3::new(0.0, 0.0, 20.5), Vec3::new(0.0, 0.0, 5.0)));
        update_balls(&mut state, &cfg, 0.016);
        assert!(!state.balls[0].alive);
    }
}
