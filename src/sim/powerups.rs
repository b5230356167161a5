//! Power-up drops, falling motion, pickup and effects

use glam::Vec3;
use rand::Rng;

use super::cards::ball_speed_mult;
use super::physics::{paddle_half_width, reset_ball_to_paddle};
use super::scoring::{award_points, push_popup};
use super::state::{Ball, GameEvent, GameState, PowerUp, PowerUpKind};
use crate::tuning::GameConfig;

/// Spread of the three EXTRA_BALL balls
const EXTRA_BALL_ANGLES_DEG: [f32; 3] = [-30.0, 0.0, 30.0];

/// Sample the fixed weighted table used outside Rogue
pub fn roll_weighted_kind<R: Rng>(rng: &mut R) -> PowerUpKind {
    let total: u32 = PowerUpKind::ALL.iter().map(|k| k.spawn_weight()).sum();
    let mut roll = rng.random_range(0..total);
    for kind in PowerUpKind::ALL {
        let w = kind.spawn_weight();
        if roll < w {
            return kind;
        }
        roll -= w;
    }
    PowerUpKind::ExtraBall
}

/// Chance-gated drop at `pos`.
///
/// In Rogue the type is a uniform pick from the drop deck, and an empty
/// deck never drops.
pub fn maybe_spawn(state: &mut GameState, pos: Vec3, chance: f32) {
    if state.is_rogue() && state.rogue.drop_deck.is_empty() {
        return;
    }
    if !state.rng.random_bool(chance.clamp(0.0, 1.0) as f64) {
        return;
    }

    let kind = if state.is_rogue() {
        let idx = state.rng.random_range(0..state.rogue.drop_deck.len());
        match state.rogue.drop_deck.iter().nth(idx) {
            Some(k) => *k,
            None => return,
        }
    } else {
        roll_weighted_kind(&mut state.rng)
    };

    state.power_ups.push(PowerUp {
        kind,
        pos: Vec3::new(pos.x, 0.0, pos.z),
        alive: true,
    });
    state.push_event(GameEvent::PowerUpSpawned(kind));
}

/// Drop capsules toward the paddle and resolve pickups
pub fn update_power_ups(state: &mut GameState, cfg: &GameConfig, dt: f32) {
    // Pickup box is the paddle grown by a ball radius of slack
    let half_x = paddle_half_width(state, cfg) + cfg.ball_radius;
    let half_z = cfg.paddle_size.z / 2.0 + cfg.ball_radius;
    let paddle = state.paddle;

    let mut picked = Vec::new();
    for p in state.power_ups.iter_mut().filter(|p| p.alive) {
        p.pos.z += cfg.power_up_drop_speed * dt;
        if (p.pos.x - paddle.x).abs() <= half_x && (p.pos.z - paddle.z).abs() <= half_z {
            p.alive = false;
            picked.push(p.kind);
        } else if p.pos.z > cfg.out_of_play_z {
            p.alive = false;
        }
    }

    for kind in picked {
        collect(state, cfg, kind);
    }
    state.power_ups.retain(|p| p.alive);
}

/// Pickup score, effect and event for a caught capsule
pub fn collect(state: &mut GameState, cfg: &GameConfig, kind: PowerUpKind) {
    let points = kind.pickup_points();
    award_points(state, points);
    push_popup(state, points);
    apply_effect(state, cfg, kind);
    state.push_event(GameEvent::PowerUpPicked(kind));
    log::debug!("Picked up {} ({:+})", kind.name(), points);
}

/// Apply a power-up's effect (also used by Rogue power-up cards)
pub fn apply_effect(state: &mut GameState, cfg: &GameConfig, kind: PowerUpKind) {
    match kind {
        PowerUpKind::ExtraLife => state.lives += 1,
        PowerUpKind::ExtraBall => {
            let origin = state
                .balls
                .iter()
                .find(|b| b.alive)
                .map(|b| b.pos)
                .unwrap_or(state.paddle);
            let mut speed = cfg.ball_speed;
            if state.is_rogue() {
                speed *= ball_speed_mult(state);
            }
            for deg in EXTRA_BALL_ANGLES_DEG {
                let a = deg.to_radians();
                let vel = Vec3::new(a.sin(), 0.0, -a.cos()) * speed;
                state.balls.push(Ball::new(origin, vel));
            }
        }
        PowerUpKind::Slow => state.timers.slow = cfg.power_up_duration,
        PowerUpKind::Expand => state.timers.expand = cfg.power_up_duration,
        PowerUpKind::Reverse => state.timers.reverse = cfg.reverse_duration,
        PowerUpKind::Tiny => state.timers.tiny = cfg.tiny_duration,
        PowerUpKind::Fireball => {
            state.balls.clear();
            let mut ball = Ball::new(state.paddle, Vec3::ZERO);
            reset_ball_to_paddle(&mut ball, state.paddle, cfg);
            ball.is_fireball = true;
            state.balls.push(ball);
        }
        PowerUpKind::Shield => {
            let mult = if state.is_rogue() {
                state.rogue.mods.shield_duration_mult.max(0.25)
            } else {
                1.0
            };
            state.timers.shield = cfg.shield_duration * mult;
        }
    }
}
