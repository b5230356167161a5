//! Demo AI that plays the game
//!
//! Produces the same `TickInput` a player would. Used by the headless
//! binary and by long-running tests.

use super::physics::paddle_half_width;
use super::state::{GameState, GameType, Mode};
use super::tick::{MenuAction, TickInput};
use crate::tuning::GameConfig;

/// Paddle stops chasing inside this distance of its target
const DEADZONE: f32 = 0.25;
/// Balls farther up the field than this are not a threat yet
const SAFE_Z_MARGIN: f32 = 9.0;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Seconds of play, drives the aim wobble
    time: f32,
    /// Game type started from the menu and after a loss
    pub game_type: GameType,
}

impl Autopilot {
    pub fn new(game_type: GameType) -> Self {
        Self {
            time: 0.0,
            game_type,
        }
    }

    /// Decide this frame's input
    pub fn input(&mut self, state: &GameState, cfg: &GameConfig, dt: f32) -> TickInput {
        self.time += dt;
        let mut input = TickInput::default();

        match state.mode {
            Mode::Menu => {
                input.menu = Some(MenuAction::Start(self.game_type));
                return input;
            }
            Mode::RogueCards => {
                input.card_pick = Some(0);
                return input;
            }
            Mode::GameOver => {
                input.menu = Some(MenuAction::Restart);
                return input;
            }
            Mode::Win => {
                input.menu = Some(if state.game_type == GameType::Levels {
                    MenuAction::NextLevel
                } else {
                    MenuAction::Restart
                });
                return input;
            }
            Mode::Paused => {
                input.pause = true;
                return input;
            }
            Mode::Playing => {}
        }

        // Serve as soon as a ball is waiting
        if state.balls.iter().any(|b| b.attached) {
            input.launch = true;
        }

        // The most threatening ball is the one nearest the paddle heading down
        let threat = state
            .balls
            .iter()
            .filter(|b| b.alive && !b.attached && b.vel.z > 0.0)
            .max_by(|a, b| a.pos.z.total_cmp(&b.pos.z));

        let all_safe = threat.is_none_or(|b| b.pos.z < state.paddle.z - SAFE_Z_MARGIN);

        // If safe, go grab the nearest good pickup
        let pickup = if all_safe {
            state
                .power_ups
                .iter()
                .filter(|p| p.alive && !p.kind.is_curse())
                .max_by(|a, b| a.pos.z.total_cmp(&b.pos.z))
                .map(|p| p.pos.x)
        } else {
            None
        };

        let target_x = if let Some(x) = pickup {
            Some(x)
        } else if let Some(ball) = threat {
            // Lead the ball to the paddle line, folding the path off the side walls
            let time_to_paddle = ((state.paddle.z - ball.pos.z) / ball.vel.z).max(0.0);
            let raw = ball.pos.x + ball.vel.x * time_to_paddle;
            let x = fold_into(raw, cfg.arena_min_x + cfg.ball_radius, cfg.arena_max_x - cfg.ball_radius);
            // Vary the contact point so rallies do not loop
            let half = paddle_half_width(state, cfg);
            let offset = (self.time * 0.9).sin() * half * 0.45;
            Some(x + offset)
        } else {
            None
        };

        if let Some(x) = target_x {
            let dx = x - state.paddle.x;
            if dx.abs() > DEADZONE {
                input.paddle_dir = dx.signum();
                // The core flips input while reversed
                if state.timers.reverse > 0.0 {
                    input.paddle_dir = -input.paddle_dir;
                }
            }
        }
        input
    }
}

/// Reflect `x` back into `[lo, hi]` as a ball bouncing between walls would
fn fold_into(x: f32, lo: f32, hi: f32) -> f32 {
    let span = hi - lo;
    if span <= 0.0 {
        return lo;
    }
    let period = 2.0 * span;
    let t = (x - lo).rem_euclid(period);
    if t <= span { lo + t } else { hi - (t - span) }
}
