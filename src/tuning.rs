//! Game tuning values
//!
//! Immutable for the duration of a run. Defaults are the authoritative
//! balance; a JSON file may override any subset of fields.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// All gameplay tuning in one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Arena ===
    pub arena_min_x: f32,
    pub arena_max_x: f32,
    pub arena_min_z: f32,
    pub arena_max_z: f32,
    /// Balls and power-ups past this z are removed
    pub out_of_play_z: f32,

    // === Paddle ===
    pub paddle_size: Vec3,
    pub paddle_speed: f32,
    pub paddle_start_z: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_speed: f32,
    /// Seconds between brick hits for one ball
    pub brick_hit_cooldown: f32,

    // === Bricks ===
    pub brick_cols: usize,
    pub brick_size: Vec3,
    pub brick_col_step: f32,
    pub brick_row_step: f32,
    pub brick_first_row_z: f32,

    // === Power-ups ===
    pub power_up_drop_speed: f32,
    pub power_up_chance: f32,
    pub power_up_duration: f32,
    pub power_up_visual_scale: f32,
    pub slow_speed_factor: f32,
    pub expand_scale_factor: f32,
    pub shield_duration: f32,
    pub shield_offset_z: f32,
    /// Shield barrier never sits deeper than this
    pub shield_max_z: f32,
    pub reverse_duration: f32,
    pub tiny_duration: f32,
    pub tiny_scale_factor: f32,

    // === Fireball ===
    pub fireball_explosion_radius: f32,
    pub fireball_explosion_fx_duration: f32,
    pub fireball_flash_max_alpha: f32,
    pub fireball_shake_duration: f32,
    pub fireball_shake_strength: f32,
    pub fireball_shard_count: usize,
    pub fireball_shard_life: f32,
    pub fireball_shard_speed: f32,
    pub fireball_shard_up: f32,
    pub fireball_shard_drag: f32,
    pub fireball_shard_gravity: f32,

    // === Scoring ===
    pub life_loss_penalty: i64,
    pub score_popup_life: f32,
    pub streak_idle_seconds: f32,
    pub streak_bank_anim_seconds: f32,
    pub starting_lives: i32,

    // === Endless ===
    pub endless_grace_seconds: f32,
    pub endless_interval_start: f32,
    pub endless_interval_end: f32,
    pub endless_ramp_seconds: f32,
    pub endless_batch: usize,
    pub endless_spawn_cooldown: f32,

    // === Rogue ===
    pub rogue_max_waves: i32,
    pub rogue_reward_every: i32,
    pub rogue_row_spawn_interval: f32,
    pub rogue_initial_draft_rounds: u32,

    // === Frame ===
    pub max_frame_dt: f32,
    /// Base RNG seed; each run mixes in its run counter
    pub seed: u64,
    /// Debug layout: a single brick a few rows deep
    pub test_one_brick: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_min_x: -18.0,
            arena_max_x: 18.0,
            arena_min_z: -12.0,
            arena_max_z: 12.0,
            out_of_play_z: 20.0,

            paddle_size: Vec3::new(3.6, 0.55, 0.90),
            paddle_speed: 14.0,
            paddle_start_z: 11.0,

            ball_radius: 0.42,
            ball_speed: 10.5,
            brick_hit_cooldown: 0.045,

            brick_cols: 12,
            brick_size: Vec3::new(2.6, 0.8, 1.0),
            brick_col_step: 2.8,
            brick_row_step: 1.2,
            brick_first_row_z: -11.0,

            power_up_drop_speed: 4.5,
            power_up_chance: 0.35,
            power_up_duration: 7.0,
            power_up_visual_scale: 1.15,
            slow_speed_factor: 0.5,
            expand_scale_factor: 1.6,
            shield_duration: 6.5,
            shield_offset_z: 2.2,
            shield_max_z: 19.0,
            reverse_duration: 4.25,
            tiny_duration: 6.0,
            tiny_scale_factor: 0.60,

            fireball_explosion_radius: 4.2,
            fireball_explosion_fx_duration: 0.45,
            fireball_flash_max_alpha: 0.20,
            fireball_shake_duration: 0.32,
            fireball_shake_strength: 0.28,
            fireball_shard_count: 18,
            fireball_shard_life: 0.55,
            fireball_shard_speed: 8.0,
            fireball_shard_up: 4.5,
            fireball_shard_drag: 2.2,
            fireball_shard_gravity: 14.0,

            life_loss_penalty: 200,
            score_popup_life: 2.10,
            streak_idle_seconds: 2.5,
            streak_bank_anim_seconds: 0.55,
            starting_lives: 3,

            endless_grace_seconds: 60.0,
            endless_interval_start: 26.0,
            endless_interval_end: 12.0,
            endless_ramp_seconds: 540.0,
            endless_batch: 12,
            endless_spawn_cooldown: 0.6,

            rogue_max_waves: 10,
            rogue_reward_every: 1,
            rogue_row_spawn_interval: 0.35,
            rogue_initial_draft_rounds: 3,

            max_frame_dt: 0.05,
            seed: 0x5EED,
            test_one_brick: false,
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) JSON override
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load overrides from a file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json_str(&json) {
                Ok(cfg) => {
                    log::info!("Loaded tuning from {}", path.display());
                    cfg
                }
                Err(e) => {
                    log::warn!("Bad tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No tuning file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn arena_width(&self) -> f32 {
        self.arena_max_x - self.arena_min_x
    }

    /// Bricks reaching this z end an Endless/Rogue run
    pub fn death_line_z(&self, paddle_z: f32) -> f32 {
        paddle_z - 0.5
    }

    /// Bricks past this z raise the danger warning
    pub fn danger_line_z(&self, paddle_z: f32) -> f32 {
        self.death_line_z(paddle_z) - 3.0 * self.brick_row_step
    }

    /// X of the center of brick column `col`
    pub fn brick_col_x(&self, col: usize) -> f32 {
        let mid = (self.brick_cols as f32 - 1.0) / 2.0;
        (col as f32 - mid) * self.brick_col_step
    }

    /// Z of the center of brick row `row` (row 0 is the far edge)
    pub fn brick_row_z(&self, row: usize) -> f32 {
        self.brick_first_row_z + row as f32 * self.brick_row_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_override() {
        let cfg = GameConfig::from_json_str(r#"{ "ball_speed": 12.0, "brick_cols": 10 }"#)
            .expect("valid json");
        assert_eq!(cfg.ball_speed, 12.0);
        assert_eq!(cfg.brick_cols, 10);
        // Untouched fields keep their defaults
        assert_eq!(cfg.paddle_speed, 14.0);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(GameConfig::from_json_str("{ nope").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let cfg = GameConfig::load_or_default("/definitely/not/here.json");
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn test_grid_fits_arena() {
        let cfg = GameConfig::default();
        let left = cfg.brick_col_x(0) - cfg.brick_size.x / 2.0;
        let right = cfg.brick_col_x(cfg.brick_cols - 1) + cfg.brick_size.x / 2.0;
        assert!(left > cfg.arena_min_x);
        assert!(right < cfg.arena_max_x);
        assert!((cfg.brick_col_x(0) + cfg.brick_col_x(cfg.brick_cols - 1)).abs() < 1e-4);
    }
}
