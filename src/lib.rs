//! Brick Breaker - a 3D brick-breaking arcade game
//!
//! Core modules:
//! - `sim`: Gameplay simulation (physics, collisions, power-ups, modes, scoring)
//! - `tuning`: Data-driven game balance
//! - `persistence`: Best-score key/value store
//! - `audio`: Audio collaborator boundary (events in, sound ids out)
//! - `renderer`: Renderer collaborator boundary and camera
//! - `platform`: Input adapter, frame clock and window host loop

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use persistence::{FileScoreStore, MemoryScoreStore, ScoreStore};
pub use tuning::GameConfig;

use glam::Vec3;

/// Magnitudes at or below this are treated as zero when renormalizing
pub const SPEED_EPSILON: f32 = 1e-4;

/// Horizontal (XZ-plane) speed of a velocity
#[inline]
pub fn horizontal_speed(v: Vec3) -> f32 {
    (v.x * v.x + v.z * v.z).sqrt()
}

/// Rescale the XZ components of `v` so its horizontal speed equals `target`.
///
/// Skipped when either magnitude is too small to divide safely.
#[inline]
pub fn renormalize_horizontal(v: &mut Vec3, target: f32) {
    let current = horizontal_speed(*v);
    if current <= SPEED_EPSILON || target <= SPEED_EPSILON {
        return;
    }
    let k = target / current;
    v.x *= k;
    v.z *= k;
}

/// Move a countdown timer toward zero
#[inline]
pub fn tick_down(timer: &mut f32, dt: f32) {
    *timer = (*timer - dt).max(0.0);
}

/// Hermite smoothstep on [0, 1]
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
