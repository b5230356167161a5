//! Collision detection and response
//!
//! The game is 2.5-D for contact purposes: every test is a circle against an
//! axis-aligned box in the XZ plane. Height (Y) is only visual.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::cards::effective_drop_chance;
use super::physics::paddle_half_width;
use super::powerups::maybe_spawn;
use super::scoring::{add_score, award_points, brick_award, push_popup};
use super::state::{
    FireballExplosionFx, FireballShard, GameEvent, GameState, GameType, HeldBrick,
};
use crate::tuning::GameConfig;

/// Push-out slack so a resolved ball does not re-touch the same surface
pub const CONTACT_EPS: f32 = 0.01;
/// Maximum paddle deflection from straight ahead
pub const MAX_BOUNCE_ANGLE_DEG: f32 = 60.0;
/// Side hits need this much more horizontal than depth offset
const SIDE_HIT_BIAS: f32 = 1.05;

/// What happened when a ball met the brick field this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrickHitOutcome {
    pub hit: bool,
    pub fireball: bool,
    pub damaged: bool,
    /// Damaged but still standing
    pub cracked: bool,
    pub broke: bool,
    pub bricks_killed: u32,
    pub hp_before: i32,
    pub hp_after: i32,
    pub max_hp: i32,
    /// Index of the directly-hit brick
    pub brick_index: Option<usize>,
}

/// Circle vs box overlap in XZ
#[inline]
pub fn sphere_aabb_xz(center: Vec3, radius: f32, box_center: Vec3, half: Vec3) -> bool {
    let cx = center.x.clamp(box_center.x - half.x, box_center.x + half.x);
    let cz = center.z.clamp(box_center.z - half.z, box_center.z + half.z);
    let dx = center.x - cx;
    let dz = center.z - cz;
    dx * dx + dz * dz <= radius * radius
}

#[inline]
fn sign(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Reflect off the side walls and the far wall. There is no near wall.
///
/// Returns true if any wall was touched.
pub fn collide_world(state: &mut GameState, cfg: &GameConfig, index: usize) -> bool {
    let r = cfg.ball_radius;
    let ball = &mut state.balls[index];
    if !ball.alive || ball.attached {
        return false;
    }

    let mut hit = false;
    if ball.pos.x - r < cfg.arena_min_x {
        ball.pos.x = cfg.arena_min_x + r;
        ball.vel.x = ball.vel.x.abs();
        hit = true;
    } else if ball.pos.x + r > cfg.arena_max_x {
        ball.pos.x = cfg.arena_max_x - r;
        ball.vel.x = -ball.vel.x.abs();
        hit = true;
    }
    if ball.pos.z - r < cfg.arena_min_z {
        ball.pos.z = cfg.arena_min_z + r;
        ball.vel.z = ball.vel.z.abs();
        hit = true;
    }
    hit
}

/// Paddle contact with angle control and the Rogue sticky variant
///
/// Returns true on contact.
pub fn collide_paddle(state: &mut GameState, cfg: &GameConfig, index: usize) -> bool {
    let hw = paddle_half_width(state, cfg);
    let hd = cfg.paddle_size.z / 2.0;
    let r = cfg.ball_radius;
    let paddle = state.paddle;
    let sticky = state.is_rogue() && state.rogue.mods.sticky_paddle;
    let fallback_speed = cfg.ball_speed
        * if state.is_rogue() {
            state.rogue.mods.ball_speed_mult
        } else {
            1.0
        };

    let ball = &mut state.balls[index];
    if !ball.alive || ball.attached {
        return false;
    }
    if !sphere_aabb_xz(ball.pos, r, paddle, Vec3::new(hw, 0.0, hd)) {
        return false;
    }

    let dx = ball.pos.x - paddle.x;
    let dz = ball.pos.z - paddle.z;

    if dx.abs() > SIDE_HIT_BIAS * dz.abs() {
        // Side hit: bounce sideways, keep depth motion
        let s = sign(dx);
        ball.vel.x = s * ball.vel.x.abs();
        ball.pos.x = paddle.x + s * (hw + r + CONTACT_EPS);
    } else {
        let front = ball.pos.z < paddle.z;
        if front && sticky && ball.vel.z > 0.0 && !ball.is_fireball {
            ball.attached = true;
            ball.vel = Vec3::ZERO;
            ball.pos.z = paddle.z - hd - r - CONTACT_EPS;
        } else {
            let mut speed = ball.vel.length();
            if speed <= crate::SPEED_EPSILON {
                speed = fallback_speed;
            }
            let t = (dx / hw).clamp(-1.0, 1.0);
            let angle = (t * MAX_BOUNCE_ANGLE_DEG).to_radians();
            let away = if front { -1.0 } else { 1.0 };
            ball.vel = Vec3::new(angle.sin(), 0.0, away * angle.cos()) * speed;
            ball.pos.z = paddle.z + away * (hd + r + CONTACT_EPS);
        }
    }

    state.push_event(GameEvent::PaddleHit);
    true
}

/// Resolve the first brick the ball overlaps
pub fn collide_bricks(state: &mut GameState, cfg: &GameConfig, index: usize) -> BrickHitOutcome {
    let r = cfg.ball_radius;
    let ball = &state.balls[index];
    if !ball.alive || ball.attached || ball.brick_cooldown > 0.0 {
        return BrickHitOutcome::default();
    }
    let pos = ball.pos;

    let Some(hit_index) = state
        .bricks
        .iter()
        .position(|b| b.alive && sphere_aabb_xz(pos, r, b.pos, b.size / 2.0))
    else {
        return BrickHitOutcome::default();
    };

    state.balls[index].brick_cooldown = cfg.brick_hit_cooldown;

    if state.balls[index].is_fireball {
        fireball_hit(state, cfg, index, hit_index)
    } else {
        normal_hit(state, cfg, index, hit_index)
    }
}

fn normal_hit(
    state: &mut GameState,
    cfg: &GameConfig,
    ball_index: usize,
    hit_index: usize,
) -> BrickHitOutcome {
    let damage = 1 + if state.is_rogue() {
        state.rogue.mods.brick_damage_bonus.max(0)
    } else {
        0
    };

    let brick = &mut state.bricks[hit_index];
    let max_hp = brick.max_hp;
    let (hp_before, hp_after) = brick.damage(damage);
    let broke = hp_after <= 0;
    let brick_pos = brick.pos;
    let half = brick.size / 2.0;

    if broke {
        let points = brick_award(state, max_hp);
        award_points(state, points);
        if state.is_rogue() {
            state.rogue.bricks_broken_this_wave += 1;
        }
        on_brick_destroyed(state, hit_index);
        state.push_event(GameEvent::BrickBroken { max_hp });

        let chance = if state.is_rogue() {
            effective_drop_chance(state, cfg)
        } else {
            cfg.power_up_chance
        };
        maybe_spawn(state, brick_pos, chance);
    } else {
        state.push_event(GameEvent::BrickHit { cracked: true });
    }

    // Reflect along the dominant separation axis
    let r = cfg.ball_radius;
    let ball = &mut state.balls[ball_index];
    let nx = (ball.pos.x - brick_pos.x) / (half.x + r);
    let nz = (ball.pos.z - brick_pos.z) / (half.z + r);
    if nx.abs() > nz.abs() {
        let s = sign(nx);
        ball.vel.x = s * ball.vel.x.abs();
        ball.pos.x = brick_pos.x + s * (half.x + r + CONTACT_EPS);
    } else {
        let s = sign(nz);
        ball.vel.z = s * ball.vel.z.abs();
        ball.pos.z = brick_pos.z + s * (half.z + r + CONTACT_EPS);
    }

    BrickHitOutcome {
        hit: true,
        fireball: false,
        damaged: hp_after < hp_before,
        cracked: !broke,
        broke,
        bricks_killed: u32::from(broke),
        hp_before,
        hp_after,
        max_hp,
        brick_index: Some(hit_index),
    }
}

fn fireball_hit(
    state: &mut GameState,
    cfg: &GameConfig,
    ball_index: usize,
    hit_index: usize,
) -> BrickHitOutcome {
    let center = state.bricks[hit_index].pos;
    let max_hp = state.bricks[hit_index].max_hp;
    let hp_before = state.bricks[hit_index].hp;
    let mut radius = cfg.fireball_explosion_radius;
    if state.is_rogue() {
        radius *= state.rogue.mods.fireball_radius_mult;
    }

    // Every brick in range dies, visited in container order
    let victims: Vec<usize> = state
        .bricks
        .iter()
        .enumerate()
        .filter(|(i, b)| {
            let d = Vec3::new(b.pos.x - center.x, 0.0, b.pos.z - center.z);
            b.alive && (*i == hit_index || d.length() <= radius)
        })
        .map(|(i, _)| i)
        .collect();

    let mut total = 0;
    for &i in &victims {
        let mh = state.bricks[i].max_hp;
        state.bricks[i].kill();
        total += brick_award(state, mh);
        on_brick_destroyed(state, i);
        state.push_event(GameEvent::BrickBroken { max_hp: mh });
    }
    let killed = victims.len() as u32;
    if state.is_rogue() {
        state.rogue.bricks_broken_this_wave += killed as i32;
    }

    // Fireball awards skip the bank
    add_score(state, total);
    push_popup(state, total);

    // Only the directly-hit brick may drop
    let chance = if state.is_rogue() {
        effective_drop_chance(state, cfg)
    } else {
        cfg.power_up_chance
    };
    maybe_spawn(state, center, chance);

    spawn_explosion(state, cfg, center);

    let ball = &mut state.balls[ball_index];
    ball.alive = false;
    ball.is_fireball = false;
    state.pending_respawn_after_fireball = true;
    state.push_event(GameEvent::FireballExplosion {
        bricks_killed: killed,
    });

    BrickHitOutcome {
        hit: true,
        fireball: true,
        damaged: true,
        cracked: false,
        broke: true,
        bricks_killed: killed,
        hp_before,
        hp_after: 0,
        max_hp,
        brick_index: Some(hit_index),
    }
}

/// Explosion flash, camera shake and shards at `center`
pub fn spawn_explosion(state: &mut GameState, cfg: &GameConfig, center: Vec3) {
    state.fx.explosions.push(FireballExplosionFx { pos: center, t: 0.0 });
    state.fx.shake_timer = cfg.fireball_shake_duration;

    for _ in 0..cfg.fireball_shard_count {
        let angle = state.rng.random_range(0.0..TAU);
        let speed = cfg.fireball_shard_speed * state.rng.random_range(0.65..=1.20);
        let up = cfg.fireball_shard_up * state.rng.random_range(0.65..=1.20);
        state.fx.shards.push(FireballShard {
            pos: center + Vec3::Y * 0.3,
            vel: Vec3::new(angle.cos() * speed, up, angle.sin() * speed),
            t: 0.0,
        });
    }
}

/// Bookkeeping shared by every brick kill
fn on_brick_destroyed(state: &mut GameState, index: usize) {
    let brick = &state.bricks[index];
    let snapshot = HeldBrick {
        pos: brick.pos,
        size: brick.size,
        max_hp: brick.max_hp,
    };
    state.last_brick_destroyed_pos = Some(snapshot.pos);

    if state.game_type == GameType::Normal && !state.bricks.iter().any(|b| b.alive) {
        state.finisher.hold_brick = Some(snapshot);
    }
}
