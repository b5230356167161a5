//! Frame submission: world pass, then HUD

use glam::{Vec2, Vec3, Vec4};

use super::camera::Camera;
use super::shapes::{ball_tint, box_model, brick_tint, power_up_model, power_up_tint, sphere_model};
use super::{MeshId, Renderer};
use crate::sim::cards::CardId;
use crate::sim::fx::{flash_alpha, shake_amplitude};
use crate::sim::physics::paddle_half_width;
use crate::sim::state::{BACKGROUND_COUNT, GameState, GameType, Mode};
use crate::tuning::GameConfig;

const WHITE: Vec4 = Vec4::ONE;
const DIM: Vec4 = Vec4::new(0.0, 0.0, 0.0, 0.6);
const DANGER_RED: Vec4 = Vec4::new(0.9, 0.1, 0.1, 0.35);
const GOLD: Vec4 = Vec4::new(1.0, 0.8, 0.2, 1.0);
const HUD_MARGIN: f32 = 16.0;
const HUD_TEXT: f32 = 1.0;
const BANNER_TEXT: f32 = 2.5;
/// Popups drift up this many pixels over their life
const POPUP_RISE: f32 = 60.0;
const SWATCH_SIZE: f32 = 22.0;

/// Pixel rect `(pos, size)` of the HUD background picker button `index`
pub fn background_swatch(index: u8, viewport: Vec2) -> (Vec2, Vec2) {
    let step = SWATCH_SIZE + 6.0;
    let left = viewport.x - HUD_MARGIN - step * BACKGROUND_COUNT as f32 + 6.0;
    let pos = Vec2::new(
        left + index as f32 * step,
        viewport.y - HUD_MARGIN - SWATCH_SIZE,
    );
    (pos, Vec2::splat(SWATCH_SIZE))
}

/// Background picker button under a pixel, if any
pub fn background_at(pixel: Vec2, viewport: Vec2) -> Option<u8> {
    (0..BACKGROUND_COUNT).find(|&i| {
        let (pos, size) = background_swatch(i, viewport);
        pixel.cmpge(pos).all() && pixel.cmplt(pos + size).all()
    })
}

/// Submit one frame for `state`
pub fn draw_scene(
    r: &mut dyn Renderer,
    state: &GameState,
    cfg: &GameConfig,
    viewport: Vec2,
    time: f32,
) {
    let amp = shake_amplitude(state, cfg);
    let shake = Vec3::new((time * 53.0).sin(), 0.0, (time * 41.0).cos()) * amp;
    let camera = Camera::preset(state.ui.camera_preset, viewport).with_shake(shake);

    r.draw_background(state.ui.background_index);
    r.set_view_proj(camera.view_proj());
    draw_world(r, state, cfg, time);

    r.begin_ui(viewport);
    draw_hud(r, state, cfg, &camera, viewport);
    r.end_ui();
}

fn draw_world(r: &mut dyn Renderer, state: &GameState, cfg: &GameConfig, time: f32) {
    if state.mode == Mode::Menu {
        return;
    }

    let half = paddle_half_width(state, cfg);
    let paddle_size = Vec3::new(half * 2.0, cfg.paddle_size.y, cfg.paddle_size.z);
    r.draw_mesh(MeshId::Paddle, box_model(state.paddle, paddle_size), WHITE);

    if state.timers.shield > 0.0 {
        let z = (state.paddle.z + cfg.shield_offset_z).min(cfg.shield_max_z);
        let size = Vec3::new(cfg.arena_width(), 0.1, 0.15);
        r.draw_mesh(
            MeshId::Shield,
            box_model(Vec3::new(0.0, 0.0, z), size),
            Vec4::new(0.3, 0.8, 1.0, 0.5),
        );
    }

    for ball in state.balls.iter().filter(|b| b.alive) {
        r.draw_mesh(
            MeshId::Ball,
            sphere_model(ball.pos, cfg.ball_radius),
            ball_tint(ball.is_fireball),
        );
    }

    for brick in state.bricks.iter().filter(|b| b.alive) {
        r.draw_mesh(
            MeshId::Brick,
            box_model(brick.pos, brick.size),
            brick_tint(brick.hp, brick.max_hp),
        );
    }

    // The last brick stays on screen through the finisher
    if state.finisher.active {
        if let Some(held) = state.finisher.hold_brick {
            let fade = 1.0 - (state.finisher.cine_t / 0.6).clamp(0.0, 1.0);
            let mut tint = brick_tint(held.max_hp, held.max_hp);
            tint.w = fade;
            r.draw_mesh(MeshId::Brick, box_model(held.pos, held.size), tint);
        }
    }

    for p in state.power_ups.iter().filter(|p| p.alive) {
        r.draw_mesh(
            MeshId::PowerUp,
            power_up_model(p.pos, cfg.power_up_visual_scale, time * 2.0),
            power_up_tint(p.kind),
        );
    }

    let explosion_life = cfg.fireball_explosion_fx_duration.max(0.001);
    for e in &state.fx.explosions {
        let k = (e.t / explosion_life).clamp(0.0, 1.0);
        let radius = cfg.fireball_explosion_radius * (0.3 + 0.7 * k);
        r.draw_mesh(
            MeshId::Explosion,
            sphere_model(e.pos, radius),
            Vec4::new(1.0, 0.55, 0.15, 1.0 - k),
        );
    }
    for s in &state.fx.shards {
        let fade = 1.0 - (s.t / cfg.fireball_shard_life.max(0.001)).clamp(0.0, 1.0);
        r.draw_mesh(
            MeshId::Shard,
            sphere_model(s.pos, 0.12),
            Vec4::new(1.0, 0.6, 0.2, fade),
        );
    }
}

/// Draw `text` horizontally centered at `y`
fn centered_text(r: &mut dyn Renderer, text: &str, viewport: Vec2, y: f32, scale: f32, color: Vec4) {
    let size = r.measure_text(text, scale);
    r.draw_ui_text(text, Vec2::new((viewport.x - size.x) * 0.5, y), scale, color);
}

fn draw_hud(
    r: &mut dyn Renderer,
    state: &GameState,
    cfg: &GameConfig,
    camera: &Camera,
    viewport: Vec2,
) {
    if state.mode == Mode::Menu {
        draw_menu(r, state, viewport);
        return;
    }

    let flash = flash_alpha(state, cfg);
    if flash > 0.0 {
        r.draw_ui_rect(Vec2::ZERO, viewport, Vec4::new(1.0, 0.95, 0.8, flash));
    }
    if state.endless.danger_active {
        r.draw_ui_rect(Vec2::ZERO, Vec2::new(viewport.x, 24.0), DANGER_RED);
    }

    for i in 0..BACKGROUND_COUNT {
        let (pos, size) = background_swatch(i, viewport);
        let alpha = if i == state.ui.background_index { 0.9 } else { 0.35 };
        r.draw_ui_rect(pos, size, Vec4::new(1.0, 1.0, 1.0, alpha));
    }

    let line = r.measure_text("0", HUD_TEXT).y;
    let mut y = HUD_MARGIN;
    r.draw_ui_text(&format!("SCORE {}", state.score), Vec2::new(HUD_MARGIN, y), HUD_TEXT, WHITE);
    y += line;
    r.draw_ui_text(&format!("LIVES {}", state.lives), Vec2::new(HUD_MARGIN, y), HUD_TEXT, WHITE);
    y += line;

    match state.game_type {
        GameType::Endless | GameType::Rogue => {
            r.draw_ui_text(&format!("WAVE {}", state.wave), Vec2::new(HUD_MARGIN, y), HUD_TEXT, WHITE);
            y += line;
            let best = if state.is_rogue() {
                state.rogue.best_score
            } else {
                state.endless.best_score
            };
            r.draw_ui_text(&format!("BEST {}", best), Vec2::new(HUD_MARGIN, y), HUD_TEXT, WHITE);
            y += line;
            if !state.streak.is_empty() {
                let label = if state.streak.banking { "BANKING" } else { "STREAK" };
                let text = format!("{} {:+}", label, state.streak.points);
                r.draw_ui_text(&text, Vec2::new(HUD_MARGIN, y), HUD_TEXT, GOLD);
            }
        }
        GameType::Levels => {
            let text = format!("LEVEL {}", state.levels.current_level);
            r.draw_ui_text(&text, Vec2::new(HUD_MARGIN, y), HUD_TEXT, WHITE);
        }
        GameType::Normal => {}
    }

    for (i, popup) in state.fx.popups.iter().enumerate() {
        let k = (popup.t / cfg.score_popup_life.max(0.001)).clamp(0.0, 1.0);
        let color = if popup.points >= 0 {
            Vec4::new(0.4, 1.0, 0.4, 1.0 - k)
        } else {
            Vec4::new(1.0, 0.35, 0.35, 1.0 - k)
        };
        let py = viewport.y * 0.3 - POPUP_RISE * k + i as f32 * line;
        centered_text(r, &format!("{:+}", popup.points), viewport, py, HUD_TEXT, color);
    }

    // Launch hint above a waiting ball
    if state.mode == Mode::Playing {
        if let Some(ball) = state.balls.iter().find(|b| b.attached) {
            if let Some(p) = camera.project(ball.pos) {
                let tip = p - Vec2::new(0.0, 40.0);
                r.draw_ui_triangle(
                    tip,
                    tip + Vec2::new(-10.0, 16.0),
                    tip + Vec2::new(10.0, 16.0),
                    WHITE,
                );
            }
        }
    }

    match state.mode {
        Mode::Paused => banner(r, viewport, "PAUSED", None),
        Mode::GameOver => {
            let sub = format!("SCORE {}", state.score);
            banner(r, viewport, "GAME OVER", Some(&sub));
        }
        Mode::Win => {
            let sub = if state.game_type == GameType::Levels {
                let idx = state.levels.current_level.saturating_sub(1) as usize;
                let stars = state.levels.stars.get(idx).copied().unwrap_or(0);
                format!("{} / 3 STARS", stars)
            } else {
                format!("SCORE {}", state.score)
            };
            banner(r, viewport, "YOU WIN", Some(&sub));
        }
        Mode::RogueCards => draw_card_offer(r, state, viewport),
        Mode::Menu | Mode::Playing => {}
    }
}

fn banner(r: &mut dyn Renderer, viewport: Vec2, title: &str, sub: Option<&str>) {
    r.draw_ui_rect(Vec2::ZERO, viewport, DIM);
    centered_text(r, title, viewport, viewport.y * 0.4, BANNER_TEXT, WHITE);
    if let Some(sub) = sub {
        centered_text(r, sub, viewport, viewport.y * 0.55, HUD_TEXT, WHITE);
    }
}

fn draw_menu(r: &mut dyn Renderer, state: &GameState, viewport: Vec2) {
    centered_text(r, "BRICK BREAKER", viewport, viewport.y * 0.25, BANNER_TEXT, WHITE);
    let options = [
        "NORMAL".to_string(),
        format!("ENDLESS  best {}", state.endless.best_score),
        format!("ROGUE  best {}", state.rogue.best_score),
        format!("LEVELS  {}/{}", state.levels.best_level_reached, state.levels.stars.len()),
    ];
    let line = r.measure_text("0", HUD_TEXT).y * 1.5;
    for (i, text) in options.iter().enumerate() {
        centered_text(r, text, viewport, viewport.y * 0.45 + i as f32 * line, HUD_TEXT, WHITE);
    }
}

fn draw_card_offer(r: &mut dyn Renderer, state: &GameState, viewport: Vec2) {
    r.draw_ui_rect(Vec2::ZERO, viewport, DIM);
    let title = if state.rogue.draft_rounds_left > 0 {
        format!("DRAFT ({} LEFT)", state.rogue.draft_rounds_left)
    } else {
        format!("WAVE {} REWARD", state.wave)
    };
    centered_text(r, &title, viewport, viewport.y * 0.15, BANNER_TEXT * 0.6, WHITE);

    let count = state.rogue.offers.len().max(1) as f32;
    let card_w = (viewport.x - HUD_MARGIN * (count + 1.0)) / count;
    let card_h = viewport.y * 0.45;
    for (i, id) in state.rogue.offers.iter().enumerate() {
        let x = HUD_MARGIN + i as f32 * (card_w + HUD_MARGIN);
        let y = viewport.y * 0.3;
        let border = if id.is_op() { GOLD } else { WHITE };
        r.draw_ui_rect(Vec2::new(x, y), Vec2::new(card_w, card_h), border * Vec4::new(1.0, 1.0, 1.0, 0.25));
        draw_card_text(r, *id, Vec2::new(x + 12.0, y + 12.0), i);
    }
}

fn draw_card_text(r: &mut dyn Renderer, id: CardId, pos: Vec2, index: usize) {
    let def = id.def();
    let line = r.measure_text("0", HUD_TEXT).y;
    r.draw_ui_text(&format!("{}. {}", index + 1, def.name), pos, HUD_TEXT, WHITE);
    r.draw_ui_text(def.short_desc, pos + Vec2::new(0.0, line * 1.5), HUD_TEXT * 0.8, WHITE);
}
