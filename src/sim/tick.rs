//! Per-frame orchestration
//!
//! `tick` picks one update path by `Mode`. The PLAYING path runs a fixed
//! sequence of systems; every step reads the state the previous step left.

use glam::Vec3;

use super::cards::{ball_speed_mult, pick_card};
use super::collision::{collide_bricks, collide_paddle, collide_world};
use super::fx::{finish_win, start_win_finisher, update_fx, update_win_finisher};
use super::init::{any_bricks_alive, init_game, spawn_incremental_bricks};
use super::physics::{reset_ball_to_paddle, update_balls, update_paddle};
use super::powerups::update_power_ups;
use super::rogue::{advance_wave, update_row_injection, wave_complete};
use super::scoring::{apply_life_loss_penalty, settle_run, update_streak_bank};
use super::state::{
    BACKGROUND_COUNT, Ball, GameEvent, GameState, GameType, LEVEL_COUNT, Mode, PowerUp,
    PowerUpKind,
};
use crate::persistence::ScoreStore;
use crate::tick_down;
use crate::tuning::GameConfig;

/// Largest |x/z| ratio a launch may use
pub const MAX_LAUNCH_SLOPE: f32 = 0.8;
/// Incremental rows per Endless wave step
const ENDLESS_ROWS_PER_WAVE: u32 = 4;
/// Rows queued when an Endless board is wiped out
const ENDLESS_CLEAR_REFILL_ROWS: usize = 3;
/// Distance ahead of the paddle a forced power-up appears
const DEBUG_DROP_AHEAD: f32 = 6.0;

/// Menu and end-screen commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Start(GameType),
    /// Start Levels at a given 1-based level if it is unlocked
    SelectLevel(u32),
    Restart,
    NextLevel,
    ReturnToMenu,
}

/// Debug hotkey commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugCommand {
    ForcePowerUp(PowerUpKind),
    FillRogueDeck,
    UnlockLevels,
    ForceSpawn,
}

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// -1 left, +1 right
    pub paddle_dir: f32,
    pub launch: bool,
    /// Launch direction on the ball plane; straight ahead when absent
    pub launch_dir: Option<Vec3>,
    pub pause: bool,
    /// Switch to camera preset 0 or 1
    pub camera_preset: Option<u8>,
    /// Select HUD background 0..BACKGROUND_COUNT
    pub background: Option<u8>,
    pub menu: Option<MenuAction>,
    /// Index into the current card offer
    pub card_pick: Option<usize>,
    pub debug: Option<DebugCommand>,
}

/// Advance the game by one frame
pub fn tick(
    state: &mut GameState,
    cfg: &GameConfig,
    input: &TickInput,
    store: &mut dyn ScoreStore,
    dt: f32,
) {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, cfg.max_frame_dt)
    } else {
        0.0
    };

    apply_ui_input(state, input);
    if let Some(cmd) = input.debug {
        apply_debug(state, cfg, cmd);
    }

    match state.mode {
        Mode::Menu => update_menu(state, cfg, input, store),
        Mode::Playing => update_playing(state, cfg, input, store, dt),
        Mode::Paused => update_paused(state, input, store),
        Mode::RogueCards => update_rogue_cards(state, cfg, input, store),
        Mode::GameOver | Mode::Win => update_end_screen(state, cfg, input, store),
    }
}

fn apply_ui_input(state: &mut GameState, input: &TickInput) {
    if let Some(preset) = input.camera_preset {
        state.ui.camera_preset = preset.min(1);
    }
    if let Some(bg) = input.background {
        if bg < BACKGROUND_COUNT {
            state.ui.background_index = bg;
        }
    }
}

fn apply_debug(state: &mut GameState, cfg: &GameConfig, cmd: DebugCommand) {
    log::debug!("Debug command {:?}", cmd);
    match cmd {
        DebugCommand::ForcePowerUp(kind) => {
            if state.mode == Mode::Playing {
                let pos = Vec3::new(state.paddle.x, 0.0, state.paddle.z - DEBUG_DROP_AHEAD);
                state.power_ups.push(PowerUp {
                    kind,
                    pos,
                    alive: true,
                });
                state.push_event(GameEvent::PowerUpSpawned(kind));
            }
        }
        DebugCommand::FillRogueDeck => {
            if state.is_rogue() {
                state.rogue.drop_deck.extend(PowerUpKind::ALL);
            }
        }
        DebugCommand::UnlockLevels => {
            state.levels.best_level_reached = LEVEL_COUNT as u32;
        }
        DebugCommand::ForceSpawn => {
            if state.game_type == GameType::Endless && state.mode == Mode::Playing {
                state.endless.pending_spawn += cfg.endless_batch;
            }
        }
    }
}

fn start_run(
    state: &mut GameState,
    cfg: &GameConfig,
    store: &mut dyn ScoreStore,
    game_type: GameType,
) {
    state.game_type = game_type;
    init_game(state, cfg, store);
}

fn update_menu(
    state: &mut GameState,
    cfg: &GameConfig,
    input: &TickInput,
    store: &mut dyn ScoreStore,
) {
    match input.menu {
        Some(MenuAction::Start(game_type)) => start_run(state, cfg, store, game_type),
        Some(MenuAction::SelectLevel(level)) => {
            if level >= 1 && level <= state.levels.best_level_reached {
                state.levels.current_level = level;
                start_run(state, cfg, store, GameType::Levels);
            }
        }
        _ => {}
    }
}

fn update_paused(state: &mut GameState, input: &TickInput, store: &mut dyn ScoreStore) {
    if input.pause {
        state.mode = Mode::Playing;
        state.push_event(GameEvent::Paused(false));
    } else if input.menu == Some(MenuAction::ReturnToMenu) {
        return_to_menu(state, store);
    }
}

fn update_rogue_cards(
    state: &mut GameState,
    cfg: &GameConfig,
    input: &TickInput,
    store: &mut dyn ScoreStore,
) {
    if input.menu == Some(MenuAction::ReturnToMenu) {
        return_to_menu(state, store);
        return;
    }
    if let Some(index) = input.card_pick {
        pick_card(state, cfg, index);
    }
}

fn update_end_screen(
    state: &mut GameState,
    cfg: &GameConfig,
    input: &TickInput,
    store: &mut dyn ScoreStore,
) {
    match input.menu {
        Some(MenuAction::Restart) => {
            let game_type = state.game_type;
            start_run(state, cfg, store, game_type);
        }
        Some(MenuAction::NextLevel)
            if state.mode == Mode::Win && state.game_type == GameType::Levels =>
        {
            let next = (state.levels.current_level + 1).min(LEVEL_COUNT as u32);
            state.levels.current_level = next;
            start_run(state, cfg, store, GameType::Levels);
        }
        Some(MenuAction::ReturnToMenu) => return_to_menu(state, store),
        _ => {}
    }
}

/// Leave the run; any banked streak still counts
fn return_to_menu(state: &mut GameState, store: &mut dyn ScoreStore) {
    if state.game_type.uses_bank() {
        settle_run(state, store);
    }
    state.mode = Mode::Menu;
    state.finisher.active = false;
    state.balls.clear();
    state.power_ups.clear();
}

fn update_playing(
    state: &mut GameState,
    cfg: &GameConfig,
    input: &TickInput,
    store: &mut dyn ScoreStore,
    dt: f32,
) {
    // A pause frame leaves the clock where it was
    if input.pause && !state.finisher.active {
        state.mode = Mode::Paused;
        state.push_event(GameEvent::Paused(true));
        return;
    }

    // 1. Timers and effects
    update_timers(state, cfg, dt);

    // 2. Finisher owns the frame while it runs
    if state.finisher.active {
        update_win_finisher(state, dt);
        return;
    }

    // 3. Gameplay input
    let mut dir = input.paddle_dir.clamp(-1.0, 1.0);
    if state.timers.reverse > 0.0 {
        dir = -dir;
    }
    if input.launch {
        launch_balls(state, cfg, input.launch_dir);
    }

    // 4. Physics
    update_paddle(state, cfg, dir, dt);
    update_balls(state, cfg, dt);

    // 5. Collisions: world, paddle, bricks per ball
    for i in 0..state.balls.len() {
        if collide_world(state, cfg, i) {
            state.push_event(GameEvent::WallHit);
        }
        collide_paddle(state, cfg, i);
        collide_bricks(state, cfg, i);
    }

    // 6. Dead balls out; a spent fireball comes back for free
    state.balls.retain(|b| b.alive);
    if state.balls.is_empty() && state.pending_respawn_after_fireball {
        state.pending_respawn_after_fireball = false;
        spawn_attached_ball(state, cfg);
    }

    // 7. Streak bank
    if state.game_type.uses_bank() {
        update_streak_bank(state, cfg, store, dt);
    }

    // 8. Rogue waves
    if state.is_rogue() {
        update_rogue_waves(state, cfg, store, dt);
        if state.mode != Mode::Playing {
            return;
        }
    }

    // 9. Endless pressure
    if state.game_type == GameType::Endless {
        update_endless_pressure(state, cfg);
    }

    // 10. Danger zone and death line
    if state.game_type.uses_bank() {
        update_danger(state, cfg, store, dt);
        if state.mode != Mode::Playing {
            return;
        }
    }

    // 11. Power-ups
    update_power_ups(state, cfg, dt);

    // 12. Life loss
    if state.balls.is_empty() {
        handle_ball_loss(state, cfg, store);
        if state.mode != Mode::Playing {
            return;
        }
    }

    // 13. Cleared board outside Endless/Rogue
    if matches!(state.game_type, GameType::Normal | GameType::Levels) && !any_bricks_alive(state) {
        start_win_finisher(state);
    }
}

/// Step 1: count down every timer and age the effect queues
pub fn update_timers(state: &mut GameState, cfg: &GameConfig, dt: f32) {
    for ball in state.balls.iter_mut() {
        tick_down(&mut ball.brick_cooldown, dt);
    }

    match state.game_type {
        GameType::Endless => {
            let e = &mut state.endless;
            e.elapsed += dt;
            tick_down(&mut e.spawn_cooldown, dt);
            // The auto-spawn clock starts after the grace window
            if e.elapsed > cfg.endless_grace_seconds {
                e.auto_timer += dt;
            }
        }
        GameType::Rogue => {
            tick_down(&mut state.rogue.wave_cooldown, dt);
            state.rogue.wave_timer += dt;
        }
        _ => {}
    }

    let t = &mut state.timers;
    tick_down(&mut t.expand, dt);
    tick_down(&mut t.slow, dt);
    tick_down(&mut t.shield, dt);
    tick_down(&mut t.reverse, dt);
    tick_down(&mut t.tiny, dt);

    update_fx(state, cfg, dt);
}

/// Clamp an aim vector toward the bricks with |x/z| <= 0.8
pub fn clamp_launch_dir(aim: Vec3) -> Vec3 {
    let z = -aim.z.abs().max(crate::SPEED_EPSILON);
    let slope = (aim.x / -z).clamp(-MAX_LAUNCH_SLOPE, MAX_LAUNCH_SLOPE);
    Vec3::new(slope, 0.0, -1.0).normalize()
}

/// Release every attached ball
pub fn launch_balls(state: &mut GameState, cfg: &GameConfig, aim: Option<Vec3>) {
    // New rows are still sliding in
    if state.is_rogue() && state.rogue.pending_rows > 0 {
        return;
    }
    let mut speed = cfg.ball_speed;
    if state.is_rogue() {
        speed *= ball_speed_mult(state);
    }
    let dir = aim.map(clamp_launch_dir).unwrap_or(Vec3::NEG_Z);

    let mut launched = false;
    for ball in state.balls.iter_mut().filter(|b| b.alive && b.attached) {
        ball.attached = false;
        ball.vel = dir * speed;
        launched = true;
    }
    if launched {
        state.push_event(GameEvent::Launch);
    }
}

fn spawn_attached_ball(state: &mut GameState, cfg: &GameConfig) {
    let mut ball = Ball::new(state.paddle, Vec3::ZERO);
    reset_ball_to_paddle(&mut ball, state.paddle, cfg);
    state.balls.push(ball);
}

/// Step 8: meter new rows, then check whether the wave is over
pub fn update_rogue_waves(
    state: &mut GameState,
    cfg: &GameConfig,
    store: &mut dyn ScoreStore,
    dt: f32,
) {
    update_row_injection(state, cfg, dt);
    if state.rogue.wave_cooldown > 0.0 {
        return;
    }
    if wave_complete(state) {
        advance_wave(state, cfg, store);
    }
}

/// Seconds between Endless auto-spawns at this point of the run
pub fn endless_spawn_interval(cfg: &GameConfig, elapsed: f32) -> f32 {
    let ramp = if cfg.endless_ramp_seconds > 0.0 {
        ((elapsed - cfg.endless_grace_seconds) / cfg.endless_ramp_seconds).clamp(0.0, 1.0)
    } else {
        1.0
    };
    cfg.endless_interval_start + (cfg.endless_interval_end - cfg.endless_interval_start) * ramp
}

/// Step 9: queue and apply Endless brick spawns
pub fn update_endless_pressure(state: &mut GameState, cfg: &GameConfig) {
    let interval = endless_spawn_interval(cfg, state.endless.elapsed);
    if state.endless.auto_timer >= interval {
        state.endless.auto_timer = 0.0;
        state.endless.pending_spawn += cfg.endless_batch;
    }
    if state.endless.pending_spawn == 0 && !any_bricks_alive(state) {
        state.endless.pending_spawn += ENDLESS_CLEAR_REFILL_ROWS * cfg.brick_cols;
    }

    if state.endless.pending_spawn == 0 || state.endless.spawn_cooldown > 0.0 {
        return;
    }
    let count = state.endless.pending_spawn.min(cfg.brick_cols.max(1));
    state.endless.pending_spawn -= count;
    state.endless.spawn_cooldown = cfg.endless_spawn_cooldown;
    let wave = state.wave;
    spawn_incremental_bricks(state, cfg, count, wave);

    let new_wave = 1 + (state.endless.rows_spawned / ENDLESS_ROWS_PER_WAVE) as i32;
    if new_wave > state.wave {
        state.wave = new_wave;
        state.push_event(GameEvent::WaveAdvanced { wave: new_wave });
        log::info!("Endless wave {}", new_wave);
    }
}

/// Step 10: danger warning and the death line
pub fn update_danger(state: &mut GameState, cfg: &GameConfig, store: &mut dyn ScoreStore, dt: f32) {
    let max_z = state
        .bricks
        .iter()
        .filter(|b| b.alive)
        .map(|b| b.near_z())
        .fold(f32::NEG_INFINITY, f32::max);
    let danger = max_z >= cfg.danger_line_z(state.paddle.z);

    let e = &mut state.endless;
    e.danger_max_z = max_z.max(cfg.arena_min_z);
    if danger {
        e.danger_timer += dt;
        if !e.danger_active {
            e.danger_active = true;
            state.push_event(GameEvent::DangerStarted);
        }
    } else {
        e.danger_active = false;
        e.danger_timer = 0.0;
    }

    if max_z >= cfg.death_line_z(state.paddle.z) {
        log::info!("Bricks reached the paddle");
        game_over(state, store);
    }
}

fn game_over(state: &mut GameState, store: &mut dyn ScoreStore) {
    settle_run(state, store);
    state.mode = Mode::GameOver;
    state.push_event(GameEvent::GameOver);
    log::info!("Game over ({}) with {}", state.game_type.name(), state.score);
}

/// Step 12: the last ball is gone
pub fn handle_ball_loss(state: &mut GameState, cfg: &GameConfig, store: &mut dyn ScoreStore) {
    if state.finisher.active {
        return;
    }
    state.lives -= 1;
    state.push_event(GameEvent::LifeLost);
    apply_life_loss_penalty(state, cfg);

    if state.lives > 0 {
        spawn_attached_ball(state, cfg);
        return;
    }

    if any_bricks_alive(state) {
        game_over(state, store);
    } else {
        settle_run(state, store);
        finish_win(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{ENDLESS_BEST_KEY, MemoryScoreStore, ROGUE_BEST_KEY};
    use crate::sim::powerups::apply_effect;
    use crate::sim::rogue::{
        WAVE_ADVANCE_COOLDOWN, min_time_before_advance, required_bricks, time_limit,
    };
    use crate::sim::state::Brick;

    fn playing(game_type: GameType) -> (GameState, GameConfig, MemoryScoreStore) {
        let cfg = GameConfig::default();
        let mut state = GameState::new(&cfg);
        let mut store = MemoryScoreStore::new();
        state.game_type = game_type;
        init_game(&mut state, &cfg, &mut store);
        (state, cfg, store)
    }

    #[test]
    fn test_menu_start_and_launch() {
        let cfg = GameConfig::default();
        let mut state = GameState::new(&cfg);
        let mut store = MemoryScoreStore::new();
        assert_eq!(state.mode, Mode::Menu);

        let start = TickInput {
            menu: Some(MenuAction::Start(GameType::Normal)),
            ..Default::default()
        };
        tick(&mut state, &cfg, &start, &mut store, 0.016);
        assert_eq!(state.mode, Mode::Playing);
        assert!(state.balls[0].attached);

        let launch = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &cfg, &launch, &mut store, 0.016);
        assert!(!state.balls[0].attached);
        assert!(state.balls[0].vel.z < 0.0);
        assert!((state.balls[0].vel.length() - cfg.ball_speed).abs() < 1e-3);
    }

    #[test]
    fn test_pause_round_trip() {
        let (mut state, cfg, mut store) = playing(GameType::Normal);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        state.timers.expand = 1.0;
        state.fx.shake_timer = 0.3;
        tick(&mut state, &cfg, &pause, &mut store, 0.016);
        assert_eq!(state.mode, Mode::Paused);
        assert_eq!(state.timers.expand, 1.0);
        assert_eq!(state.fx.shake_timer, 0.3);
        let paddle = state.paddle;
        let move_right = TickInput {
            paddle_dir: 1.0,
            ..Default::default()
        };
        tick(&mut state, &cfg, &move_right, &mut store, 0.016);
        assert_eq!(state.paddle, paddle);
        tick(&mut state, &cfg, &pause, &mut store, 0.016);
        assert_eq!(state.mode, Mode::Playing);
    }

    #[test]
    fn test_reverse_flips_paddle() {
        let (mut state, cfg, mut store) = playing(GameType::Normal);
        state.timers.reverse = 2.0;
        let right = TickInput {
            paddle_dir: 1.0,
            ..Default::default()
        };
        tick(&mut state, &cfg, &right, &mut store, 0.02);
        assert!(state.paddle.x < 0.0);
    }

    #[test]
    fn test_launch_clamp() {
        let d = clamp_launch_dir(Vec3::new(5.0, 0.0, 1.0));
        assert!(d.z < 0.0);
        assert!((d.x / -d.z - MAX_LAUNCH_SLOPE).abs() < 1e-4);
        let straight = clamp_launch_dir(Vec3::new(0.0, 3.0, -2.0));
        assert!((straight - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_rogue_launch_waits_for_rows() {
        let (mut state, cfg, _) = playing(GameType::Rogue);
        state.mode = Mode::Playing;
        state.rogue.pending_rows = 1;
        launch_balls(&mut state, &cfg, None);
        assert!(state.balls[0].attached);
        state.rogue.pending_rows = 0;
        launch_balls(&mut state, &cfg, None);
        assert!(!state.balls[0].attached);
    }

    #[test]
    fn test_dt_is_clamped() {
        let (mut state, cfg, mut store) = playing(GameType::Endless);
        tick(&mut state, &cfg, &TickInput::default(), &mut store, 3.0);
        assert!((state.endless.elapsed - cfg.max_frame_dt).abs() < 1e-6);
        tick(&mut state, &cfg, &TickInput::default(), &mut store, -1.0);
        assert!((state.endless.elapsed - cfg.max_frame_dt).abs() < 1e-6);
    }

    #[test]
    fn test_endless_interval_ramp() {
        let cfg = GameConfig::default();
        assert_eq!(endless_spawn_interval(&cfg, 0.0), 26.0);
        assert_eq!(endless_spawn_interval(&cfg, 60.0), 26.0);
        assert!((endless_spawn_interval(&cfg, 330.0) - 19.0).abs() < 1e-4);
        assert_eq!(endless_spawn_interval(&cfg, 10_000.0), 12.0);
    }

    #[test]
    fn test_endless_auto_spawn_after_grace() {
        let (mut state, cfg, _) = playing(GameType::Endless);
        state.endless.elapsed = 90.0;
        state.endless.auto_timer = 26.0;
        let before = state.bricks.len();
        update_endless_pressure(&mut state, &cfg);
        assert_eq!(state.endless.rows_spawned, 1);
        assert_eq!(state.bricks.len(), before + cfg.brick_cols);
        assert_eq!(state.endless.pending_spawn, 0);
    }

    #[test]
    fn test_endless_cleared_board_refills() {
        let (mut state, cfg, _) = playing(GameType::Endless);
        state.bricks.clear();
        update_endless_pressure(&mut state, &cfg);
        assert_eq!(state.alive_brick_count(), cfg.brick_cols);
        assert_eq!(state.endless.pending_spawn, 2 * cfg.brick_cols);
    }

    #[test]
    fn test_death_line_ends_endless() {
        let (mut state, cfg, mut store) = playing(GameType::Endless);
        state.streak.points = 75;
        state.streak.pos = 75;
        let z = cfg.death_line_z(state.paddle.z);
        state
            .bricks
            .push(Brick::new(Vec3::new(10.0, 0.0, z), cfg.brick_size, 1));
        update_danger(&mut state, &cfg, &mut store, 0.016);
        assert!(state.endless.danger_active);
        assert_eq!(state.mode, Mode::GameOver);
        assert_eq!(state.score, 75);
        assert!(state.streak.is_empty());
    }

    #[test]
    fn test_fireball_score_saved_at_game_over() {
        let (mut state, cfg, mut store) = playing(GameType::Endless);
        apply_effect(&mut state, &cfg, PowerUpKind::Fireball);
        let target = state.bricks[0].pos;
        let ball = &mut state.balls[0];
        ball.attached = false;
        ball.pos = target;
        ball.vel = Vec3::new(0.0, 0.0, -cfg.ball_speed);
        collide_bricks(&mut state, &cfg, 0);
        let scored = state.score;
        assert!(scored > 0);
        assert!(state.streak.is_empty());

        let z = cfg.death_line_z(state.paddle.z);
        state
            .bricks
            .push(Brick::new(Vec3::new(10.0, 0.0, z), cfg.brick_size, 1));
        update_danger(&mut state, &cfg, &mut store, 0.016);
        assert_eq!(state.mode, Mode::GameOver);
        assert_eq!(state.endless.best_score, scored);
        assert_eq!(store.get(ENDLESS_BEST_KEY), Some(scored));
    }

    #[test]
    fn test_menu_exit_saves_direct_score() {
        let (mut state, cfg, mut store) = playing(GameType::Rogue);
        state.mode = Mode::Paused;
        state.score = 400;
        let leave = TickInput {
            menu: Some(MenuAction::ReturnToMenu),
            ..Default::default()
        };
        tick(&mut state, &cfg, &leave, &mut store, 0.016);
        assert_eq!(state.mode, Mode::Menu);
        assert_eq!(store.get(ROGUE_BEST_KEY), Some(400));
    }

    #[test]
    fn test_danger_zone_warns_without_ending() {
        let (mut state, cfg, mut store) = playing(GameType::Endless);
        let danger = cfg.danger_line_z(state.paddle.z);
        let death = cfg.death_line_z(state.paddle.z);
        let z = (danger + death) / 2.0 - cfg.brick_size.z / 2.0;
        state
            .bricks
            .push(Brick::new(Vec3::new(0.0, 0.0, z), cfg.brick_size, 2));

        update_danger(&mut state, &cfg, &mut store, 0.1);
        update_danger(&mut state, &cfg, &mut store, 0.1);
        assert!(state.endless.danger_active);
        assert!((state.endless.danger_timer - 0.2).abs() < 1e-5);
        assert_eq!(state.mode, Mode::Playing);
        let started = state
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::DangerStarted)
            .count();
        assert_eq!(started, 1);

        state.bricks.pop();
        update_danger(&mut state, &cfg, &mut store, 0.1);
        assert!(!state.endless.danger_active);
        assert_eq!(state.endless.danger_timer, 0.0);
    }

    fn rogue_in_play() -> (GameState, GameConfig, MemoryScoreStore) {
        let (mut state, cfg, store) = playing(GameType::Rogue);
        state.rogue.offers.clear();
        state.rogue.draft_rounds_left = 0;
        state.mode = Mode::Playing;
        state.wave = 1;
        (state, cfg, store)
    }

    #[test]
    fn test_rogue_wave_ends_on_time_limit() {
        let (mut state, cfg, mut store) = rogue_in_play();
        state.rogue.bricks_broken_this_wave = 3;
        state.rogue.wave_timer = time_limit(1) - 0.01;
        update_rogue_waves(&mut state, &cfg, &mut store, 0.0);
        assert_eq!(state.wave, 1);

        state.rogue.wave_timer = time_limit(1);
        update_rogue_waves(&mut state, &cfg, &mut store, 0.0);
        assert_eq!(state.wave, 2);
        assert_eq!(state.rogue.wave_timer, 0.0);
        assert_eq!(state.rogue.wave_cooldown, WAVE_ADVANCE_COOLDOWN);
    }

    #[test]
    fn test_rogue_quota_waits_for_min_time() {
        let (mut state, cfg, mut store) = rogue_in_play();
        state.rogue.bricks_broken_this_wave = required_bricks(1);
        state.rogue.wave_timer = min_time_before_advance(1) - 0.1;
        update_rogue_waves(&mut state, &cfg, &mut store, 0.0);
        assert_eq!(state.wave, 1);

        state.rogue.wave_timer = min_time_before_advance(1);
        update_rogue_waves(&mut state, &cfg, &mut store, 0.0);
        assert_eq!(state.wave, 2);
    }

    #[test]
    fn test_rogue_advance_waits_for_cooldown() {
        let (mut state, cfg, mut store) = rogue_in_play();
        state.rogue.wave_timer = time_limit(1);
        update_rogue_waves(&mut state, &cfg, &mut store, 0.0);
        assert_eq!(state.wave, 2);

        // Wave 2 already looks complete, but the cooldown holds it
        state.rogue.bricks_broken_this_wave = required_bricks(2);
        state.rogue.wave_timer = time_limit(2);
        update_rogue_waves(&mut state, &cfg, &mut store, 0.0);
        assert_eq!(state.wave, 2);

        state.rogue.wave_cooldown = 0.0;
        update_rogue_waves(&mut state, &cfg, &mut store, 0.0);
        assert_eq!(state.wave, 3);
    }

    #[test]
    fn test_last_life_with_bricks_is_game_over() {
        let (mut state, cfg, mut store) = playing(GameType::Normal);
        state.lives = 1;
        state.balls.clear();
        handle_ball_loss(&mut state, &cfg, &mut store);
        assert_eq!(state.lives, 0);
        assert_eq!(state.mode, Mode::GameOver);
    }

    #[test]
    fn test_normal_life_loss_hits_score() {
        let (mut state, cfg, mut store) = playing(GameType::Normal);
        state.score = 500;
        state.balls.clear();
        handle_ball_loss(&mut state, &cfg, &mut store);
        assert_eq!(state.score, 300);
        assert_eq!(state.balls.len(), 1);
        assert!(state.balls[0].attached);
    }

    #[test]
    fn test_camera_and_background_flags() {
        let (mut state, cfg, mut store) = playing(GameType::Normal);
        let input = TickInput {
            camera_preset: Some(1),
            background: Some(3),
            ..Default::default()
        };
        tick(&mut state, &cfg, &input, &mut store, 0.016);
        assert_eq!(state.ui.camera_preset, 1);
        assert_eq!(state.ui.background_index, 3);
        let bad = TickInput {
            background: Some(BACKGROUND_COUNT),
            ..Default::default()
        };
        tick(&mut state, &cfg, &bad, &mut store, 0.016);
        assert_eq!(state.ui.background_index, 3);
    }

    #[test]
    fn test_level_select_respects_unlocks() {
        let cfg = GameConfig::default();
        let mut state = GameState::new(&cfg);
        let mut store = MemoryScoreStore::new();
        let pick = TickInput {
            menu: Some(MenuAction::SelectLevel(5)),
            ..Default::default()
        };
        tick(&mut state, &cfg, &pick, &mut store, 0.016);
        assert_eq!(state.mode, Mode::Menu);

        let unlock = TickInput {
            debug: Some(DebugCommand::UnlockLevels),
            ..Default::default()
        };
        tick(&mut state, &cfg, &unlock, &mut store, 0.016);
        tick(&mut state, &cfg, &pick, &mut store, 0.016);
        assert_eq!(state.mode, Mode::Playing);
        assert_eq!(state.game_type, GameType::Levels);
        assert_eq!(state.levels.current_level, 5);
    }

    #[test]
    fn test_determinism() {
        let cfg = GameConfig::default();
        let mut a = GameState::new(&cfg);
        let mut b = GameState::new(&cfg);
        let mut store_a = MemoryScoreStore::new();
        let mut store_b = MemoryScoreStore::new();

        let inputs = [
            TickInput {
                menu: Some(MenuAction::Start(GameType::Endless)),
                ..Default::default()
            },
            TickInput {
                launch: true,
                launch_dir: Some(Vec3::new(0.3, 0.0, -1.0)),
                ..Default::default()
            },
            TickInput {
                paddle_dir: 1.0,
                ..Default::default()
            },
        ];
        for input in &inputs {
            for _ in 0..120 {
                tick(&mut a, &cfg, input, &mut store_a, 1.0 / 60.0);
                tick(&mut b, &cfg, input, &mut store_b, 1.0 / 60.0);
            }
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.streak, b.streak);
        assert_eq!(a.balls, b.balls);
        assert_eq!(a.bricks, b.bricks);
    }
}
