//! Game state and core simulation types
//!
//! `GameState` is the single mutable record every system receives by
//! reference. Entity sequences are plain `Vec`s iterated in insertion order
//! and compacted with `retain`; cross-entity references are value snapshots.

use std::collections::BTreeSet;

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::cards::CardId;
use crate::tuning::GameConfig;

/// Top-level screen/flow mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Menu,
    Playing,
    Paused,
    /// Rogue card draft overlay
    RogueCards,
    GameOver,
    Win,
}

/// Which ruleset the run follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameType {
    #[default]
    Normal,
    Endless,
    Rogue,
    Levels,
}

impl GameType {
    /// Endless and Rogue defer brick points into the streak bank
    pub fn uses_bank(self) -> bool {
        matches!(self, GameType::Endless | GameType::Rogue)
    }

    pub fn name(self) -> &'static str {
        match self {
            GameType::Normal => "Normal",
            GameType::Endless => "Endless",
            GameType::Rogue => "Rogue",
            GameType::Levels => "Levels",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(GameType::Normal),
            "endless" => Some(GameType::Endless),
            "rogue" => Some(GameType::Rogue),
            "levels" | "level" => Some(GameType::Levels),
            _ => None,
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Glued to the paddle, waiting for launch
    pub attached: bool,
    pub alive: bool,
    /// One-shot area-of-effect projectile
    pub is_fireball: bool,
    /// Seconds until this ball may hit another brick
    pub brick_cooldown: f32,
}

impl Ball {
    pub fn new(pos: Vec3, vel: Vec3) -> Self {
        Self {
            pos,
            vel,
            attached: false,
            alive: true,
            is_fireball: false,
            brick_cooldown: 0.0,
        }
    }
}

/// Highest brick HP any generator produces
pub const MAX_BRICK_HP: i32 = 6;

/// A destructible brick
#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    pub pos: Vec3,
    pub size: Vec3,
    pub alive: bool,
    pub hp: i32,
    pub max_hp: i32,
}

impl Brick {
    pub fn new(pos: Vec3, size: Vec3, hp: i32) -> Self {
        let hp = hp.clamp(1, MAX_BRICK_HP);
        Self {
            pos,
            size,
            alive: true,
            hp,
            max_hp: hp,
        }
    }

    /// Apply damage; returns hp before and after
    pub fn damage(&mut self, amount: i32) -> (i32, i32) {
        let before = self.hp;
        self.hp = (self.hp - amount.max(0)).max(0);
        self.alive = self.hp > 0;
        (before, self.hp)
    }

    pub fn kill(&mut self) {
        self.hp = 0;
        self.alive = false;
    }

    /// Far edge z (toward the paddle)
    pub fn near_z(&self) -> f32 {
        self.pos.z + self.size.z / 2.0
    }
}

/// Power-up types
///
/// Each variant owns its spawn weight, pickup score and timer data so the
/// weighted table and effects stay in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PowerUpKind {
    Expand,
    ExtraBall,
    Slow,
    ExtraLife,
    Fireball,
    Shield,
    Reverse,
    Tiny,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 8] = [
        PowerUpKind::ExtraBall,
        PowerUpKind::Expand,
        PowerUpKind::Slow,
        PowerUpKind::ExtraLife,
        PowerUpKind::Fireball,
        PowerUpKind::Shield,
        PowerUpKind::Reverse,
        PowerUpKind::Tiny,
    ];

    /// Weight in the non-Rogue drop table (all weights sum to 100)
    pub fn spawn_weight(self) -> u32 {
        match self {
            PowerUpKind::ExtraBall => 22,
            PowerUpKind::Expand => 14,
            PowerUpKind::Slow => 12,
            PowerUpKind::ExtraLife => 10,
            PowerUpKind::Fireball => 14,
            PowerUpKind::Shield => 14,
            PowerUpKind::Reverse => 7,
            PowerUpKind::Tiny => 7,
        }
    }

    /// Score awarded (or taken) on pickup
    pub fn pickup_points(self) -> i64 {
        match self {
            PowerUpKind::ExtraLife => 400,
            PowerUpKind::Fireball => 350,
            PowerUpKind::ExtraBall => 300,
            PowerUpKind::Expand => 250,
            PowerUpKind::Shield => 220,
            PowerUpKind::Slow => -220,
            PowerUpKind::Tiny => -240,
            PowerUpKind::Reverse => -250,
        }
    }

    /// Curses hurt the player
    pub fn is_curse(self) -> bool {
        matches!(
            self,
            PowerUpKind::Slow | PowerUpKind::Reverse | PowerUpKind::Tiny
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            PowerUpKind::Expand => "Expand",
            PowerUpKind::ExtraBall => "Extra Ball",
            PowerUpKind::Slow => "Slow",
            PowerUpKind::ExtraLife => "Extra Life",
            PowerUpKind::Fireball => "Fireball",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::Reverse => "Reverse",
            PowerUpKind::Tiny => "Tiny",
        }
    }
}

/// A falling power-up capsule
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub pos: Vec3,
    pub alive: bool,
}

/// Remaining seconds of each timed power-up
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerUpTimers {
    pub expand: f32,
    pub slow: f32,
    pub shield: f32,
    pub reverse: f32,
    pub tiny: f32,
}

/// Fireball explosion flash/ring
#[derive(Debug, Clone, PartialEq)]
pub struct FireballExplosionFx {
    pub pos: Vec3,
    pub t: f32,
}

/// Debris thrown by a fireball explosion
#[derive(Debug, Clone, PartialEq)]
pub struct FireballShard {
    pub pos: Vec3,
    pub vel: Vec3,
    pub t: f32,
}

/// Floating "+N" / "-N" text
#[derive(Debug, Clone, PartialEq)]
pub struct ScorePopup {
    pub points: i64,
    pub t: f32,
}

/// Visual effect queues, one container per effect type
#[derive(Debug, Clone, Default)]
pub struct FxQueues {
    pub explosions: Vec<FireballExplosionFx>,
    pub shards: Vec<FireballShard>,
    pub popups: Vec<ScorePopup>,
    /// Camera shake seconds remaining
    pub shake_timer: f32,
}

/// Deferred Endless/Rogue scoring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreakBank {
    /// Signed points waiting to be committed
    pub points: i64,
    /// Sum of positive contributions
    pub pos: i64,
    /// Sum of penalties (stored positive)
    pub neg: i64,
    /// Seconds since the last contribution
    pub idle: f32,
    /// Commit animation running
    pub banking: bool,
    pub bank_timer: f32,
}

impl StreakBank {
    pub fn is_empty(&self) -> bool {
        self.points == 0 && self.pos == 0 && self.neg == 0
    }
}

/// Endless-mode counters
#[derive(Debug, Clone, Default)]
pub struct EndlessState {
    /// Seconds spent playing this run
    pub elapsed: f32,
    pub auto_timer: f32,
    pub spawn_cooldown: f32,
    /// Bricks queued for the next incremental spawn
    pub pending_spawn: usize,
    pub rows_spawned: u32,
    pub danger_active: bool,
    pub danger_timer: f32,
    pub danger_max_z: f32,
    pub best_score: i64,
}

/// Rogue run modifiers, mutated only by card effects
#[derive(Debug, Clone, PartialEq)]
pub struct RogueModifiers {
    pub drop_chance_mult: f32,
    pub base_paddle_scale_x: f32,
    pub paddle_speed_mult: f32,
    pub ball_speed_mult: f32,
    pub brick_points_mult: f32,
    pub bank_idle_mult: f32,
    pub brick_damage_bonus: i32,
    pub fireball_radius_mult: f32,
    pub shield_duration_mult: f32,
    pub life_loss_penalty_bonus: i64,
    pub rows_per_wave_delta: i32,
    /// Constant lateral wind acceleration
    pub wind_x: f32,
    pub random_wind: bool,
    /// Extra inset on both paddle clamp edges
    pub paddle_clamp_margin: f32,
    pub sticky_paddle: bool,
}

impl Default for RogueModifiers {
    fn default() -> Self {
        Self {
            drop_chance_mult: 1.0,
            base_paddle_scale_x: 1.0,
            paddle_speed_mult: 1.0,
            ball_speed_mult: 1.0,
            brick_points_mult: 1.0,
            bank_idle_mult: 1.0,
            brick_damage_bonus: 0,
            fireball_radius_mult: 1.0,
            shield_duration_mult: 1.0,
            life_loss_penalty_bonus: 0,
            rows_per_wave_delta: 0,
            wind_x: 0.0,
            random_wind: false,
            paddle_clamp_margin: 0.0,
            sticky_paddle: false,
        }
    }
}

/// Rogue run state
#[derive(Debug, Clone, Default)]
pub struct RogueState {
    pub max_waves: i32,
    /// Cards currently on offer (at most three)
    pub offers: Vec<CardId>,
    /// Current offer was dealt from the OP pool
    pub offer_is_op: bool,
    pub chosen: Vec<CardId>,
    /// Power-up types eligible to drop
    pub drop_deck: BTreeSet<PowerUpKind>,
    pub normal_pool: Vec<CardId>,
    pub op_pool: Vec<CardId>,
    /// Starting-draft rounds still to pick
    pub draft_rounds_left: u32,
    pub mods: RogueModifiers,
    pub bricks_broken_this_wave: i32,
    pub wave_timer: f32,
    pub wave_cooldown: f32,
    pub pending_rows: i32,
    pub row_spawn_timer: f32,
    pub random_wind_timer: f32,
    pub best_score: i64,
}

/// Number of levels in Levels mode
pub const LEVEL_COUNT: usize = 20;

/// Levels-mode progress
#[derive(Debug, Clone, PartialEq)]
pub struct LevelsState {
    /// 1-based
    pub current_level: u32,
    pub best_level_reached: u32,
    pub stars: [u8; LEVEL_COUNT],
}

impl Default for LevelsState {
    fn default() -> Self {
        Self {
            current_level: 1,
            best_level_reached: 1,
            stars: [0; LEVEL_COUNT],
        }
    }
}

/// Snapshot of the last brick standing in Normal mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeldBrick {
    pub pos: Vec3,
    pub size: Vec3,
    pub max_hp: i32,
}

/// Post-clear cinematic (Normal/Levels)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WinFinisher {
    pub active: bool,
    /// Unscaled seconds since start
    pub real_t: f32,
    /// Seconds advanced by the time-scale envelope
    pub cine_t: f32,
    pub time_scale: f32,
    pub anchor: Vec3,
    pub hold_brick: Option<HeldBrick>,
}

/// UI flags the core owns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiFlags {
    /// 0 or 1
    pub camera_preset: u8,
    /// 0..BACKGROUND_COUNT
    pub background_index: u8,
}

/// Background choices in the HUD
pub const BACKGROUND_COUNT: u8 = 5;

/// Events emitted during an update, drained by audio/HUD collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Launch,
    WallHit,
    PaddleHit,
    BrickHit { cracked: bool },
    BrickBroken { max_hp: i32 },
    FireballExplosion { bricks_killed: u32 },
    PowerUpSpawned(PowerUpKind),
    PowerUpPicked(PowerUpKind),
    LifeLost,
    BankStarted,
    BankCommitted { points: i64 },
    NewBest { score: i64 },
    WaveAdvanced { wave: i32 },
    CardsOffered { op: bool },
    CardPicked(CardId),
    DangerStarted,
    RunStarted(GameType),
    Paused(bool),
    GameOver,
    WinFinisherStarted,
    Win,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Base seed; each run mixes in `runs_started`
    pub seed: u64,
    pub runs_started: u64,
    pub rng: Pcg32,
    pub mode: Mode,
    pub game_type: GameType,
    pub lives: i32,
    pub score: i64,
    /// Difficulty generation (Endless/Rogue)
    pub wave: i32,
    pub paddle: Vec3,
    pub balls: Vec<Ball>,
    pub power_ups: Vec<PowerUp>,
    pub bricks: Vec<Brick>,
    pub timers: PowerUpTimers,
    pub fx: FxQueues,
    pub streak: StreakBank,
    pub endless: EndlessState,
    pub rogue: RogueState,
    pub levels: LevelsState,
    pub finisher: WinFinisher,
    /// A fireball was consumed; respawn a ball without costing a life
    pub pending_respawn_after_fireball: bool,
    pub last_brick_destroyed_pos: Option<Vec3>,
    pub ui: UiFlags,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh state sitting in the menu
    pub fn new(cfg: &GameConfig) -> Self {
        Self {
            seed: cfg.seed,
            runs_started: 0,
            rng: Pcg32::seed_from_u64(cfg.seed),
            mode: Mode::Menu,
            game_type: GameType::Normal,
            lives: cfg.starting_lives,
            score: 0,
            wave: 1,
            paddle: Vec3::new(0.0, 0.0, cfg.paddle_start_z),
            balls: Vec::new(),
            power_ups: Vec::new(),
            bricks: Vec::new(),
            timers: PowerUpTimers::default(),
            fx: FxQueues::default(),
            streak: StreakBank::default(),
            endless: EndlessState::default(),
            rogue: RogueState {
                max_waves: cfg.rogue_max_waves,
                ..Default::default()
            },
            levels: LevelsState::default(),
            finisher: WinFinisher::default(),
            pending_respawn_after_fireball: false,
            last_brick_destroyed_pos: None,
            ui: UiFlags::default(),
            events: Vec::new(),
        }
    }

    pub fn is_rogue(&self) -> bool {
        self.game_type == GameType::Rogue
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn alive_brick_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }
}
