//! Gameplay simulation
//!
//! All gameplay logic lives here. This module is pure of rendering and
//! audio:
//! - Time comes in as a clamped `dt`
//! - Seeded RNG only, stored in the state
//! - Entity sequences iterate in insertion order
//! - Collaborators read `GameState` and drain `GameEvent`s

pub mod autopilot;
pub mod cards;
pub mod collision;
pub mod fx;
pub mod init;
pub mod levels;
pub mod physics;
pub mod powerups;
pub mod rogue;
pub mod scoring;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use cards::{CARDS, CardDef, CardId};
pub use collision::BrickHitOutcome;
pub use init::{any_bricks_alive, init_game};
pub use state::{
    Ball, Brick, GameEvent, GameState, GameType, Mode, PowerUp, PowerUpKind, ScorePopup,
};
pub use tick::{DebugCommand, MenuAction, TickInput, tick};
