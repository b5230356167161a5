//! Keyboard and mouse to `TickInput`
//!
//! The host fills an `InputState` from its window events each frame;
//! `InputAdapter` turns it into the simulation's intent struct, routing keys
//! by the current mode.

use std::collections::HashSet;

use glam::Vec2;

use crate::renderer::{Camera, background_at};
use crate::sim::state::{GameState, GameType, LEVEL_COUNT, Mode, PowerUpKind};
use crate::sim::tick::{DebugCommand, MenuAction, TickInput, clamp_launch_dir};

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    A,
    D,
    Left,
    Right,
    Space,
    Enter,
    Escape,
    N,
    Q,
    Num1,
    Num2,
    Num3,
    Num4,
    Num8,
    Num9,
    Num0,
    Minus,
    R,
    L,
}

/// Raw input for one frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    down: HashSet<Key>,
    pressed: HashSet<Key>,
    /// Cursor in pixels, origin top-left
    pub mouse: Option<Vec2>,
    /// Left button went down this frame
    pub clicked: bool,
    /// Wheel movement this frame, positive away from the user
    pub scroll: f32,
}

impl InputState {
    pub fn key_down(&mut self, key: Key) {
        if self.down.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.down.remove(&key);
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    /// Went down since the last `end_frame`
    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Clear edge-triggered state once the frame has been consumed
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.clicked = false;
        self.scroll = 0.0;
    }
}

/// Stateful mapping from raw input to simulation intents
#[derive(Debug, Clone)]
pub struct InputAdapter {
    /// Level highlighted on the menu
    pub level_cursor: u32,
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self { level_cursor: 1 }
    }
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build this frame's intents
    pub fn frame_input(
        &mut self,
        input: &InputState,
        state: &GameState,
        camera: &Camera,
    ) -> TickInput {
        let mut out = TickInput::default();
        match state.mode {
            Mode::Menu => self.menu_input(input, state, &mut out),
            Mode::Playing => self.playing_input(input, state, camera, &mut out),
            Mode::Paused => {
                out.pause = input.was_pressed(Key::Escape);
                if input.was_pressed(Key::Q) {
                    out.menu = Some(MenuAction::ReturnToMenu);
                }
            }
            Mode::RogueCards => {
                out.card_pick = [Key::Num1, Key::Num2, Key::Num3]
                    .iter()
                    .position(|&k| input.was_pressed(k));
                if input.was_pressed(Key::Escape) {
                    out.menu = Some(MenuAction::ReturnToMenu);
                }
            }
            Mode::GameOver | Mode::Win => {
                out.menu = if input.was_pressed(Key::Enter) || input.was_pressed(Key::Space) {
                    Some(MenuAction::Restart)
                } else if input.was_pressed(Key::N) {
                    Some(MenuAction::NextLevel)
                } else if input.was_pressed(Key::Escape) {
                    Some(MenuAction::ReturnToMenu)
                } else {
                    None
                };
            }
        }
        out
    }

    fn menu_input(&mut self, input: &InputState, state: &GameState, out: &mut TickInput) {
        let unlocked = state.levels.best_level_reached.clamp(1, LEVEL_COUNT as u32);
        if input.was_pressed(Key::Left) {
            self.level_cursor = self.level_cursor.saturating_sub(1).max(1);
        }
        if input.was_pressed(Key::Right) || input.scroll > 0.0 {
            self.level_cursor = (self.level_cursor + 1).min(unlocked);
        }
        if input.scroll < 0.0 {
            self.level_cursor = self.level_cursor.saturating_sub(1).max(1);
        }
        self.level_cursor = self.level_cursor.clamp(1, unlocked);

        let starts = [
            (Key::Num1, GameType::Normal),
            (Key::Num2, GameType::Endless),
            (Key::Num3, GameType::Rogue),
            (Key::Num4, GameType::Levels),
        ];
        out.menu = starts
            .iter()
            .find(|(k, _)| input.was_pressed(*k))
            .map(|&(_, game_type)| MenuAction::Start(game_type));
        if out.menu.is_none() && input.was_pressed(Key::Enter) {
            out.menu = Some(MenuAction::SelectLevel(self.level_cursor));
        }
    }

    fn playing_input(
        &mut self,
        input: &InputState,
        state: &GameState,
        camera: &Camera,
        out: &mut TickInput,
    ) {
        let mut dir = 0.0;
        if input.is_down(Key::A) || input.is_down(Key::Left) {
            dir -= 1.0;
        }
        if input.is_down(Key::D) || input.is_down(Key::Right) {
            dir += 1.0;
        }
        out.paddle_dir = dir;
        out.pause = input.was_pressed(Key::Escape);

        if input.was_pressed(Key::Num1) {
            out.camera_preset = Some(0);
        } else if input.was_pressed(Key::Num2) {
            out.camera_preset = Some(1);
        }

        // HUD clicks don't launch
        let hud_click = match input.mouse {
            Some(pixel) if input.clicked => background_at(pixel, camera.viewport),
            _ => None,
        };
        out.background = hud_click;
        out.launch = input.was_pressed(Key::Space) || (input.clicked && hud_click.is_none());

        if out.launch {
            let attached = state.balls.iter().find(|b| b.alive && b.attached);
            if let (Some(ball), Some(pixel)) = (attached, input.mouse) {
                out.launch_dir = camera
                    .unproject_to_plane(pixel, ball.pos.y)
                    .map(|hit| clamp_launch_dir(hit - ball.pos));
            }
        }

        if cfg!(feature = "debug-hotkeys") {
            out.debug = debug_command(input);
        }
    }
}

fn debug_command(input: &InputState) -> Option<DebugCommand> {
    let bindings = [
        (Key::Num8, DebugCommand::ForcePowerUp(PowerUpKind::ExtraBall)),
        (Key::Num9, DebugCommand::ForcePowerUp(PowerUpKind::Fireball)),
        (Key::Num0, DebugCommand::ForcePowerUp(PowerUpKind::Shield)),
        (Key::Minus, DebugCommand::ForcePowerUp(PowerUpKind::Expand)),
        (Key::R, DebugCommand::FillRogueDeck),
        (Key::L, DebugCommand::UnlockLevels),
        (Key::Num3, DebugCommand::ForceSpawn),
    ];
    bindings
        .iter()
        .find(|(k, _)| input.was_pressed(*k))
        .map(|&(_, cmd)| cmd)
}
