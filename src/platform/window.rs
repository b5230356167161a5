//! Window collaborator and the per-frame host loop

use glam::Vec2;

use super::input::{InputAdapter, InputState};
use super::time::{FrameClock, SIM_DT};
use crate::audio::{AudioBackend, AudioManager};
use crate::persistence::ScoreStore;
use crate::renderer::{Camera, Renderer, draw_scene};
use crate::sim::state::GameState;
use crate::sim::tick::tick;
use crate::tuning::GameConfig;

/// Host window
pub trait Window {
    /// Drawable size in pixels
    fn framebuffer_size(&self) -> Vec2;
    /// Pump OS events into `input`; false once the window wants to close
    fn poll(&mut self, input: &mut InputState) -> bool;
    /// Wheel movement since the last poll
    fn scroll_delta(&self) -> f32;
    fn swap(&mut self);
    fn request_close(&mut self);
}

/// Owns the collaborators and runs one frame at a time
pub struct Host<W: Window, B: AudioBackend> {
    pub window: W,
    pub audio: AudioManager<B>,
    pub input: InputState,
    pub adapter: InputAdapter,
    pub clock: FrameClock,
    /// Seconds of simulated time, drives shake and spin
    pub time: f32,
}

impl<W: Window, B: AudioBackend> Host<W, B> {
    pub fn new(window: W, audio: B, cfg: &GameConfig) -> Self {
        Self {
            window,
            audio: AudioManager::new(audio),
            input: InputState::default(),
            adapter: InputAdapter::new(),
            clock: FrameClock::new(cfg.max_frame_dt),
            time: 0.0,
        }
    }

    /// Poll, simulate, draw and present one frame.
    ///
    /// Returns false once the window has closed.
    pub fn frame(
        &mut self,
        renderer: &mut dyn Renderer,
        state: &mut GameState,
        cfg: &GameConfig,
        store: &mut dyn ScoreStore,
        now_seconds: f64,
    ) -> bool {
        if !self.window.poll(&mut self.input) {
            return false;
        }
        self.input.scroll += self.window.scroll_delta();

        // UI metrics follow the framebuffer every frame
        let viewport = self.window.framebuffer_size();
        let camera = Camera::preset(state.ui.camera_preset, viewport);

        let steps = self.clock.advance(now_seconds);
        for step in 0..steps {
            let input = if step == 0 {
                self.adapter.frame_input(&self.input, state, &camera)
            } else {
                // Edge-triggered intents apply once per frame
                let mut held = self.adapter.frame_input(&self.input, state, &camera);
                held.launch = false;
                held.pause = false;
                held.menu = None;
                held.card_pick = None;
                held.debug = None;
                held.background = None;
                held.camera_preset = None;
                held
            };
            tick(state, cfg, &input, store, SIM_DT);
            self.time += SIM_DT;
        }
        if steps > 0 {
            self.input.end_frame();
        }

        let events = state.drain_events();
        self.audio.handle_events(&events);
        self.audio.update(steps as f32 * SIM_DT);

        draw_scene(renderer, state, cfg, viewport, self.time);
        self.window.swap();
        true
    }
}
