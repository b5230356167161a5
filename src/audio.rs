//! Audio collaborator boundary
//!
//! The simulation never talks to audio directly. `AudioManager` drains the
//! frame's `GameEvent`s and turns them into one-shots, music changes and
//! loop toggles on whatever `AudioBackend` the host provides.

use std::collections::BTreeMap;

use crate::sim::state::{GameEvent, PowerUpKind};

/// Root of the audio assets
pub const AUDIO_DIR: &str = "assets/audio";
/// One-shot effects, `<logical id>_NN.ogg` for random variants
pub const SFX_DIR: &str = "assets/audio/sfx";
pub const MUSIC_DIR: &str = "assets/audio/music";
pub const STINGERS_DIR: &str = "assets/audio/stingers_music";

/// Music group played during a run
pub const MUSIC_GAMEPLAY: &str = "gameplay";
/// Crossfade when a run starts
const MUSIC_CROSSFADE_SECONDS: f32 = 1.5;
/// Loop running while bricks are in the danger zone
pub const LOOP_DANGER: &str = "danger_alarm";

/// Host-side audio implementation
pub trait AudioBackend {
    /// Play a logical sound id once with a gain offset in dB
    fn play_one_shot(&mut self, id: &str, db: f32);
    /// Switch to a music group, crossfading over `crossfade` seconds
    fn play_music(&mut self, group: &str, crossfade: f32);
    fn set_loop(&mut self, name: &str, on: bool);
    fn update(&mut self, dt: f32);
}

/// Backend that drops everything (audio unavailable)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play_one_shot(&mut self, _id: &str, _db: f32) {}
    fn play_music(&mut self, _group: &str, _crossfade: f32) {}
    fn set_loop(&mut self, _name: &str, _on: bool) {}
    fn update(&mut self, _dt: f32) {}
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball launched from the paddle
    Launch,
    WallHit,
    PaddleHit,
    /// Brick damaged but standing
    BrickHit,
    /// Brick destroyed (heavier bricks get a deeper sound)
    BrickBreak,
    BrickBreakHeavy,
    FireballExplosion,
    PowerUpGood,
    PowerUpCurse,
    LifeLost,
    BankTally,
    BankCommit,
    NewBest,
    WaveAdvance,
    CardsOffered,
    CardPicked,
    /// Stinger: game over
    GameOver,
    /// Stinger: run won
    Win,
    WinFinisher,
    Pause,
}

impl SoundEffect {
    /// Logical sound id (file stem without the `_NN` variant suffix)
    pub fn id(self) -> &'static str {
        match self {
            SoundEffect::Launch => "launch",
            SoundEffect::WallHit => "wall_hit",
            SoundEffect::PaddleHit => "paddle_hit",
            SoundEffect::BrickHit => "brick_hit",
            SoundEffect::BrickBreak => "brick_break",
            SoundEffect::BrickBreakHeavy => "brick_break_heavy",
            SoundEffect::FireballExplosion => "fireball_explosion",
            SoundEffect::PowerUpGood => "powerup_good",
            SoundEffect::PowerUpCurse => "powerup_curse",
            SoundEffect::LifeLost => "life_lost",
            SoundEffect::BankTally => "bank_tally",
            SoundEffect::BankCommit => "bank_commit",
            SoundEffect::NewBest => "new_best",
            SoundEffect::WaveAdvance => "wave_advance",
            SoundEffect::CardsOffered => "cards_offered",
            SoundEffect::CardPicked => "card_picked",
            SoundEffect::GameOver => "game_over",
            SoundEffect::Win => "win",
            SoundEffect::WinFinisher => "win_finisher",
            SoundEffect::Pause => "pause",
        }
    }

    /// Per-effect mix offset in dB
    pub fn base_db(self) -> f32 {
        match self {
            SoundEffect::WallHit => -6.0,
            SoundEffect::BrickHit | SoundEffect::PaddleHit => -3.0,
            SoundEffect::FireballExplosion | SoundEffect::GameOver | SoundEffect::Win => 2.0,
            _ => 0.0,
        }
    }
}

/// Map one event to its sound, if any
pub fn sound_for_event(event: &GameEvent) -> Option<SoundEffect> {
    let effect = match event {
        GameEvent::Launch => SoundEffect::Launch,
        GameEvent::WallHit => SoundEffect::WallHit,
        GameEvent::PaddleHit => SoundEffect::PaddleHit,
        GameEvent::BrickHit { .. } => SoundEffect::BrickHit,
        GameEvent::BrickBroken { max_hp } if *max_hp >= 4 => SoundEffect::BrickBreakHeavy,
        GameEvent::BrickBroken { .. } => SoundEffect::BrickBreak,
        GameEvent::FireballExplosion { .. } => SoundEffect::FireballExplosion,
        GameEvent::PowerUpPicked(kind) => pickup_sound(*kind),
        GameEvent::LifeLost => SoundEffect::LifeLost,
        GameEvent::BankStarted => SoundEffect::BankTally,
        GameEvent::BankCommitted { .. } => SoundEffect::BankCommit,
        GameEvent::NewBest { .. } => SoundEffect::NewBest,
        GameEvent::WaveAdvanced { .. } => SoundEffect::WaveAdvance,
        GameEvent::CardsOffered { .. } => SoundEffect::CardsOffered,
        GameEvent::CardPicked(_) => SoundEffect::CardPicked,
        GameEvent::GameOver => SoundEffect::GameOver,
        GameEvent::Win => SoundEffect::Win,
        GameEvent::WinFinisherStarted => SoundEffect::WinFinisher,
        GameEvent::Paused(_) => SoundEffect::Pause,
        GameEvent::PowerUpSpawned(_) | GameEvent::DangerStarted | GameEvent::RunStarted(_) => {
            return None;
        }
    };
    Some(effect)
}

/// Strip a trailing `_NN` variant suffix from a file stem
pub fn logical_id(stem: &str) -> &str {
    if let Some((base, suffix)) = stem.rsplit_once('_') {
        if !base.is_empty() && !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
            return base;
        }
    }
    stem
}

/// Group file stems by logical id, variants in sorted order
pub fn variant_groups<'a>(stems: impl IntoIterator<Item = &'a str>) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for stem in stems {
        groups
            .entry(logical_id(stem).to_string())
            .or_default()
            .push(stem.to_string());
    }
    for variants in groups.values_mut() {
        variants.sort();
    }
    groups
}

/// Linear gain (0..1) to dB, with silence floored
fn gain_to_db(gain: f32) -> f32 {
    if gain <= 1e-4 {
        -80.0
    } else {
        20.0 * gain.log10()
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Play a sound effect. Gain is fixed when the sound starts.
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.backend
            .play_one_shot(effect.id(), effect.base_db() + gain_to_db(vol));
    }

    /// Route a frame's events to the backend
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::RunStarted(_) => {
                    self.backend.set_loop(LOOP_DANGER, false);
                    self.backend
                        .play_music(MUSIC_GAMEPLAY, MUSIC_CROSSFADE_SECONDS);
                }
                GameEvent::DangerStarted => self.backend.set_loop(LOOP_DANGER, true),
                GameEvent::GameOver | GameEvent::Win => self.backend.set_loop(LOOP_DANGER, false),
                _ => {}
            }
            if let Some(effect) = sound_for_event(event) {
                self.play(effect);
            }
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.backend.update(dt);
    }
}

/// Pickup sound for a power-up kind
pub fn pickup_sound(kind: PowerUpKind) -> SoundEffect {
    if kind.is_curse() {
        SoundEffect::PowerUpCurse
    } else {
        SoundEffect::PowerUpGood
    }
}
