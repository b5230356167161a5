//! Renderer collaborator boundary
//!
//! The host implements `Renderer`; `draw_scene` walks the game state and
//! submits one frame: a 3D pass for the world, then a pixel-space UI pass.

pub mod camera;
pub mod scene;
pub mod shapes;

pub use camera::Camera;
pub use scene::{background_at, draw_scene};

use glam::{Mat4, Vec2, Vec4};

/// Mesh and texture roots the host loads from
pub const MODELS_DIR: &str = "assets/models";
pub const TEXTURES_DIR: &str = "assets/textures";
pub const FONTS_DIR: &str = "assets/fonts";

/// Initial window size
pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 720;

/// Meshes the world pass asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshId {
    Paddle,
    Ball,
    Brick,
    PowerUp,
    Shield,
    Explosion,
    Shard,
}

/// Host-side drawing API
pub trait Renderer {
    fn set_view_proj(&mut self, view_proj: Mat4);
    /// Full-screen background texture by HUD index
    fn draw_background(&mut self, index: u8);
    fn draw_mesh(&mut self, mesh: MeshId, model: Mat4, tint: Vec4);
    /// Start the UI pass in pixel coordinates
    fn begin_ui(&mut self, viewport: Vec2);
    fn end_ui(&mut self);
    fn draw_ui_rect(&mut self, pos: Vec2, size: Vec2, color: Vec4);
    fn draw_ui_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Vec4);
    fn draw_ui_text(&mut self, text: &str, pos: Vec2, scale: f32, color: Vec4);
    /// Width and line height of `text` at `scale`
    fn measure_text(&self, text: &str, scale: f32) -> Vec2;
}
