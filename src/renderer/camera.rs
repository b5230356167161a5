//! Camera presets and screen-to-world picking

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// Vertical field of view
const FOV_Y_DEG: f32 = 45.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 200.0;

/// Perspective camera looking at the arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    /// Viewport in pixels
    pub viewport: Vec2,
}

impl Camera {
    /// Preset 0 sits low behind the paddle, preset 1 looks almost straight down
    pub fn preset(index: u8, viewport: Vec2) -> Self {
        let (eye, target) = match index {
            1 => (Vec3::new(0.0, 42.0, 6.0), Vec3::new(0.0, 0.0, 0.0)),
            _ => (Vec3::new(0.0, 20.0, 27.0), Vec3::new(0.0, 0.0, -1.5)),
        };
        Self {
            eye,
            target,
            viewport,
        }
    }

    /// Same camera nudged by a shake offset
    pub fn with_shake(mut self, offset: Vec3) -> Self {
        self.eye += offset;
        self.target += offset;
        self
    }

    pub fn aspect(&self) -> f32 {
        if self.viewport.y <= 0.0 {
            1.0
        } else {
            self.viewport.x / self.viewport.y
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_DEG.to_radians(), self.aspect(), Z_NEAR, Z_FAR)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// World point to pixel coordinates (origin top-left)
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_proj() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        ))
    }

    /// Cast a ray through a pixel and hit the horizontal plane `y = plane_y`
    pub fn unproject_to_plane(&self, pixel: Vec2, plane_y: f32) -> Option<Vec3> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(
            2.0 * pixel.x / self.viewport.x - 1.0,
            1.0 - 2.0 * pixel.y / self.viewport.y,
        );
        let inv = self.view_proj().inverse();
        let near = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        // The far plane is too imprecise in f32
        let mid = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        let dir = mid - near;
        if dir.y.abs() <= 1e-6 {
            return None;
        }
        let t = (plane_y - near.y) / dir.y;
        if t < 0.0 {
            return None;
        }
        Some(near + dir * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

    #[test]
    fn test_screen_center_hits_target() {
        for preset in 0..2 {
            let cam = Camera::preset(preset, VIEWPORT);
            let hit = cam
                .unproject_to_plane(VIEWPORT * 0.5, 0.0)
                .expect("center ray hits the floor");
            assert!((hit - cam.target).length() < 5e-2, "preset {preset}: {hit:?}");
        }
    }

    #[test]
    fn test_project_unproject_round_trip() {
        let cam = Camera::preset(0, VIEWPORT);
        let world = Vec3::new(6.0, 0.0, 4.0);
        let px = cam.project(world).expect("point in front of camera");
        let back = cam.unproject_to_plane(px, 0.0).expect("ray hits floor");
        assert!((back - world).length() < 5e-2);
    }

    #[test]
    fn test_plane_behind_eye_misses() {
        let cam = Camera::preset(0, VIEWPORT);
        assert!(cam.unproject_to_plane(VIEWPORT * 0.5, 50.0).is_none());
    }

    #[test]
    fn test_degenerate_viewport() {
        let cam = Camera::preset(0, Vec2::ZERO);
        assert_eq!(cam.aspect(), 1.0);
        assert!(cam.unproject_to_plane(Vec2::ZERO, 0.0).is_none());
    }
}
