//! Model matrices and tints for world objects

use glam::{Mat4, Quat, Vec3, Vec4};

use crate::sim::state::{MAX_BRICK_HP, PowerUpKind};

/// Interpolate brick color by hit points (1 = cool blue, 6 = hot red)
pub fn brick_tint(hp: i32, max_hp: i32) -> Vec4 {
    let t = ((max_hp - 1) as f32 / (MAX_BRICK_HP - 1) as f32).clamp(0.0, 1.0);

    // Color gradient: blue -> cyan -> green -> yellow -> red
    let (r, g, b) = if t < 0.25 {
        let u = t / 0.25;
        (0.2, 0.4 + 0.4 * u, 1.0)
    } else if t < 0.5 {
        let u = (t - 0.25) / 0.25;
        (0.2, 0.8, 1.0 - 0.6 * u)
    } else if t < 0.75 {
        let u = (t - 0.5) / 0.25;
        (0.2 + 0.8 * u, 0.8, 0.4 - 0.2 * u)
    } else {
        let u = (t - 0.75) / 0.25;
        (1.0, 0.8 - 0.5 * u, 0.2)
    };

    // Cracked bricks darken as they lose hp
    let health = if max_hp > 0 {
        (hp as f32 / max_hp as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let shade = 0.55 + 0.45 * health;
    Vec4::new(r * shade, g * shade, b * shade, 1.0)
}

pub fn power_up_tint(kind: PowerUpKind) -> Vec4 {
    match kind {
        PowerUpKind::Expand => Vec4::new(0.3, 0.9, 0.4, 1.0),
        PowerUpKind::ExtraBall => Vec4::new(0.9, 0.9, 1.0, 1.0),
        PowerUpKind::Slow => Vec4::new(0.5, 0.5, 0.9, 1.0),
        PowerUpKind::ExtraLife => Vec4::new(1.0, 0.35, 0.5, 1.0),
        PowerUpKind::Fireball => Vec4::new(1.0, 0.5, 0.1, 1.0),
        PowerUpKind::Shield => Vec4::new(0.3, 0.8, 1.0, 1.0),
        PowerUpKind::Reverse => Vec4::new(0.7, 0.2, 0.8, 1.0),
        PowerUpKind::Tiny => Vec4::new(0.6, 0.6, 0.2, 1.0),
    }
}

pub fn ball_tint(is_fireball: bool) -> Vec4 {
    if is_fireball {
        Vec4::new(1.0, 0.45, 0.1, 1.0)
    } else {
        Vec4::ONE
    }
}

/// Unit cube scaled to `size`, centered at `pos`
pub fn box_model(pos: Vec3, size: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(size, Quat::IDENTITY, pos)
}

/// Unit sphere scaled to `radius`
pub fn sphere_model(pos: Vec3, radius: f32) -> Mat4 {
    Mat4::from_scale_rotation_translation(Vec3::splat(radius * 2.0), Quat::IDENTITY, pos)
}

/// Capsule spinning about Y
pub fn power_up_model(pos: Vec3, scale: f32, spin: f32) -> Mat4 {
    Mat4::from_scale_rotation_translation(Vec3::splat(scale), Quat::from_rotation_y(spin), pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brick_tint_darkens_when_cracked() {
        let full = brick_tint(3, 3);
        let cracked = brick_tint(1, 3);
        assert!(cracked.x < full.x || cracked.y < full.y);
        assert_eq!(full.w, 1.0);
    }

    #[test]
    fn test_brick_tint_gradient_ends() {
        let soft = brick_tint(1, 1);
        let hard = brick_tint(6, 6);
        assert!(soft.z > soft.x);
        assert!(hard.x > hard.z);
    }

    #[test]
    fn test_box_model_places_corners() {
        let m = box_model(Vec3::new(1.0, 0.0, -2.0), Vec3::new(2.0, 1.0, 4.0));
        let corner = m.transform_point3(Vec3::splat(0.5));
        assert!((corner - Vec3::new(2.0, 0.5, 0.0)).length() < 1e-5);
    }
}
