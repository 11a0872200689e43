//! Speed-weighted up-axis blending and the boundary rotation.

use nalgebra as na;

use crate::{
    collision::{Quat, Vec3},
    constants::DIRECTION_EPS,
};

/// Blend between `reference_up` and `contact_normal` by speed.
///
/// - `speed <= min_speed`: exactly `reference_up`.
/// - `speed >= max_speed`: exactly `contact_normal`.
/// - In between: normalized lerp with `t = (speed - min) / (max - min)`.
///
/// Opposite inputs that cancel out mid-blend fall back to `reference_up`.
pub fn blend(
    reference_up: Vec3,
    contact_normal: Vec3,
    speed: f32,
    min_speed: f32,
    max_speed: f32,
) -> Vec3 {
    if speed <= min_speed {
        return reference_up;
    }
    if speed >= max_speed {
        return contact_normal;
    }
    let t = (speed - min_speed) / (max_speed - min_speed);
    reference_up
        .lerp(&contact_normal, t)
        .try_normalize(DIRECTION_EPS)
        .unwrap_or(reference_up)
}

/// Rotation whose local +Z looks along `forward` and local +Y along `up`.
///
/// `forward` is re-projected onto the plane orthogonal to `up`; when that leaves
/// nothing usable, any perpendicular of `up` is used instead.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let up = up.try_normalize(DIRECTION_EPS).unwrap_or_else(Vec3::y);
    let planar = forward - up * forward.dot(&up);
    let f = planar
        .try_normalize(DIRECTION_EPS)
        .unwrap_or_else(|| any_perpendicular(&up));
    Quat::face_towards(&f, &up)
}

/// Some unit vector orthogonal to unit `v`.
pub fn any_perpendicular(v: &Vec3) -> Vec3 {
    let helper = if v.x.abs() < 0.9 { Vec3::x() } else { Vec3::z() };
    na::Unit::new_normalize(v.cross(&helper)).into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn slope() -> Vec3 {
        Vec3::new(1.0, 1.0, 0.0).normalize()
    }

    #[test]
    fn blend_hits_both_boundaries_exactly() {
        assert_eq!(blend(Vec3::y(), slope(), 6.0, 6.0, 12.0), Vec3::y());
        assert_eq!(blend(Vec3::y(), slope(), 12.0, 6.0, 12.0), slope());
        assert_eq!(blend(Vec3::y(), slope(), 0.0, 6.0, 12.0), Vec3::y());
        assert_eq!(blend(Vec3::y(), slope(), 40.0, 6.0, 12.0), slope());
    }

    #[test]
    fn blend_tilts_monotonically_with_speed() {
        let mut last = Vec3::y().dot(&slope());
        for i in 1..12 {
            let speed = 6.0 + i as f32 * 0.5;
            let up = blend(Vec3::y(), slope(), speed, 6.0, 12.0);
            assert_relative_eq!(up.norm(), 1.0, epsilon = 1.0e-6);
            let toward_normal = up.dot(&slope());
            assert!(toward_normal >= last - 1.0e-6);
            last = toward_normal;
        }
    }

    #[test]
    fn look_rotation_maps_axes() {
        let q = look_rotation(Vec3::x(), Vec3::y());
        assert_relative_eq!(q * Vec3::z(), Vec3::x(), epsilon = 1.0e-6);
        assert_relative_eq!(q * Vec3::y(), Vec3::y(), epsilon = 1.0e-6);
    }

    #[test]
    fn look_rotation_survives_forward_parallel_to_up() {
        let q = look_rotation(Vec3::y(), Vec3::y());
        assert_relative_eq!(q * Vec3::y(), Vec3::y(), epsilon = 1.0e-5);
        assert_relative_eq!((q * Vec3::z()).dot(&Vec3::y()), 0.0, epsilon = 1.0e-5);
    }
}
