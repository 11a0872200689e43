use nalgebra as na;
use rapier3d::parry::{
    query::{self, Ray, RayCast as _, ShapeCastOptions},
    shape::{self as pshape, Shape},
};

use super::{
    settings::{GRAZING_DOT, MIN_NORMAL_SQ, TOUCH_DISTANCE},
    types::{Iso, Penetration, StaticShape, Vec3},
};

/// World-space result of a cast against a single static shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec3,
    /// Unit normal pointing away from the static surface.
    pub normal: Vec3,
    pub distance: f32,
}

/// Run `f` with the parry3d shape and world pose of `shape`.
///
/// Planes become a `HalfSpace` positioned at `normal * dist`.
pub fn with_parry_shape<R>(shape: &StaticShape, f: impl FnOnce(&Iso, &dyn Shape) -> R) -> R {
    match *shape {
        StaticShape::Plane { normal, dist } => {
            let unit_n = na::Unit::new_normalize(normal);
            let origin = unit_n.into_inner() * dist;
            let iso = Iso::translation(origin.x, origin.y, origin.z);
            f(&iso, &pshape::HalfSpace::new(unit_n))
        }
        StaticShape::Cuboid {
            half_extents,
            transform,
        } => f(&transform.iso(), &pshape::Cuboid::new(half_extents)),
        StaticShape::Sphere { radius, transform } => {
            // Rotation is irrelevant for a ball.
            let t = transform.translation;
            f(&Iso::translation(t.x, t.y, t.z), &pshape::Ball::new(radius))
        }
        StaticShape::Capsule {
            radius,
            half_height,
            transform,
        } => f(
            &transform.iso(),
            &pshape::Capsule::new_y(half_height, radius),
        ),
        StaticShape::Cylinder {
            radius,
            half_height,
            transform,
        } => f(&transform.iso(), &pshape::Cylinder::new(half_height, radius)),
        StaticShape::Cone {
            radius,
            half_height,
            transform,
        } => f(&transform.iso(), &pshape::Cone::new(half_height, radius)),
    }
}

/// Cast a moving shape along unit direction `dir` against a single static shape.
///
/// - `max_distance` bounds the travel (meters); the returned `distance` is the travel
///   before impact.
/// - A shape that is already touching the target at the start only blocks the cast if
///   `dir` points into the surface; grazing or separating motion passes through.
/// - Degenerate results (unsupported pair, non-finite or zero normal) count as no hit.
pub fn cast_against_static(
    shape_iso: &Iso,
    shape: &dyn Shape,
    dir: &Vec3,
    max_distance: f32,
    target: &StaticShape,
) -> Option<SurfaceHit> {
    with_parry_shape(target, |target_iso, target_shape| {
        let mut opts = ShapeCastOptions::with_max_time_of_impact(max_distance);
        opts.stop_at_penetration = false;
        let hit = query::cast_shapes(
            shape_iso,
            dir,
            shape,
            target_iso,
            &Vec3::zeros(),
            target_shape,
            opts,
        )
        .ok()
        .flatten()?;

        if !hit.time_of_impact.is_finite() {
            return None;
        }

        let mut normal = trusted_normal(target_iso * hit.normal2.into_inner())?;
        if hit.time_of_impact <= TOUCH_DISTANCE && normal.dot(dir) > -GRAZING_DOT {
            return None;
        }
        // Ensure the normal opposes motion (consistent with slide logic).
        if normal.dot(dir) > 0.0 {
            normal = -normal;
        }

        Some(SurfaceHit {
            point: (target_iso * hit.witness2).coords,
            normal,
            distance: hit.time_of_impact.max(0.0),
        })
    })
}

/// Cast a ray against a single static shape.
///
/// Rays starting inside a solid report no hit.
pub fn ray_against_static(
    origin: &Vec3,
    dir: &Vec3,
    max_distance: f32,
    target: &StaticShape,
) -> Option<SurfaceHit> {
    let ray = Ray::new(na::Point3::from(*origin), *dir);
    with_parry_shape(target, |iso, target_shape| {
        let hit = target_shape.cast_ray_and_get_normal(iso, &ray, max_distance, true)?;
        let normal = trusted_normal(hit.normal)?;
        Some(SurfaceHit {
            point: ray.point_at(hit.time_of_impact).coords,
            normal,
            distance: hit.time_of_impact,
        })
    })
}

/// Minimum translation separating `shape` from a single static shape, if they overlap.
pub fn penetration_against_static(
    shape_iso: &Iso,
    shape: &dyn Shape,
    target: &StaticShape,
) -> Option<Penetration> {
    with_parry_shape(target, |target_iso, target_shape| {
        let contact = query::contact(shape_iso, shape, target_iso, target_shape, 0.0)
            .ok()
            .flatten()?;
        if !(contact.dist < 0.0) {
            return None;
        }
        // normal1 points from the query shape toward the collider; push the other way.
        let direction = trusted_normal(-contact.normal1.into_inner())?;
        Some(Penetration {
            direction,
            distance: -contact.dist,
        })
    })
}

/// Normalize `n`, rejecting non-finite or near-zero vectors.
#[inline]
pub fn trusted_normal(n: Vec3) -> Option<Vec3> {
    if !n.iter().all(|c| c.is_finite()) || n.norm_squared() <= MIN_NORMAL_SQ {
        return None;
    }
    Some(n.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::types::Transform;
    use approx::assert_relative_eq;

    fn ground() -> StaticShape {
        StaticShape::Plane {
            normal: Vec3::y(),
            dist: 0.0,
        }
    }

    #[test]
    fn ball_cast_down_hits_plane_at_gap_distance() {
        let ball = pshape::Ball::new(0.25);
        let iso = Iso::translation(0.0, 1.0, 0.0);
        let hit = cast_against_static(&iso, &ball, &(-Vec3::y()), 2.0, &ground())
            .expect("plane below");

        assert_relative_eq!(hit.distance, 0.75, epsilon = 1.0e-4);
        assert_relative_eq!(hit.normal, Vec3::y(), epsilon = 1.0e-5);
        assert_relative_eq!(hit.point.y, 0.0, epsilon = 1.0e-4);
    }

    #[test]
    fn resting_shape_slides_along_touching_plane() {
        // Ball resting exactly on the plane, moving tangentially: not blocked.
        let ball = pshape::Ball::new(0.25);
        let iso = Iso::translation(0.0, 0.25, 0.0);
        assert!(cast_against_static(&iso, &ball, &Vec3::x(), 1.0, &ground()).is_none());
    }

    #[test]
    fn ray_reports_world_normal_of_rotated_box() {
        let cuboid = StaticShape::Cuboid {
            half_extents: Vec3::new(0.5, 0.5, 0.5),
            transform: Transform::from_translation(Vec3::new(3.0, 0.0, 0.0)),
        };
        let hit = ray_against_static(&Vec3::zeros(), &Vec3::x(), 10.0, &cuboid).expect("box");
        assert_relative_eq!(hit.distance, 2.5, epsilon = 1.0e-5);
        assert_relative_eq!(hit.normal, -Vec3::x(), epsilon = 1.0e-5);
    }

    #[test]
    fn sphere_sunk_into_plane_is_pushed_up() {
        let ball = pshape::Ball::new(0.5);
        let iso = Iso::translation(0.0, 0.3, 0.0);
        let pen = penetration_against_static(&iso, &ball, &ground()).expect("overlap");
        assert_relative_eq!(pen.direction, Vec3::y(), epsilon = 1.0e-5);
        assert_relative_eq!(pen.distance, 0.2, epsilon = 1.0e-4);
    }

    #[test]
    fn zero_normal_is_not_trusted() {
        assert!(trusted_normal(Vec3::zeros()).is_none());
        assert!(trusted_normal(Vec3::new(f32::NAN, 1.0, 0.0)).is_none());
        assert_relative_eq!(
            trusted_normal(Vec3::new(0.0, 2.0, 0.0)).unwrap(),
            Vec3::y()
        );
    }
}
