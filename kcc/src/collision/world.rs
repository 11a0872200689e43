//! The query interface consumed by the controller, and the static world backend.

use std::collections::HashSet;

use log::debug;
use nalgebra as na;
use rapier3d::parry::shape::{self as pshape, Shape};

use crate::error::WorldError;

use super::{
    broad::{self, WorldAccel},
    defs::WorldStaticDef,
    narrow_phase::{self, SurfaceHit},
    settings::{BROAD_PHASE_MARGIN, DIST_EPS, OVERLAP_TOLERANCE},
    types::{ColliderHandle, ContactInfo, Iso, Penetration, StaticShape, Vec3},
};

/// Shape-cast, ray-cast and overlap queries the controller needs from its world.
///
/// Directions are expected to be unit length; implementations may return `None`
/// for degenerate input instead of failing. Contact normals point away from the
/// struck collider.
pub trait CollisionWorld {
    /// First obstruction met by the capsule `bottom..top` swept along `direction`.
    fn sweep_capsule(
        &self,
        bottom: Vec3,
        top: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<ContactInfo>;

    /// Every collider the capsule currently penetrates.
    fn overlap_colliders(&self, bottom: Vec3, top: Vec3, radius: f32) -> Vec<ColliderHandle>;

    /// Whether the capsule penetrates anything.
    fn overlap_capsule(&self, bottom: Vec3, top: Vec3, radius: f32) -> bool {
        !self.overlap_colliders(bottom, top, radius).is_empty()
    }

    /// Minimum translation that pushes the capsule out of `other`.
    fn compute_penetration(
        &self,
        bottom: Vec3,
        top: Vec3,
        radius: f32,
        other: ColliderHandle,
    ) -> Option<Penetration>;

    fn sweep_sphere(
        &self,
        origin: Vec3,
        direction: Vec3,
        radius: f32,
        max_distance: f32,
    ) -> Option<ContactInfo>;

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<ContactInfo>;
}

/// Immutable world of static shapes answered with parry3d queries.
///
/// Handles are indices into the shape list; [`StaticWorld::def_id`] maps them back
/// to the definition ids the world was built from.
pub struct StaticWorld {
    shapes: Vec<StaticShape>,
    ids: Vec<u32>,
    accel: WorldAccel,
}

impl StaticWorld {
    /// Build a world from collider definitions.
    ///
    /// Determinism
    /// - The input is sorted by `id` before insertion, so handles are stable for a given set.
    /// - Invalid or duplicate definitions are rejected instead of producing NaN queries.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Result<Self, WorldError> {
        defs.sort_by_key(|d| d.id);

        let mut seen = HashSet::with_capacity(defs.len());
        for def in &defs {
            def.validate()?;
            if !seen.insert(def.id) {
                return Err(WorldError::DuplicateId(def.id));
            }
        }

        let shapes: Vec<StaticShape> = defs.iter().map(WorldStaticDef::to_static_shape).collect();
        let ids = defs.iter().map(|d| d.id).collect();
        debug!("built static world with {} colliders", shapes.len());
        Ok(Self::with_ids(shapes, ids))
    }

    /// Build a world directly from world-space shapes; ids are the list indices.
    ///
    /// Shapes are trusted as given.
    pub fn from_shapes(shapes: Vec<StaticShape>) -> Self {
        let ids = (0..shapes.len() as u32).collect();
        Self::with_ids(shapes, ids)
    }

    fn with_ids(shapes: Vec<StaticShape>, ids: Vec<u32>) -> Self {
        let accel = broad::build_world_accel(&shapes);
        Self { shapes, ids, accel }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shape(&self, handle: ColliderHandle) -> Option<&StaticShape> {
        self.shapes.get(handle.0 as usize)
    }

    /// Definition id of the collider behind `handle`.
    pub fn def_id(&self, handle: ColliderHandle) -> Option<u32> {
        self.ids.get(handle.0 as usize).copied()
    }

    /// Earliest hit of `shape` cast from `iso` along unit `dir` over candidate statics.
    fn earliest_cast(
        &self,
        iso: &Iso,
        shape: &dyn Shape,
        dir: Vec3,
        max_distance: f32,
    ) -> Option<ContactInfo> {
        let swept = broad::swept_aabb(shape, iso, dir * max_distance, BROAD_PHASE_MARGIN);
        let hits = broad::query_candidates(&self.accel, &swept).filter_map(|idx| {
            narrow_phase::cast_against_static(iso, shape, &dir, max_distance, &self.shapes[idx])
                .map(|hit| (idx, hit))
        });
        earliest(hits)
    }
}

impl CollisionWorld for StaticWorld {
    fn sweep_capsule(
        &self,
        bottom: Vec3,
        top: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<ContactInfo> {
        let dir = query_direction(direction, max_distance)?;
        let capsule = segment_capsule(bottom, top, radius);
        self.earliest_cast(&Iso::identity(), &capsule, dir, max_distance)
    }

    fn overlap_colliders(&self, bottom: Vec3, top: Vec3, radius: f32) -> Vec<ColliderHandle> {
        let capsule = segment_capsule(bottom, top, radius);
        let iso = Iso::identity();
        let bounds = broad::swept_aabb(&capsule, &iso, Vec3::zeros(), BROAD_PHASE_MARGIN);
        broad::query_candidates(&self.accel, &bounds)
            .filter(|&idx| {
                narrow_phase::penetration_against_static(&iso, &capsule, &self.shapes[idx])
                    .is_some_and(|p| p.distance > OVERLAP_TOLERANCE)
            })
            .map(|idx| ColliderHandle(idx as u32))
            .collect()
    }

    fn compute_penetration(
        &self,
        bottom: Vec3,
        top: Vec3,
        radius: f32,
        other: ColliderHandle,
    ) -> Option<Penetration> {
        let target = self.shape(other)?;
        let capsule = segment_capsule(bottom, top, radius);
        narrow_phase::penetration_against_static(&Iso::identity(), &capsule, target)
    }

    fn sweep_sphere(
        &self,
        origin: Vec3,
        direction: Vec3,
        radius: f32,
        max_distance: f32,
    ) -> Option<ContactInfo> {
        let dir = query_direction(direction, max_distance)?;
        let ball = pshape::Ball::new(radius);
        let iso = Iso::translation(origin.x, origin.y, origin.z);
        self.earliest_cast(&iso, &ball, dir, max_distance)
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<ContactInfo> {
        let dir = query_direction(direction, max_distance)?;
        let bounds = broad::segment_aabb(origin, dir * max_distance, BROAD_PHASE_MARGIN);
        let hits = broad::query_candidates(&self.accel, &bounds).filter_map(|idx| {
            narrow_phase::ray_against_static(&origin, &dir, max_distance, &self.shapes[idx])
                .map(|hit| (idx, hit))
        });
        earliest(hits)
    }
}

/// Capsule between two world-space cap centers, used with an identity pose.
#[inline]
fn segment_capsule(bottom: Vec3, top: Vec3, radius: f32) -> pshape::Capsule {
    pshape::Capsule::new(na::Point3::from(bottom), na::Point3::from(top), radius)
}

/// Unit query direction, or `None` for degenerate input.
#[inline]
fn query_direction(direction: Vec3, max_distance: f32) -> Option<Vec3> {
    if !(max_distance > 0.0) || !max_distance.is_finite() {
        return None;
    }
    direction.try_normalize(DIST_EPS)
}

/// Pick the hit with the smallest travel distance.
fn earliest(hits: impl Iterator<Item = (usize, SurfaceHit)>) -> Option<ContactInfo> {
    hits.min_by(|a, b| a.1.distance.total_cmp(&b.1.distance))
        .map(|(idx, hit)| ContactInfo {
            point: hit.point,
            normal: hit.normal,
            distance: hit.distance,
            collider: ColliderHandle(idx as u32),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{ColliderShapeDef, Quat, Transform};
    use approx::assert_relative_eq;

    fn room() -> StaticWorld {
        StaticWorld::from_shapes(vec![
            StaticShape::Plane {
                normal: Vec3::y(),
                dist: 0.0,
            },
            StaticShape::Cuboid {
                half_extents: Vec3::new(0.5, 2.0, 2.0),
                transform: Transform::from_translation(Vec3::new(1.5, 2.0, 0.0)),
            },
        ])
    }

    #[test]
    fn capsule_sweep_stops_at_the_wall_face() {
        let world = room();
        let hit = world
            .sweep_capsule(
                Vec3::new(0.0, 0.25, 0.0),
                Vec3::new(0.0, 0.75, 0.0),
                0.25,
                Vec3::x(),
                2.0,
            )
            .expect("wall ahead");

        assert_eq!(hit.collider, ColliderHandle(1));
        assert_relative_eq!(hit.distance, 0.75, epsilon = 1.0e-3);
        assert_relative_eq!(hit.normal, -Vec3::x(), epsilon = 1.0e-3);
        assert_relative_eq!(hit.point.x, 1.0, epsilon = 1.0e-3);
    }

    #[test]
    fn resting_capsule_is_not_overlapping_the_floor() {
        let world = room();
        let bottom = Vec3::new(0.0, 0.25, 0.0);
        let top = Vec3::new(0.0, 0.75, 0.0);
        assert!(!world.overlap_capsule(bottom, top, 0.25));
        assert!(
            world
                .sweep_capsule(bottom, top, 0.25, Vec3::new(0.0, 0.0, 1.0), 0.5)
                .is_none()
        );
    }

    #[test]
    fn sunk_capsule_reports_floor_overlap_and_push_out() {
        let world = room();
        let bottom = Vec3::new(0.0, 0.1, 0.0);
        let top = Vec3::new(0.0, 0.6, 0.0);

        let handles = world.overlap_colliders(bottom, top, 0.25);
        assert_eq!(handles, vec![ColliderHandle(0)]);

        let pen = world
            .compute_penetration(bottom, top, 0.25, handles[0])
            .expect("penetrating");
        assert_relative_eq!(pen.direction, Vec3::y(), epsilon = 1.0e-4);
        assert_relative_eq!(pen.distance, 0.15, epsilon = 1.0e-3);
    }

    #[test]
    fn raycast_and_sphere_sweep_find_the_floor() {
        let world = room();
        let ray = world
            .raycast(Vec3::new(0.0, 1.0, 0.0), -Vec3::y(), 5.0)
            .expect("floor");
        assert_relative_eq!(ray.distance, 1.0, epsilon = 1.0e-5);
        assert_eq!(ray.collider, ColliderHandle(0));

        let sphere = world
            .sweep_sphere(Vec3::new(0.0, 1.0, 0.0), -Vec3::y(), 0.125, 5.0)
            .expect("floor");
        assert_relative_eq!(sphere.distance, 0.875, epsilon = 1.0e-4);
    }

    #[test]
    fn degenerate_queries_fail_open() {
        let world = room();
        assert!(world.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::zeros(), 5.0).is_none());
        assert!(
            world
                .sweep_sphere(Vec3::new(0.0, 1.0, 0.0), -Vec3::y(), 0.1, 0.0)
                .is_none()
        );
    }

    #[test]
    fn build_sorts_by_id_and_rejects_duplicates() {
        let floor = WorldStaticDef::new(
            9,
            Vec3::zeros(),
            Quat::identity(),
            ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        );
        let ball = WorldStaticDef::new(
            2,
            Vec3::new(0.0, 3.0, 0.0),
            Quat::identity(),
            ColliderShapeDef::Sphere { radius: 1.0 },
        );

        let world = StaticWorld::build(vec![floor.clone(), ball.clone()]).expect("valid");
        assert_eq!(world.len(), 2);
        assert_eq!(world.def_id(ColliderHandle(0)), Some(2));
        assert_eq!(world.def_id(ColliderHandle(1)), Some(9));

        let dup = StaticWorld::build(vec![floor.clone(), floor]);
        assert_eq!(dup.err(), Some(WorldError::DuplicateId(9)));
    }
}
