use nalgebra as na;
use rapier3d::parry::{
    bounding_volume::{Aabb, BoundingVolume},
    partitioning::{Bvh, BvhBuildStrategy},
    shape::Shape,
};

use super::{
    narrow_phase::with_parry_shape,
    types::{Iso, StaticShape, Vec3},
};

/// Acceleration structure for broad-phase queries over immutable world statics.
///
/// Notes:
/// - Finite shapes are stored as world-space AABBs in a BVH. Planes are handled
///   separately because they are infinite.
/// - `non_plane_indices` maps each BVH leaf back to its index in the input `statics` slice.
/// - `plane_indices` stores indices of planes in the input `statics` slice.
pub struct WorldAccel {
    /// BVH over finite static shapes (AABBs).
    pub bvh: Bvh,
    pub non_plane_indices: Vec<usize>,
    pub plane_indices: Vec<usize>,
}

impl WorldAccel {
    /// Return true if this accelerator has no non-plane entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.non_plane_indices.is_empty()
    }

    /// Number of non-plane entries (BVH leaves) in this accelerator.
    #[inline]
    pub fn len(&self) -> usize {
        self.non_plane_indices.len()
    }
}

/// Build the broad-phase accelerator over immutable world statics.
pub fn build_world_accel(statics: &[StaticShape]) -> WorldAccel {
    let mut aabbs = Vec::new();
    let mut non_plane_indices = Vec::new();
    let mut plane_indices = Vec::new();

    for (i, s) in statics.iter().enumerate() {
        if s.is_plane() {
            plane_indices.push(i);
        } else {
            aabbs.push(with_parry_shape(s, |iso, shape| shape.compute_aabb(iso)));
            non_plane_indices.push(i);
        }
    }

    WorldAccel {
        bvh: Bvh::from_leaves(BvhBuildStrategy::Binned, &aabbs),
        non_plane_indices,
        plane_indices,
    }
}

/// World-space AABB of `shape` swept from `iso` by `translation`, inflated by `margin`.
pub fn swept_aabb(shape: &dyn Shape, iso: &Iso, translation: Vec3, margin: f32) -> Aabb {
    let start = shape.compute_aabb(iso);
    let end_iso = Iso::from_parts(
        na::Translation3::from(iso.translation.vector + translation),
        iso.rotation,
    );
    let end = shape.compute_aabb(&end_iso);
    start.merged(&end).loosened(margin.max(0.0))
}

/// AABB of the segment `origin .. origin + translation`, inflated by `margin`.
pub fn segment_aabb(origin: Vec3, translation: Vec3, margin: f32) -> Aabb {
    let end = origin + translation;
    Aabb::new(origin.inf(&end).into(), origin.sup(&end).into()).loosened(margin.max(0.0))
}

/// Query candidate static indices: every plane, then finite shapes whose AABB intersects `query`.
///
/// Returns indices into the input `statics` slice (not BVH leaf ids).
pub fn query_candidates<'a>(
    accel: &'a WorldAccel,
    query: &'a Aabb,
) -> impl Iterator<Item = usize> + 'a {
    let finite = accel
        .bvh
        .intersect_aabb(query)
        .filter_map(|leaf| accel.non_plane_indices.get(leaf as usize).copied());
    accel.plane_indices.iter().copied().chain(finite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::types::Transform;

    fn statics() -> Vec<StaticShape> {
        vec![
            StaticShape::Plane {
                normal: Vec3::y(),
                dist: 0.0,
            },
            StaticShape::Cuboid {
                half_extents: Vec3::new(0.5, 0.5, 0.5),
                transform: Transform::from_translation(Vec3::new(5.0, 0.5, 0.0)),
            },
            StaticShape::Sphere {
                radius: 1.0,
                transform: Transform::from_translation(Vec3::new(-5.0, 1.0, 0.0)),
            },
        ]
    }

    #[test]
    fn planes_are_kept_out_of_the_bvh() {
        let accel = build_world_accel(&statics());
        assert_eq!(accel.plane_indices, vec![0]);
        assert_eq!(accel.non_plane_indices, vec![1, 2]);
        assert_eq!(accel.len(), 2);
        assert_eq!(accel.bvh.leaf_count(), 2);
        assert!(!accel.is_empty());
    }

    #[test]
    fn candidates_always_include_planes_and_only_nearby_shapes() {
        let accel = build_world_accel(&statics());
        let query = segment_aabb(Vec3::new(4.0, 0.5, 0.0), Vec3::new(0.4, 0.0, 0.0), 0.2);
        let found: Vec<usize> = query_candidates(&accel, &query).collect();
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    fn plane_only_world_has_an_empty_bvh() {
        let accel = build_world_accel(&statics()[..1]);
        assert!(accel.is_empty());
        let query = segment_aabb(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0), 0.0);
        let found: Vec<usize> = query_candidates(&accel, &query).collect();
        assert_eq!(found, vec![0]);
    }

    #[test]
    fn many_boxes_return_only_the_overlapped_ones() {
        let boxes: Vec<StaticShape> = (0..64)
            .map(|i| StaticShape::Cuboid {
                half_extents: Vec3::new(0.4, 0.4, 0.4),
                transform: Transform::from_translation(Vec3::new(i as f32, 0.0, 0.0)),
            })
            .collect();
        let accel = build_world_accel(&boxes);
        let query = segment_aabb(Vec3::new(10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 0.05);
        let mut found: Vec<usize> = query_candidates(&accel, &query).collect();
        found.sort_unstable();
        assert_eq!(found, vec![10, 11]);
    }

    #[test]
    fn swept_aabb_covers_start_and_end() {
        let ball = rapier3d::parry::shape::Ball::new(0.5);
        let aabb = swept_aabb(&ball, &Iso::identity(), Vec3::new(2.0, 0.0, 0.0), 0.0);
        assert!((aabb.mins.x + 0.5).abs() < 1.0e-6);
        assert!((aabb.maxs.x - 2.5).abs() < 1.0e-6);
    }
}
