/*!
Collision root module.

This module re-exports the submodules that answer the controller's geometric
queries. Narrow-phase work is done with parry3d (through `rapier3d::parry`);
finite shapes are pruned by a simple world-space AABB broad phase. The code is
split for clarity:

- types:        shared data types (Transform, StaticShape, ContactInfo, Penetration, etc.)
- settings:     query tolerance constants
- broad:        broad-phase helpers (swept AABBs, candidate queries)
- narrow_phase: thin wrappers over parry3d queries (shape casts, contacts, rays)
- defs:         schema-agnostic static collider definitions
- world:        the `CollisionWorld` trait and the `StaticWorld` backend
*/

pub mod broad;
pub mod defs;
pub mod narrow_phase;
pub mod settings;
pub mod types;
pub mod world;

// Re-export commonly used types.
pub use defs::{ColliderShapeDef, WorldStaticDef};
pub use types::{ColliderHandle, ContactInfo, Penetration, Quat, StaticShape, Transform, Vec3};
pub use world::{CollisionWorld, StaticWorld};

/// Convenience: build a `StaticShape::Plane` from a world-space plane pose:
/// - normal = rotation * +Y
/// - dist = dot(normal, translation) + optional offset
#[inline]
pub fn plane_from_pose(rotation: Quat, translation: Vec3, offset_along_normal: f32) -> StaticShape {
    let normal = rotation * Vec3::y();
    let dist = normal.dot(&translation) + offset_along_normal;
    StaticShape::Plane { normal, dist }
}

/// Convenience: build a `StaticShape::Cuboid` with given half extents and pose.
#[inline]
pub fn cuboid_from_pose(half_extents: Vec3, translation: Vec3, rotation: Quat) -> StaticShape {
    StaticShape::Cuboid {
        half_extents,
        transform: Transform::new(translation, rotation),
    }
}
