/*!
Core collision types and math aliases shared by the collision submodules.

No algorithms live here. It defines the data types
exchanged between:
- broad (world-space AABB pruning)
- narrow_phase (parry3d shape casts, ray casts and contacts)
- world (the `CollisionWorld` trait and the static backend)
- the controller (sweep-and-slide, depenetration, ground probes)

Notes
- Every query result is a value: a contact never outlives the resolver iteration
  that asked for it, and colliders are referred to by opaque handles.
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// A rigid transform (isometry) in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::identity())
    }

    /// Convert to nalgebra `Isometry3` for use with parry3d narrow-phase queries.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(
            na::Translation3::new(self.translation.x, self.translation.y, self.translation.z),
            self.rotation,
        )
    }
}

/// Static collision shapes supported by the world.
///
/// - Plane: infinite plane in world-space represented by its normal and offset (dist)
///          satisfying: normal ⋅ x = dist. Everything below the plane is solid.
/// - Finite shapes are described in local space (Y-aligned where it matters) and
///   placed by `transform`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StaticShape {
    Plane {
        /// World-space unit normal of the plane.
        normal: Vec3,
        /// Plane offset along the normal, i.e., normal ⋅ x = dist.
        dist: f32,
    },
    Cuboid {
        /// Local-space half-extents (hx, hy, hz).
        half_extents: Vec3,
        transform: Transform,
    },
    Sphere {
        radius: f32,
        /// World-space pose (translation used; rotation ignored).
        transform: Transform,
    },
    Capsule {
        radius: f32,
        /// Half of the cylinder length along the local +Y axis.
        half_height: f32,
        transform: Transform,
    },
    Cylinder {
        radius: f32,
        half_height: f32,
        transform: Transform,
    },
    Cone {
        radius: f32,
        half_height: f32,
        transform: Transform,
    },
}

impl StaticShape {
    #[inline]
    pub fn is_plane(&self) -> bool {
        matches!(self, StaticShape::Plane { .. })
    }
}

/// Opaque identifier of a collider inside a [`super::CollisionWorld`].
///
/// The controller only ever stores and passes these back to the world that
/// produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderHandle(pub u32);

/// First obstruction reported by a sweep or ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactInfo {
    /// World-space contact point on the struck surface.
    pub point: Vec3,
    /// Unit surface normal, pointing away from the struck collider.
    pub normal: Vec3,
    /// Distance travelled along the query direction before contact (meters).
    pub distance: f32,
    pub collider: ColliderHandle,
}

/// Minimum translation that separates the query capsule from one collider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Penetration {
    /// Unit direction to push the capsule.
    pub direction: Vec3,
    /// Penetration depth (meters, positive).
    pub distance: f32,
}

impl Penetration {
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.direction * self.distance
    }
}
