//! Schema-agnostic definitions of immutable world colliders.
//!
//! Callers map their own scene data to [`WorldStaticDef`] and hand the list to
//! [`super::StaticWorld::build`].
//!
//! Conventions
//! - Units are meters.
//! - Rotation is a unit quaternion.
//! - For planes, we use a pose-derived normal: `normal = rotation * +Y`,
//!   and compute `dist = dot(normal, translation) + offset_along_normal`.

use crate::error::WorldError;

use super::types::{Quat, StaticShape, Transform, Vec3};

/// Canonical definition of an immutable world collider.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldStaticDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    /// World-space translation.
    pub translation: Vec3,
    /// World-space rotation (unit quaternion).
    pub rotation: Quat,
    pub shape: ColliderShapeDef,
}

/// Supported static collider shapes.
///
/// Keep this intentionally small and deterministic. Extend as needed.
#[derive(Clone, Debug, PartialEq)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space).
    ///
    /// The plane normal is derived from the pose as `rotation * +Y`; everything
    /// behind it is solid.
    Plane {
        /// Offset along the plane normal (meters).
        offset_along_normal: f32,
    },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vec3 },

    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Y-aligned cylinder (meters).
    CylinderY { radius: f32, half_height: f32 },

    /// Y-aligned cone (meters).
    ConeY { radius: f32, half_height: f32 },
}

impl WorldStaticDef {
    #[inline]
    pub fn new(id: u32, translation: Vec3, rotation: Quat, shape: ColliderShapeDef) -> Self {
        Self {
            id,
            translation,
            rotation,
            shape,
        }
    }

    /// Reject definitions that would produce NaNs or degenerate shapes in queries.
    pub fn validate(&self) -> Result<(), WorldError> {
        let q = self.rotation.quaternion();
        let pose_finite = self.translation.iter().all(|c| c.is_finite())
            && q.coords.iter().all(|c| c.is_finite());
        if !pose_finite {
            return Err(WorldError::NonFinitePose { id: self.id });
        }

        let positive = |field: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(WorldError::InvalidDimension {
                    id: self.id,
                    field,
                    value,
                })
            }
        };

        match self.shape {
            ColliderShapeDef::Plane {
                offset_along_normal,
            } => {
                if !offset_along_normal.is_finite() {
                    return Err(WorldError::InvalidDimension {
                        id: self.id,
                        field: "offset_along_normal",
                        value: offset_along_normal,
                    });
                }
                Ok(())
            }
            ColliderShapeDef::Cuboid { half_extents } => {
                positive("half_extents.x", half_extents.x)?;
                positive("half_extents.y", half_extents.y)?;
                positive("half_extents.z", half_extents.z)
            }
            ColliderShapeDef::Sphere { radius } => positive("radius", radius),
            ColliderShapeDef::CapsuleY {
                radius,
                half_height,
            }
            | ColliderShapeDef::CylinderY {
                radius,
                half_height,
            }
            | ColliderShapeDef::ConeY {
                radius,
                half_height,
            } => {
                positive("radius", radius)?;
                positive("half_height", half_height)
            }
        }
    }

    /// Convert to the world-space shape used by the narrow phase.
    pub fn to_static_shape(&self) -> StaticShape {
        let transform = Transform::new(self.translation, self.rotation);
        match self.shape {
            ColliderShapeDef::Plane {
                offset_along_normal,
            } => {
                // n = R * +Y; with pose translation `t`, dist = n ⋅ t + offset.
                let normal = self.rotation * Vec3::y();
                let dist = normal.dot(&self.translation) + offset_along_normal;
                StaticShape::Plane { normal, dist }
            }
            ColliderShapeDef::Cuboid { half_extents } => StaticShape::Cuboid {
                half_extents,
                transform,
            },
            ColliderShapeDef::Sphere { radius } => StaticShape::Sphere { radius, transform },
            ColliderShapeDef::CapsuleY {
                radius,
                half_height,
            } => StaticShape::Capsule {
                radius,
                half_height,
                transform,
            },
            ColliderShapeDef::CylinderY {
                radius,
                half_height,
            } => StaticShape::Cylinder {
                radius,
                half_height,
                transform,
            },
            ColliderShapeDef::ConeY {
                radius,
                half_height,
            } => StaticShape::Cone {
                radius,
                half_height,
                transform,
            },
        }
    }
}
