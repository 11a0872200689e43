use crate::{collision::Vec3, constants::DIRECTION_EPS};

/// Collision volume of a character: two world-space cap centers and a radius.
///
/// The segment length stays fixed for the character's lifetime; reorienting
/// rotates the segment around one of its ends or its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapsuleState {
    pub bottom: Vec3,
    pub top: Vec3,
    pub radius: f32,
}

impl CapsuleState {
    #[inline]
    pub fn new(bottom: Vec3, top: Vec3, radius: f32) -> Self {
        Self {
            bottom,
            top,
            radius,
        }
    }

    /// Capsule centered at `center` whose segment points along unit `up`.
    pub fn centered(center: Vec3, up: Vec3, segment_length: f32, radius: f32) -> Self {
        let half = up * (segment_length * 0.5);
        Self::new(center - half, center + half, radius)
    }

    /// Midpoint of the segment.
    #[inline]
    pub fn position(&self) -> Vec3 {
        (self.top + self.bottom) * 0.5
    }

    /// Unit vector from bottom to top. Falls back to +Y for a collapsed segment.
    #[inline]
    pub fn up_axis(&self) -> Vec3 {
        (self.top - self.bottom)
            .try_normalize(DIRECTION_EPS)
            .unwrap_or_else(Vec3::y)
    }

    #[inline]
    pub fn segment_length(&self) -> f32 {
        (self.top - self.bottom).norm()
    }

    #[inline]
    pub fn translated(&self, delta: Vec3) -> Self {
        Self::new(self.bottom + delta, self.top + delta, self.radius)
    }

    /// Same capsule with its bottom at `bottom` and segment along unit `up`.
    pub fn placed(&self, bottom: Vec3, up: Vec3) -> Self {
        Self::new(bottom, bottom + up * self.segment_length(), self.radius)
    }

    /// Rotate the segment around its center so it points along unit `up`.
    pub fn reoriented_about_center(&self, up: Vec3) -> Self {
        Self::centered(self.position(), up, self.segment_length(), self.radius)
    }
}

/// Per-character motion state carried between ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionState {
    pub velocity: Vec3,
    pub grounded: bool,
    /// Value of `grounded` before the latest classification.
    pub was_grounded: bool,
    /// Heading used for the visual orientation.
    pub facing_dir: Vec3,
}

impl MotionState {
    /// Spawn state: at rest, grounded, facing +Z.
    pub fn new() -> Self {
        Self {
            velocity: Vec3::zeros(),
            grounded: true,
            was_grounded: true,
            facing_dir: Vec3::z(),
        }
    }

    /// Record a new classification, remembering the previous one.
    #[inline]
    pub fn set_grounded(&mut self, grounded: bool) {
        self.was_grounded = self.grounded;
        self.grounded = grounded;
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self::new()
    }
}
