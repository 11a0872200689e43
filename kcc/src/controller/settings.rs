use serde::{Deserialize, Serialize};

use crate::{collision::Vec3, constants::*, error::SettingsError};

/// Per-character tunables.
///
/// Missing fields deserialize to their defaults, so a settings file only needs
/// to list what it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterSettings {
    pub radius: f32,
    /// Distance between the bottom and top cap centers.
    pub segment_length: f32,
    pub min_offset: f32,
    pub max_step: f32,
    pub safety_margin: f32,
    pub acceleration: f32,
    pub brake_acceleration: f32,
    pub angular_acceleration: f32,
    pub walk_speed: f32,
    pub min_speed_to_rotate: f32,
    pub max_speed_to_rotate: f32,
    /// Steepest walkable slope at low speed, in degrees from horizontal.
    pub max_steepness_deg: f32,
    pub gravity: Vec3,
    pub ground_probe_distance: f32,
    pub flicker_threshold: f32,
    pub sticky_probe_spacing: f32,
    pub sticky_max_normal_deviation_deg: f32,
    /// Collect diagnostic trace records in each `TickResult`.
    pub record_trace: bool,
}

impl Default for CharacterSettings {
    fn default() -> Self {
        let [gx, gy, gz] = DEFAULT_GRAVITY;
        Self {
            radius: DEFAULT_RADIUS,
            segment_length: DEFAULT_SEGMENT_LENGTH,
            min_offset: DEFAULT_MIN_OFFSET,
            max_step: DEFAULT_MAX_STEP,
            safety_margin: DEFAULT_SAFETY_MARGIN,
            acceleration: DEFAULT_ACCELERATION,
            brake_acceleration: DEFAULT_BRAKE_ACCELERATION,
            angular_acceleration: DEFAULT_ANGULAR_ACCELERATION,
            walk_speed: DEFAULT_WALK_SPEED,
            min_speed_to_rotate: DEFAULT_MIN_SPEED_TO_ROTATE,
            max_speed_to_rotate: DEFAULT_MAX_SPEED_TO_ROTATE,
            max_steepness_deg: DEFAULT_MAX_STEEPNESS_DEG,
            gravity: Vec3::new(gx, gy, gz),
            ground_probe_distance: DEFAULT_GROUND_PROBE_DISTANCE,
            flicker_threshold: DEFAULT_FLICKER_THRESHOLD,
            sticky_probe_spacing: DEFAULT_STICKY_PROBE_SPACING,
            sticky_max_normal_deviation_deg: DEFAULT_STICKY_MAX_NORMAL_DEVIATION_DEG,
            record_trace: false,
        }
    }
}

impl CharacterSettings {
    /// Check every field before a character is built from these settings.
    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("radius", self.radius)?;
        positive("segment_length", self.segment_length)?;
        positive("min_offset", self.min_offset)?;
        positive("max_step", self.max_step)?;
        positive("walk_speed", self.walk_speed)?;
        positive("ground_probe_distance", self.ground_probe_distance)?;

        non_negative("safety_margin", self.safety_margin)?;
        non_negative("acceleration", self.acceleration)?;
        non_negative("brake_acceleration", self.brake_acceleration)?;
        non_negative("angular_acceleration", self.angular_acceleration)?;
        non_negative("min_speed_to_rotate", self.min_speed_to_rotate)?;
        non_negative("flicker_threshold", self.flicker_threshold)?;
        non_negative("sticky_probe_spacing", self.sticky_probe_spacing)?;

        if self.max_step <= self.min_offset {
            return Err(SettingsError::StepBelowMinOffset {
                max_step: self.max_step,
                min_offset: self.min_offset,
            });
        }
        if !(self.max_speed_to_rotate > self.min_speed_to_rotate)
            || !self.max_speed_to_rotate.is_finite()
        {
            return Err(SettingsError::RotationSpeedRange {
                min: self.min_speed_to_rotate,
                max: self.max_speed_to_rotate,
            });
        }

        angle("max_steepness_deg", self.max_steepness_deg)?;
        angle(
            "sticky_max_normal_deviation_deg",
            self.sticky_max_normal_deviation_deg,
        )?;

        if !self.gravity.iter().all(|c| c.is_finite()) {
            return Err(SettingsError::NonFiniteGravity([
                self.gravity.x,
                self.gravity.y,
                self.gravity.z,
            ]));
        }
        Ok(())
    }

    /// Unit vector opposite to gravity, or `None` when gravity is (near) zero.
    #[inline]
    pub fn gravity_up(&self) -> Option<Vec3> {
        (-self.gravity).try_normalize(DIRECTION_EPS)
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::Negative { field, value })
    }
}

fn angle(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if (0.0..90.0).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::AngleOutOfRange { field, value })
    }
}
