//! Input-driven velocity update and gravity integration.

use crate::{
    collision::Vec3,
    constants::{BRAKE_MULTIPLIER, DIRECTION_EPS, REVERSAL_DOT},
};

use super::settings::CharacterSettings;

/// Acceleration parameters for one velocity update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocomotionParams {
    pub acceleration: f32,
    pub brake_acceleration: f32,
    pub angular_acceleration: f32,
    pub walk_speed: f32,
    /// Walking caps the speed; running does not.
    pub walking: bool,
}

impl LocomotionParams {
    pub fn from_settings(settings: &CharacterSettings, walking: bool) -> Self {
        Self {
            acceleration: settings.acceleration,
            brake_acceleration: settings.brake_acceleration,
            angular_acceleration: settings.angular_acceleration,
            walk_speed: settings.walk_speed,
            walking,
        }
    }
}

/// Update `velocity` from a desired direction.
///
/// A zero `desired_dir` means no input: a grounded character brakes by
/// `brake_acceleration * dt` without reversing, an airborne one keeps its velocity.
/// With input, grounded characters first shed up to `angular_acceleration * dt` of
/// the velocity component off the desired direction, then accelerate along it
/// (five times harder when reversing). Walking clamps the result to the larger of
/// the walk speed and the incoming speed.
pub fn update(
    velocity: Vec3,
    desired_dir: Vec3,
    grounded: bool,
    params: &LocomotionParams,
    dt: f32,
) -> Vec3 {
    let dt = dt.max(0.0);
    let incoming = velocity.norm();

    let Some(dir) = desired_dir.try_normalize(DIRECTION_EPS) else {
        return if grounded {
            brake(velocity, params.brake_acceleration * dt)
        } else {
            velocity
        };
    };

    let mut v = velocity;
    let mut multiplier = 1.0;
    if grounded {
        let lateral = v - dir * v.dot(&dir);
        let budget = params.angular_acceleration * dt;
        let lateral_len = lateral.norm();
        if lateral_len > budget {
            v -= lateral * (budget / lateral_len);
        } else {
            v -= lateral;
        }
        if v.dot(&dir) < REVERSAL_DOT {
            multiplier = BRAKE_MULTIPLIER;
        }
    }

    let next = v + dir * (params.acceleration * dt * multiplier);
    if params.walking {
        let cap = params.walk_speed.max(incoming);
        let speed = next.norm();
        if speed > cap {
            return next * (cap / speed);
        }
    }
    next
}

/// Reduce the magnitude of `velocity` by `amount`, stopping at zero.
#[inline]
pub fn brake(velocity: Vec3, amount: f32) -> Vec3 {
    let speed = velocity.norm();
    if speed > amount {
        velocity * ((speed - amount) / speed)
    } else {
        Vec3::zeros()
    }
}

/// Integrate gravity over `dt`.
///
/// Airborne (`ground_normal == None`) the full `gravity * dt` is added. On the
/// ground only the part of gravity tangent to the surface is added, so resting
/// contact does not feed speed into the slide renormalization.
pub fn apply_gravity(velocity: Vec3, gravity: Vec3, ground_normal: Option<Vec3>, dt: f32) -> Vec3 {
    let dt = dt.max(0.0);
    let g = match ground_normal {
        Some(n) => gravity - n * gravity.dot(&n),
        None => gravity,
    };
    velocity + g * dt
}
