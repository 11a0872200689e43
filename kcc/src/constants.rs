//! Controller defaults and fixed algorithm parameters.
//!
//! Tunables that vary per character live in [`crate::controller::CharacterSettings`];
//! the `DEFAULT_*` values here are its defaults. The remaining constants are part
//! of the algorithm and are not configurable.

/// Capsule radius (meters).
pub const DEFAULT_RADIUS: f32 = 0.25;

/// Distance between the two cap centers (meters).
pub const DEFAULT_SEGMENT_LENGTH: f32 = 0.5;

/// Remaining offsets shorter than this are dropped (meters).
pub const DEFAULT_MIN_OFFSET: f32 = 0.01;

/// Longest single sweep the resolver performs (meters).
pub const DEFAULT_MAX_STEP: f32 = 0.5;

/// Gap kept between the capsule and any surface it stops against (meters).
pub const DEFAULT_SAFETY_MARGIN: f32 = 0.01;

pub const DEFAULT_ACCELERATION: f32 = 20.0;
pub const DEFAULT_BRAKE_ACCELERATION: f32 = 20.0;
pub const DEFAULT_ANGULAR_ACCELERATION: f32 = 10.0;

/// Speed cap while walking (m/s). Running is uncapped.
pub const DEFAULT_WALK_SPEED: f32 = 6.0;

/// Below this speed the capsule stays aligned with gravity (m/s).
pub const DEFAULT_MIN_SPEED_TO_ROTATE: f32 = 6.0;

/// At or above this speed the capsule fully aligns with the contact normal (m/s).
pub const DEFAULT_MAX_SPEED_TO_ROTATE: f32 = 12.0;

/// Steepest walkable slope at low speed (degrees).
pub const DEFAULT_MAX_STEEPNESS_DEG: f32 = 45.0;

/// Gravity acceleration (m/s²).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -10.0, 0.0];

/// Length of the downward ground probe (meters).
pub const DEFAULT_GROUND_PROBE_DISTANCE: f32 = 0.3;

/// Per-tick travel below which the facing direction is left alone (meters).
pub const DEFAULT_FLICKER_THRESHOLD: f32 = 0.015;

/// Spacing between the two sticky-ground rays (meters).
pub const DEFAULT_STICKY_PROBE_SPACING: f32 = 0.05;

/// Largest angle between the two sticky-ground normals (degrees).
pub const DEFAULT_STICKY_MAX_NORMAL_DEVIATION_DEG: f32 = 45.0;

/// A contact is floor-like when `dot(up_axis, normal)` exceeds this.
pub const FLOOR_CONTACT_DOT: f32 = 0.3;

/// Grounded slides that keep less than this fraction of the speed stop dead.
pub const MIN_SLIDE_RATIO: f32 = 1.0e-2;

/// Upper bound on depenetration passes per call.
pub const PENETRATION_MAX_ITERATIONS: u32 = 10;

/// Sweeps allowed beyond `ceil(|offset| / max_step)` before the resolver gives up.
pub const MAX_EXTRA_SWEEPS: u32 = 8;

/// Ground probe sphere radius relative to the capsule radius.
pub const GROUND_PROBE_RADIUS_SCALE: f32 = 0.5;

/// Sticky-ground rays reach this many radii below the bottom cap center.
pub const STICKY_RAY_RADII: f32 = 3.0;

/// Lateral braking multiplier applied when input reverses the current velocity.
pub const BRAKE_MULTIPLIER: f32 = 5.0;

/// `dot(velocity, desired_dir)` below this counts as a reversal.
pub const REVERSAL_DOT: f32 = -0.9;

/// Smallest vector length treated as a usable direction.
pub const DIRECTION_EPS: f32 = 1.0e-6;
