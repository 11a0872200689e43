use log::{debug, trace};

use crate::{
    collision::{CollisionWorld, ContactInfo, Vec3},
    constants::{DIRECTION_EPS, FLOOR_CONTACT_DOT, MAX_EXTRA_SWEEPS, MIN_SLIDE_RATIO},
};

use super::{
    ground::stick_to_ground,
    orientation::blend,
    penetration::resolve_penetration,
    settings::CharacterSettings,
    state::{CapsuleState, MotionState},
    trace::{Trace, TraceTag},
};

/// Result of one collide-and-slide pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolved {
    pub capsule: CapsuleState,
    pub motion: MotionState,
    /// Sweeps performed.
    pub iterations: u32,
    /// The loop gave up with motion left over (underflowing step or sweep cap).
    pub stalled: bool,
}

/// Move `capsule` by `offset`, sliding along whatever it hits.
///
/// Algorithm
/// - Offsets shorter than `min_offset` are ignored entirely.
/// - An airborne capsule is first stood upright against gravity around its center.
/// - The offset is consumed in sweeps of at most `max_step`. A clear sweep
///   advances, double-checked with an overlap test and depenetration; grounded
///   characters then try to stick to the surface below.
/// - A blocked sweep stops `safety_margin` short of the contact. Floor-like contacts
///   (`dot(up, normal) > 0.3`) stand the capsule on the surface with a blended up-axis,
///   walls only translate. The remaining offset and the velocity lose their normal
///   component; a character grounded last tick keeps its speed through the contact.
/// - Sweeps are capped at `ceil(|offset| / max_step) + MAX_EXTRA_SWEEPS`.
/// - Finally the facing direction follows the slid velocity if the tick moved
///   more than `flicker_threshold`.
pub fn resolve<W: CollisionWorld + ?Sized>(
    world: &W,
    settings: &CharacterSettings,
    capsule: CapsuleState,
    motion: MotionState,
    offset: Vec3,
    trace: &mut Trace,
) -> Resolved {
    let offset_len = offset.norm();
    if !(offset_len >= settings.min_offset) {
        return Resolved {
            capsule,
            motion,
            iterations: 0,
            stalled: false,
        };
    }

    let mut capsule = capsule;
    let mut motion = motion;
    let gravity_up = settings.gravity_up().unwrap_or_else(|| capsule.up_axis());
    if !motion.grounded {
        capsule = capsule.reoriented_about_center(gravity_up);
    }

    let max_iterations = (offset_len / settings.max_step).ceil() as u32 + MAX_EXTRA_SWEEPS;
    let mut remaining = offset;
    let mut iterations = 0;
    let mut stalled = false;

    while remaining.norm() > settings.min_offset {
        if iterations >= max_iterations {
            debug!(
                "sweep cap of {max_iterations} reached with {:.4} left",
                remaining.norm()
            );
            stalled = true;
            break;
        }

        let len = remaining.norm();
        let step = if len <= settings.max_step {
            remaining
        } else {
            remaining * (settings.max_step / len)
        };
        let step_len = step.norm();
        if step_len < settings.min_offset {
            stalled = true;
            break;
        }
        let dir = step / step_len;
        iterations += 1;

        match world.sweep_capsule(capsule.bottom, capsule.top, capsule.radius, dir, step_len) {
            None => {
                let advanced = capsule.translated(step);
                capsule = advanced;
                remaining -= step;

                if world.overlap_capsule(advanced.bottom, advanced.top, advanced.radius) {
                    let fix = resolve_penetration(world, advanced, settings.safety_margin, trace);
                    if fix.corrected {
                        capsule = fix.capsule;
                        if let Some(n) = (fix.capsule.bottom - advanced.bottom)
                            .try_normalize(DIRECTION_EPS)
                        {
                            remaining -= n * remaining.dot(&n);
                        }
                    }
                }

                let snapped = if motion.grounded {
                    stick_to_ground(world, settings, &capsule, &motion, dir)
                } else {
                    None
                };
                if let Some(snapped) = snapped {
                    trace.push(capsule.bottom, snapped.bottom, TraceTag::StickyGround);
                    capsule = snapped;
                }
            }
            Some(hit) => {
                capsule =
                    slide_to_contact(settings, capsule, &motion, gravity_up, dir, &hit, trace);
                remaining -= dir * hit.distance;
                remaining -= hit.normal * remaining.dot(&hit.normal);
                motion.velocity =
                    project_velocity(motion.velocity, hit.normal, motion.was_grounded);
            }
        }
    }

    if offset_len > settings.flicker_threshold {
        let up = capsule.up_axis();
        let planar = motion.velocity - up * motion.velocity.dot(&up);
        if let Some(facing) = planar.try_normalize(DIRECTION_EPS) {
            motion.facing_dir = facing;
        }
    }

    Resolved {
        capsule,
        motion,
        iterations,
        stalled,
    }
}

/// Place the capsule against `hit`, backed off by `safety_margin` along `dir`.
fn slide_to_contact(
    settings: &CharacterSettings,
    capsule: CapsuleState,
    motion: &MotionState,
    gravity_up: Vec3,
    dir: Vec3,
    hit: &ContactInfo,
    trace: &mut Trace,
) -> CapsuleState {
    let err = dir * settings.safety_margin;
    let n = hit.normal;

    if capsule.up_axis().dot(&n) > FLOOR_CONTACT_DOT {
        trace!("floor contact at {:?}, normal {:?}", hit.point, n);
        trace.push(hit.point, hit.point + n, TraceTag::FloorContact);
        let bottom = hit.point + n * capsule.radius - err;
        let up = blend(
            gravity_up,
            n,
            motion.speed(),
            settings.min_speed_to_rotate,
            settings.max_speed_to_rotate,
        );
        capsule.placed(bottom, up)
    } else {
        trace!("wall contact at {:?}, normal {:?}", hit.point, n);
        trace.push(hit.point, hit.point + n, TraceTag::WallContact);
        capsule.translated(dir * hit.distance - err)
    }
}

/// Remove the component of `velocity` along `normal`.
///
/// With `keep_speed` the result is rescaled to the incoming speed. A head-on
/// contact, whose projection keeps less than `MIN_SLIDE_RATIO` of the speed,
/// stops dead instead.
pub fn project_velocity(velocity: Vec3, normal: Vec3, keep_speed: bool) -> Vec3 {
    let projected = velocity - normal * velocity.dot(&normal);
    if !keep_speed {
        return projected;
    }
    let speed = velocity.norm();
    let projected_len = projected.norm();
    if projected_len <= speed * MIN_SLIDE_RATIO || projected_len <= DIRECTION_EPS {
        return Vec3::zeros();
    }
    projected * (speed / projected_len)
}
