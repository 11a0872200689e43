use log::{debug, warn};

use crate::{
    collision::{CollisionWorld, Vec3},
    constants::{DIRECTION_EPS, PENETRATION_MAX_ITERATIONS},
};

use super::{
    state::CapsuleState,
    trace::{Trace, TraceTag},
};

/// Result of a depenetration attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PenetrationOutcome {
    pub capsule: CapsuleState,
    /// At least one push-out was applied.
    pub corrected: bool,
    /// The final pose was checked and overlaps nothing.
    pub resolved: bool,
    /// Push-out passes applied.
    pub iterations: u32,
}

/// Push `capsule` out of every collider it overlaps.
///
/// Each pass sums the minimum-translation vectors of all overlapping colliders
/// and moves by the sum plus `safety_margin` along its direction. Passes repeat
/// until the capsule is clear or `PENETRATION_MAX_ITERATIONS` is reached; a
/// best-effort pose is returned when it does not converge.
pub fn resolve_penetration<W: CollisionWorld + ?Sized>(
    world: &W,
    capsule: CapsuleState,
    safety_margin: f32,
    trace: &mut Trace,
) -> PenetrationOutcome {
    let mut current = capsule;
    let mut iterations = 0;

    while iterations < PENETRATION_MAX_ITERATIONS {
        let overlapping = world.overlap_colliders(current.bottom, current.top, current.radius);
        if overlapping.is_empty() {
            return PenetrationOutcome {
                capsule: current,
                corrected: iterations > 0,
                resolved: true,
                iterations,
            };
        }

        let push = overlapping
            .iter()
            .filter_map(|&other| {
                world.compute_penetration(current.bottom, current.top, current.radius, other)
            })
            .fold(Vec3::zeros(), |acc, p| acc + p.translation());

        let Some(dir) = push.try_normalize(DIRECTION_EPS) else {
            // Opposing pushes cancel out: there is no way out from here.
            debug!(
                "depenetration stalled against {} colliders at {:?}",
                overlapping.len(),
                current.position()
            );
            break;
        };

        let delta = push + dir * safety_margin;
        trace.push(
            current.position(),
            current.position() + delta,
            TraceTag::Depenetration,
        );
        current = current.translated(delta);
        iterations += 1;
    }

    let resolved = !world.overlap_capsule(current.bottom, current.top, current.radius);
    if !resolved {
        warn!(
            "capsule still penetrating after {iterations} depenetration passes at {:?}",
            current.position()
        );
    }
    PenetrationOutcome {
        capsule: current,
        corrected: iterations > 0,
        resolved,
        iterations,
    }
}
