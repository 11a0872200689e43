use log::trace;

use crate::{
    collision::{CollisionWorld, ContactInfo, Vec3, settings::TOUCH_DISTANCE},
    constants::{DIRECTION_EPS, GROUND_PROBE_RADIUS_SCALE, STICKY_RAY_RADII},
};

use super::{
    orientation::blend,
    settings::CharacterSettings,
    state::{CapsuleState, MotionState},
};

/// Outcome of the per-tick ground probe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundProbe {
    pub grounded: bool,
    /// Surface normal under the capsule, or the reference up when nothing was hit.
    pub normal: Vec3,
    pub contact: Option<ContactInfo>,
}

/// Probe below the capsule with a short sphere sweep along `bottom - top`.
///
/// A hit counts as ground when the surface is shallow enough relative to
/// gravity, or when the character moves faster than `min_speed_to_rotate`.
/// The caller records the result with [`MotionState::set_grounded`].
pub fn classify_ground<W: CollisionWorld + ?Sized>(
    world: &W,
    settings: &CharacterSettings,
    capsule: &CapsuleState,
    motion: &MotionState,
) -> GroundProbe {
    let up = capsule.up_axis();
    let reference_up = settings.gravity_up().unwrap_or(up);

    let hit = world.sweep_sphere(
        capsule.bottom,
        -up,
        capsule.radius * GROUND_PROBE_RADIUS_SCALE,
        settings.ground_probe_distance,
    );

    match hit {
        None => GroundProbe {
            grounded: false,
            normal: reference_up,
            contact: None,
        },
        Some(contact) => {
            let grounded = is_walkable(settings, reference_up, contact.normal)
                || motion.speed() > settings.min_speed_to_rotate;
            trace!(
                "ground probe hit at {:.3}, normal {:?}, grounded {grounded}",
                contact.distance,
                contact.normal
            );
            GroundProbe {
                grounded,
                normal: contact.normal,
                contact: Some(contact),
            }
        }
    }
}

/// Bring a capsule the probe found grounded down onto its actual support.
///
/// The whole capsule is swept along its down axis over `ground_probe_distance`.
/// When the gap to the first hit exceeds `safety_margin` the capsule drops to rest
/// `safety_margin` above it. The returned probe is re-judged against that support
/// contact, so a capsule perched on a corner too steep to stand on is released
/// even when the sphere probe sees flat ground further down.
pub fn settle_on_ground<W: CollisionWorld + ?Sized>(
    world: &W,
    settings: &CharacterSettings,
    capsule: &CapsuleState,
    motion: &MotionState,
) -> Option<(CapsuleState, GroundProbe)> {
    let up = capsule.up_axis();
    let reference_up = settings.gravity_up().unwrap_or(up);
    let support = world.sweep_capsule(
        capsule.bottom,
        capsule.top,
        capsule.radius,
        -up,
        settings.ground_probe_distance,
    )?;

    let grounded = is_walkable(settings, reference_up, support.normal)
        || motion.speed() > settings.min_speed_to_rotate;
    let gap = support.distance - settings.safety_margin;
    let settled = if grounded && gap > TOUCH_DISTANCE {
        trace!("settling capsule by {gap:.4} onto {:?}", support.point);
        capsule.translated(-up * gap)
    } else {
        *capsule
    };

    let probe = GroundProbe {
        grounded,
        normal: support.normal,
        contact: Some(support),
    };
    Some((settled, probe))
}

/// `angle(gravity, normal) > 90° + max_steepness`.
fn is_walkable(settings: &CharacterSettings, reference_up: Vec3, normal: Vec3) -> bool {
    let down = -reference_up;
    down.angle(&normal).to_degrees() > 90.0 + settings.max_steepness_deg
}

/// Try to pull a grounded capsule back onto the surface below it.
///
/// Two rays are cast down the capsule axis: one from the bottom cap center and one
/// `sticky_probe_spacing` ahead along the motion. Both must hit, and their normals
/// must agree within `sticky_max_normal_deviation_deg`, so sharp convex edges are
/// left alone. The capsule drops along its axis until flush with the surface; the
/// drop must be positive and no longer than the radius, and the snapped pose must
/// be clear. The up-axis is re-blended around the new bottom.
pub fn stick_to_ground<W: CollisionWorld + ?Sized>(
    world: &W,
    settings: &CharacterSettings,
    capsule: &CapsuleState,
    motion: &MotionState,
    step_dir: Vec3,
) -> Option<CapsuleState> {
    let up = capsule.up_axis();
    let down = -up;
    let ahead = (step_dir - up * step_dir.dot(&up)).try_normalize(DIRECTION_EPS)?;
    let reach = capsule.radius * STICKY_RAY_RADII;

    let here = world.raycast(capsule.bottom, down, reach)?;
    let there = world.raycast(
        capsule.bottom + ahead * settings.sticky_probe_spacing,
        down,
        reach,
    )?;
    if here.normal.angle(&there.normal).to_degrees() > settings.sticky_max_normal_deviation_deg {
        return None;
    }

    let n = here.normal;
    let facing = up.dot(&n);
    if facing <= DIRECTION_EPS {
        return None;
    }
    let drop = here.distance - capsule.radius / facing;
    if !(drop > TOUCH_DISTANCE && drop <= capsule.radius) {
        return None;
    }

    let bottom = capsule.bottom + down * drop;
    let reference_up = settings.gravity_up().unwrap_or(up);
    let new_up = blend(
        reference_up,
        n,
        motion.speed(),
        settings.min_speed_to_rotate,
        settings.max_speed_to_rotate,
    );
    let snapped = capsule.placed(bottom, new_up);
    if world.overlap_capsule(snapped.bottom, snapped.top, snapped.radius) {
        return None;
    }
    trace!("sticky ground dropped capsule by {drop:.4}");
    Some(snapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Quat, StaticShape, StaticWorld, cuboid_from_pose, plane_from_pose};
    use approx::assert_relative_eq;

    fn flat() -> StaticWorld {
        StaticWorld::from_shapes(vec![StaticShape::Plane {
            normal: Vec3::y(),
            dist: 0.0,
        }])
    }

    fn at(bottom: Vec3) -> CapsuleState {
        CapsuleState::new(bottom, bottom + Vec3::new(0.0, 0.5, 0.0), 0.25)
    }

    fn moving(speed: f32) -> MotionState {
        MotionState {
            velocity: Vec3::new(speed, 0.0, 0.0),
            ..MotionState::new()
        }
    }

    #[test]
    fn resting_on_flat_ground_is_grounded() {
        let settings = CharacterSettings::default();
        let probe = classify_ground(
            &flat(),
            &settings,
            &at(Vec3::new(0.0, 0.25, 0.0)),
            &moving(0.0),
        );
        assert!(probe.grounded);
        assert_relative_eq!(probe.normal, Vec3::y(), epsilon = 1.0e-5);
    }

    #[test]
    fn high_above_ground_is_airborne() {
        let settings = CharacterSettings::default();
        let probe = classify_ground(
            &flat(),
            &settings,
            &at(Vec3::new(0.0, 2.0, 0.0)),
            &moving(0.0),
        );
        assert!(!probe.grounded);
        assert!(probe.contact.is_none());
        assert_eq!(probe.normal, Vec3::y());
    }

    #[test]
    fn steep_face_needs_speed_to_count_as_ground() {
        // 60 degree slope, steeper than the 45 degree default.
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), 60f32.to_radians());
        let world = StaticWorld::from_shapes(vec![plane_from_pose(rotation, Vec3::zeros(), 0.0)]);
        let settings = CharacterSettings::default();
        let n = rotation * Vec3::y();

        // Bottom cap center 0.2 from the plane along its normal.
        let capsule = at(n * 0.2);
        let slow = classify_ground(&world, &settings, &capsule, &moving(1.0));
        assert!(slow.contact.is_some());
        assert!(!slow.grounded);

        let fast = classify_ground(&world, &settings, &capsule, &moving(8.0));
        assert!(fast.grounded);
    }

    #[test]
    fn hovering_capsule_settles_onto_the_floor() {
        let settings = CharacterSettings::default();
        let hovering = at(Vec3::new(0.0, 0.4, 0.0));
        let probe = classify_ground(&flat(), &settings, &hovering, &moving(0.0));
        assert!(probe.grounded);

        let (settled, support) = settle_on_ground(&flat(), &settings, &hovering, &moving(0.0))
            .expect("floor within reach");
        assert!(support.grounded);
        assert_relative_eq!(settled.bottom.y, 0.25 + settings.safety_margin, epsilon = 1.0e-4);
        assert_relative_eq!(support.normal, Vec3::y(), epsilon = 1.0e-5);
    }

    #[test]
    fn resting_capsule_is_not_moved_by_settling() {
        let settings = CharacterSettings::default();
        let resting = at(Vec3::new(0.0, 0.25, 0.0));
        let (settled, support) = settle_on_ground(&flat(), &settings, &resting, &moving(0.0))
            .expect("floor under the capsule");
        assert_eq!(settled, resting);
        assert!(support.grounded);
    }

    #[test]
    fn corner_too_steep_to_stand_on_is_not_ground() {
        // Ledge top at y = 0 for x <= 0, lower floor at y = -0.2.
        let world = StaticWorld::from_shapes(vec![
            StaticShape::Plane {
                normal: Vec3::y(),
                dist: -0.2,
            },
            cuboid_from_pose(
                Vec3::new(1.0, 1.0, 2.0),
                Vec3::new(-1.0, -1.0, 0.0),
                Quat::identity(),
            ),
        ]);
        let settings = CharacterSettings::default();
        // Bottom sphere overhangs the edge by 0.2 and rests on the corner.
        let perched = at(Vec3::new(0.2, 0.16, 0.0));

        let probe = classify_ground(&world, &settings, &perched, &moving(0.0));
        assert!(probe.grounded, "the sphere probe only sees the lower floor");

        let (settled, support) = settle_on_ground(&world, &settings, &perched, &moving(0.0))
            .expect("corner under the capsule");
        assert!(!support.grounded);
        assert_eq!(settled, perched);
        assert!(support.normal.x > 0.5);
    }

    #[test]
    fn sticky_ground_pulls_capsule_down_onto_slope() {
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), 20f32.to_radians());
        let world = StaticWorld::from_shapes(vec![plane_from_pose(rotation, Vec3::zeros(), 0.0)]);
        let settings = CharacterSettings::default();
        let n = rotation * Vec3::y();

        // Flush position shifted up by 0.1.
        let flush = n * 0.25;
        let capsule = at(flush + Vec3::new(0.0, 0.1, 0.0));
        let snapped = stick_to_ground(&world, &settings, &capsule, &moving(2.0), Vec3::x())
            .expect("slope within reach");

        assert_relative_eq!(snapped.bottom, flush, epsilon = 1.0e-4);
        // Slow: stays upright.
        assert_relative_eq!(snapped.up_axis(), Vec3::y(), epsilon = 1.0e-5);
    }

    #[test]
    fn sticky_ground_ignores_drops_larger_than_radius() {
        let settings = CharacterSettings::default();
        let capsule = at(Vec3::new(0.0, 0.6, 0.0));
        assert!(stick_to_ground(&flat(), &settings, &capsule, &moving(2.0), Vec3::x()).is_none());
    }

    #[test]
    fn sticky_ground_rejects_sharp_ridges() {
        // Cube turned 45 degrees about Z: a ridge along Z at the origin with faces
        // sloping down at 45 degrees on either side.
        let world = StaticWorld::from_shapes(vec![cuboid_from_pose(
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, -std::f32::consts::SQRT_2, 0.0),
            Quat::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_4),
        )]);
        let settings = CharacterSettings::default();
        // The two rays straddle the ridge and see normals 90 degrees apart.
        let capsule = at(Vec3::new(-0.03, 0.45, 0.0));
        assert!(stick_to_ground(&world, &settings, &capsule, &moving(2.0), Vec3::x()).is_none());

        // Same drop with both rays on one face reattaches.
        let capsule = at(Vec3::new(-0.2, 0.28, 0.0));
        assert!(stick_to_ground(&world, &settings, &capsule, &moving(2.0), Vec3::x()).is_some());
    }

    #[test]
    fn sticky_ground_needs_lateral_motion() {
        let settings = CharacterSettings::default();
        let capsule = at(Vec3::new(0.0, 0.3, 0.0));
        assert!(stick_to_ground(&flat(), &settings, &capsule, &moving(2.0), -Vec3::y()).is_none());
    }
}
