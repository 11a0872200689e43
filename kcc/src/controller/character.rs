use log::trace;

use crate::{
    collision::{CollisionWorld, Quat, Vec3},
    constants::DIRECTION_EPS,
    error::SettingsError,
};

use super::{
    ground::{classify_ground, settle_on_ground},
    locomotion::{self, LocomotionParams},
    orientation::look_rotation,
    resolver::resolve,
    settings::CharacterSettings,
    state::{CapsuleState, MotionState},
    trace::{Trace, TraceRecord, TraceTag},
};

/// Movement request for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveInput {
    /// Desired world-space direction; zero means no input.
    pub direction: Vec3,
    /// Run instead of walk (no speed cap).
    pub run: bool,
}

impl MoveInput {
    /// No directional input.
    #[inline]
    pub fn idle() -> Self {
        Self {
            direction: Vec3::zeros(),
            run: false,
        }
    }

    #[inline]
    pub fn walk(direction: Vec3) -> Self {
        Self {
            direction,
            run: false,
        }
    }

    #[inline]
    pub fn run(direction: Vec3) -> Self {
        Self {
            direction,
            run: true,
        }
    }
}

impl Default for MoveInput {
    fn default() -> Self {
        Self::idle()
    }
}

/// Output of a single [`Character::step`].
#[derive(Clone, Debug, PartialEq)]
pub struct TickResult {
    /// Capsule center.
    pub position: Vec3,
    /// Local +Z along the facing direction, local +Y along the capsule axis.
    pub orientation: Quat,
    pub velocity: Vec3,
    pub grounded: bool,
    /// Empty unless `record_trace` is set.
    pub trace: Vec<TraceRecord>,
}

/// One kinematic capsule character.
#[derive(Clone, Debug)]
pub struct Character {
    settings: CharacterSettings,
    capsule: CapsuleState,
    motion: MotionState,
}

impl Character {
    /// Spawn an upright character centered at `spawn_position`.
    pub fn new(settings: CharacterSettings, spawn_position: Vec3) -> Result<Self, SettingsError> {
        settings.validate()?;
        let up = settings.gravity_up().unwrap_or_else(Vec3::y);
        let capsule = CapsuleState::centered(
            spawn_position,
            up,
            settings.segment_length,
            settings.radius,
        );
        Ok(Self {
            settings,
            capsule,
            motion: MotionState::new(),
        })
    }

    #[inline]
    pub fn settings(&self) -> &CharacterSettings {
        &self.settings
    }

    #[inline]
    pub fn capsule(&self) -> &CapsuleState {
        &self.capsule
    }

    #[inline]
    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.capsule.position()
    }

    /// Rotation handed to presentation: facing direction and capsule axis.
    pub fn orientation(&self) -> Quat {
        look_rotation(self.motion.facing_dir, self.capsule.top - self.capsule.bottom)
    }

    /// Replace the velocity, e.g. for knockback or teleport resets.
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.motion.velocity = velocity;
    }

    /// Advance the character by `dt` seconds.
    ///
    /// Order: ground classification and settling, input locomotion, gravity,
    /// collide-and-slide.
    /// Negative or non-finite `dt` is treated as zero.
    pub fn step<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        input: MoveInput,
        dt: f32,
    ) -> TickResult {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut trace = Trace::new(self.settings.record_trace);
        let start = self.capsule.position();

        // 1) Ground: classify, then rest on the support actually under the capsule.
        let mut probe = classify_ground(world, &self.settings, &self.capsule, &self.motion);
        if probe.grounded && dt > 0.0 {
            if let Some((settled, support)) =
                settle_on_ground(world, &self.settings, &self.capsule, &self.motion)
            {
                if settled != self.capsule {
                    trace.push(self.capsule.bottom, settled.bottom, TraceTag::StickyGround);
                    self.capsule = settled;
                }
                probe = support;
            }
        }
        self.motion.set_grounded(probe.grounded);

        // 2) Input: steer within the capsule's cross-section plane.
        let up = self.capsule.up_axis();
        let desired = (input.direction - up * input.direction.dot(&up))
            .try_normalize(DIRECTION_EPS)
            .unwrap_or_else(Vec3::zeros);
        let params = LocomotionParams::from_settings(&self.settings, !input.run);
        let velocity = locomotion::update(
            self.motion.velocity,
            desired,
            self.motion.grounded,
            &params,
            dt,
        );

        // 3) Gravity.
        let ground_normal = self.motion.grounded.then_some(probe.normal);
        self.motion.velocity =
            locomotion::apply_gravity(velocity, self.settings.gravity, ground_normal, dt);

        // 4) Collide and slide.
        let resolved = resolve(
            world,
            &self.settings,
            self.capsule,
            self.motion,
            self.motion.velocity * dt,
            &mut trace,
        );
        self.capsule = resolved.capsule;
        self.motion = resolved.motion;
        if resolved.stalled {
            trace!("motion stalled after {} sweeps", resolved.iterations);
        }

        let position = self.capsule.position();
        trace.push(start, position, TraceTag::Trajectory);
        let arrow = position + self.capsule.up_axis() * self.capsule.radius;
        trace.push(arrow, arrow + self.motion.velocity, TraceTag::Velocity);

        TickResult {
            position,
            orientation: self.orientation(),
            velocity: self.motion.velocity,
            grounded: self.motion.grounded,
            trace: trace.into_records(),
        }
    }
}
