/*!
Kinematic capsule controller.

A character is a massless capsule driven by a velocity. Each tick runs:

- ground:       sphere-probe classification and the sticky-ground snap
- locomotion:   input steering, braking and gravity integration
- resolver:     swept collide-and-slide with floor/wall handling
- penetration:  summed minimum-translation push-out
- orientation:  speed-weighted up-axis blend and the boundary rotation
- character:    the `Character::step` entry point tying the above together

All geometry goes through the [`crate::collision::CollisionWorld`] trait.
*/

pub mod character;
pub mod ground;
pub mod locomotion;
pub mod orientation;
pub mod penetration;
pub mod resolver;
pub mod settings;
pub mod state;
pub mod trace;

pub use character::{Character, MoveInput, TickResult};
pub use ground::{GroundProbe, classify_ground, settle_on_ground, stick_to_ground};
pub use locomotion::{LocomotionParams, apply_gravity};
pub use orientation::{blend, look_rotation};
pub use penetration::{PenetrationOutcome, resolve_penetration};
pub use resolver::{Resolved, resolve};
pub use settings::CharacterSettings;
pub use state::{CapsuleState, MotionState};
pub use trace::{Trace, TraceRecord, TraceTag};
