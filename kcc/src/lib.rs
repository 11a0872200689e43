pub mod collision;
pub mod constants;
pub mod controller;
pub mod error;

pub use collision::{
    ColliderHandle, ColliderShapeDef, CollisionWorld, ContactInfo, Penetration, Quat, StaticShape,
    StaticWorld, Vec3, WorldStaticDef,
};
pub use controller::{
    CapsuleState, Character, CharacterSettings, MotionState, MoveInput, TickResult, TraceRecord,
    TraceTag,
};
pub use error::{SettingsError, WorldError};
