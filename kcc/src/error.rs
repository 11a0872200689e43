//! Construction-time error types.
//!
//! A controller tick never fails; these only surface when building a character
//! from settings or a static world from definitions.

use thiserror::Error;

/// Invalid per-character settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    /// A length, speed or rate that must be strictly positive.
    #[error("`{field}` must be positive and finite, got {value}")]
    NotPositive {
        /// Settings field name.
        field: &'static str,
        /// Offending value.
        value: f32,
    },

    /// A quantity that may be zero but not negative.
    #[error("`{field}` must be non-negative and finite, got {value}")]
    Negative {
        /// Settings field name.
        field: &'static str,
        /// Offending value.
        value: f32,
    },

    /// The sweep step must be able to make progress past the motion epsilon.
    #[error("max_step ({max_step}) must be greater than min_offset ({min_offset})")]
    StepBelowMinOffset {
        /// Configured maximum sweep step.
        max_step: f32,
        /// Configured minimum offset.
        min_offset: f32,
    },

    /// The orientation blend needs a non-empty speed range.
    #[error("max_speed_to_rotate ({max}) must be greater than min_speed_to_rotate ({min})")]
    RotationSpeedRange {
        /// Configured lower bound.
        min: f32,
        /// Configured upper bound.
        max: f32,
    },

    /// An angle outside the range it is interpreted in.
    #[error("`{field}` must be within [0, 90) degrees, got {value}")]
    AngleOutOfRange {
        /// Settings field name.
        field: &'static str,
        /// Offending value in degrees.
        value: f32,
    },

    /// Gravity with NaN or infinite components.
    #[error("gravity must be finite, got {0:?}")]
    NonFiniteGravity([f32; 3]),
}

/// Invalid static world definitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    /// Translation or rotation contains NaN or infinite values.
    #[error("static collider {id} has a non-finite pose")]
    NonFinitePose {
        /// Definition id.
        id: u32,
    },

    /// A shape dimension that must be strictly positive.
    #[error("static collider {id} has an invalid `{field}`: {value}")]
    InvalidDimension {
        /// Definition id.
        id: u32,
        /// Shape field name.
        field: &'static str,
        /// Offending value.
        value: f32,
    },

    /// Two definitions share the same id, so insertion order would be ambiguous.
    #[error("duplicate static collider id {0}")]
    DuplicateId(u32),
}
