use thiserror::Error;

use crate::skeleton::JointRole;

#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProfileValidationError {
    #[error("smoothing time for {lighter:?} ({lighter_time}s) exceeds the one for {heavier:?} ({heavier_time}s)")]
    SmoothingOrder {
        lighter: JointRole,
        lighter_time: f32,
        heavier: JointRole,
        heavier_time: f32,
    },
    #[error("{0} must be strictly positive, got {1}")]
    NotPositive(&'static str, f32),
    #[error("blink interval [{min}, {max}] is empty or negative")]
    BlinkInterval { min: f32, max: f32 },
    #[error("{0} is outside the unit interval, got {1}")]
    OutOfUnitRange(&'static str, f32),
    #[error("frame delta range [{min}, {max}] is empty")]
    DeltaRange { min: f32, max: f32 },
}
