//! # Avatar Motion Core
//!
//! Procedural motion for humanoid avatars: breathing, idle sway, gaze, emotion, lip movement and
//! blinking, blended every frame into one joint pose and one set of expression weights.
//!
//! The pipeline for one frame, driven by [`AnimationSession::advance`](session::AnimationSession):
//! - [`OrganicSignalSet`](signals::OrganicSignalSet) advances the breathing, idle and drift phases.
//! - [`LookAtSolver`](look_at::LookAtSolver) turns the gaze target into clamped head, neck and eye
//!   angles.
//! - [`compute_targets`](targets::compute_targets) derives a rotation target for every joint from
//!   the signals, the character state and the gaze.
//! - [`smooth_pose`](smoothing::smooth_pose) moves each joint toward its target with a
//!   critically damped spring whose smoothing time depends on the joint's role.
//! - [`ExpressionMixer`](expression::ExpressionMixer) produces the facial expression weights.
//!
//! Everything is tuned by one [`MotionProfile`](profile::MotionProfile), which can be loaded from
//! `*.motion.ron` files:
//! ```ron
//! (
//!     smoothing: (head: 0.1, hips: 0.5),
//!     look_at: (yaw_limit: 0.7),
//!     blink: (min_interval: 3.0, max_interval: 7.0),
//! )
//! ```
//! Fields left out keep their defaults.
//!
//! This crate holds no ECS systems. Rigs are read through [`SkeletonProvider`](skeleton::SkeletonProvider)
//! and written through [`PoseWriter`](skeleton::PoseWriter); faces are written through
//! [`ExpressionSink`](expression::ExpressionSink).

pub mod errors;
pub mod expression;
pub mod interpolation;
pub mod look_at;
pub mod profile;
pub mod session;
pub mod signals;
pub mod skeleton;
pub mod smoothing;
pub mod state;
pub mod targets;

pub mod prelude {
    pub use super::errors::*;
    pub use super::expression::*;
    pub use super::interpolation::*;
    pub use super::look_at::*;
    pub use super::profile::*;
    pub use super::session::*;
    pub use super::signals::*;
    pub use super::skeleton::*;
    pub use super::smoothing::*;
    pub use super::state::*;
    pub use super::targets::*;
}
