//! Turns a world-space gaze target into clamped head, neck and eye rotations.

use bevy::{
    math::{Quat, Vec3},
    reflect::{Reflect, std_traits::ReflectDefault},
};
use serde::{Deserialize, Serialize};

use crate::interpolation::DecayTowards;

#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(default)]
pub struct LookAtTuning {
    /// Half-life of the smoothed gaze point, in seconds
    pub target_half_life: f32,
    /// Scales head pitch before clamping
    pub vertical_damping: f32,
    pub yaw_limit: f32,
    pub pitch_limit: f32,
    /// Share of the head rotation given to the neck
    pub neck_fraction: f32,
    /// Eyes lead the head by this factor
    pub eye_multiplier: f32,
    pub eye_yaw_limit: f32,
    pub eye_pitch_limit: f32,
    /// Head height above the avatar root, used when the rig has no head joint
    pub default_head_height: f32,
}

impl Default for LookAtTuning {
    fn default() -> Self {
        Self {
            target_half_life: 0.08,
            vertical_damping: 0.6,
            yaw_limit: 0.55,
            pitch_limit: 0.35,
            neck_fraction: 0.35,
            eye_multiplier: 1.75,
            eye_yaw_limit: 0.8,
            eye_pitch_limit: 0.5,
            default_head_height: 1.45,
        }
    }
}

/// Gaze angles, in radians. Positive yaw turns toward +X, negative pitch looks up.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq)]
pub struct LookAtSolution {
    pub head_pitch: f32,
    pub head_yaw: f32,
    pub neck_pitch: f32,
    pub neck_yaw: f32,
    pub eye_pitch: f32,
    pub eye_yaw: f32,
}

impl LookAtSolution {
    /// Splits a head rotation into neck and eye rotations; eyes are clamped to their own limits.
    pub fn from_head(head_pitch: f32, head_yaw: f32, tuning: &LookAtTuning) -> Self {
        Self {
            head_pitch,
            head_yaw,
            neck_pitch: head_pitch * tuning.neck_fraction,
            neck_yaw: head_yaw * tuning.neck_fraction,
            eye_pitch: (head_pitch * tuning.eye_multiplier)
                .clamp(-tuning.eye_pitch_limit, tuning.eye_pitch_limit),
            eye_yaw: (head_yaw * tuning.eye_multiplier)
                .clamp(-tuning.eye_yaw_limit, tuning.eye_yaw_limit),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LookAtSolver {
    smoothed_target: Option<Vec3>,
    last: LookAtSolution,
}

impl LookAtSolver {
    /// `facing` is the avatar's world rotation; the solution is expressed in its frame, with
    /// +Z forward.
    pub fn solve(
        &mut self,
        head_position: Vec3,
        facing: Quat,
        target: Option<Vec3>,
        dt: f32,
        tuning: &LookAtTuning,
    ) -> LookAtSolution {
        let Some(target) = target else {
            self.smoothed_target = None;
            self.last = LookAtSolution::default();
            return self.last;
        };

        let smoothed = match self.smoothed_target {
            Some(previous) => previous.decay_towards(&target, tuning.target_half_life, dt),
            None => target,
        };
        self.smoothed_target = Some(smoothed);

        let Some(direction) = (facing.inverse() * (smoothed - head_position)).try_normalize()
        else {
            return self.last;
        };

        let yaw = direction
            .x
            .atan2(direction.z)
            .clamp(-tuning.yaw_limit, tuning.yaw_limit);
        let pitch = (-direction.y.clamp(-1., 1.).asin() * tuning.vertical_damping)
            .clamp(-tuning.pitch_limit, tuning.pitch_limit);

        self.last = LookAtSolution::from_head(pitch, yaw, tuning);
        self.last
    }

    pub fn last(&self) -> LookAtSolution {
        self.last
    }

    pub fn smoothed_target(&self) -> Option<Vec3> {
        self.smoothed_target
    }
}
