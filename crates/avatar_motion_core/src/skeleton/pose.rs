use bevy::{
    math::{EulerRot, Quat, Vec3},
    platform::collections::HashMap,
};

use super::joint::HumanoidJoint;
use crate::{interpolation::SmoothedValue, smoothing::SmoothingTable};

/// One rotational degree of freedom of one joint.
pub type JointChannel = SmoothedValue;

/// Euler order used to turn pitch/yaw/roll channels into a rotation.
pub const JOINT_EULER: EulerRot = EulerRot::YXZ;

/// Pitch (x), yaw (y) and roll (z) channels of a joint.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JointRotation {
    pub pitch: JointChannel,
    pub yaw: JointChannel,
    pub roll: JointChannel,
}

impl JointRotation {
    pub fn new(smoothing_time: f32, max_speed: Option<f32>) -> Self {
        let channel = JointChannel::new(0., smoothing_time).with_max_speed(max_speed);
        Self {
            pitch: channel,
            yaw: channel,
            roll: channel,
        }
    }

    pub fn channels_mut(&mut self) -> [&mut JointChannel; 3] {
        [&mut self.pitch, &mut self.yaw, &mut self.roll]
    }

    pub fn set_smoothing(&mut self, smoothing_time: f32, max_speed: Option<f32>) {
        for channel in self.channels_mut() {
            channel.smoothing_time = smoothing_time;
            channel.max_speed = max_speed;
        }
    }

    /// Sets targets from a `(pitch, yaw, roll)` vector.
    pub fn set_target(&mut self, target: Vec3) {
        self.pitch.set_target(target.x);
        self.yaw.set_target(target.y);
        self.roll.set_target(target.z);
    }

    pub fn step(&mut self, dt: f32) {
        for channel in self.channels_mut() {
            channel.step(dt);
        }
    }

    /// Current `(pitch, yaw, roll)`.
    pub fn current(&self) -> Vec3 {
        Vec3::new(self.pitch.current, self.yaw.current, self.roll.current)
    }

    pub fn target(&self) -> Vec3 {
        Vec3::new(self.pitch.target, self.yaw.target, self.roll.target)
    }

    pub fn to_quat(&self) -> Quat {
        euler_to_quat(self.current())
    }
}

pub fn euler_to_quat(pitch_yaw_roll: Vec3) -> Quat {
    Quat::from_euler(
        JOINT_EULER,
        pitch_yaw_roll.y,
        pitch_yaw_roll.x,
        pitch_yaw_roll.z,
    )
}

/// Smoothed rotation channels for the joints a rig actually has.
#[derive(Clone, Debug, Default)]
pub struct SkeletonPose {
    joints: HashMap<HumanoidJoint, JointRotation>,
}

impl SkeletonPose {
    pub fn for_joints(
        joints: impl IntoIterator<Item = HumanoidJoint>,
        table: &SmoothingTable,
        max_speed: Option<f32>,
    ) -> Self {
        Self {
            joints: joints
                .into_iter()
                .map(|joint| {
                    (
                        joint,
                        JointRotation::new(table.time_for(joint.role()), max_speed),
                    )
                })
                .collect(),
        }
    }

    pub fn get(&self, joint: HumanoidJoint) -> Option<&JointRotation> {
        self.joints.get(&joint)
    }

    pub fn get_mut(&mut self, joint: HumanoidJoint) -> Option<&mut JointRotation> {
        self.joints.get_mut(&joint)
    }

    pub fn contains(&self, joint: HumanoidJoint) -> bool {
        self.joints.contains_key(&joint)
    }

    pub fn iter(&self) -> impl Iterator<Item = (HumanoidJoint, &JointRotation)> {
        self.joints.iter().map(|(joint, rotation)| (*joint, rotation))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (HumanoidJoint, &mut JointRotation)> {
        self.joints
            .iter_mut()
            .map(|(joint, rotation)| (*joint, rotation))
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Current rotation of `joint`, relative to its rest rotation.
    pub fn rotation(&self, joint: HumanoidJoint) -> Option<Quat> {
        self.get(joint).map(JointRotation::to_quat)
    }
}
