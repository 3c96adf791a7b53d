//! Per-joint rotation targets from organic signals, character state and gaze.
//!
//! Targets are `(pitch, yaw, roll)` in radians relative to the bind pose, with the avatar facing
//! +Z, +X on its left and +Y up. Computing them is a pure function of the inputs: all the lag
//! comes later, from the per-role smoothing times.

use std::f32::consts::FRAC_PI_2;

use bevy::{
    math::Vec3,
    platform::collections::HashMap,
    reflect::{Reflect, std_traits::ReflectDefault},
};
use serde::{Deserialize, Serialize};

use crate::{
    look_at::{LookAtSolution, LookAtTuning},
    profile::MotionProfile,
    signals::{OrganicSignalSet, SignalKind},
    skeleton::{Finger, FingerSegment, HumanoidJoint, Side},
    state::StatePreset,
};

/// Amplitudes (radians), read speeds (multiples of the signal rate) and bind-pose biases.
///
/// Hips sway the most and the slowest, the head the least and the fastest.
#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(default)]
pub struct PoseTuning {
    pub head_sway: f32,
    pub head_nod: f32,
    pub head_roll: f32,
    pub head_speed: f32,
    pub head_drift: f32,
    pub head_breath: f32,

    pub hips_sway: f32,
    pub hips_roll: f32,
    pub hips_speed: f32,
    pub hips_breath: f32,

    /// Spine yaw is `-hips.yaw * spine_counter`
    pub spine_counter: f32,
    pub chest_counter: f32,
    pub spine_breath: f32,
    pub chest_breath: f32,
    pub chest_drift: f32,
    pub shoulder_breath: f32,

    /// Lowers the upper arms out of the T-pose
    pub arm_down_bias: f32,
    pub arm_forward_bias: f32,
    pub arm_sway: f32,
    pub arm_speed: f32,
    pub elbow_bend_bias: f32,
    /// Lower-arm motion while talking
    pub gesture_amplitude: f32,
    pub hand_roll_bias: f32,

    /// Relaxed curl per segment, proximal to distal
    pub finger_curl: [f32; 3],
    pub thumb_curl: f32,
    pub finger_drift: f32,

    /// Share of the hips roll the upper legs take back, keeping the feet planted
    pub leg_weight_shift: f32,
    pub knee_bend: f32,

    pub talk_nod: f32,
    pub talk_nod_speed: f32,
}

impl Default for PoseTuning {
    fn default() -> Self {
        Self {
            head_sway: 0.03,
            head_nod: 0.02,
            head_roll: 0.015,
            head_speed: 1.3,
            head_drift: 0.02,
            head_breath: 0.01,

            hips_sway: 0.045,
            hips_roll: 0.025,
            hips_speed: 0.5,
            hips_breath: 0.008,

            spine_counter: 0.6,
            chest_counter: 0.3,
            spine_breath: 0.02,
            chest_breath: 0.03,
            chest_drift: 0.015,
            shoulder_breath: 0.03,

            arm_down_bias: 1.2,
            arm_forward_bias: 0.12,
            arm_sway: 0.04,
            arm_speed: 0.8,
            elbow_bend_bias: 0.25,
            gesture_amplitude: 0.1,
            hand_roll_bias: 0.1,

            finger_curl: [0.15, 0.25, 0.2],
            thumb_curl: 0.2,
            finger_drift: 0.03,

            leg_weight_shift: 0.6,
            knee_bend: 0.05,

            talk_nod: 0.04,
            talk_nod_speed: 2.6,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoseTargets {
    targets: HashMap<HumanoidJoint, Vec3>,
}

impl PoseTargets {
    pub fn get(&self, joint: HumanoidJoint) -> Option<Vec3> {
        self.targets.get(&joint).copied()
    }

    pub fn set(&mut self, joint: HumanoidJoint, pitch_yaw_roll: Vec3) {
        self.targets.insert(joint, pitch_yaw_roll);
    }

    pub fn iter(&self) -> impl Iterator<Item = (HumanoidJoint, Vec3)> + '_ {
        self.targets.iter().map(|(joint, target)| (*joint, *target))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// The state-dependent inputs of [`compute_targets`].
#[derive(Clone, Copy, Debug)]
pub struct StateDrive<'a> {
    pub preset: &'a StatePreset,
    /// Damped talk intensity, in `[0, 1]`
    pub talk_intensity: f32,
}

pub fn compute_targets(
    signals: &OrganicSignalSet,
    state: StateDrive<'_>,
    look: &LookAtSolution,
    profile: &MotionProfile,
) -> PoseTargets {
    let tuning = &profile.pose;
    let preset = state.preset;
    let idle_amplitude = preset.idle_amplitude;
    let breath = signals.sample(SignalKind::Breathing);
    let breath_raw = breath.raw * preset.breathing_amplitude;
    let inhale = breath.inhale * preset.breathing_amplitude;
    let idle = signals.get(SignalKind::Idle);
    let drift = signals.get(SignalKind::Drift);

    let mut targets = PoseTargets::default();

    let hips = Vec3::new(
        breath_raw * tuning.hips_breath,
        idle.value_shifted(tuning.hips_speed, 0.) * tuning.hips_sway * idle_amplitude,
        idle.value_shifted(tuning.hips_speed, 1.1) * tuning.hips_roll * idle_amplitude,
    );
    targets.set(HumanoidJoint::Hips, hips);

    targets.set(
        HumanoidJoint::Spine,
        Vec3::new(
            -inhale * tuning.spine_breath,
            -hips.y * tuning.spine_counter,
            -hips.z * tuning.spine_counter,
        ),
    );
    let chest = Vec3::new(
        -inhale * tuning.chest_breath + drift.value() * tuning.chest_drift,
        -hips.y * tuning.chest_counter,
        -hips.z * tuning.chest_counter,
    );
    targets.set(HumanoidJoint::Chest, chest);
    targets.set(
        HumanoidJoint::UpperChest,
        Vec3::new(-inhale * tuning.chest_breath * 0.5, chest.y * 0.5, 0.),
    );

    let talk_nod = state.talk_intensity
        * preset.gesture
        * tuning.talk_nod
        * idle.value_shifted(tuning.talk_nod_speed, 0.).max(0.);
    let head = Vec3::new(
        look.head_pitch
            + preset.head_pitch
            + idle.value_shifted(tuning.head_speed, 2.3) * tuning.head_nod * idle_amplitude
            + breath_raw * tuning.head_breath
            + talk_nod,
        look.head_yaw
            + idle.value_shifted(tuning.head_speed, 0.7) * tuning.head_sway * idle_amplitude
            + drift.value_shifted(1., 1.9) * tuning.head_drift,
        preset.head_tilt
            + idle.value_shifted(tuning.head_speed * 0.8, 4.1) * tuning.head_roll * idle_amplitude,
    );
    targets.set(HumanoidJoint::Head, head);

    let look_tuning: &LookAtTuning = &profile.look_at;
    let gaze = LookAtSolution::from_head(head.x, head.y, look_tuning);
    targets.set(
        HumanoidJoint::Neck,
        Vec3::new(gaze.neck_pitch, gaze.neck_yaw, head.z * look_tuning.neck_fraction),
    );
    let eyes = Vec3::new(gaze.eye_pitch, gaze.eye_yaw, 0.);

    for side in Side::BOTH {
        targets.set(HumanoidJoint::Eye(side), eyes);

        targets.set(
            HumanoidJoint::Shoulder(side),
            Vec3::new(0., 0., side.mirror(inhale * tuning.shoulder_breath)),
        );

        // Sides sway a quarter period apart
        let phase = match side {
            Side::Left => 0.,
            Side::Right => FRAC_PI_2,
        };
        let sway = idle.value_shifted(tuning.arm_speed, phase) * tuning.arm_sway * idle_amplitude;
        targets.set(
            HumanoidJoint::UpperArm(side),
            Vec3::new(
                sway * 0.5,
                -side.mirror(tuning.arm_forward_bias),
                -side.mirror(tuning.arm_down_bias + sway),
            ),
        );

        let gesture = state.talk_intensity
            * preset.gesture
            * tuning.gesture_amplitude
            * idle.value_shifted(tuning.talk_nod_speed * 0.5, phase + 0.8);
        targets.set(
            HumanoidJoint::LowerArm(side),
            Vec3::new(0., -side.mirror(tuning.elbow_bend_bias + gesture), 0.),
        );
        targets.set(
            HumanoidJoint::Hand(side),
            Vec3::new(0., 0., -side.mirror(tuning.hand_roll_bias)),
        );

        targets.set(
            HumanoidJoint::UpperLeg(side),
            Vec3::new(0., 0., -hips.z * tuning.leg_weight_shift),
        );
        targets.set(HumanoidJoint::LowerLeg(side), Vec3::new(tuning.knee_bend, 0., 0.));

        let finger_drift = drift.value_shifted(2., phase) * tuning.finger_drift;
        for finger in Finger::ALL {
            for segment in FingerSegment::ALL {
                let joint = HumanoidJoint::Finger(side, finger, segment);
                let target = match finger {
                    Finger::Thumb => Vec3::new(0., -side.mirror(tuning.thumb_curl), 0.),
                    _ => {
                        let curl = tuning.finger_curl[usize::from(segment.number() - 1)];
                        Vec3::new(0., 0., -side.mirror(curl + finger_drift))
                    }
                };
                targets.set(joint, target);
            }
        }
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        signals::SignalProfile,
        state::{CharacterState, StatePresets},
    };

    fn advanced_signals(seconds: f32) -> OrganicSignalSet {
        let mut signals = OrganicSignalSet::new(&SignalProfile::default());
        let steps = (seconds * 60.) as usize;
        for _ in 0..steps {
            signals.advance(1. / 60.);
        }
        signals
    }

    fn idle_targets(signals: &OrganicSignalSet, look: &LookAtSolution) -> PoseTargets {
        let profile = MotionProfile::default();
        let presets = StatePresets::default();
        compute_targets(
            signals,
            StateDrive {
                preset: presets.get(CharacterState::Idle),
                talk_intensity: 0.,
            },
            look,
            &profile,
        )
    }

    #[test]
    fn upper_arms_are_not_in_t_pose() {
        let targets = idle_targets(&advanced_signals(3.), &LookAtSolution::default());
        let left = targets.get(HumanoidJoint::UpperArm(Side::Left)).unwrap();
        let right = targets.get(HumanoidJoint::UpperArm(Side::Right)).unwrap();
        assert!(left.z < -1.);
        assert!(right.z > 1.);
    }

    #[test]
    fn spine_counter_rotates_hips() {
        for seconds in [0.5, 2., 7.3, 19.] {
            let targets = idle_targets(&advanced_signals(seconds), &LookAtSolution::default());
            let hips = targets.get(HumanoidJoint::Hips).unwrap();
            let spine = targets.get(HumanoidJoint::Spine).unwrap();
            assert!((spine.y + hips.y * PoseTuning::default().spine_counter).abs() < 1e-6);
        }
    }

    #[test]
    fn neck_is_a_fraction_of_head_target() {
        let look = LookAtSolution {
            head_yaw: 0.4,
            head_pitch: -0.1,
            ..Default::default()
        };
        let targets = idle_targets(&advanced_signals(1.), &look);
        let head = targets.get(HumanoidJoint::Head).unwrap();
        let neck = targets.get(HumanoidJoint::Neck).unwrap();
        let fraction = LookAtTuning::default().neck_fraction;
        assert!((neck.y - head.y * fraction).abs() < 1e-6);
        assert!((neck.x - head.x * fraction).abs() < 1e-6);
    }

    #[test]
    fn eyes_lead_head_within_limits() {
        let tuning = LookAtTuning::default();
        let look = LookAtSolution {
            head_yaw: 0.2,
            ..Default::default()
        };
        let targets = idle_targets(&advanced_signals(1.), &look);
        let head = targets.get(HumanoidJoint::Head).unwrap();
        let eye = targets.get(HumanoidJoint::Eye(Side::Left)).unwrap();
        assert!(eye.y.abs() > head.y.abs());

        let look = LookAtSolution {
            head_yaw: tuning.yaw_limit,
            ..Default::default()
        };
        let targets = idle_targets(&advanced_signals(1.), &look);
        let eye = targets.get(HumanoidJoint::Eye(Side::Right)).unwrap();
        assert!(eye.y <= tuning.eye_yaw_limit);
    }

    #[test]
    fn neck_and_eyes_split_the_head_target_like_the_solver() {
        let tuning = LookAtTuning::default();
        let look = LookAtSolution {
            head_yaw: tuning.yaw_limit,
            head_pitch: -tuning.pitch_limit,
            ..Default::default()
        };
        let targets = idle_targets(&advanced_signals(2.5), &look);
        let head = targets.get(HumanoidJoint::Head).unwrap();
        let split = LookAtSolution::from_head(head.x, head.y, &tuning);

        let neck = targets.get(HumanoidJoint::Neck).unwrap();
        assert_eq!((neck.x, neck.y), (split.neck_pitch, split.neck_yaw));
        for side in Side::BOTH {
            let eye = targets.get(HumanoidJoint::Eye(side)).unwrap();
            assert_eq!((eye.x, eye.y), (split.eye_pitch, split.eye_yaw));
        }
    }

    #[test]
    fn same_inputs_same_targets() {
        let signals = advanced_signals(4.2);
        let look = LookAtSolution {
            head_yaw: 0.1,
            ..Default::default()
        };
        assert_eq!(idle_targets(&signals, &look), idle_targets(&signals, &look));
    }

    #[test]
    fn hips_sway_slowest_and_widest() {
        let tuning = PoseTuning::default();
        assert!(tuning.hips_sway > tuning.head_sway);
        assert!(tuning.hips_speed < tuning.arm_speed);
        assert!(tuning.arm_speed < tuning.head_speed);
    }

    #[test]
    fn thinking_tilts_the_head() {
        let signals = advanced_signals(2.);
        let profile = MotionProfile::default();
        let look = LookAtSolution::default();
        let thinking = compute_targets(
            &signals,
            StateDrive {
                preset: profile.states.get(CharacterState::Thinking),
                talk_intensity: 0.,
            },
            &look,
            &profile,
        );
        let idle = idle_targets(&signals, &look);
        let tilt = thinking.get(HumanoidJoint::Head).unwrap().z
            - idle.get(HumanoidJoint::Head).unwrap().z;
        assert!(tilt > 0.05);
    }

    #[test]
    fn every_vocabulary_joint_gets_a_target() {
        let targets = idle_targets(&advanced_signals(1.), &LookAtSolution::default());
        for joint in HumanoidJoint::all() {
            assert!(targets.get(joint).is_some(), "{joint} has no target");
        }
    }
}
