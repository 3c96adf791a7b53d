//! Moves every procedural joint channel toward its target, once per frame.

use bevy::reflect::{Reflect, std_traits::ReflectDefault};
use serde::{Deserialize, Serialize};

use crate::{
    errors::ProfileValidationError,
    skeleton::{JointOwnership, JointRole, SkeletonPose},
    targets::PoseTargets,
};

/// Smoothing time, in seconds, per joint role.
///
/// Lighter parts settle faster: eyes ≤ head ≤ neck ≤ fingers ≤ arms ≤ legs ≤ spine ≤ hips.
/// [`SmoothingTable::validate`] rejects tables that break this ordering.
#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(default)]
pub struct SmoothingTable {
    pub eyes: f32,
    pub head: f32,
    pub neck: f32,
    pub fingers: f32,
    pub arms: f32,
    pub legs: f32,
    pub spine: f32,
    pub hips: f32,
}

impl Default for SmoothingTable {
    fn default() -> Self {
        Self {
            eyes: 0.08,
            head: 0.13,
            neck: 0.19,
            fingers: 0.2,
            arms: 0.24,
            legs: 0.3,
            spine: 0.35,
            hips: 0.4,
        }
    }
}

impl SmoothingTable {
    pub fn time_for(&self, role: JointRole) -> f32 {
        match role {
            JointRole::Eyes => self.eyes,
            JointRole::Head => self.head,
            JointRole::Neck => self.neck,
            JointRole::Fingers => self.fingers,
            JointRole::Arms => self.arms,
            JointRole::Legs => self.legs,
            JointRole::Spine => self.spine,
            JointRole::Hips => self.hips,
        }
    }

    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        for role in JointRole::ALL {
            let time = self.time_for(role);
            if time.is_nan() || time <= 0. {
                return Err(ProfileValidationError::NotPositive("smoothing time", time));
            }
        }
        for pair in JointRole::ALL.windows(2) {
            let (lighter, heavier) = (pair[0], pair[1]);
            let (lighter_time, heavier_time) = (self.time_for(lighter), self.time_for(heavier));
            if lighter_time > heavier_time {
                return Err(ProfileValidationError::SmoothingOrder {
                    lighter,
                    lighter_time,
                    heavier,
                    heavier_time,
                });
            }
        }
        Ok(())
    }
}

/// Retargets and steps every procedural joint of `pose`.
///
/// Joints without a target are driven back to rest. Clip-owned joints are neither retargeted nor
/// stepped, so they resume from where they were when handed back.
pub fn smooth_pose(
    pose: &mut SkeletonPose,
    targets: &PoseTargets,
    ownership: &JointOwnership,
    table: &SmoothingTable,
    max_speed: Option<f32>,
    dt: f32,
) {
    for (joint, rotation) in pose.iter_mut() {
        if !ownership.is_procedural(joint) {
            continue;
        }
        rotation.set_smoothing(table.time_for(joint.role()), max_speed);
        rotation.set_target(targets.get(joint).unwrap_or_default());
        rotation.step(dt);
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::Vec3;

    use super::*;
    use crate::skeleton::{HumanoidJoint, JointOwner, Side};

    #[test]
    fn reference_table_is_ordered() {
        let table = SmoothingTable::default();
        assert!(table.validate().is_ok());
        assert!(table.hips >= table.spine);
        assert!(table.spine >= table.arms);
        assert!(table.arms >= table.neck);
        assert!(table.neck >= table.head);
    }

    #[test]
    fn out_of_order_table_is_rejected() {
        let table = SmoothingTable {
            head: 0.5,
            ..Default::default()
        };
        assert_eq!(
            table.validate(),
            Err(ProfileValidationError::SmoothingOrder {
                lighter: JointRole::Head,
                lighter_time: 0.5,
                heavier: JointRole::Neck,
                heavier_time: 0.19,
            })
        );
    }

    #[test]
    fn non_positive_time_is_rejected() {
        let table = SmoothingTable {
            eyes: 0.,
            ..Default::default()
        };
        assert!(matches!(
            table.validate(),
            Err(ProfileValidationError::NotPositive(..))
        ));
    }

    #[test]
    fn lighter_joints_lead_heavier_ones() {
        let table = SmoothingTable::default();
        let mut pose =
            SkeletonPose::for_joints([HumanoidJoint::Head, HumanoidJoint::Hips], &table, None);
        let mut targets = PoseTargets::default();
        targets.set(HumanoidJoint::Head, Vec3::Y);
        targets.set(HumanoidJoint::Hips, Vec3::Y);

        for _ in 0..10 {
            smooth_pose(
                &mut pose,
                &targets,
                &JointOwnership::default(),
                &table,
                None,
                1. / 60.,
            );
        }
        let head = pose.get(HumanoidJoint::Head).unwrap().current().y;
        let hips = pose.get(HumanoidJoint::Hips).unwrap().current().y;
        assert!(head > hips);
    }

    #[test]
    fn clip_owned_joints_are_untouched() {
        let table = SmoothingTable::default();
        let hand = HumanoidJoint::Hand(Side::Left);
        let mut pose = SkeletonPose::for_joints([hand, HumanoidJoint::Head], &table, None);
        let mut targets = PoseTargets::default();
        targets.set(hand, Vec3::ONE);
        targets.set(HumanoidJoint::Head, Vec3::ONE);
        let mut ownership = JointOwnership::default();
        ownership.set_owner(hand, JointOwner::Clip);

        for _ in 0..30 {
            smooth_pose(&mut pose, &targets, &ownership, &table, None, 1. / 60.);
        }
        assert_eq!(pose.get(hand).unwrap().current(), Vec3::ZERO);
        assert_eq!(pose.get(hand).unwrap().target(), Vec3::ZERO);
        assert!(pose.get(HumanoidJoint::Head).unwrap().current().x > 0.);
    }
}
