use bevy::{
    math::{Quat, Vec3},
    platform::collections::HashMap,
};

use super::joint::HumanoidJoint;

/// Read access to a loaded rig.
///
/// Any joint may be missing: partially rigged models are a normal input and the engine animates
/// whatever is there.
pub trait SkeletonProvider {
    type Joint: Copy;

    fn joint(&self, joint: HumanoidJoint) -> Option<Self::Joint>;

    fn world_position(&self, joint: Self::Joint) -> Vec3;

    /// Local rotation of the joint in its bind pose. Procedural rotations are applied on top.
    fn rest_rotation(&self, _joint: Self::Joint) -> Quat {
        Quat::IDENTITY
    }
}

/// Write access to a rig's joint rotations.
pub trait PoseWriter {
    type Joint: Copy;

    fn write_joint_rotation(&mut self, joint: Self::Joint, rotation: Quat);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundJoint<J> {
    pub handle: J,
    pub rest_rotation: Quat,
}

/// Humanoid joints resolved to rig handles, once, when the rig becomes available.
#[derive(Clone, Debug)]
pub struct RigBinding<J> {
    joints: HashMap<HumanoidJoint, BoundJoint<J>>,
}

impl<J> Default for RigBinding<J> {
    fn default() -> Self {
        Self {
            joints: HashMap::default(),
        }
    }
}

impl<J: Copy> RigBinding<J> {
    pub fn resolve<P: SkeletonProvider<Joint = J>>(provider: &P) -> Self {
        let mut binding = Self::default();
        for joint in HumanoidJoint::all() {
            if let Some(handle) = provider.joint(joint) {
                binding.insert(joint, handle, provider.rest_rotation(handle));
            }
        }
        binding
    }

    pub fn insert(&mut self, joint: HumanoidJoint, handle: J, rest_rotation: Quat) {
        self.joints.insert(
            joint,
            BoundJoint {
                handle,
                rest_rotation,
            },
        );
    }

    pub fn get(&self, joint: HumanoidJoint) -> Option<&BoundJoint<J>> {
        self.joints.get(&joint)
    }

    pub fn handle(&self, joint: HumanoidJoint) -> Option<J> {
        self.joints.get(&joint).map(|bound| bound.handle)
    }

    pub fn joints(&self) -> impl Iterator<Item = HumanoidJoint> + '_ {
        self.joints.keys().copied()
    }

    /// Joints of the vocabulary that the rig does not have.
    pub fn missing(&self) -> Vec<HumanoidJoint> {
        HumanoidJoint::all()
            .into_iter()
            .filter(|joint| !self.joints.contains_key(joint))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::joint::Side;

    struct PartialRig;

    impl SkeletonProvider for PartialRig {
        type Joint = u32;

        fn joint(&self, joint: HumanoidJoint) -> Option<u32> {
            match joint {
                HumanoidJoint::Hips => Some(0),
                HumanoidJoint::Spine => Some(1),
                HumanoidJoint::Head => Some(2),
                HumanoidJoint::UpperArm(Side::Left) => Some(3),
                _ => None,
            }
        }

        fn world_position(&self, joint: u32) -> Vec3 {
            Vec3::Y * joint as f32
        }

        fn rest_rotation(&self, joint: u32) -> Quat {
            Quat::from_rotation_z(joint as f32 * 0.1)
        }
    }

    #[test]
    fn resolves_only_present_joints() {
        let binding = RigBinding::resolve(&PartialRig);
        assert_eq!(binding.len(), 4);
        assert_eq!(binding.handle(HumanoidJoint::Head), Some(2));
        assert_eq!(binding.handle(HumanoidJoint::Neck), None);
        assert_eq!(binding.missing().len(), HumanoidJoint::all().len() - 4);
    }

    #[test]
    fn captures_rest_rotation() {
        let binding = RigBinding::resolve(&PartialRig);
        let bound = binding.get(HumanoidJoint::UpperArm(Side::Left)).unwrap();
        assert_eq!(bound.rest_rotation, Quat::from_rotation_z(0.3));
    }
}
