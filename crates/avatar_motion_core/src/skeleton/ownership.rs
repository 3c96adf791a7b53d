use bevy::{platform::collections::HashSet, reflect::Reflect};
use serde::{Deserialize, Serialize};

use super::joint::HumanoidJoint;

/// Which layer drives a joint in a given frame.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointOwner {
    #[default]
    Procedural,
    /// An external clip layer writes this joint; the procedural core leaves it alone.
    Clip,
}

/// Per-joint ownership. Joints are procedural unless handed to the clip layer.
#[derive(Clone, Debug, Default)]
pub struct JointOwnership {
    clip_owned: HashSet<HumanoidJoint>,
}

impl JointOwnership {
    pub fn set_owner(&mut self, joint: HumanoidJoint, owner: JointOwner) {
        match owner {
            JointOwner::Procedural => {
                self.clip_owned.remove(&joint);
            }
            JointOwner::Clip => {
                self.clip_owned.insert(joint);
            }
        }
    }

    pub fn owner(&self, joint: HumanoidJoint) -> JointOwner {
        if self.clip_owned.contains(&joint) {
            JointOwner::Clip
        } else {
            JointOwner::Procedural
        }
    }

    pub fn is_procedural(&self, joint: HumanoidJoint) -> bool {
        !self.clip_owned.contains(&joint)
    }

    /// Hands every joint back to the procedural core.
    pub fn release_all(&mut self) {
        self.clip_owned.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::joint::Side;

    #[test]
    fn joints_default_to_procedural() {
        let mut ownership = JointOwnership::default();
        assert!(ownership.is_procedural(HumanoidJoint::Head));

        ownership.set_owner(HumanoidJoint::Hand(Side::Left), JointOwner::Clip);
        assert_eq!(
            ownership.owner(HumanoidJoint::Hand(Side::Left)),
            JointOwner::Clip
        );
        assert!(ownership.is_procedural(HumanoidJoint::Hand(Side::Right)));

        ownership.set_owner(HumanoidJoint::Hand(Side::Left), JointOwner::Procedural);
        assert!(ownership.is_procedural(HumanoidJoint::Hand(Side::Left)));
    }

    #[test]
    fn release_all_restores_procedural() {
        let mut ownership = JointOwnership::default();
        ownership.set_owner(HumanoidJoint::Hips, JointOwner::Clip);
        ownership.set_owner(HumanoidJoint::Spine, JointOwner::Clip);
        ownership.release_all();
        assert!(ownership.is_procedural(HumanoidJoint::Hips));
        assert!(ownership.is_procedural(HumanoidJoint::Spine));
    }
}
