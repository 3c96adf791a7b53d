use std::fmt;

use bevy::reflect::Reflect;
use serde::{Deserialize, Serialize};

#[derive(Reflect, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Returns `value` for the left side and `-value` for the right side.
    pub fn mirror(self, value: f32) -> f32 {
        match self {
            Side::Left => value,
            Side::Right => -value,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

#[derive(Reflect, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Little,
    ];

    fn name(self) -> &'static str {
        match self {
            Finger::Thumb => "Thumb",
            Finger::Index => "Index",
            Finger::Middle => "Middle",
            Finger::Ring => "Ring",
            Finger::Little => "Little",
        }
    }
}

#[derive(Reflect, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FingerSegment {
    Proximal,
    Intermediate,
    Distal,
}

impl FingerSegment {
    pub const ALL: [FingerSegment; 3] = [
        FingerSegment::Proximal,
        FingerSegment::Intermediate,
        FingerSegment::Distal,
    ];

    /// 1-based position along the finger, as numbered by most rigs.
    pub fn number(self) -> u8 {
        match self {
            FingerSegment::Proximal => 1,
            FingerSegment::Intermediate => 2,
            FingerSegment::Distal => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(FingerSegment::Proximal),
            2 => Some(FingerSegment::Intermediate),
            3 => Some(FingerSegment::Distal),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            FingerSegment::Proximal => "Proximal",
            FingerSegment::Intermediate => "Intermediate",
            FingerSegment::Distal => "Distal",
        }
    }
}

/// Which smoothing time a joint uses. Ordered from lightest to heaviest.
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JointRole {
    Eyes,
    Head,
    Neck,
    Fingers,
    Arms,
    Legs,
    Spine,
    Hips,
}

impl JointRole {
    pub const ALL: [JointRole; 8] = [
        JointRole::Eyes,
        JointRole::Head,
        JointRole::Neck,
        JointRole::Fingers,
        JointRole::Arms,
        JointRole::Legs,
        JointRole::Spine,
        JointRole::Hips,
    ];
}

/// The humanoid joint vocabulary the engine animates.
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HumanoidJoint {
    Hips,
    Spine,
    Chest,
    UpperChest,
    Neck,
    Head,
    Eye(Side),
    Shoulder(Side),
    UpperArm(Side),
    LowerArm(Side),
    Hand(Side),
    UpperLeg(Side),
    LowerLeg(Side),
    Finger(Side, Finger, FingerSegment),
}

impl HumanoidJoint {
    /// Every joint of the vocabulary, trunk first, then limbs, then fingers.
    pub fn all() -> Vec<HumanoidJoint> {
        let mut joints = vec![
            HumanoidJoint::Hips,
            HumanoidJoint::Spine,
            HumanoidJoint::Chest,
            HumanoidJoint::UpperChest,
            HumanoidJoint::Neck,
            HumanoidJoint::Head,
        ];
        for side in Side::BOTH {
            joints.extend([
                HumanoidJoint::Eye(side),
                HumanoidJoint::Shoulder(side),
                HumanoidJoint::UpperArm(side),
                HumanoidJoint::LowerArm(side),
                HumanoidJoint::Hand(side),
                HumanoidJoint::UpperLeg(side),
                HumanoidJoint::LowerLeg(side),
            ]);
        }
        for side in Side::BOTH {
            for finger in Finger::ALL {
                for segment in FingerSegment::ALL {
                    joints.push(HumanoidJoint::Finger(side, finger, segment));
                }
            }
        }
        joints
    }

    /// Canonical humanoid name, e.g. `upperChest`, `leftLowerArm`, `rightIndexDistal`.
    pub fn name(&self) -> String {
        match self {
            HumanoidJoint::Hips => "hips".into(),
            HumanoidJoint::Spine => "spine".into(),
            HumanoidJoint::Chest => "chest".into(),
            HumanoidJoint::UpperChest => "upperChest".into(),
            HumanoidJoint::Neck => "neck".into(),
            HumanoidJoint::Head => "head".into(),
            HumanoidJoint::Eye(side) => format!("{}Eye", side.prefix()),
            HumanoidJoint::Shoulder(side) => format!("{}Shoulder", side.prefix()),
            HumanoidJoint::UpperArm(side) => format!("{}UpperArm", side.prefix()),
            HumanoidJoint::LowerArm(side) => format!("{}LowerArm", side.prefix()),
            HumanoidJoint::Hand(side) => format!("{}Hand", side.prefix()),
            HumanoidJoint::UpperLeg(side) => format!("{}UpperLeg", side.prefix()),
            HumanoidJoint::LowerLeg(side) => format!("{}LowerLeg", side.prefix()),
            HumanoidJoint::Finger(side, finger, segment) => {
                format!("{}{}{}", side.prefix(), finger.name(), segment.name())
            }
        }
    }

    /// Case-insensitive lookup by canonical name.
    pub fn from_name(name: &str) -> Option<HumanoidJoint> {
        Self::all()
            .into_iter()
            .find(|joint| joint.name().eq_ignore_ascii_case(name))
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            HumanoidJoint::Eye(side)
            | HumanoidJoint::Shoulder(side)
            | HumanoidJoint::UpperArm(side)
            | HumanoidJoint::LowerArm(side)
            | HumanoidJoint::Hand(side)
            | HumanoidJoint::UpperLeg(side)
            | HumanoidJoint::LowerLeg(side)
            | HumanoidJoint::Finger(side, _, _) => Some(*side),
            _ => None,
        }
    }

    pub fn role(&self) -> JointRole {
        match self {
            HumanoidJoint::Hips => JointRole::Hips,
            HumanoidJoint::Spine | HumanoidJoint::Chest | HumanoidJoint::UpperChest => {
                JointRole::Spine
            }
            HumanoidJoint::Neck => JointRole::Neck,
            HumanoidJoint::Head => JointRole::Head,
            HumanoidJoint::Eye(_) => JointRole::Eyes,
            HumanoidJoint::Shoulder(_)
            | HumanoidJoint::UpperArm(_)
            | HumanoidJoint::LowerArm(_)
            | HumanoidJoint::Hand(_) => JointRole::Arms,
            HumanoidJoint::UpperLeg(_) | HumanoidJoint::LowerLeg(_) => JointRole::Legs,
            HumanoidJoint::Finger(..) => JointRole::Fingers,
        }
    }

    /// Parent in the standard humanoid hierarchy. Optional joints (upper chest) are not
    /// skipped, so the parent may be absent from a given rig.
    pub fn parent(&self) -> Option<HumanoidJoint> {
        use HumanoidJoint::*;
        match *self {
            Hips => None,
            Spine => Some(Hips),
            Chest => Some(Spine),
            UpperChest => Some(Chest),
            Neck => Some(UpperChest),
            Head => Some(Neck),
            Eye(_) => Some(Head),
            Shoulder(_) => Some(UpperChest),
            UpperArm(side) => Some(Shoulder(side)),
            LowerArm(side) => Some(UpperArm(side)),
            Hand(side) => Some(LowerArm(side)),
            UpperLeg(_) => Some(Hips),
            LowerLeg(side) => Some(UpperLeg(side)),
            Finger(side, _, FingerSegment::Proximal) => Some(Hand(side)),
            Finger(side, finger, FingerSegment::Intermediate) => {
                Some(Finger(side, finger, FingerSegment::Proximal))
            }
            Finger(side, finger, FingerSegment::Distal) => {
                Some(Finger(side, finger, FingerSegment::Intermediate))
            }
        }
    }
}

impl fmt::Display for HumanoidJoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
