//! Maps rig node names onto the humanoid vocabulary.
//!
//! Resolution order for a node name:
//! 1. custom aliases, in insertion order,
//! 2. canonical humanoid names (`leftUpperArm`), case-insensitive,
//! 3. common rig conventions after stripping a known prefix: VRM0 (`J_Bip_L_UpperArm`,
//!    `J_Adj_R_FaceEye`) and Mixamo (`mixamorig:LeftForeArm`, `mixamorig:RightHandIndex2`).

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::joint::{Finger, FingerSegment, HumanoidJoint, Side};
use crate::errors::RigBindingError;

const SIDE_PATTERN: &str = r"(?i)^(?:(?P<short>[lrc])_|(?P<long>left|right))?(?P<part>.+)$";
const FINGER_PATTERN: &str = r"(?i)^(?:hand)?(thumb|index|middle|ring|little|pinky)(\d)$";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointAliasSerial {
    pub pattern: String,
    pub joint: HumanoidJoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointNameMapperSerial {
    /// Stripped from node names before convention matching.
    pub prefix_pattern: String,
    pub aliases: Vec<JointAliasSerial>,
}

impl Default for JointNameMapperSerial {
    fn default() -> Self {
        Self {
            prefix_pattern: r"(?i)^(?:mixamorig\d*[:_]|j_(?:bip|adj)_)".into(),
            aliases: Vec::new(),
        }
    }
}

impl JointNameMapperSerial {
    pub fn to_value(&self) -> Result<JointNameMapper, RigBindingError> {
        let mut mapper = JointNameMapper {
            prefix: compile(&self.prefix_pattern)?,
            side: compile(SIDE_PATTERN)?,
            finger: compile(FINGER_PATTERN)?,
            aliases: Vec::new(),
        };
        for alias in &self.aliases {
            mapper = mapper.with_alias(&alias.pattern, alias.joint)?;
        }
        Ok(mapper)
    }
}

fn compile(pattern: &str) -> Result<Regex, RigBindingError> {
    Regex::new(pattern).map_err(|source| RigBindingError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[derive(Debug, Clone)]
pub struct JointNameMapper {
    prefix: Regex,
    side: Regex,
    finger: Regex,
    aliases: Vec<(Regex, HumanoidJoint)>,
}

impl Default for JointNameMapper {
    fn default() -> Self {
        JointNameMapperSerial::default()
            .to_value()
            .expect("built-in joint name patterns are valid")
    }
}

impl JointNameMapper {
    /// Adds a custom pattern that must match the whole node name.
    pub fn with_alias(
        mut self,
        pattern: &str,
        joint: HumanoidJoint,
    ) -> Result<Self, RigBindingError> {
        let anchored = compile(&format!("^(?:{pattern})$"))?;
        self.aliases.push((anchored, joint));
        Ok(self)
    }

    pub fn resolve(&self, name: &str) -> Option<HumanoidJoint> {
        if let Some((_, joint)) = self.aliases.iter().find(|(regex, _)| regex.is_match(name)) {
            return Some(*joint);
        }
        if let Some(joint) = HumanoidJoint::from_name(name) {
            return Some(joint);
        }

        let stripped = self.prefix.replace(name, "");
        let captures = self.side.captures(&stripped)?;
        let side = match (captures.name("short"), captures.name("long")) {
            (Some(short), _) => match short.as_str() {
                "l" | "L" => Some(Side::Left),
                "r" | "R" => Some(Side::Right),
                _ => None,
            },
            (None, Some(long)) if long.as_str().eq_ignore_ascii_case("left") => Some(Side::Left),
            (None, Some(_)) => Some(Side::Right),
            (None, None) => None,
        };
        let part = captures.name("part")?.as_str().to_ascii_lowercase();

        match side {
            None => trunk_joint(&part),
            Some(side) => self.limb_joint(side, &part),
        }
    }

    fn limb_joint(&self, side: Side, part: &str) -> Option<HumanoidJoint> {
        let joint = match part {
            "faceeye" | "eye" => HumanoidJoint::Eye(side),
            "shoulder" => HumanoidJoint::Shoulder(side),
            "upperarm" | "arm" => HumanoidJoint::UpperArm(side),
            "lowerarm" | "forearm" => HumanoidJoint::LowerArm(side),
            "hand" => HumanoidJoint::Hand(side),
            "upperleg" | "upleg" => HumanoidJoint::UpperLeg(side),
            "lowerleg" | "leg" => HumanoidJoint::LowerLeg(side),
            _ => {
                let captures = self.finger.captures(part)?;
                let finger = match &captures[1] {
                    "thumb" => Finger::Thumb,
                    "index" => Finger::Index,
                    "middle" => Finger::Middle,
                    "ring" => Finger::Ring,
                    _ => Finger::Little,
                };
                let segment = FingerSegment::from_number(captures[2].parse().ok()?)?;
                HumanoidJoint::Finger(side, finger, segment)
            }
        };
        Some(joint)
    }
}

fn trunk_joint(part: &str) -> Option<HumanoidJoint> {
    match part {
        "hips" => Some(HumanoidJoint::Hips),
        "spine" => Some(HumanoidJoint::Spine),
        "chest" | "spine1" => Some(HumanoidJoint::Chest),
        "upperchest" | "spine2" => Some(HumanoidJoint::UpperChest),
        "neck" => Some(HumanoidJoint::Neck),
        "head" => Some(HumanoidJoint::Head),
        _ => None,
    }
}
