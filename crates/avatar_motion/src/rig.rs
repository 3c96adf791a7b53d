use avatar_motion_core::skeleton::{
    HumanoidJoint, JointNameMapper, PoseWriter, RigBinding, SkeletonProvider,
};
use bevy::{
    ecs::{entity::Entity, hierarchy::Children, name::Name, system::Query},
    math::{Quat, Vec3},
    platform::collections::HashMap,
    transform::components::{GlobalTransform, Transform},
};

#[derive(Clone, Copy, Debug)]
struct JointNode {
    rest_rotation: Quat,
    world_position: Vec3,
}

/// Named joint entities found below an avatar root, used once to build a [`RigBinding`].
///
/// Rest rotations are the joints' local rotations at the time of the snapshot.
#[derive(Clone, Debug, Default)]
pub struct RigSnapshot {
    joints: HashMap<HumanoidJoint, Entity>,
    nodes: HashMap<Entity, JointNode>,
}

impl RigSnapshot {
    /// Walks the hierarchy below `root` breadth first. When two nodes resolve to the same joint,
    /// the one closer to the root wins.
    pub fn collect(
        root: Entity,
        name_mapper: &JointNameMapper,
        children: &Query<&Children>,
        nodes: &Query<(&Name, &Transform, &GlobalTransform)>,
    ) -> Self {
        let mut snapshot = Self::default();
        let mut pending = vec![root];

        while !pending.is_empty() {
            let mut next = Vec::new();
            for entity in pending {
                if let Ok((name, transform, global)) = nodes.get(entity)
                    && let Some(joint) = name_mapper.resolve(name.as_str())
                    && !snapshot.joints.contains_key(&joint)
                {
                    snapshot.joints.insert(joint, entity);
                    snapshot.nodes.insert(
                        entity,
                        JointNode {
                            rest_rotation: transform.rotation,
                            world_position: global.translation(),
                        },
                    );
                }
                if let Ok(entity_children) = children.get(entity) {
                    next.extend(entity_children.iter());
                }
            }
            pending = next;
        }

        snapshot
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

impl SkeletonProvider for RigSnapshot {
    type Joint = Entity;

    fn joint(&self, joint: HumanoidJoint) -> Option<Entity> {
        self.joints.get(&joint).copied()
    }

    fn world_position(&self, joint: Entity) -> Vec3 {
        self.nodes
            .get(&joint)
            .map(|node| node.world_position)
            .unwrap_or_default()
    }

    fn rest_rotation(&self, joint: Entity) -> Quat {
        self.nodes
            .get(&joint)
            .map(|node| node.rest_rotation)
            .unwrap_or_default()
    }
}

/// A bound rig as seen during one frame. Joints whose entity is gone read as missing.
///
/// Only used to read positions; rest rotations stay in the [`RigBinding`].
pub struct FrameRig<'a, 'w, 's, 'q> {
    pub binding: &'a RigBinding<Entity>,
    pub globals: &'a Query<'w, 's, &'q GlobalTransform>,
}

impl SkeletonProvider for FrameRig<'_, '_, '_, '_> {
    type Joint = Entity;

    fn joint(&self, joint: HumanoidJoint) -> Option<Entity> {
        let entity = self.binding.handle(joint)?;
        self.globals.contains(entity).then_some(entity)
    }

    fn world_position(&self, joint: Entity) -> Vec3 {
        self.globals
            .get(joint)
            .map(GlobalTransform::translation)
            .unwrap_or_default()
    }
}

/// Writes procedural rotations into joint [`Transform`]s, leaving translation and scale alone.
pub struct TransformWriter<'a, 'w, 's, 'q> {
    pub transforms: &'a mut Query<'w, 's, &'q mut Transform>,
}

impl PoseWriter for TransformWriter<'_, '_, '_, '_> {
    type Joint = Entity;

    fn write_joint_rotation(&mut self, joint: Entity, rotation: Quat) {
        if let Ok(mut transform) = self.transforms.get_mut(joint) {
            transform.rotation = rotation;
        }
    }
}
