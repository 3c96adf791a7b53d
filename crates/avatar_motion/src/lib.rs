//! # Avatar Motion
//!
//! Bevy plugin that keeps humanoid avatars alive: breathing, idle sway, gaze following, emotional
//! expressions, blinking and synthesized lip movement, all procedural and layered onto whatever
//! rig the avatar was loaded with.
//!
//! Add [`AvatarMotionPlugin`] to the app and an [`AvatarMotionPlayer`] to the root entity of an
//! avatar scene:
//! ```ignore
//!     commands.spawn((
//!         SceneRoot(asset_server.load("models/avatar.vrm#Scene0")),
//!         AvatarMotionPlayer::new()
//!             .with_profile(asset_server.load("profiles/calm.motion.ron")),
//!     ));
//! ```
//! The player binds the rig as soon as joints with recognizable names appear below it (VRM,
//! VRM0 and Mixamo naming work out of the box; see [`JointNameMapper`] for custom rigs). From then
//! on, joint rotations are written to the joints' [`Transform`]s every frame, before transform
//! propagation, and expression weights are written to the [`AvatarExpressions`] component for the
//! app to forward to its morph targets.
//!
//! Behavior is steered through the player:
//! ```ignore
//!     player.set_state(CharacterState::Talking);
//!     player.set_look_at_target(camera_position);
//!     player.trigger_reaction(Reaction::Laugh);
//! ```
//!
//! [`JointNameMapper`]: avatar_motion_core::skeleton::JointNameMapper
//! [`Transform`]: bevy::transform::components::Transform

pub mod expressions;
pub mod player;
pub mod plugin;
pub mod rig;
pub mod systems;

pub use expressions::AvatarExpressions;
pub use player::AvatarMotionPlayer;
pub use plugin::{AvatarMotionPlugin, AvatarMotionSet};

pub mod prelude {
    pub use super::expressions::*;
    pub use super::player::*;
    pub use super::plugin::*;
    pub use super::rig::*;
    pub use avatar_motion_core::prelude::*;
}

#[cfg(test)]
mod tests {
    use avatar_motion_core::prelude::*;
    use bevy::{
        ecs::{
            hierarchy::Children,
            name::Name,
            system::{Query, RunSystemOnce},
            world::World,
        },
        math::{Quat, Vec3},
        prelude::{ChildOf, Entity},
        time::Time,
        transform::components::{GlobalTransform, Transform},
    };
    use std::time::Duration;

    use crate::{
        expressions::AvatarExpressions,
        player::AvatarMotionPlayer,
        rig::RigSnapshot,
        systems::{advance_avatar_motion, bind_avatar_rigs},
    };

    fn spawn_joint(world: &mut World, parent: Entity, name: &str, rest: Quat) -> Entity {
        world
            .spawn((
                Name::new(name.to_string()),
                Transform::from_rotation(rest),
                GlobalTransform::default(),
                ChildOf(parent),
            ))
            .id()
    }

    /// Avatar root with a small Mixamo-named chain and one unrelated node.
    fn spawn_avatar(world: &mut World) -> (Entity, Entity, Entity) {
        let root = world
            .spawn((
                AvatarMotionPlayer::new(),
                Transform::default(),
                GlobalTransform::default(),
            ))
            .id();
        let hips = spawn_joint(world, root, "mixamorig:Hips", Quat::IDENTITY);
        let spine = spawn_joint(world, hips, "mixamorig:Spine", Quat::IDENTITY);
        let neck = spawn_joint(world, spine, "mixamorig:Neck", Quat::IDENTITY);
        let rest = Quat::from_rotation_z(0.3);
        let head = spawn_joint(world, neck, "mixamorig:Head", rest);
        spawn_joint(world, head, "HeadTop_End", Quat::IDENTITY);
        (root, hips, head)
    }

    fn step(world: &mut World) {
        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(1. / 60.));
        world.run_system_once(advance_avatar_motion).unwrap();
    }

    #[test]
    fn binds_named_joints_below_root() {
        let mut world = World::new();
        let (root, hips, head) = spawn_avatar(&mut world);

        world.run_system_once(bind_avatar_rigs).unwrap();

        let player = world.get::<AvatarMotionPlayer>(root).unwrap();
        let binding = player.binding().unwrap();
        assert_eq!(binding.len(), 4);
        assert_eq!(binding.handle(HumanoidJoint::Hips), Some(hips));
        assert_eq!(binding.handle(HumanoidJoint::Head), Some(head));
        assert!(binding.get(HumanoidJoint::UpperArm(Side::Left)).is_none());
        assert!(player.session().is_initialized());
    }

    #[test]
    fn snapshot_reads_rest_pose_by_entity() {
        let mut world = World::new();
        let (root, hips, head) = spawn_avatar(&mut world);
        world
            .entity_mut(head)
            .insert(GlobalTransform::from_translation(Vec3::new(0., 1.6, 0.)));

        let snapshot = world
            .run_system_once(
                move |children: Query<&Children>,
                      nodes: Query<(&Name, &Transform, &GlobalTransform)>| {
                    RigSnapshot::collect(root, &JointNameMapper::default(), &children, &nodes)
                },
            )
            .unwrap();

        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.joint(HumanoidJoint::Head), Some(head));
        assert_eq!(snapshot.world_position(head), Vec3::new(0., 1.6, 0.));
        assert!(snapshot.rest_rotation(head).abs_diff_eq(Quat::from_rotation_z(0.3), 1e-6));
        assert_eq!(snapshot.rest_rotation(hips), Quat::IDENTITY);
        assert_eq!(snapshot.world_position(root), Vec3::ZERO);
    }

    #[test]
    fn waits_for_rig_to_appear() {
        let mut world = World::new();
        let root = world
            .spawn((AvatarMotionPlayer::new(), GlobalTransform::default()))
            .id();

        world.run_system_once(bind_avatar_rigs).unwrap();
        assert!(!world.get::<AvatarMotionPlayer>(root).unwrap().is_bound());

        spawn_joint(&mut world, root, "J_Bip_C_Head", Quat::IDENTITY);
        world.run_system_once(bind_avatar_rigs).unwrap();
        assert!(world.get::<AvatarMotionPlayer>(root).unwrap().is_bound());
    }

    #[test]
    fn writes_rotations_onto_rest_pose() {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        let (root, _, head) = spawn_avatar(&mut world);
        world.run_system_once(bind_avatar_rigs).unwrap();

        world
            .get_mut::<AvatarMotionPlayer>(root)
            .unwrap()
            .set_look_at_target(Vec3::new(2., 1.45, 1.));
        for _ in 0..120 {
            step(&mut world);
        }

        let rest = Quat::from_rotation_z(0.3);
        let written = world.get::<Transform>(head).unwrap().rotation;
        let procedural = rest.inverse() * written;
        assert!(procedural.angle_between(Quat::IDENTITY) > 0.05);

        let expressions = world.get::<AvatarExpressions>(root).unwrap();
        assert_eq!(expressions.len(), 10);
        assert!(expressions.iter().any(|(name, _)| name == "blink"));
        assert!(expressions.get("happy") > 0.);
    }

    #[test]
    fn paused_player_leaves_rig_alone() {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        let (root, hips, _) = spawn_avatar(&mut world);
        world.run_system_once(bind_avatar_rigs).unwrap();
        world.get_mut::<AvatarMotionPlayer>(root).unwrap().pause();

        for _ in 0..30 {
            step(&mut world);
        }

        assert_eq!(world.get::<Transform>(hips).unwrap().rotation, Quat::IDENTITY);
        assert!(world.get::<AvatarExpressions>(root).unwrap().is_empty());
    }

    #[test]
    fn clip_owned_joint_is_not_written() {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        let (root, hips, _) = spawn_avatar(&mut world);
        world.run_system_once(bind_avatar_rigs).unwrap();
        world
            .get_mut::<AvatarMotionPlayer>(root)
            .unwrap()
            .set_joint_owner(HumanoidJoint::Hips, JointOwner::Clip);

        world
            .entity_mut(hips)
            .insert(Transform::from_rotation(Quat::from_rotation_y(1.)));
        for _ in 0..30 {
            step(&mut world);
        }

        let rotation = world.get::<Transform>(hips).unwrap().rotation;
        assert!(rotation.abs_diff_eq(Quat::from_rotation_y(1.), 1e-6));
    }
}
