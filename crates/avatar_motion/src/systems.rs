use avatar_motion_core::{profile::MotionProfile, skeleton::RigBinding};
use bevy::{
    asset::{AssetServer, Assets, LoadState},
    ecs::{
        entity::Entity,
        hierarchy::Children,
        name::Name,
        system::{Query, Res},
    },
    log::{debug, info, warn},
    time::Time,
    transform::components::{GlobalTransform, Transform},
};

use crate::{
    expressions::AvatarExpressions,
    player::AvatarMotionPlayer,
    rig::{FrameRig, RigSnapshot, TransformWriter},
};

/// Hands loaded (or hot-reloaded) profile assets to their sessions.
pub fn apply_motion_profiles(
    mut players: Query<(Entity, &mut AvatarMotionPlayer)>,
    profiles: Res<Assets<MotionProfile>>,
    asset_server: Res<AssetServer>,
) {
    for (entity, mut player) in &mut players {
        let Some(handle) = &player.profile else {
            continue;
        };

        if let Some(profile) = profiles.get(handle) {
            if player.session.profile() != profile {
                let profile = profile.clone();
                let player = player.as_mut();
                player.session.set_profile(profile);
                player.profile_failed = false;
                debug!("Applied motion profile to {entity}");
            }
        } else if !player.profile_failed
            && matches!(
                asset_server.get_load_state(handle.id()),
                Some(LoadState::Failed(_))
            )
        {
            warn!("Motion profile for {entity} failed to load, keeping the current tuning");
            player.profile_failed = true;
        }
    }
}

/// Binds every unbound player whose rig has at least one recognizable joint. Players are retried
/// each frame until their scene has spawned.
pub fn bind_avatar_rigs(
    mut players: Query<(Entity, &mut AvatarMotionPlayer)>,
    children: Query<&Children>,
    nodes: Query<(&Name, &Transform, &GlobalTransform)>,
) {
    for (entity, mut player) in &mut players {
        if player.is_bound() {
            continue;
        }

        let snapshot = RigSnapshot::collect(entity, &player.name_mapper, &children, &nodes);
        if snapshot.is_empty() {
            continue;
        }

        let binding = RigBinding::resolve(&snapshot);
        info!("Bound avatar {entity} with {} joints", binding.len());
        let missing = binding.missing();
        if !missing.is_empty() {
            debug!("Avatar {entity} has no joints for {:?}", missing);
        }

        let player = player.as_mut();
        player.session.bind(&binding);
        player.binding = Some(binding);
    }
}

/// Advances every bound, unpaused player by one frame and writes its pose and expressions.
pub fn advance_avatar_motion(
    mut players: Query<(
        &mut AvatarMotionPlayer,
        &mut AvatarExpressions,
        &GlobalTransform,
    )>,
    globals: Query<&GlobalTransform>,
    mut transforms: Query<&mut Transform>,
    time: Res<Time>,
) {
    for (mut player, mut expressions, root) in &mut players {
        if player.paused || !player.is_bound() {
            continue;
        }
        let player = player.as_mut();
        let Some(binding) = &player.binding else {
            continue;
        };

        let (_, facing, root_position) = root.to_scale_rotation_translation();
        let rig = FrameRig {
            binding,
            globals: &globals,
        };
        if !player
            .session
            .advance_rig(time.delta_secs(), &rig, root_position, facing)
        {
            continue;
        }

        player.session.write_pose(
            binding,
            &mut TransformWriter {
                transforms: &mut transforms,
            },
        );
        player.session.write_expressions(expressions.as_mut());
    }
}
