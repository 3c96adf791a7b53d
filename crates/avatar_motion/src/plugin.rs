use avatar_motion_core::{
    expression::{Emotion, Reaction},
    profile::{MotionProfile, MotionProfileLoader},
    skeleton::JointOwner,
    state::CharacterState,
};
use bevy::{
    app::{App, Plugin, PostUpdate},
    asset::AssetApp,
    ecs::{
        intern::Interned,
        schedule::{IntoScheduleConfigs, ScheduleLabel, SystemSet},
    },
    transform::TransformSystems,
};

use crate::{
    expressions::AvatarExpressions,
    player::AvatarMotionPlayer,
    systems::{advance_avatar_motion, apply_motion_profiles, bind_avatar_rigs},
};

/// Adds procedural avatar motion to an app
pub struct AvatarMotionPlugin {
    pub schedule: Interned<dyn ScheduleLabel>,
}

impl Default for AvatarMotionPlugin {
    fn default() -> Self {
        Self {
            schedule: PostUpdate.intern(),
        }
    }
}

#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, SystemSet)]
pub enum AvatarMotionSet {
    /// Applies loaded profiles and binds newly spawned rigs
    Bind,
    /// Advances sessions and writes joint transforms and expression weights
    Advance,
}

impl Plugin for AvatarMotionPlugin {
    fn build(&self, app: &mut App) {
        self.register_assets(app);
        self.register_types(app);

        app.configure_sets(
            self.schedule,
            (AvatarMotionSet::Bind, AvatarMotionSet::Advance)
                .chain()
                .before(TransformSystems::Propagate),
        );

        app.add_systems(
            self.schedule,
            (apply_motion_profiles, bind_avatar_rigs)
                .chain()
                .in_set(AvatarMotionSet::Bind),
        );

        app.add_systems(
            self.schedule,
            advance_avatar_motion.in_set(AvatarMotionSet::Advance),
        );
    }
}

impl AvatarMotionPlugin {
    fn register_assets(&self, app: &mut App) {
        app.init_asset::<MotionProfile>()
            .init_asset_loader::<MotionProfileLoader>()
            .register_asset_reflect::<MotionProfile>();
    }

    fn register_types(&self, app: &mut App) {
        app //
            .register_type::<AvatarMotionPlayer>()
            .register_type::<AvatarExpressions>()
            .register_type::<CharacterState>()
            .register_type::<Emotion>()
            .register_type::<Reaction>()
            .register_type::<JointOwner>();
    }
}
