use avatar_motion_core::{
    expression::{Emotion, Reaction, ReactionToken},
    profile::MotionProfile,
    session::AnimationSession,
    skeleton::{HumanoidJoint, JointNameMapper, JointOwner, RigBinding},
    state::CharacterState,
};
use bevy::{
    asset::Handle,
    ecs::{component::Component, entity::Entity, reflect::ReflectComponent},
    math::Vec3,
    reflect::Reflect,
};

use crate::expressions::AvatarExpressions;

/// Procedural motion controls for one avatar. Put it on the avatar's root entity, above the
/// rig's named joint entities.
///
/// The rig is bound the first frame its joints can be found; until then the avatar is left
/// alone. Everything set here takes effect on the next frame.
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
#[require(AvatarExpressions)]
pub struct AvatarMotionPlayer {
    pub(crate) paused: bool,
    pub(crate) profile: Option<Handle<MotionProfile>>,
    pub(crate) profile_failed: bool,

    #[reflect(ignore)]
    pub(crate) session: AnimationSession,
    #[reflect(ignore)]
    pub(crate) binding: Option<RigBinding<Entity>>,
    #[reflect(ignore)]
    pub(crate) name_mapper: JointNameMapper,
}

impl AvatarMotionPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tune the avatar with a profile asset. Until it loads, the default profile is used.
    pub fn with_profile(mut self, profile: Handle<MotionProfile>) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Seed for blink timing. Avatars sharing a seed blink in sync.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.session = AnimationSession::with_seed(self.session.profile().clone(), seed);
        self
    }

    /// Maps the rig's node names onto humanoid joints. Defaults to VRM, VRM0 and Mixamo names.
    pub fn with_name_mapper(mut self, name_mapper: JointNameMapper) -> Self {
        self.name_mapper = name_mapper;
        self
    }

    pub fn set_profile(&mut self, profile: Handle<MotionProfile>) -> &mut Self {
        self.profile = Some(profile);
        self.profile_failed = false;
        self
    }

    pub fn get_profile(&self) -> Option<Handle<MotionProfile>> {
        self.profile.clone()
    }

    pub fn set_state(&mut self, state: CharacterState) -> &mut Self {
        self.session.set_state(state);
        self
    }

    pub fn state(&self) -> CharacterState {
        self.session.state()
    }

    pub fn set_emotion(&mut self, emotion: Emotion) -> &mut Self {
        self.session.set_emotion(emotion);
        self
    }

    pub fn clear_emotion(&mut self) -> &mut Self {
        self.session.clear_emotion();
        self
    }

    pub fn set_look_at_target(&mut self, target: Vec3) -> &mut Self {
        self.session.set_look_at_target(target);
        self
    }

    pub fn clear_look_at_target(&mut self) -> &mut Self {
        self.session.clear_look_at_target();
        self
    }

    pub fn trigger_reaction(&mut self, reaction: Reaction) -> ReactionToken {
        self.session.trigger_reaction(reaction)
    }

    pub fn cancel_reaction(&mut self, token: ReactionToken) -> bool {
        self.session.cancel_reaction(token)
    }

    /// Hands a joint to an animation clip layer, or back to the procedural motion.
    pub fn set_joint_owner(&mut self, joint: HumanoidJoint, owner: JointOwner) -> &mut Self {
        self.session.set_joint_owner(joint, owner);
        self
    }

    pub fn pause(&mut self) -> &mut Self {
        self.paused = true;
        self
    }

    pub fn resume(&mut self) -> &mut Self {
        self.paused = false;
        self
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Forgets the current rig; it is looked up again on the next frame.
    pub fn rebind(&mut self) -> &mut Self {
        self.binding = None;
        self.session.unbind();
        self
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    pub fn binding(&self) -> Option<&RigBinding<Entity>> {
        self.binding.as_ref()
    }

    pub fn session(&self) -> &AnimationSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut AnimationSession {
        &mut self.session
    }
}
