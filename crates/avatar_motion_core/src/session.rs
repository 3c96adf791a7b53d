//! One animated character: its pose, signals, gaze, face and pending reactions.

use bevy::{
    log::debug,
    math::{Quat, Vec3},
};

use crate::{
    expression::{
        Emotion, ExpressionDrive, ExpressionMixer, ExpressionSink, ExpressionWeights, Reaction,
        ReactionScheduler, ReactionToken,
    },
    look_at::{LookAtSolution, LookAtSolver},
    profile::MotionProfile,
    signals::OrganicSignalSet,
    skeleton::{
        HumanoidJoint, JointOwner, JointOwnership, PoseWriter, RigBinding, SkeletonPose,
        SkeletonProvider,
    },
    smoothing::smooth_pose,
    state::CharacterState,
    targets::{PoseTargets, StateDrive, compute_targets},
};

/// Seed used by [`AnimationSession::new`].
pub const DEFAULT_BLINK_SEED: u64 = 0x5eed;

/// Owns everything one avatar needs to be animated, and advances it one frame at a time.
///
/// The session stays uninitialized until [`AnimationSession::bind`] is given the rig; until then
/// [`AnimationSession::advance`] does nothing. State setters can be called at any time and take
/// effect on the next advance.
#[derive(Clone, Debug)]
pub struct AnimationSession {
    profile: MotionProfile,
    signals: OrganicSignalSet,
    pose: Option<SkeletonPose>,
    ownership: JointOwnership,
    look_solver: LookAtSolver,
    look_target: Option<Vec3>,
    look: LookAtSolution,
    targets: PoseTargets,
    mixer: ExpressionMixer,
    reactions: ReactionScheduler,
    state: CharacterState,
    emotion_override: Option<Emotion>,
}

impl Default for AnimationSession {
    fn default() -> Self {
        Self::new(MotionProfile::default())
    }
}

impl AnimationSession {
    pub fn new(profile: MotionProfile) -> Self {
        Self::with_seed(profile, DEFAULT_BLINK_SEED)
    }

    /// `seed` drives blink timing; avatars with different seeds blink out of sync.
    pub fn with_seed(profile: MotionProfile, seed: u64) -> Self {
        Self {
            signals: OrganicSignalSet::new(&profile.signals),
            pose: None,
            ownership: JointOwnership::default(),
            look_solver: LookAtSolver::default(),
            look_target: None,
            look: LookAtSolution::default(),
            targets: PoseTargets::default(),
            mixer: ExpressionMixer::new(seed, &profile),
            reactions: ReactionScheduler::default(),
            state: CharacterState::default(),
            emotion_override: None,
            profile,
        }
    }

    pub fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    /// Swaps the tuning table. Phases, channel values and velocities carry over.
    pub fn set_profile(&mut self, profile: MotionProfile) {
        self.signals.apply_profile(&profile.signals);
        self.profile = profile;
    }

    /// Creates the pose for the joints `binding` resolved. Rebinding starts the pose from rest.
    pub fn bind<J: Copy>(&mut self, binding: &RigBinding<J>) {
        self.pose = Some(SkeletonPose::for_joints(
            binding.joints(),
            &self.profile.smoothing,
            self.profile.timing.max_angular_speed,
        ));
    }

    pub fn unbind(&mut self) {
        self.pose = None;
    }

    pub fn is_initialized(&self) -> bool {
        self.pose.is_some()
    }

    /// Switches state immediately. A different state drops any emotion override and ends the
    /// active reaction; its effects on the face and mouth are damped.
    pub fn set_state(&mut self, state: CharacterState) {
        if state == self.state {
            return;
        }
        debug!("Avatar state {:?} -> {:?}", self.state, state);
        self.state = state;
        self.emotion_override = None;
        self.reactions.preempt();
    }

    pub fn state(&self) -> CharacterState {
        self.state
    }

    /// Overrides the state's default emotion until the next state change.
    pub fn set_emotion(&mut self, emotion: Emotion) {
        self.emotion_override = Some(emotion);
        self.reactions.preempt();
    }

    pub fn clear_emotion(&mut self) {
        self.emotion_override = None;
        self.reactions.preempt();
    }

    /// Emotion currently shown: the active reaction's, else the override, else the state's.
    pub fn emotion(&self) -> Emotion {
        self.expression_drive().emotion
    }

    pub fn set_look_at_target(&mut self, target: Vec3) {
        self.look_target = Some(target);
    }

    pub fn clear_look_at_target(&mut self) {
        self.look_target = None;
    }

    pub fn look_at_target(&self) -> Option<Vec3> {
        self.look_target
    }

    pub fn trigger_reaction(&mut self, reaction: Reaction) -> ReactionToken {
        let token = self.reactions.trigger(reaction, &self.profile.reactions);
        debug!("Avatar reaction {:?} scheduled as {:?}", reaction, token);
        token
    }

    pub fn cancel_reaction(&mut self, token: ReactionToken) -> bool {
        self.reactions.cancel(token)
    }

    pub fn active_reaction(&self) -> Option<Reaction> {
        self.reactions.active().map(|active| active.reaction)
    }

    pub fn set_joint_owner(&mut self, joint: HumanoidJoint, owner: JointOwner) {
        self.ownership.set_owner(joint, owner);
    }

    pub fn joint_owner(&self, joint: HumanoidJoint) -> JointOwner {
        self.ownership.owner(joint)
    }

    pub fn signals(&self) -> &OrganicSignalSet {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut OrganicSignalSet {
        &mut self.signals
    }

    /// What the face is being driven toward this frame.
    pub fn expression_drive(&self) -> ExpressionDrive {
        let preset = self.profile.states.get(self.state);
        match self.reactions.active() {
            Some(active) => {
                let reaction = self.profile.reactions.get(active.reaction);
                ExpressionDrive {
                    emotion: reaction.emotion,
                    intensity: reaction.intensity,
                    talk: preset.talk_intensity,
                    wink: active.reaction == Reaction::Wink,
                }
            }
            None => ExpressionDrive {
                emotion: self.emotion_override.unwrap_or(preset.emotion),
                intensity: preset.expression_intensity,
                talk: preset.talk_intensity,
                wink: false,
            },
        }
    }

    /// Advances one frame. `head_position` is the head's world position and `facing` the avatar's
    /// world rotation. Returns `false` without touching anything when no rig is bound.
    pub fn advance(&mut self, dt: f32, head_position: Vec3, facing: Quat) -> bool {
        if self.pose.is_none() {
            return false;
        }
        let dt = self.profile.timing.clamp_delta(dt);

        self.signals.advance(dt);
        if let Some(reaction) = self.reactions.advance(dt) {
            debug!("Avatar reaction {:?} reverted", reaction);
        }

        self.look = self.look_solver.solve(
            head_position,
            facing,
            self.look_target,
            dt,
            &self.profile.look_at,
        );

        let drive = self.expression_drive();
        self.mixer.update(dt, drive, &self.profile);

        self.targets = compute_targets(
            &self.signals,
            StateDrive {
                preset: self.profile.states.get(self.state),
                talk_intensity: self.mixer.talk_intensity(),
            },
            &self.look,
            &self.profile,
        );

        let Some(pose) = self.pose.as_mut() else {
            return false;
        };
        smooth_pose(
            pose,
            &self.targets,
            &self.ownership,
            &self.profile.smoothing,
            self.profile.timing.max_angular_speed,
            dt,
        );
        true
    }

    /// [`Self::advance`], reading the head position from the rig. Rigs without a head use a
    /// point [`default_head_height`](crate::look_at::LookAtTuning::default_head_height) above
    /// `root_position`.
    pub fn advance_rig<P: SkeletonProvider>(
        &mut self,
        dt: f32,
        rig: &P,
        root_position: Vec3,
        facing: Quat,
    ) -> bool {
        let head_position = rig
            .joint(HumanoidJoint::Head)
            .map(|head| rig.world_position(head))
            .unwrap_or_else(|| {
                root_position + facing * (Vec3::Y * self.profile.look_at.default_head_height)
            });
        self.advance(dt, head_position, facing)
    }

    /// Writes every procedural joint as its rest rotation composed with the procedural one.
    pub fn write_pose<J: Copy, W: PoseWriter<Joint = J>>(
        &self,
        binding: &RigBinding<J>,
        writer: &mut W,
    ) {
        let Some(pose) = &self.pose else {
            return;
        };
        for (joint, rotation) in pose.iter() {
            if !self.ownership.is_procedural(joint) {
                continue;
            }
            if let Some(bound) = binding.get(joint) {
                writer.write_joint_rotation(bound.handle, bound.rest_rotation * rotation.to_quat());
            }
        }
    }

    pub fn write_expressions(&self, sink: &mut impl ExpressionSink) {
        self.mixer.weights().write_to(sink);
    }

    pub fn pose(&self) -> Option<&SkeletonPose> {
        self.pose.as_ref()
    }

    pub fn targets(&self) -> &PoseTargets {
        &self.targets
    }

    pub fn look_solution(&self) -> LookAtSolution {
        self.look
    }

    pub fn expressions(&self) -> &ExpressionWeights {
        self.mixer.weights()
    }

    pub fn talk_intensity(&self) -> f32 {
        self.mixer.talk_intensity()
    }

    pub fn expression_intensity(&self) -> f32 {
        self.mixer.expression_intensity()
    }
}
