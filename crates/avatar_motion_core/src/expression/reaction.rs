use bevy::reflect::{Reflect, std_traits::ReflectDefault};
use serde::{Deserialize, Serialize};

use super::Emotion;

/// A timed expression pulse.
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reaction {
    Laugh,
    Surprise,
    Pout,
    Anger,
    /// Closes the left eye only
    Wink,
    Blush,
}

impl Reaction {
    pub const ALL: [Reaction; 6] = [
        Reaction::Laugh,
        Reaction::Surprise,
        Reaction::Pout,
        Reaction::Anger,
        Reaction::Wink,
        Reaction::Blush,
    ];
}

#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReactionPreset {
    pub emotion: Emotion,
    pub intensity: f32,
    /// Seconds until the expression reverts to the state's resting one
    pub duration: f32,
}

impl ReactionPreset {
    pub const fn new(emotion: Emotion, intensity: f32, duration: f32) -> Self {
        Self {
            emotion,
            intensity,
            duration,
        }
    }
}

#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(default)]
pub struct ReactionPresets {
    pub laugh: ReactionPreset,
    pub surprise: ReactionPreset,
    pub pout: ReactionPreset,
    pub anger: ReactionPreset,
    pub wink: ReactionPreset,
    pub blush: ReactionPreset,
}

impl Default for ReactionPresets {
    fn default() -> Self {
        Self {
            laugh: ReactionPreset::new(Emotion::Happy, 0.9, 1.5),
            surprise: ReactionPreset::new(Emotion::Surprised, 0.8, 0.8),
            pout: ReactionPreset::new(Emotion::Sad, 0.6, 2.),
            anger: ReactionPreset::new(Emotion::Angry, 0.7, 2.5),
            wink: ReactionPreset::new(Emotion::Happy, 0.4, 0.3),
            blush: ReactionPreset::new(Emotion::Flirty, 0.8, 1.2),
        }
    }
}

impl ReactionPresets {
    pub fn get(&self, reaction: Reaction) -> &ReactionPreset {
        match reaction {
            Reaction::Laugh => &self.laugh,
            Reaction::Surprise => &self.surprise,
            Reaction::Pout => &self.pout,
            Reaction::Anger => &self.anger,
            Reaction::Wink => &self.wink,
            Reaction::Blush => &self.blush,
        }
    }
}

/// Generation number handed out when a reaction is scheduled.
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReactionToken(pub u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveReaction {
    pub reaction: Reaction,
    pub token: ReactionToken,
}

#[derive(Clone, Copy, Debug)]
struct PendingRevert {
    token: ReactionToken,
    remaining: f32,
}

/// Schedules reaction reverts.
///
/// Every change (a new reaction, or anything the caller reports through [`Self::preempt`]) bumps
/// the generation. A revert only applies if its token is still the current generation; older
/// reverts are dropped when they come due.
#[derive(Clone, Debug, Default)]
pub struct ReactionScheduler {
    generation: u64,
    active: Option<ActiveReaction>,
    pending: Vec<PendingRevert>,
}

impl ReactionScheduler {
    pub fn trigger(&mut self, reaction: Reaction, presets: &ReactionPresets) -> ReactionToken {
        self.generation += 1;
        let token = ReactionToken(self.generation);
        self.active = Some(ActiveReaction { reaction, token });
        self.pending.push(PendingRevert {
            token,
            remaining: presets.get(reaction).duration,
        });
        token
    }

    /// Records a newer change: the active reaction ends and any pending revert goes stale.
    pub fn preempt(&mut self) {
        self.generation += 1;
        self.active = None;
    }

    /// Ends the reaction early if `token` is still the active one.
    pub fn cancel(&mut self, token: ReactionToken) -> bool {
        if self.active.map(|active| active.token) == Some(token) {
            self.preempt();
            true
        } else {
            false
        }
    }

    /// Counts down pending reverts. Returns the reaction whose revert applied this frame.
    pub fn advance(&mut self, dt: f32) -> Option<Reaction> {
        let mut reverted = None;
        let generation = self.generation;
        let active = self.active;
        self.pending.retain_mut(|pending| {
            pending.remaining -= dt;
            if pending.remaining > 0. {
                return true;
            }
            if pending.token == ReactionToken(generation) {
                reverted = active.map(|active| active.reaction);
            }
            false
        });
        if reverted.is_some() {
            self.active = None;
        }
        reverted
    }

    pub fn active(&self) -> Option<ActiveReaction> {
        self.active
    }

    pub fn pending_reverts(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(scheduler: &mut ReactionScheduler, seconds: f32) -> Vec<Reaction> {
        let mut reverted = Vec::new();
        let steps = (seconds * 60.).round() as usize;
        for _ in 0..steps {
            reverted.extend(scheduler.advance(1. / 60.));
        }
        reverted
    }

    #[test]
    fn reaction_reverts_after_its_duration() {
        let presets = ReactionPresets::default();
        let mut scheduler = ReactionScheduler::default();
        scheduler.trigger(Reaction::Surprise, &presets);
        assert!(run(&mut scheduler, 0.5).is_empty());
        assert!(scheduler.active().is_some());
        assert_eq!(run(&mut scheduler, 0.5), vec![Reaction::Surprise]);
        assert!(scheduler.active().is_none());
        assert_eq!(scheduler.pending_reverts(), 0);
    }

    #[test]
    fn newer_reaction_discards_older_revert() {
        let presets = ReactionPresets::default();
        let mut scheduler = ReactionScheduler::default();
        scheduler.trigger(Reaction::Wink, &presets);
        run(&mut scheduler, 0.1);
        let token = scheduler.trigger(Reaction::Laugh, &presets);

        // The wink revert comes due here but is stale
        assert!(run(&mut scheduler, 0.5).is_empty());
        assert_eq!(scheduler.active().map(|active| active.token), Some(token));

        assert_eq!(run(&mut scheduler, 1.2), vec![Reaction::Laugh]);
    }

    #[test]
    fn preempted_revert_does_nothing() {
        let presets = ReactionPresets::default();
        let mut scheduler = ReactionScheduler::default();
        scheduler.trigger(Reaction::Pout, &presets);
        scheduler.preempt();
        assert!(scheduler.active().is_none());
        assert!(run(&mut scheduler, 3.).is_empty());
        assert_eq!(scheduler.pending_reverts(), 0);
    }

    #[test]
    fn cancel_only_matches_active_token() {
        let presets = ReactionPresets::default();
        let mut scheduler = ReactionScheduler::default();
        let first = scheduler.trigger(Reaction::Anger, &presets);
        let second = scheduler.trigger(Reaction::Blush, &presets);
        assert!(!scheduler.cancel(first));
        assert!(scheduler.cancel(second));
        assert!(scheduler.active().is_none());
    }

    #[test]
    fn durations_are_within_range() {
        let presets = ReactionPresets::default();
        for reaction in Reaction::ALL {
            let duration = presets.get(reaction).duration;
            assert!((0.3..=2.5).contains(&duration));
        }
    }
}
