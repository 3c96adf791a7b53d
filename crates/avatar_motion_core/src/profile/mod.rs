//! The one configuration table every tuning constant lives in.

mod loader;

pub use loader::*;

use bevy::{
    asset::Asset,
    reflect::{Reflect, std_traits::ReflectDefault},
};
use serde::{Deserialize, Serialize};

use crate::{
    errors::ProfileValidationError,
    expression::{BlinkTuning, ExpressionTuning, MouthTuning, ReactionPresets},
    look_at::LookAtTuning,
    signals::SignalProfile,
    smoothing::SmoothingTable,
    state::StatePresets,
    targets::PoseTuning,
};

#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(default)]
pub struct TimingTuning {
    /// Frame deltas are clamped to `[min_delta, max_delta]` seconds before any smoothing math
    pub min_delta: f32,
    pub max_delta: f32,
    /// Optional cap on joint angular speed, in rad/s
    pub max_angular_speed: Option<f32>,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            min_delta: 1e-4,
            max_delta: 0.1,
            max_angular_speed: None,
        }
    }
}

impl TimingTuning {
    /// Clamps a frame delta. A non-finite delta counts as the minimum.
    pub fn clamp_delta(&self, dt: f32) -> f32 {
        if !dt.is_finite() {
            return self.min_delta;
        }
        dt.clamp(self.min_delta, self.max_delta)
    }
}

#[derive(Asset, Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(default)]
pub struct MotionProfile {
    pub timing: TimingTuning,
    pub smoothing: SmoothingTable,
    pub signals: SignalProfile,
    pub pose: PoseTuning,
    pub look_at: LookAtTuning,
    pub states: StatePresets,
    pub blink: BlinkTuning,
    pub mouth: MouthTuning,
    pub expression: ExpressionTuning,
    pub reactions: ReactionPresets,
}

impl MotionProfile {
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        let timing = &self.timing;
        positive("min_delta", timing.min_delta)?;
        if timing.max_delta < timing.min_delta {
            return Err(ProfileValidationError::DeltaRange {
                min: timing.min_delta,
                max: timing.max_delta,
            });
        }
        if let Some(speed) = timing.max_angular_speed {
            positive("max_angular_speed", speed)?;
        }

        self.smoothing.validate()?;

        for (name, shape) in [
            ("breathing rate", &self.signals.breathing),
            ("idle rate", &self.signals.idle),
            ("drift rate", &self.signals.drift),
        ] {
            positive(name, shape.rate)?;
        }

        positive("look-at target half-life", self.look_at.target_half_life)?;

        let blink = &self.blink;
        if blink.min_interval <= 0. || blink.max_interval < blink.min_interval {
            return Err(ProfileValidationError::BlinkInterval {
                min: blink.min_interval,
                max: blink.max_interval,
            });
        }
        positive("blink duration", blink.duration)?;
        if !(blink.close_ratio > 0. && blink.close_ratio < 1.) {
            return Err(ProfileValidationError::OutOfUnitRange(
                "blink close ratio",
                blink.close_ratio,
            ));
        }

        if !(self.mouth.cap > 0. && self.mouth.cap <= 1.) {
            return Err(ProfileValidationError::OutOfUnitRange("mouth cap", self.mouth.cap));
        }
        positive("talk smoothing", self.mouth.talk_smoothing)?;
        positive("intensity smoothing", self.expression.intensity_smoothing)?;
        positive("channel smoothing", self.expression.channel_smoothing)?;

        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ProfileValidationError> {
    if value > 0. {
        Ok(())
    } else {
        Err(ProfileValidationError::NotPositive(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_valid() {
        assert_eq!(MotionProfile::default().validate(), Ok(()));
    }

    #[test]
    fn default_profile_round_trips_through_ron() {
        let profile = MotionProfile::default();
        let text =
            ron::ser::to_string_pretty(&profile, ron::ser::PrettyConfig::default()).unwrap();
        let parsed: MotionProfile = ron::de::from_str(&text).unwrap();
        assert_eq!(parsed, profile);
    }

    #[test]
    fn partial_profile_falls_back_to_defaults() {
        let parsed: MotionProfile =
            ron::de::from_str("(smoothing: (hips: 0.6), blink: (min_interval: 3.0))").unwrap();
        assert_eq!(parsed.smoothing.hips, 0.6);
        assert_eq!(parsed.smoothing.head, SmoothingTable::default().head);
        assert_eq!(parsed.blink.min_interval, 3.);
        assert_eq!(parsed.mouth, MouthTuning::default());
    }

    #[test]
    fn rejects_bad_tables() {
        let mut profile = MotionProfile::default();
        profile.smoothing.eyes = 0.5;
        assert!(matches!(
            profile.validate(),
            Err(ProfileValidationError::SmoothingOrder { .. })
        ));

        let mut profile = MotionProfile::default();
        profile.blink.max_interval = 1.;
        assert!(matches!(
            profile.validate(),
            Err(ProfileValidationError::BlinkInterval { .. })
        ));

        let mut profile = MotionProfile::default();
        profile.mouth.cap = 1.5;
        assert!(matches!(
            profile.validate(),
            Err(ProfileValidationError::OutOfUnitRange("mouth cap", _))
        ));
    }

    #[test]
    fn delta_is_clamped() {
        let timing = TimingTuning::default();
        assert_eq!(timing.clamp_delta(0.), 1e-4);
        assert_eq!(timing.clamp_delta(3.), 0.1);
        assert_eq!(timing.clamp_delta(f32::NAN), 1e-4);
        assert_eq!(timing.clamp_delta(f32::INFINITY), 1e-4);
        assert_eq!(timing.clamp_delta(1. / 60.), 1. / 60.);
    }
}
