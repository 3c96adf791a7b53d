use bevy::reflect::{Reflect, std_traits::ReflectDefault};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Blinker, Emotion, ExpressionChannel, ExpressionWeights, MouthShape, VisemeSynth};
use crate::{interpolation::SmoothedValue, profile::MotionProfile};

const EMOTION_CHANNELS: [ExpressionChannel; 5] = [
    ExpressionChannel::Happy,
    ExpressionChannel::Sad,
    ExpressionChannel::Angry,
    ExpressionChannel::Surprised,
    ExpressionChannel::Relaxed,
];

#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(default)]
pub struct ExpressionTuning {
    /// Smoothing time of the overall expression intensity
    pub intensity_smoothing: f32,
    /// Smoothing time of each emotion channel, so switching emotion cross-fades
    pub channel_smoothing: f32,
    /// `happy` weight of a neutral face, as a share of intensity
    pub neutral_residual: f32,
    /// `happy` weight added to a flirty face, as a share of intensity
    pub flirty_happy_residual: f32,
}

impl Default for ExpressionTuning {
    fn default() -> Self {
        Self {
            intensity_smoothing: 0.3,
            channel_smoothing: 0.12,
            neutral_residual: 0.4,
            flirty_happy_residual: 0.3,
        }
    }
}

/// What the face should be doing this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExpressionDrive {
    pub emotion: Emotion,
    /// Target for the damped expression intensity
    pub intensity: f32,
    /// Target for the damped talk intensity
    pub talk: f32,
    /// Holds the left eye closed
    pub wink: bool,
}

/// Emotion channel weights for `emotion` at `intensity`. Channels not listed are 0.
pub fn emotion_weights(
    emotion: Emotion,
    intensity: f32,
    tuning: &ExpressionTuning,
) -> Vec<(ExpressionChannel, f32)> {
    match emotion {
        Emotion::Neutral => vec![(
            ExpressionChannel::Happy,
            intensity * tuning.neutral_residual,
        )],
        Emotion::Happy => vec![(ExpressionChannel::Happy, intensity)],
        Emotion::Sad => vec![(ExpressionChannel::Sad, intensity)],
        Emotion::Surprised => vec![(ExpressionChannel::Surprised, intensity)],
        Emotion::Angry => vec![(ExpressionChannel::Angry, intensity)],
        Emotion::Flirty => vec![
            (ExpressionChannel::Relaxed, intensity),
            (
                ExpressionChannel::Happy,
                intensity * tuning.flirty_happy_residual,
            ),
        ],
    }
}

/// Blends emotion, blinking and mouth movement into [`ExpressionWeights`], fully recomputed every
/// frame.
#[derive(Clone, Debug)]
pub struct ExpressionMixer {
    intensity: SmoothedValue,
    channels: IndexMap<ExpressionChannel, SmoothedValue>,
    wink: SmoothedValue,
    blinker: Blinker,
    mouth: VisemeSynth,
    last_mouth: MouthShape,
    weights: ExpressionWeights,
}

impl ExpressionMixer {
    pub fn new(seed: u64, profile: &MotionProfile) -> Self {
        let tuning = &profile.expression;
        Self {
            intensity: SmoothedValue::new(0., tuning.intensity_smoothing),
            channels: EMOTION_CHANNELS
                .into_iter()
                .map(|channel| (channel, SmoothedValue::new(0., tuning.channel_smoothing)))
                .collect(),
            wink: SmoothedValue::new(0., tuning.channel_smoothing),
            blinker: Blinker::new(seed, &profile.blink),
            mouth: VisemeSynth::new(&profile.mouth),
            last_mouth: MouthShape::default(),
            weights: ExpressionWeights::default(),
        }
    }

    pub fn update(
        &mut self,
        dt: f32,
        drive: ExpressionDrive,
        profile: &MotionProfile,
    ) -> &ExpressionWeights {
        let tuning = &profile.expression;

        self.intensity.smoothing_time = tuning.intensity_smoothing;
        self.intensity.set_target(drive.intensity.clamp(0., 1.));
        let intensity = self.intensity.step(dt);

        let targets = emotion_weights(drive.emotion, intensity, tuning);
        for (channel, value) in self.channels.iter_mut() {
            let target = targets
                .iter()
                .find(|(target_channel, _)| target_channel == channel)
                .map(|(_, weight)| *weight)
                .unwrap_or_default();
            value.smoothing_time = tuning.channel_smoothing;
            value.set_target(target);
            value.step(dt);
        }

        self.wink.smoothing_time = tuning.channel_smoothing;
        self.wink.set_target(if drive.wink { 1. } else { 0. });
        let wink = self.wink.step(dt);

        let surprised = self.channel(ExpressionChannel::Surprised);
        let blink = self.blinker.update(dt, &profile.blink)
            * (1. - surprised * profile.blink.surprise_suppression).clamp(0., 1.);

        self.last_mouth = self.mouth.update(dt, drive.talk, &profile.mouth);

        self.weights.reset();
        for (channel, value) in &self.channels {
            self.weights.set(*channel, value.current);
        }
        self.weights.set(ExpressionChannel::Aa, self.last_mouth.aa);
        self.weights.set(ExpressionChannel::Oh, self.last_mouth.oh);
        self.weights.set(ExpressionChannel::Blink, blink);
        self.weights.set(ExpressionChannel::BlinkLeft, wink);
        self.weights.set(ExpressionChannel::BlinkRight, 0.);

        &self.weights
    }

    fn channel(&self, channel: ExpressionChannel) -> f32 {
        self.channels
            .get(&channel)
            .map(|value| value.current)
            .unwrap_or_default()
    }

    pub fn weights(&self) -> &ExpressionWeights {
        &self.weights
    }

    pub fn expression_intensity(&self) -> f32 {
        self.intensity.current
    }

    pub fn talk_intensity(&self) -> f32 {
        self.mouth.talk_intensity()
    }

    pub fn mouth(&self) -> MouthShape {
        self.last_mouth
    }

    pub fn blinker(&self) -> &Blinker {
        &self.blinker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1. / 60.;

    fn drive(emotion: Emotion, intensity: f32, talk: f32) -> ExpressionDrive {
        ExpressionDrive {
            emotion,
            intensity,
            talk,
            wink: false,
        }
    }

    #[test]
    fn neutral_keeps_a_small_smile() {
        let profile = MotionProfile::default();
        let mut mixer = ExpressionMixer::new(1, &profile);
        for _ in 0..300 {
            mixer.update(DT, drive(Emotion::Neutral, 0.25, 0.), &profile);
        }
        let happy = mixer.weights().get(ExpressionChannel::Happy);
        assert!((happy - 0.25 * profile.expression.neutral_residual).abs() < 1e-3);
        assert_eq!(mixer.weights().get(ExpressionChannel::Sad), 0.);
    }

    #[test]
    fn switching_emotion_cross_fades() {
        let profile = MotionProfile::default();
        let mut mixer = ExpressionMixer::new(1, &profile);
        for _ in 0..300 {
            mixer.update(DT, drive(Emotion::Angry, 0.6, 0.), &profile);
        }
        let mut previous_angry = mixer.weights().get(ExpressionChannel::Angry);
        let mut previous_sad = mixer.weights().get(ExpressionChannel::Sad);
        for _ in 0..60 {
            mixer.update(DT, drive(Emotion::Sad, 0.6, 0.), &profile);
            let angry = mixer.weights().get(ExpressionChannel::Angry);
            let sad = mixer.weights().get(ExpressionChannel::Sad);
            assert!(angry <= previous_angry);
            assert!(sad >= previous_sad);
            assert!((angry - previous_angry).abs() < 0.15);
            assert!((sad - previous_sad).abs() < 0.15);
            previous_angry = angry;
            previous_sad = sad;
        }
        assert!(previous_angry < 0.01);
        assert!((previous_sad - 0.6).abs() < 0.01);
    }

    #[test]
    fn flirty_is_relaxed_with_a_smile() {
        let profile = MotionProfile::default();
        let mut mixer = ExpressionMixer::new(1, &profile);
        for _ in 0..300 {
            mixer.update(DT, drive(Emotion::Flirty, 0.7, 0.), &profile);
        }
        let weights = mixer.weights();
        assert!((weights.get(ExpressionChannel::Relaxed) - 0.7).abs() < 1e-3);
        assert!(weights.get(ExpressionChannel::Happy) > 0.);
    }

    #[test]
    fn wink_closes_left_eye_only() {
        let profile = MotionProfile::default();
        let mut mixer = ExpressionMixer::new(1, &profile);
        let mut wink = drive(Emotion::Happy, 0.4, 0.);
        wink.wink = true;
        for _ in 0..30 {
            mixer.update(DT, wink, &profile);
        }
        assert!(mixer.weights().get(ExpressionChannel::BlinkLeft) > 0.9);
        assert_eq!(mixer.weights().get(ExpressionChannel::BlinkRight), 0.);
    }

    #[test]
    fn surprise_attenuates_blinking() {
        let profile = MotionProfile::default();
        let mut calm = ExpressionMixer::new(3, &profile);
        let mut surprised = ExpressionMixer::new(3, &profile);
        let mut calm_peak: f32 = 0.;
        let mut surprised_peak: f32 = 0.;
        for _ in 0..60 * 20 {
            calm.update(DT, drive(Emotion::Neutral, 0.25, 0.), &profile);
            surprised.update(DT, drive(Emotion::Surprised, 1., 0.), &profile);
            calm_peak = calm_peak.max(calm.weights().get(ExpressionChannel::Blink));
            surprised_peak = surprised_peak.max(surprised.weights().get(ExpressionChannel::Blink));
        }
        assert!(calm_peak > 0.9);
        assert!(surprised_peak < calm_peak * 0.5);
    }

    #[test]
    fn mouth_moves_only_while_talking() {
        let profile = MotionProfile::default();
        let mut mixer = ExpressionMixer::new(1, &profile);
        let mut peak: f32 = 0.;
        for _ in 0..120 {
            mixer.update(DT, drive(Emotion::Neutral, 0.25, 0.), &profile);
            peak = peak.max(mixer.weights().get(ExpressionChannel::Aa));
        }
        assert_eq!(peak, 0.);
        for _ in 0..240 {
            mixer.update(DT, drive(Emotion::Happy, 0.5, 1.), &profile);
            let open = mixer.mouth().open;
            assert!(open <= profile.mouth.cap);
            peak = peak.max(mixer.weights().get(ExpressionChannel::Aa));
        }
        assert!(peak > 0.1);
    }
}
