//! Synthesized lip movement. There is no audio analysis: a few incommensurate sine carriers read
//! as speech once they are gated by phrase pauses and scaled by talk intensity.

use bevy::reflect::{Reflect, std_traits::ReflectDefault};
use serde::{Deserialize, Serialize};

use crate::interpolation::{SmoothedValue, smoothstep_between};

#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(default)]
pub struct MouthTuning {
    /// Angular frequencies of the carriers, in rad/s
    pub base_frequency: f32,
    pub secondary_frequency: f32,
    pub secondary_weight: f32,
    pub tertiary_frequency: f32,
    pub tertiary_weight: f32,
    /// Angular frequency of the phrase gate
    pub pause_frequency: f32,
    /// Gate sine value below which the mouth rests
    pub pause_threshold: f32,
    /// Width of the gate's eased transition
    pub pause_band: f32,
    /// Upper bound on mouth openness
    pub cap: f32,
    /// Smoothing time of talk intensity, in seconds
    pub talk_smoothing: f32,
    /// Largest share of openness given to the round viseme
    pub round_share: f32,
}

impl Default for MouthTuning {
    fn default() -> Self {
        Self {
            base_frequency: 24.,
            secondary_frequency: 17.3,
            secondary_weight: 0.35,
            tertiary_frequency: 31.7,
            tertiary_weight: 0.2,
            pause_frequency: 1.9,
            pause_threshold: -0.35,
            pause_band: 0.4,
            cap: 0.55,
            talk_smoothing: 0.25,
            round_share: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MouthShape {
    pub open: f32,
    /// Open viseme weight
    pub aa: f32,
    /// Round viseme weight
    pub oh: f32,
}

/// Mouth shape at talk time `t` for a given talk intensity. Every output lies in `[0, cap]`.
pub fn mouth_shape(t: f64, talk_intensity: f32, tuning: &MouthTuning) -> MouthShape {
    let carrier = (t * f64::from(tuning.base_frequency)).sin()
        + f64::from(tuning.secondary_weight) * (t * f64::from(tuning.secondary_frequency)).sin()
        + f64::from(tuning.tertiary_weight) * (t * f64::from(tuning.tertiary_frequency)).sin();
    let total_weight = 1. + f64::from(tuning.secondary_weight) + f64::from(tuning.tertiary_weight);
    let carrier = (0.5 + 0.5 * carrier / total_weight) as f32;

    let pause = (t * f64::from(tuning.pause_frequency)).sin() as f32;
    let gate = smoothstep_between(
        tuning.pause_threshold,
        tuning.pause_threshold + tuning.pause_band,
        pause,
    );

    let open = (carrier * gate * talk_intensity.clamp(0., 1.) * tuning.cap).clamp(0., tuning.cap);
    let roundness =
        (0.5 + 0.5 * (t * f64::from(tuning.secondary_frequency) + 1.3).sin()) as f32;
    let oh = open * tuning.round_share.clamp(0., 1.) * roundness;

    MouthShape {
        open,
        aa: open - oh,
        oh,
    }
}

/// Damped talk intensity driving [`mouth_shape`].
#[derive(Clone, Debug)]
pub struct VisemeSynth {
    talk: SmoothedValue,
    time: f64,
}

impl VisemeSynth {
    pub fn new(tuning: &MouthTuning) -> Self {
        Self {
            talk: SmoothedValue::new(0., tuning.talk_smoothing),
            time: 0.,
        }
    }

    pub fn update(&mut self, dt: f32, talk_target: f32, tuning: &MouthTuning) -> MouthShape {
        self.time += f64::from(dt);
        self.talk.smoothing_time = tuning.talk_smoothing;
        self.talk.set_target(talk_target);
        let talk = self.talk.step(dt);
        mouth_shape(self.time, talk, tuning)
    }

    pub fn talk_intensity(&self) -> f32 {
        self.talk.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openness_never_exceeds_cap() {
        let tuning = MouthTuning::default();
        for intensity in [0., 0.3, 0.7, 1., 1.5] {
            for frame in 0..20_000 {
                let t = f64::from(frame) * 0.0123;
                let shape = mouth_shape(t, intensity, &tuning);
                assert!((0. ..=tuning.cap).contains(&shape.open));
                assert!((0. ..=tuning.cap).contains(&shape.aa));
                assert!((0. ..=tuning.cap).contains(&shape.oh));
            }
        }
    }

    #[test]
    fn silent_without_talk_intensity() {
        let tuning = MouthTuning::default();
        for frame in 0..1000 {
            let shape = mouth_shape(f64::from(frame) / 60., 0., &tuning);
            assert_eq!(shape.open, 0.);
        }
    }

    #[test]
    fn pauses_close_the_mouth() {
        let tuning = MouthTuning::default();
        // Trough of the gate sine
        let t = 1.5 * std::f64::consts::PI / f64::from(tuning.pause_frequency);
        assert_eq!(mouth_shape(t, 1., &tuning).open, 0.);
    }

    #[test]
    fn talk_intensity_ramps() {
        let tuning = MouthTuning::default();
        let mut synth = VisemeSynth::new(&tuning);
        let mut previous = 0.;
        for _ in 0..30 {
            synth.update(1. / 60., 1., &tuning);
            assert!(synth.talk_intensity() > previous);
            assert!(synth.talk_intensity() <= 1.);
            previous = synth.talk_intensity();
        }
        for _ in 0..120 {
            synth.update(1. / 60., 0., &tuning);
        }
        assert!(synth.talk_intensity() < previous);
    }
}
