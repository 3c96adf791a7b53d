//! Organic signals: multi-harmonic sine sums used as the source of breathing, idle sway and slow
//! drift.
//!
//! Each harmonic contributes `sin(phase * frequency + offset) / (i + 1)`, and the sum is divided
//! by the total weight so every signal stays within `[-1, 1]` regardless of how many harmonics it
//! has. Using a few incommensurate frequencies gives a waveform whose apparent period is much
//! longer than any single sine, which keeps a long idle from looking like a loop.

use std::f64::consts::TAU;

use bevy::reflect::{Reflect, std_traits::ReflectDefault};
use serde::{Deserialize, Serialize};

use crate::interpolation::smoothstep;

#[derive(Reflect, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Harmonic {
    pub frequency: f32,
    pub offset: f32,
}

impl Harmonic {
    pub const fn new(frequency: f32, offset: f32) -> Self {
        Self { frequency, offset }
    }
}

/// Rate (cycles per second) and harmonic content of one signal.
#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
pub struct SignalShape {
    pub rate: f32,
    pub harmonics: Vec<Harmonic>,
}

impl Default for SignalShape {
    fn default() -> Self {
        Self {
            rate: 0.25,
            harmonics: vec![Harmonic::new(1., 0.)],
        }
    }
}

#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(default)]
pub struct SignalProfile {
    pub breathing: SignalShape,
    pub idle: SignalShape,
    pub drift: SignalShape,
}

impl Default for SignalProfile {
    fn default() -> Self {
        Self {
            // ~15 breaths per minute
            breathing: SignalShape {
                rate: 0.25,
                harmonics: vec![Harmonic::new(1., 0.), Harmonic::new(2., 0.6)],
            },
            idle: SignalShape {
                rate: 0.18,
                harmonics: vec![
                    Harmonic::new(1., 0.),
                    Harmonic::new(0.7, 1.3),
                    Harmonic::new(1.3, 2.1),
                ],
            },
            drift: SignalShape {
                rate: 0.05,
                harmonics: vec![
                    Harmonic::new(1., 0.4),
                    Harmonic::new(0.61, 2.7),
                    Harmonic::new(1.73, 5.1),
                ],
            },
        }
    }
}

#[derive(Reflect, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Breathing,
    Idle,
    Drift,
}

/// Everything derived from one signal value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SignalSample {
    /// Oscillation in `[-1, 1]`
    pub raw: f32,
    /// `raw` remapped to `[0, 1]`
    pub normalized: f32,
    /// Eased positive half of the oscillation, in `[0, 1]`
    pub inhale: f32,
    /// Eased negative half of the oscillation, in `[0, 1]`
    pub exhale: f32,
}

impl SignalSample {
    pub fn from_raw(raw: f32) -> Self {
        Self {
            raw,
            normalized: 0.5 + 0.5 * raw,
            inhale: smoothstep(raw.max(0.)),
            exhale: smoothstep((-raw).max(0.)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct OrganicSignal {
    /// Unwrapped. Harmonics with non-integer frequencies are discontinuous across a `2π` wrap.
    phase: f64,
    shape: SignalShape,
}

impl OrganicSignal {
    pub fn new(shape: SignalShape) -> Self {
        Self { phase: 0., shape }
    }

    pub fn advance(&mut self, dt: f32) {
        self.phase += f64::from(self.shape.rate) * TAU * f64::from(dt);
    }

    /// Phase wrapped to `[0, 2π)`.
    pub fn phase(&self) -> f32 {
        self.phase.rem_euclid(TAU) as f32
    }

    pub fn shape(&self) -> &SignalShape {
        &self.shape
    }

    /// Replaces rate and harmonics, keeping the accumulated phase.
    pub fn set_shape(&mut self, shape: SignalShape) {
        self.shape = shape;
    }

    pub fn value(&self) -> f32 {
        self.value_shifted(1., 0.)
    }

    /// Value read as if the phase ran `speed` times faster and was offset by `offset` radians.
    pub fn value_shifted(&self, speed: f32, offset: f32) -> f32 {
        let phase = self.phase * f64::from(speed);
        let mut sum = 0.;
        let mut total_weight = 0.;
        for (i, harmonic) in self.shape.harmonics.iter().enumerate() {
            let weight = 1. / (i + 1) as f64;
            sum += weight
                * (phase * f64::from(harmonic.frequency)
                    + f64::from(harmonic.offset)
                    + f64::from(offset))
                .sin();
            total_weight += weight;
        }
        if total_weight == 0. {
            return 0.;
        }
        (sum / total_weight) as f32
    }

    pub fn sample(&self) -> SignalSample {
        SignalSample::from_raw(self.value())
    }

    pub fn sample_shifted(&self, speed: f32, offset: f32) -> SignalSample {
        SignalSample::from_raw(self.value_shifted(speed, offset))
    }
}

/// Breathing, idle and drift signals advanced together.
#[derive(Clone, Debug)]
pub struct OrganicSignalSet {
    breathing: OrganicSignal,
    idle: OrganicSignal,
    drift: OrganicSignal,
    frozen: bool,
}

impl OrganicSignalSet {
    pub fn new(profile: &SignalProfile) -> Self {
        Self {
            breathing: OrganicSignal::new(profile.breathing.clone()),
            idle: OrganicSignal::new(profile.idle.clone()),
            drift: OrganicSignal::new(profile.drift.clone()),
            frozen: false,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        if self.frozen {
            return;
        }
        self.breathing.advance(dt);
        self.idle.advance(dt);
        self.drift.advance(dt);
    }

    /// A frozen set keeps its phases where they are; samples stay constant.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn apply_profile(&mut self, profile: &SignalProfile) {
        self.breathing.set_shape(profile.breathing.clone());
        self.idle.set_shape(profile.idle.clone());
        self.drift.set_shape(profile.drift.clone());
    }

    pub fn get(&self, kind: SignalKind) -> &OrganicSignal {
        match kind {
            SignalKind::Breathing => &self.breathing,
            SignalKind::Idle => &self.idle,
            SignalKind::Drift => &self.drift,
        }
    }

    pub fn sample(&self, kind: SignalKind) -> SignalSample {
        self.get(kind).sample()
    }
}
