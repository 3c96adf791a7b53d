use bevy::reflect::{Reflect, std_traits::ReflectDefault};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::interpolation::smoothstep;

#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(default)]
pub struct BlinkTuning {
    /// Shortest time the eyes stay open between blinks, in seconds
    pub min_interval: f32,
    pub max_interval: f32,
    /// Length of one whole blink, in seconds
    pub duration: f32,
    /// Share of the blink spent closing
    pub close_ratio: f32,
    /// How much a fully surprised face attenuates blinking
    pub surprise_suppression: f32,
}

impl Default for BlinkTuning {
    fn default() -> Self {
        Self {
            min_interval: 2.5,
            max_interval: 6.5,
            duration: 0.18,
            close_ratio: 0.3,
            surprise_suppression: 0.6,
        }
    }
}

#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlinkPhase {
    #[default]
    Open,
    Closing,
    Opening,
}

/// Blink state machine: `Open -> Closing -> Opening -> Open`, with a fresh random interval on
/// every return to `Open`.
#[derive(Clone, Debug)]
pub struct Blinker {
    phase: BlinkPhase,
    /// Time spent open since the last blink
    timer: f32,
    interval: f32,
    /// Progress through the blink, in `[0, 1]`
    progress: f32,
    blink_count: u64,
    rng: StdRng,
}

impl Blinker {
    pub fn new(seed: u64, tuning: &BlinkTuning) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let interval = random_interval(&mut rng, tuning);
        Self {
            phase: BlinkPhase::Open,
            timer: 0.,
            interval,
            progress: 0.,
            blink_count: 0,
            rng,
        }
    }

    pub fn update(&mut self, dt: f32, tuning: &BlinkTuning) -> f32 {
        match self.phase {
            BlinkPhase::Open => {
                self.timer += dt;
                if self.timer >= self.interval {
                    self.phase = BlinkPhase::Closing;
                    self.progress = 0.;
                    self.timer = 0.;
                }
            }
            BlinkPhase::Closing => {
                self.progress += dt / tuning.duration;
                if self.progress >= tuning.close_ratio {
                    self.phase = BlinkPhase::Opening;
                }
            }
            BlinkPhase::Opening => {
                self.progress += dt / tuning.duration;
                if self.progress >= 1. {
                    self.phase = BlinkPhase::Open;
                    self.progress = 0.;
                    self.interval = random_interval(&mut self.rng, tuning);
                    self.blink_count += 1;
                }
            }
        }
        self.value(tuning)
    }

    /// Eyelid closure in `[0, 1]`.
    pub fn value(&self, tuning: &BlinkTuning) -> f32 {
        match self.phase {
            BlinkPhase::Open => 0.,
            BlinkPhase::Closing => smoothstep(self.progress / tuning.close_ratio),
            BlinkPhase::Opening => {
                1. - smoothstep((self.progress - tuning.close_ratio) / (1. - tuning.close_ratio))
            }
        }
    }

    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    /// Completed blinks.
    pub fn blink_count(&self) -> u64 {
        self.blink_count
    }
}

fn random_interval(rng: &mut StdRng, tuning: &BlinkTuning) -> f32 {
    if tuning.max_interval <= tuning.min_interval {
        return tuning.min_interval;
    }
    rng.random_range(tuning.min_interval..=tuning.max_interval)
}
