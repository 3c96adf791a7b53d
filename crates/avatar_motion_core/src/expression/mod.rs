//! Facial expression weights: emotion, blink, mouth visemes and timed reactions.

mod blink;
mod mixer;
mod mouth;
mod reaction;

pub use blink::*;
pub use mixer::*;
pub use mouth::*;
pub use reaction::*;

use std::fmt;

use bevy::reflect::Reflect;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Sad,
    Surprised,
    Angry,
    Flirty,
}

impl Emotion {
    pub const ALL: [Emotion; 6] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprised,
        Emotion::Angry,
        Emotion::Flirty,
    ];
}

/// Expression names understood by VRM-style expression sets.
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpressionChannel {
    Happy,
    Sad,
    Angry,
    Surprised,
    Relaxed,
    /// Mouth open
    Aa,
    /// Mouth round
    Oh,
    Blink,
    BlinkLeft,
    BlinkRight,
}

impl ExpressionChannel {
    pub const ALL: [ExpressionChannel; 10] = [
        ExpressionChannel::Happy,
        ExpressionChannel::Sad,
        ExpressionChannel::Angry,
        ExpressionChannel::Surprised,
        ExpressionChannel::Relaxed,
        ExpressionChannel::Aa,
        ExpressionChannel::Oh,
        ExpressionChannel::Blink,
        ExpressionChannel::BlinkLeft,
        ExpressionChannel::BlinkRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExpressionChannel::Happy => "happy",
            ExpressionChannel::Sad => "sad",
            ExpressionChannel::Angry => "angry",
            ExpressionChannel::Surprised => "surprised",
            ExpressionChannel::Relaxed => "relaxed",
            ExpressionChannel::Aa => "aa",
            ExpressionChannel::Oh => "oh",
            ExpressionChannel::Blink => "blink",
            ExpressionChannel::BlinkLeft => "blinkLeft",
            ExpressionChannel::BlinkRight => "blinkRight",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.as_str() == name)
    }
}

impl fmt::Display for ExpressionChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives expression weights, typically a model's blend shape controller. Names the sink does
/// not know are its own concern.
pub trait ExpressionSink {
    fn set_expression_weight(&mut self, name: &str, value: f32);

    fn reset_all_expressions(&mut self);
}

/// One frame of expression output, in [`ExpressionChannel::ALL`] order.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionWeights {
    weights: IndexMap<ExpressionChannel, f32>,
}

impl Default for ExpressionWeights {
    fn default() -> Self {
        Self {
            weights: ExpressionChannel::ALL
                .into_iter()
                .map(|channel| (channel, 0.))
                .collect(),
        }
    }
}

impl ExpressionWeights {
    pub fn reset(&mut self) {
        for weight in self.weights.values_mut() {
            *weight = 0.;
        }
    }

    /// Stores `value` clamped to `[0, 1]`.
    pub fn set(&mut self, channel: ExpressionChannel, value: f32) {
        self.weights.insert(channel, value.clamp(0., 1.));
    }

    pub fn get(&self, channel: ExpressionChannel) -> f32 {
        self.weights.get(&channel).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExpressionChannel, f32)> + '_ {
        self.weights.iter().map(|(channel, weight)| (*channel, *weight))
    }

    /// Resets `sink`, then writes every channel.
    pub fn write_to(&self, sink: &mut impl ExpressionSink) {
        sink.reset_all_expressions();
        for (channel, weight) in self.iter() {
            sink.set_expression_weight(channel.as_str(), weight);
        }
    }
}

impl ExpressionSink for ExpressionWeights {
    fn set_expression_weight(&mut self, name: &str, value: f32) {
        if let Some(channel) = ExpressionChannel::from_name(name) {
            self.set(channel, value);
        }
    }

    fn reset_all_expressions(&mut self) {
        self.reset();
    }
}
