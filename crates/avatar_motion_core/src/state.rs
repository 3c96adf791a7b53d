use bevy::reflect::{Reflect, std_traits::ReflectDefault};
use serde::{Deserialize, Serialize};

use crate::expression::Emotion;

/// What the character is doing, as far as the chat loop is concerned.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterState {
    #[default]
    Idle,
    Thinking,
    Talking,
    Flirty,
}

impl CharacterState {
    pub const ALL: [CharacterState; 4] = [
        CharacterState::Idle,
        CharacterState::Thinking,
        CharacterState::Talking,
        CharacterState::Flirty,
    ];
}

/// Resting behavior of one character state. Angles in radians.
#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(default)]
pub struct StatePreset {
    pub emotion: Emotion,
    /// Resting expression intensity
    pub expression_intensity: f32,
    /// Multiplies the idle sway amplitudes
    pub idle_amplitude: f32,
    /// Multiplies the breathing amplitudes
    pub breathing_amplitude: f32,
    /// Static head roll
    pub head_tilt: f32,
    /// Static head pitch, negative raises the chin
    pub head_pitch: f32,
    /// Talk intensity target
    pub talk_intensity: f32,
    /// Weight of speech-rate head nods and arm gestures
    pub gesture: f32,
}

impl Default for StatePreset {
    fn default() -> Self {
        Self {
            emotion: Emotion::Neutral,
            expression_intensity: 0.25,
            idle_amplitude: 1.,
            breathing_amplitude: 1.,
            head_tilt: 0.,
            head_pitch: 0.,
            talk_intensity: 0.,
            gesture: 0.,
        }
    }
}

#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(default)]
pub struct StatePresets {
    pub idle: StatePreset,
    pub thinking: StatePreset,
    pub talking: StatePreset,
    pub flirty: StatePreset,
}

impl Default for StatePresets {
    fn default() -> Self {
        Self {
            idle: StatePreset::default(),
            thinking: StatePreset {
                expression_intensity: 0.2,
                idle_amplitude: 0.6,
                breathing_amplitude: 0.9,
                head_tilt: 0.12,
                head_pitch: -0.08,
                ..Default::default()
            },
            talking: StatePreset {
                emotion: Emotion::Happy,
                expression_intensity: 0.5,
                idle_amplitude: 1.1,
                breathing_amplitude: 1.2,
                talk_intensity: 1.,
                gesture: 1.,
                ..Default::default()
            },
            flirty: StatePreset {
                emotion: Emotion::Flirty,
                expression_intensity: 0.7,
                idle_amplitude: 1.6,
                head_tilt: -0.15,
                head_pitch: 0.05,
                ..Default::default()
            },
        }
    }
}

impl StatePresets {
    pub fn get(&self, state: CharacterState) -> &StatePreset {
        match state {
            CharacterState::Idle => &self.idle,
            CharacterState::Thinking => &self.thinking,
            CharacterState::Talking => &self.talking,
            CharacterState::Flirty => &self.flirty,
        }
    }
}
