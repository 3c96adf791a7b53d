use avatar_motion_core::expression::ExpressionSink;
use bevy::{
    ecs::{component::Component, reflect::ReflectComponent},
    reflect::Reflect,
};
use indexmap::IndexMap;

/// Expression weights written by the avatar's motion player every frame.
///
/// Model loaders read this to drive blend shapes or morph targets. Channel order is stable from
/// one frame to the next.
#[derive(Component, Reflect, Clone, Debug, Default)]
#[reflect(Component)]
pub struct AvatarExpressions {
    #[reflect(ignore)]
    weights: IndexMap<String, f32>,
}

impl AvatarExpressions {
    pub fn get(&self, name: &str) -> f32 {
        self.weights.get(name).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.weights
            .iter()
            .map(|(name, weight)| (name.as_str(), *weight))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl ExpressionSink for AvatarExpressions {
    fn set_expression_weight(&mut self, name: &str, value: f32) {
        match self.weights.get_mut(name) {
            Some(weight) => *weight = value,
            None => {
                self.weights.insert(name.to_string(), value);
            }
        }
    }

    fn reset_all_expressions(&mut self) {
        for weight in self.weights.values_mut() {
            *weight = 0.;
        }
    }
}
