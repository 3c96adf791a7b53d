use bevy::{
    math::Vec3,
    reflect::{Reflect, std_traits::ReflectDefault},
};
use serde::{Deserialize, Serialize};

/// Smoothing times below this are clamped up to it, otherwise `omega` explodes.
pub const MIN_SMOOTHING_TIME: f32 = 1e-4;

/// Half-lives below this are clamped up to it.
pub const MIN_HALF_LIFE: f32 = 1e-4;

/// Critically damped spring step toward `target`.
///
/// Returns the new `(value, velocity)` pair. `smoothing_time` is roughly the time it takes
/// to settle on the target from rest, and is clamped to [`MIN_SMOOTHING_TIME`]. When
/// `max_speed` is given, the distance the spring is allowed to cover is limited to
/// `max_speed * smoothing_time`.
///
/// The result never ends up past `target`: if the step crosses it, the value is pinned to the
/// target and the velocity is recomputed from the pinned value.
///
/// `dt` must be strictly positive and is expected to be clamped by the caller.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: f32,
    smoothing_time: f32,
    dt: f32,
    max_speed: Option<f32>,
) -> (f32, f32) {
    let smoothing_time = smoothing_time.max(MIN_SMOOTHING_TIME);
    let omega = 2. / smoothing_time;

    let x = omega * dt;
    let decay = 1. / (1. + x + 0.48 * x * x + 0.235 * x * x * x);

    let mut change = current - target;
    if let Some(max_speed) = max_speed {
        let max_change = max_speed * smoothing_time;
        change = change.clamp(-max_change, max_change);
    }
    let limited_target = current - change;

    let temp = (velocity + omega * change) * dt;
    let mut new_velocity = (velocity - omega * temp) * decay;
    let mut value = limited_target + (change + temp) * decay;

    if (target - current > 0.) == (value > target) {
        value = target;
        new_velocity = (value - target) / dt;
    }

    (value, new_velocity)
}

/// Exponential decay of the gap between `current` and `target`: after `half_life` seconds
/// half of the gap is left. Cannot overshoot.
pub fn exp_lerp(current: f32, target: f32, half_life: f32, dt: f32) -> f32 {
    target + (current - target) * decay_factor(half_life, dt)
}

fn decay_factor(half_life: f32, dt: f32) -> f32 {
    (-dt / half_life.max(MIN_HALF_LIFE)).exp2()
}

pub trait DecayTowards {
    fn decay_towards(&self, target: &Self, half_life: f32, dt: f32) -> Self;
}

impl DecayTowards for f32 {
    fn decay_towards(&self, target: &Self, half_life: f32, dt: f32) -> Self {
        exp_lerp(*self, *target, half_life, dt)
    }
}

impl DecayTowards for Vec3 {
    fn decay_towards(&self, target: &Self, half_life: f32, dt: f32) -> Self {
        *target + (*self - *target) * decay_factor(half_life, dt)
    }
}

/// A scalar that follows its target through [`smooth_damp`], carrying velocity from one step to
/// the next.
///
/// Retargeting keeps the velocity, so a target that moves while the value is in flight bends the
/// trajectory instead of restarting it.
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
pub struct SmoothedValue {
    pub current: f32,
    pub target: f32,
    pub velocity: f32,
    pub smoothing_time: f32,
    pub max_speed: Option<f32>,
}

impl Default for SmoothedValue {
    fn default() -> Self {
        Self::new(0., 0.1)
    }
}

impl SmoothedValue {
    pub fn new(value: f32, smoothing_time: f32) -> Self {
        Self {
            current: value,
            target: value,
            velocity: 0.,
            smoothing_time,
            max_speed: None,
        }
    }

    pub fn with_max_speed(mut self, max_speed: Option<f32>) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jumps straight to `value` and stops.
    pub fn snap_to(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.velocity = 0.;
    }

    pub fn step(&mut self, dt: f32) -> f32 {
        let (value, velocity) = smooth_damp(
            self.current,
            self.target,
            self.velocity,
            self.smoothing_time,
            dt,
            self.max_speed,
        );
        self.current = value;
        self.velocity = velocity;
        value
    }

    pub fn is_settled(&self, epsilon: f32) -> bool {
        (self.current - self.target).abs() <= epsilon && self.velocity.abs() <= epsilon
    }
}
