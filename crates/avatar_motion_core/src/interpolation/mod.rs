pub mod damped;
pub mod easing;

pub use damped::*;
pub use easing::*;
