mod binding;
mod joint;
mod naming;
mod ownership;
mod pose;

pub use binding::*;
pub use joint::*;
pub use naming::*;
pub use ownership::*;
pub use pose::*;
