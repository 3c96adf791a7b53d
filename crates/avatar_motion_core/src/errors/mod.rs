mod asset_loader_error;
mod rig_binding_error;
mod validation_error;

pub use asset_loader_error::*;
pub use rig_binding_error::*;
pub use validation_error::*;
