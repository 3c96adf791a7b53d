use thiserror::Error;

use super::ProfileValidationError;

/// Possible errors produced while loading a motion profile asset
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AssetLoaderError {
    /// An [IO](std::io) Error
    #[error("could not read motion profile: {0}")]
    Io(#[from] std::io::Error),
    /// A [RON](ron) Error
    #[error("could not parse RON: {0}")]
    RonSpannedError(#[from] ron::error::SpannedError),
    #[error("motion profile is invalid: {0}")]
    InvalidProfile(#[from] ProfileValidationError),
}
