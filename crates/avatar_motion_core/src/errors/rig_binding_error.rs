use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RigBindingError {
    #[error("invalid joint name pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
