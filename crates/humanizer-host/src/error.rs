//! Host binding error types

use humanizer_core::HumanizerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Missing host feature: {0}")]
    MissingFeature(&'static str),
    #[error("Host could not map URI: {0}")]
    UnmappedUri(&'static str),
    #[error("Humanizer error: {0}")]
    Core(#[from] HumanizerError),
}

pub type Result<T> = std::result::Result<T, HostError>;
