//! Error types for humanizer

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HumanizerError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Unknown parameter: {0}")]
    UnknownParam(String),
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HumanizerError>;
