//! Error types for Ability Stones
//!
//! Activation outcomes are never errors (see [`crate::activation::ActivationResult`]).
//! This enum only covers the fallible edges: configuration, scenarios and I/O.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoneError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Could not render configuration: {0}")]
    ConfigRender(#[from] toml::ser::Error),

    #[error("Invalid scenario (line {line}): {message}")]
    Scenario { line: usize, message: String },

    #[error("Unknown stone type: {0}")]
    UnknownStoneType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoneError {
    pub fn scenario(line: usize, message: impl Into<String>) -> Self {
        StoneError::Scenario {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoneError>;
