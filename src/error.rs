//! Error taxonomy
//!
//! Configuration problems are fatal to starting a run and are reported to the
//! caller. A validated configuration makes stepping total.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SimError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    /// Whether the error stems from the configuration values themselves
    pub fn is_configuration(&self) -> bool {
        matches!(self, SimError::InvalidConfiguration { .. })
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
