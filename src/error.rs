//! Error type for the ambient layers (config, CLI, server)
//!
//! Domain operations never fail: illegal intents are reported through
//! `ReasonCode`, not through this type.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GospError>;

#[derive(Debug, Error)]
pub enum GospError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse config file '{path}': {source}", path = path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid command: {0}")]
    Command(String),

    #[error("Server error: {0}")]
    Server(String),
}
