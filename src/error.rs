//! Error types for the editor and the overlap endpoint.
//!
//! The drawing core itself never fails; these cover the I/O around it.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing the persisted shape list.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to access shape store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shape store at {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no shape at index {0}")]
    IndexOutOfRange(usize),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Request-level failures of the overlap endpoint.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServerError {
    #[error("missing query parameter `{0}`")]
    MissingParam(&'static str),

    #[error("query parameter `{name}` is not a number: {value:?}")]
    InvalidParam { name: &'static str, value: String },

    #[error("method {0} not allowed")]
    MethodNotAllowed(String),
}

impl ServerError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::MissingParam(_) | ServerError::InvalidParam { .. } => 400,
            ServerError::MethodNotAllowed(_) => 405,
        }
    }
}
