//! Error types for smart-actions
//!
//! Permission checks themselves are total: `load` and `can` never fail, and a
//! missing grant reads as "denied". The errors here cover the edges around
//! the registry:
//! - Decoding grant payloads
//! - Loading configuration
//! - Opening sessions

use std::path::PathBuf;

/// Errors while obtaining or decoding grant rows
#[derive(Debug, thiserror::Error)]
pub enum GrantError {
    /// Payload is not a JSON array of grant records
    #[error("invalid grant payload: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error reading a grant file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Upstream source failed to produce grants
    #[error("grant source failed: {0}")]
    Source(String),
}

impl GrantError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading a config file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::RegistryConfig`]
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Config parsed but holds an unusable value
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Session management errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Too many sessions are open
    #[error("session capacity exceeded (max {max})")]
    CapacityExceeded { max: usize },
}

/// Token that is not part of the standard vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown standard action: '{0}'")]
pub struct UnknownAction(pub String);

/// Crate-wide error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Grant decoding or fetching failed
    #[error(transparent)]
    Grant(#[from] GrantError),

    /// Configuration failed to load
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Session could not be opened
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Action token outside the standard vocabulary
    #[error(transparent)]
    UnknownAction(#[from] UnknownAction),
}

/// Result alias using the crate-wide [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;
