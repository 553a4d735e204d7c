//! Registry configuration
//!
//! ```toml
//! trace_checks = true
//! max_sessions = 16
//! ```

use crate::error::ConfigError;
use crate::observer::{CheckObserver, NoopObserver, TracingObserver};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Configuration for registries and the sessions that own them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Emit a `tracing` event for every permission check
    pub trace_checks: bool,
    /// Maximum concurrently open sessions
    pub max_sessions: usize,
}

impl RegistryConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With check tracing on or off
    #[inline]
    #[must_use]
    pub fn with_trace_checks(mut self, enabled: bool) -> Self {
        self.trace_checks = enabled;
        self
    }

    /// With session limit
    #[inline]
    #[must_use]
    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.max_sessions = max;
        self
    }

    /// Parse configuration from TOML
    ///
    /// # Errors
    /// Returns error if the TOML is malformed or `max_sessions` is zero
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or does not parse
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if `max_sessions` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_sessions == 0 {
            return Err(ConfigError::Invalid("max_sessions must be at least 1".into()));
        }
        Ok(())
    }

    /// Observer matching `trace_checks`
    #[must_use]
    pub fn observer(&self) -> Arc<dyn CheckObserver> {
        if self.trace_checks {
            Arc::new(TracingObserver)
        } else {
            Arc::new(NoopObserver)
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            trace_checks: false,
            max_sessions: 64,
        }
    }
}
