//! Host configuration
//!
//! Configuration is read from TOML:
//!
//! ```toml
//! reinitializer_policy = "versioned"
//! verify_storage = true
//! ```
//!
//! Missing keys take their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How later-version initializers are treated after deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReinitializerPolicy {
    /// Every reinitializer fails with `AlreadyInitialized`
    #[default]
    Reject,
    /// A reinitializer of version `v` runs once, iff `initialized < v`
    Versioned,
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for [`HostConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Settings shared by every instance of a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Treatment of `Reinitializer(v)` operations
    pub reinitializer_policy: ReinitializerPolicy,
    /// Check stored values against the new layout before every upgrade
    pub verify_storage: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            reinitializer_policy: ReinitializerPolicy::Reject,
            verify_storage: true,
        }
    }
}

impl HostConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reinitializer policy
    pub fn reinitializer_policy(mut self, policy: ReinitializerPolicy) -> Self {
        self.reinitializer_policy = policy;
        self
    }

    /// Enable or disable the pre-upgrade store check
    pub fn verify_storage(mut self, enabled: bool) -> Self {
        self.verify_storage = enabled;
        self
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Render configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}
