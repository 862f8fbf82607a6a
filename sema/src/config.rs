//! Checker configuration
//!
//! Options are read from a TOML file (all keys optional) and may be
//! overridden by command-line flags.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration for one checking run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Enforce accessibility rules: type-accessibility audits, setter
    /// narrowing and override accessibility
    pub enable_access_control: bool,

    /// Check that overrides are at least as available as what they override
    pub enable_availability_checking: bool,

    /// Treat `objc`/`dynamic` members as externally exposed with selectors.
    /// When off, selector matching never upgrades an override match.
    pub objc_interop: bool,

    /// Stop reporting after this many errors (0 = unlimited)
    pub max_errors: usize,

    /// Enable colored error output
    pub colored_output: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            enable_access_control: true,
            enable_availability_checking: true,
            objc_interop: true,
            max_errors: 0,
            colored_output: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl CheckerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
