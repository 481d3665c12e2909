//! Application configuration management.
//!
//! Settings are layered with figment, later layers overriding earlier ones:
//!
//! 1. Built-in defaults (`["bin"]` allow-list)
//! 2. TOML file in the platform config directory (`config.toml`)
//! 3. Environment variables prefixed with `DUPFOLD_`
//!
//! ```toml
//! extensions = ["bin", "img"]
//! ```
//!
//! The destination directory is fixed at [`DESTINATION`] and cannot be
//! configured.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::scanner::ExtensionFilter;

/// Extensions tracked when nothing else is configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["bin"];

/// Destination directory, relative to the working directory.
pub const DESTINATION: &str = "dest_files";

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "DUPFOLD_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extension allow-list (without leading dots).
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
        }
    }
}

/// Errors raised by configuration validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The allow-list has no entries, so nothing would ever be tracked.
    #[error("extension allow-list is empty")]
    NoExtensions,

    /// An extension contains a dot or a path separator.
    #[error("invalid extension '{0}': must not contain '.', '/' or '\\'")]
    InvalidExtension(String),
}

impl Config {
    /// Load configuration from the default platform-specific path and the
    /// environment, falling back to defaults on any failure.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from_path(path),
            None => {
                log::debug!("No platform config directory, using defaults and environment");
                Self::extract_or_default(Self::base_figment())
            }
        }
    }

    /// Load configuration from a specific TOML file plus the environment.
    ///
    /// A missing file is not an error; its layer is simply empty.
    pub fn load_from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        log::debug!("Loading configuration from {}", path.display());
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX));
        Self::extract_or_default(figment)
    }

    fn base_figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    fn extract_or_default(figment: Figment) -> Self {
        let config = match figment.extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config, using defaults: {}", e);
                return Self::default();
            }
        };

        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("Invalid configuration ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Check the configuration for values that would make a run meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|e| e.contains(&['.', '/', '\\'][..]))
        {
            return Err(ConfigError::InvalidExtension(bad.clone()));
        }
        Ok(())
    }

    /// Build the extension filter for the walk.
    #[must_use]
    pub fn extension_filter(&self) -> ExtensionFilter {
        ExtensionFilter::new(self.extensions.iter().cloned())
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupfold", "dupfold")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
