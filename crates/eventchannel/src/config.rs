//! Channel configuration.
//!
//! A channel reads its settings from a small TOML document:
//!
//! ```toml
//! max_listeners = 25
//! ```
//!
//! Missing fields fall back to defaults. `EVENTCHANNEL_MAX_LISTENERS`, when
//! set, takes precedence over the file.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::channel::DEFAULT_MAX_LISTENERS;
use crate::error::{ConfigError, ConfigResult};

/// Environment variable overriding [`ChannelConfig::max_listeners`].
pub const MAX_LISTENERS_ENV: &str = "EVENTCHANNEL_MAX_LISTENERS";

/// Prefix shared by every environment variable the channel reads.
const ENV_PREFIX: &str = "EVENTCHANNEL_";

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Settings applied when building an [`EventChannel`](crate::EventChannel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// Maximum number of listeners per event.
    #[serde(default = "default_max_listeners")]
    pub max_listeners: usize,
}

fn default_max_listeners() -> usize {
    DEFAULT_MAX_LISTENERS
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            max_listeners: default_max_listeners(),
        }
    }
}

impl ChannelConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] for malformed TOML or values of the
    /// wrong type (negative or fractional capacities included), and
    /// [`ConfigError::ValidationError`] if the result is out of range.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        parse(content, "<inline>")
    }

    /// Load and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read, plus the
    /// errors of [`from_toml_str`](Self::from_toml_str).
    pub fn load_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = from_file_content(path, &content)?;
        info!(path = %path.display(), max_listeners = config.max_listeners, "loaded channel config");
        Ok(config)
    }

    /// Like [`load_file`](Self::load_file), but a missing file yields the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Same as [`load_file`](Self::load_file), except for `NotFound`.
    pub fn load_optional(path: &Path) -> ConfigResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => from_file_content(path, &content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            },
            Err(e) => Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }

    /// Load `path` if it exists, then apply the process environment.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`load_optional`](Self::load_optional) and
    /// [`apply_env`](Self::apply_env).
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let env_vars = collect_env_vars();
        Self::load_optional(path)?.apply_env(&env_vars)
    }

    /// Apply environment overrides from `env_vars`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvError`] if an override is not a positive
    /// integer.
    pub fn apply_env(mut self, env_vars: &HashMap<String, String>) -> ConfigResult<Self> {
        if let Some(raw) = env_vars.get(MAX_LISTENERS_ENV) {
            self.max_listeners = parse_positive(MAX_LISTENERS_ENV, raw)?;
            debug!(max_listeners = self.max_listeners, "applied environment override");
        }
        Ok(self)
    }

    /// Check that every field is within range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a zero capacity.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_listeners == 0 {
            return Err(ConfigError::ValidationError {
                field: "max_listeners".to_owned(),
                message: "must be a positive integer".to_owned(),
            });
        }
        Ok(())
    }
}

/// Collect the `EVENTCHANNEL_*` variables of the current process.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    filter_env_vars(std::env::vars())
}

fn filter_env_vars(vars: impl IntoIterator<Item = (String, String)>) -> HashMap<String, String> {
    vars.into_iter()
        .filter(|(key, _)| key.starts_with(ENV_PREFIX))
        .collect()
}

fn from_file_content(path: &Path, content: &str) -> ConfigResult<ChannelConfig> {
    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit",
                content.len()
            ),
        });
    }
    parse(content, &path.display().to_string())
}

fn parse(content: &str, origin: &str) -> ConfigResult<ChannelConfig> {
    let config: ChannelConfig = toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: origin.to_owned(),
        source: e,
    })?;
    config.validate()?;
    Ok(config)
}

fn parse_positive(var_name: &str, raw: &str) -> ConfigResult<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(ConfigError::EnvError {
            var_name: var_name.to_owned(),
            message: format!("expected a positive integer, got '{raw}'"),
        }),
        Ok(value) => Ok(value),
    }
}
