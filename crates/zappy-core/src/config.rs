//! Tuning knobs for the agent and the YAML loader that fills them.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration. The runner reads the path from `ZAPPY_CONFIG`.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Agent timing and behaviour parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentConfig {
    /// How long the session waits for a line before taking an idle tick.
    #[serde(default = "default_idle_tick_ms")]
    pub idle_tick_ms: u64,

    /// Delay before resending the team name after a handshake `ko`.
    #[serde(default = "default_handshake_retry_ms")]
    pub handshake_retry_ms: u64,

    /// Silent decision ticks a follower tolerates before giving up.
    #[serde(default = "default_stale_signal_ticks")]
    pub stale_signal_ticks: u32,

    /// Silent decision ticks a caller tolerates before abandoning its call.
    #[serde(default = "default_caller_patience_ticks")]
    pub caller_patience_ticks: u32,

    /// Farthest view ring considered when looking for something to pick up.
    #[serde(default = "default_max_travel_ring")]
    pub max_travel_ring: u32,

    /// Fixed seed for the wandering RNG. Unset means OS entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            idle_tick_ms: default_idle_tick_ms(),
            handshake_retry_ms: default_handshake_retry_ms(),
            stale_signal_ticks: default_stale_signal_ticks(),
            caller_patience_ticks: default_caller_patience_ticks(),
            max_travel_ring: default_max_travel_ring(),
            rng_seed: None,
        }
    }
}

impl AgentConfig {
    /// Load configuration from a YAML file, then apply env overrides.
    ///
    /// - `ZAPPY_IDLE_TICK_MS` overrides `idle_tick_ms`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply env overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides. Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(val) = std::env::var("ZAPPY_IDLE_TICK_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.idle_tick_ms = val;
        }
    }
}

const fn default_idle_tick_ms() -> u64 {
    100
}

const fn default_handshake_retry_ms() -> u64 {
    500
}

const fn default_stale_signal_ticks() -> u32 {
    5
}

const fn default_caller_patience_ticks() -> u32 {
    100
}

const fn default_max_travel_ring() -> u32 {
    3
}
