//! Runtime configuration for one agent process.
//!
//! Connection details come from the command line. Tuning comes from an
//! optional YAML file named by `ZAPPY_CONFIG`; without it the defaults are
//! used, still subject to the env overrides `AgentConfig` applies.

use std::path::PathBuf;
use std::time::Duration;

use zappy_core::AgentConfig;

use crate::cli::Cli;
use crate::error::RunnerError;

/// Environment variable naming the YAML tuning file.
pub const CONFIG_ENV: &str = "ZAPPY_CONFIG";

/// Complete configuration for one agent process.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Team to join.
    pub team: String,
    /// Decision tuning.
    pub agent: AgentConfig,
}

impl RunnerConfig {
    /// Combine command line arguments with the tuning file, if any.
    pub fn from_cli(cli: Cli) -> Result<Self, RunnerError> {
        let agent = match std::env::var_os(CONFIG_ENV) {
            Some(path) => AgentConfig::from_file(&PathBuf::from(path))?,
            None => {
                let mut config = AgentConfig::default();
                config.apply_env_overrides();
                config
            }
        };
        Ok(Self {
            host: cli.machine,
            port: cli.port,
            team: cli.name,
            agent,
        })
    }

    /// How long to wait for a line before taking an idle tick.
    pub const fn idle_tick(&self) -> Duration {
        Duration::from_millis(self.agent.idle_tick_ms)
    }
}
