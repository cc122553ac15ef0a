//! Zappy agent entry point.
//!
//! Parses the command line, connects to the game server, and hands the
//! connection to a [`session::Session`] that plays until the player dies,
//! the game ends, or the player reaches level 8.
//!
//! # Architecture
//!
//! ```text
//! TCP lines --> codec --> Agent (decision loop) --> codec --> TCP lines
//! ```
//!
//! Logging goes through `tracing`; set `RUST_LOG=debug` to see every line
//! sent and received.

mod cli;
mod config;
mod error;
mod session;

use anyhow::Context;
use tokio::net::TcpStream;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use zappy_core::SessionPhase;

use crate::cli::{Invocation, USAGE};
use crate::config::RunnerConfig;
use crate::error::RunnerError;
use crate::session::Session;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the server is
/// unreachable, or the server refuses the team.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = match cli::parse_args(std::env::args_os()) {
        Invocation::Run(cli) => cli,
        Invocation::Usage => {
            println!("{USAGE}");
            return Ok(());
        }
    };

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = RunnerConfig::from_cli(cli)?;
    info!(
        host = config.host,
        port = config.port,
        team = config.team,
        idle_tick_ms = config.idle_tick().as_millis(),
        "configuration loaded"
    );

    info!(phase = ?SessionPhase::Connecting, "connecting");
    let stream = TcpStream::connect((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to connect to {}:{}", config.host, config.port))?;
    info!(host = config.host, port = config.port, "connected");

    let (reader, writer) = stream.into_split();
    let mut session = Session::new(reader, writer, config.agent.clone());

    tokio::select! {
        outcome = session.run(&config.team) => match outcome {
            Ok(reason) => info!(?reason, "session finished"),
            Err(RunnerError::ConnectionClosed) => warn!("server closed the connection"),
            Err(err) => return Err(err.into()),
        },
        _ = tokio::signal::ctrl_c() => info!("interrupted, closing connection"),
    }

    info!(phase = ?session.phase(), "disconnected");
    Ok(())
}
