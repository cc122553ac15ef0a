//! One connection to the game server, from `WELCOME` to the end.
//!
//! The session owns the socket halves and the line reader. It is generic
//! over the stream type so tests can drive it through an in-memory duplex
//! pipe instead of TCP.
//!
//! Reads are bounded by the idle tick. When a line arrives, every complete
//! line already buffered is handled before the agent gets its send
//! opportunity; when nothing arrives in time the agent gets one anyway.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tracing::{debug, info, warn};
use zappy_core::{
    Agent, AgentConfig, Handshake, HandshakeStep, SessionPhase, Termination, WorldInfo,
};
use zappy_types::codec;

use crate::error::RunnerError;

/// A live connection to the server.
pub struct Session<R, W> {
    lines: Lines<BufReader<R>>,
    writer: W,
    config: AgentConfig,
    phase: SessionPhase,
}

impl<R, W> Session<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Wrap the two halves of a connection.
    pub fn new(reader: R, writer: W, config: AgentConfig) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
            config,
            phase: SessionPhase::Connecting,
        }
    }

    /// Where the connection is in its lifecycle.
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    fn enter(&mut self, phase: SessionPhase) {
        debug!(from = ?self.phase, to = ?phase, "Session phase");
        self.phase = phase;
    }

    /// Join as `team`, then play until the agent terminates.
    pub async fn run(&mut self, team: &str) -> Result<Termination, RunnerError> {
        let world = self.handshake(team).await?;
        debug!(?world, "Handshake complete");
        let mut agent = Agent::new(self.config.clone());
        self.play(&mut agent).await
    }

    async fn next_line(&mut self) -> Result<String, RunnerError> {
        self.lines
            .next_line()
            .await?
            .ok_or(RunnerError::ConnectionClosed)
    }

    async fn send_raw(&mut self, line: &str) -> Result<(), RunnerError> {
        debug!(line = line.trim_end(), "Sending");
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Run the join exchange.
    pub async fn handshake(&mut self, team: &str) -> Result<WorldInfo, RunnerError> {
        let retry = Duration::from_millis(self.config.handshake_retry_ms);
        let mut handshake = Handshake::new(team.to_owned(), retry);
        self.enter(SessionPhase::Handshaking);
        loop {
            let line = self.next_line().await?;
            match handshake.on_line(&line)? {
                HandshakeStep::Send(reply) => self.send_raw(&reply).await?,
                HandshakeStep::SendAfter { delay, line } => {
                    tokio::time::sleep(delay).await;
                    self.send_raw(&line).await?;
                }
                HandshakeStep::Wait => {}
                HandshakeStep::Done(world) => return Ok(world),
            }
        }
    }

    fn has_buffered_line(&mut self) -> bool {
        self.lines.get_ref().buffer().contains(&b'\n')
    }

    fn dispatch(agent: &mut Agent, line: &str) {
        if let Err(err) = agent.handle_line(line) {
            warn!(%err, line, "Failed to apply server line");
        }
    }

    /// Exchange lines with the server until `agent` terminates.
    pub async fn play(&mut self, agent: &mut Agent) -> Result<Termination, RunnerError> {
        let idle = Duration::from_millis(self.config.idle_tick_ms);
        self.enter(SessionPhase::Playing);
        info!(level = %agent.player().level, "Playing");
        loop {
            if let Some(reason) = agent.termination() {
                self.enter(agent.phase());
                return Ok(reason);
            }

            match tokio::time::timeout(idle, self.lines.next_line()).await {
                Ok(Ok(Some(line))) => {
                    Self::dispatch(agent, &line);
                    while agent.termination().is_none() && self.has_buffered_line() {
                        let line = self.next_line().await?;
                        Self::dispatch(agent, &line);
                    }
                }
                Ok(Ok(None)) => return Err(RunnerError::ConnectionClosed),
                Ok(Err(err)) => return Err(err.into()),
                Err(_elapsed) => {}
            }

            if agent.termination().is_some() {
                continue;
            }
            match agent.send_opportunity() {
                Ok(commands) => {
                    for command in &commands {
                        self.send_raw(&codec::encode(command)).await?;
                    }
                    if !commands.is_empty() {
                        debug!(player = %agent.player().snapshot(), "State after send");
                    }
                }
                Err(err) => warn!(%err, "Decision failed, skipping this tick"),
            }
        }
    }
}
