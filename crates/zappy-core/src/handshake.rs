//! Joining a game: the exchange between `WELCOME` and the first command.
//!
//! ```text
//! server: WELCOME
//! client: <team>
//! server: <free slots>
//! server: <width> <height>
//! ```
//!
//! A `ko` after the team name is retried once. A team-full notice means
//! the server will answer later, so the client just keeps listening.

use std::time::Duration;

use tracing::{debug, info, warn};

const WELCOME: &str = "WELCOME";
const TEAM_REJECTED: &str = "Wrong team name, please try again";
const TEAM_FULL_MARKER: &str = "is full";

/// Errors that end the handshake.
#[derive(Debug, thiserror::Error)]
pub enum HandshakeError {
    /// The server does not know the team.
    #[error("team name rejected by server")]
    TeamRejected,

    /// The server refused the team name twice.
    #[error("server refused the team name after a resend")]
    Refused,

    /// A line that makes no sense at this point of the handshake.
    #[error("unexpected handshake line: {line}")]
    Protocol {
        /// The offending line.
        line: String,
    },
}

/// Map size and free slots announced at the end of the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldInfo {
    /// Connections still available for the team.
    pub free_slots: u32,
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
}

/// What the session should do after a handshake line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeStep {
    /// Send this line (newline included).
    Send(String),
    /// Wait `delay`, then send this line.
    SendAfter {
        /// Pause before sending.
        delay: Duration,
        /// The line to send.
        line: String,
    },
    /// Keep reading.
    Wait,
    /// Handshake complete; gameplay starts.
    Done(WorldInfo),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    AwaitWelcome,
    AwaitSlots,
    AwaitSize { free_slots: u32 },
    Finished,
}

/// Handshake state machine for one connection.
#[derive(Debug, Clone)]
pub struct Handshake {
    team: String,
    retry_delay: Duration,
    stage: Stage,
    resent: bool,
}

impl Handshake {
    /// Start a handshake for `team`, retrying a refusal after `retry_delay`.
    pub const fn new(team: String, retry_delay: Duration) -> Self {
        Self {
            team,
            retry_delay,
            stage: Stage::AwaitWelcome,
            resent: false,
        }
    }

    /// Whether gameplay may begin.
    pub const fn is_done(&self) -> bool {
        matches!(self.stage, Stage::Finished)
    }

    fn team_line(&self) -> String {
        format!("{}\n", self.team)
    }

    /// Feed one line from the server.
    pub fn on_line(&mut self, line: &str) -> Result<HandshakeStep, HandshakeError> {
        let line = line.trim();
        debug!(line, stage = ?self.stage, "Handshake line");

        if line == TEAM_REJECTED {
            return Err(HandshakeError::TeamRejected);
        }
        if line.contains(TEAM_FULL_MARKER) {
            info!(line, "Team is full, waiting");
            return Ok(HandshakeStep::Wait);
        }

        match self.stage {
            Stage::AwaitWelcome if line == WELCOME => {
                self.stage = Stage::AwaitSlots;
                Ok(HandshakeStep::Send(self.team_line()))
            }
            Stage::AwaitWelcome => {
                debug!(line, "Ignoring banner line");
                Ok(HandshakeStep::Wait)
            }
            Stage::AwaitSlots if line == "ko" => {
                if self.resent {
                    return Err(HandshakeError::Refused);
                }
                self.resent = true;
                warn!(delay = ?self.retry_delay, "Team name refused, resending once");
                Ok(HandshakeStep::SendAfter {
                    delay: self.retry_delay,
                    line: self.team_line(),
                })
            }
            Stage::AwaitSlots => {
                let free_slots = line.parse::<u32>().ok().ok_or_else(|| HandshakeError::Protocol {
                    line: line.to_owned(),
                })?;
                self.stage = Stage::AwaitSize { free_slots };
                Ok(HandshakeStep::Wait)
            }
            Stage::AwaitSize { free_slots } => {
                let mut parts = line.split_whitespace().map(str::parse::<u32>);
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(Ok(width)), Some(Ok(height)), None) => {
                        self.stage = Stage::Finished;
                        let world = WorldInfo {
                            free_slots,
                            width,
                            height,
                        };
                        info!(free_slots, width, height, "Joined game");
                        Ok(HandshakeStep::Done(world))
                    }
                    _ => Err(HandshakeError::Protocol {
                        line: line.to_owned(),
                    }),
                }
            }
            Stage::Finished => Err(HandshakeError::Protocol {
                line: line.to_owned(),
            }),
        }
    }
}
