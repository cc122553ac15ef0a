//! Error types for the agent binary.
//!
//! Everything that can end a session funnels into [`RunnerError`]; `main`
//! wraps it in `anyhow` for reporting.

use zappy_core::{ConfigError, HandshakeError};

/// Errors that can end a session.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The configuration file could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Reading from or writing to the server failed.
    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),

    /// The server did not let the agent join.
    #[error("handshake failed: {0}")]
    Handshake(#[from] HandshakeError),

    /// The server closed the connection.
    #[error("connection closed by server")]
    ConnectionClosed,
}
