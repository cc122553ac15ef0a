//! Decision logic for the Zappy agent.
//!
//! Everything here is synchronous and free of I/O. The runner hands lines
//! in and writes the returned commands out; this crate decides what those
//! commands are.
//!
//! # Modules
//!
//! - [`config`] -- Tuning parameters and YAML loading ([`AgentConfig`])
//! - [`coordination`] -- Ritual rendezvous signals and hand-off
//! - [`decision`] -- The per-connection decision loop ([`Agent`])
//! - [`evolution`] -- The elevation gate
//! - [`handshake`] -- Joining a game ([`Handshake`])
//! - [`navigation`] -- Paths toward view tiles and broadcast sources
//! - [`perception`] -- Food and stone collection policy

pub mod config;
pub mod coordination;
pub mod decision;
pub mod evolution;
pub mod handshake;
pub mod navigation;
pub mod perception;

// Re-export primary types at crate root for convenience.
pub use config::{AgentConfig, ConfigError};
pub use decision::{Agent, SessionPhase, Termination};
pub use evolution::{GateOutcome, Refusal};
pub use handshake::{Handshake, HandshakeError, HandshakeStep, WorldInfo};
