//! Error types for the zappy-agents crate.
//!
//! Player bookkeeping never panics. A reservation that would drive a count
//! below zero, or a push into a full command queue, is a logic error in the
//! caller and comes back as an [`AgentError`].

use zappy_types::{Command, Resource};

/// Errors that can occur while mutating player state.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Attempted to reserve more of a stone than the player holds.
    #[error("insufficient resource: wanted {requested} of {resource} but only have {available}")]
    InsufficientResource {
        /// The stone being reserved.
        resource: Resource,
        /// The quantity the caller attempted to reserve.
        requested: u32,
        /// The quantity the player actually holds.
        available: u32,
    },

    /// The pending-command queue cannot take another command.
    #[error("command queue full: cannot queue {command} ({pending} of {capacity} pending)")]
    QueueFull {
        /// The command that did not fit.
        command: Command,
        /// Commands already waiting for an acknowledgement.
        pending: usize,
        /// Maximum number of in-flight commands.
        capacity: usize,
    },

    /// An arithmetic overflow occurred in a counter.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
