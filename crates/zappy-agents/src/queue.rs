//! FIFO of commands awaiting their acknowledgement.
//!
//! The server answers commands strictly in order and never buffers more than
//! ten from one client, so the queue refuses to grow past
//! [`QUEUE_CAPACITY`]. Pairing a reply with its command is a plain
//! `pop_front`.

use std::collections::VecDeque;

use serde::Serialize;
use zappy_types::Command;

use crate::error::AgentError;

/// Maximum number of unacknowledged commands.
pub const QUEUE_CAPACITY: usize = 10;

/// In-flight commands, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commands awaiting a reply.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether every sent command has been answered.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Slots left before the queue is full.
    pub fn free(&self) -> usize {
        QUEUE_CAPACITY.saturating_sub(self.pending.len())
    }

    /// The command the next reply will answer.
    pub fn front(&self) -> Option<&Command> {
        self.pending.front()
    }

    /// Whether any pending command matches `predicate`.
    pub fn any(&self, predicate: impl Fn(&Command) -> bool) -> bool {
        self.pending.iter().any(predicate)
    }

    /// Append one command.
    pub fn push(&mut self, command: Command) -> Result<(), AgentError> {
        if self.free() == 0 {
            return Err(AgentError::QueueFull {
                command,
                pending: self.len(),
                capacity: QUEUE_CAPACITY,
            });
        }
        self.pending.push_back(command);
        Ok(())
    }

    /// Append every command or none of them.
    pub fn push_all(&mut self, commands: Vec<Command>) -> Result<(), AgentError> {
        if let Some(overflow) = commands.get(self.free()) {
            return Err(AgentError::QueueFull {
                command: overflow.clone(),
                pending: self.len(),
                capacity: QUEUE_CAPACITY,
            });
        }
        self.pending.extend(commands);
        Ok(())
    }

    /// Remove the oldest command once its reply has arrived.
    pub fn pop(&mut self) -> Option<Command> {
        self.pending.pop_front()
    }
}
