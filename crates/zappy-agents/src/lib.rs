//! Player state and leveling rules for the Zappy agent.
//!
//! This crate holds everything the agent knows about itself and the fixed
//! game tables it plays by. It performs no I/O: the decision logic in
//! `zappy-core` reads and mutates a [`Player`], and the runner owns the
//! socket.
//!
//! # Modules
//!
//! - [`communication`] -- Coordination broadcast signals ([`Signal`])
//! - [`error`] -- Error types for player bookkeeping ([`AgentError`])
//! - [`inventory`] -- Stone counts and collection ceilings ([`Inventory`])
//! - [`leveling`] -- Per-level recipes, quorum sizes, food thresholds
//! - [`player`] -- The player entity ([`Player`])
//! - [`queue`] -- Pending-command FIFO ([`CommandQueue`])
//! - [`ritual`] -- Ritual state machine ([`RitualState`], [`Coordination`])
//! - [`view`] -- Look results ([`View`], [`Sight`])

pub mod communication;
pub mod error;
pub mod inventory;
pub mod leveling;
pub mod player;
pub mod queue;
pub mod ritual;
pub mod view;

// Re-export primary types at crate root for convenience.
pub use communication::{Signal, SignalKind};
pub use error::AgentError;
pub use inventory::Inventory;
pub use leveling::{ElevationRule, quorum_threshold, required, rule};
pub use player::Player;
pub use queue::{CommandQueue, QUEUE_CAPACITY};
pub use ritual::{CallSuppression, Coordination, RitualState};
pub use view::{Sight, View};
