//! Shared type definitions for the Zappy agent.
//!
//! This crate is the single source of truth for everything that crosses the
//! wire between the agent and the game server: the resource kinds, the
//! level and direction newtypes, the outgoing [`Command`] set, the incoming
//! [`ServerEvent`] set, and the line codec that converts between them.
//!
//! # Modules
//!
//! - [`enums`] -- Resource kinds and ground items
//! - [`ids`] -- Range-checked newtypes ([`Level`], [`Direction`])
//! - [`commands`] -- Outgoing command set
//! - [`events`] -- Incoming event set
//! - [`codec`] -- Encoding commands and decoding server lines

pub mod codec;
pub mod commands;
pub mod enums;
pub mod events;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use codec::{decode, encode, inventory_count, split_list};
pub use commands::Command;
pub use enums::{Item, Resource};
pub use events::ServerEvent;
pub use ids::{Direction, Level};
