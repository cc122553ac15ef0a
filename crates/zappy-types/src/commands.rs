//! Outgoing commands understood by the game server.
//!
//! Every command produces exactly one reply line from the server, which is
//! why the agent keeps sent commands in a FIFO queue until they are
//! acknowledged.

use core::fmt;

use serde::Serialize;

use crate::enums::{Item, Resource};

/// A command the agent can send to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "arg", rename_all = "snake_case")]
pub enum Command {
    /// Move one tile in the facing direction.
    Forward,
    /// Turn 90 degrees clockwise.
    Right,
    /// Turn 90 degrees counter-clockwise.
    Left,
    /// Ask for the contents of the visible tiles.
    Look,
    /// Ask for the agent's own inventory.
    Inventory,
    /// Pick one item up from the current tile.
    Take(Item),
    /// Drop one stone onto the current tile.
    Set(Resource),
    /// Lay an egg for a new teammate.
    Fork,
    /// Start an elevation ritual on the current tile.
    Incantation,
    /// Send a text to every player on the map.
    Broadcast(String),
}

impl Command {
    /// Whether the command changes the agent's position or heading.
    ///
    /// Any such command invalidates a held look result.
    pub const fn is_movement(&self) -> bool {
        matches!(self, Self::Forward | Self::Right | Self::Left)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => f.write_str("Forward"),
            Self::Right => f.write_str("Right"),
            Self::Left => f.write_str("Left"),
            Self::Look => f.write_str("Look"),
            Self::Inventory => f.write_str("Inventory"),
            Self::Take(item) => write!(f, "Take {item}"),
            Self::Set(resource) => write!(f, "Set {resource}"),
            Self::Fork => f.write_str("Fork"),
            Self::Incantation => f.write_str("Incantation"),
            Self::Broadcast(text) => write!(f, "Broadcast \"{text}\""),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_syntax() {
        assert_eq!(Command::Take(Item::Food).to_string(), "Take food");
        assert_eq!(Command::Set(Resource::Mendiane).to_string(), "Set mendiane");
        assert_eq!(
            Command::Broadcast("Level 3 r".to_owned()).to_string(),
            "Broadcast \"Level 3 r\""
        );
        assert_eq!(Command::Incantation.to_string(), "Incantation");
    }

    #[test]
    fn serializes_with_op_tag() {
        let json = serde_json::to_value(Command::Set(Resource::Sibur)).unwrap();
        assert_eq!(json, serde_json::json!({"op": "set", "arg": "sibur"}));
        let json = serde_json::to_value(Command::Look).unwrap();
        assert_eq!(json, serde_json::json!({"op": "look"}));
    }

    #[test]
    fn only_moves_and_turns_are_movement() {
        assert!(Command::Forward.is_movement());
        assert!(Command::Left.is_movement());
        assert!(!Command::Look.is_movement());
        assert!(!Command::Take(Item::Food).is_movement());
    }
}
