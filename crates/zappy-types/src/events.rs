//! Incoming lines from the game server, after decoding.

use crate::ids::Direction;

/// A decoded server line.
///
/// Replies (`Ok`, `Negative`, the two list results, `LevelUp`) answer the
/// oldest pending command. The remaining variants arrive unprompted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Generic positive acknowledgement (`ok`).
    Ok,
    /// Generic negative acknowledgement (`ko`).
    Negative,
    /// Tile contents answering `Look`, nearest ring first.
    LookResult(Vec<String>),
    /// `"<item> <count>"` entries answering `Inventory`.
    InventoryResult(Vec<String>),
    /// A broadcast from another player.
    Message {
        /// Where the sound came from.
        direction: Direction,
        /// The broadcast text, quotes stripped.
        text: String,
    },
    /// `Current level: N`. The raw number is kept so impossible values can
    /// be rejected by the caller instead of the parser.
    LevelUp(u8),
    /// `Elevation underway`: a ritual started on the agent's tile.
    RitualStarted,
    /// Another player pushed the agent off its tile.
    Ejected(Direction),
    /// The agent starved.
    Dead,
    /// The game is over.
    EndOfGame,
    /// A line the codec does not recognise.
    Unknown(String),
}

impl ServerEvent {
    /// Whether this line arrives without answering a pending command.
    ///
    /// `LevelUp` is not listed here because it is unsolicited only for
    /// ritual participants; the decision loop settles that case using the
    /// pending queue.
    pub const fn is_unsolicited(&self) -> bool {
        matches!(
            self,
            Self::Message { .. } | Self::RitualStarted | Self::Ejected(_) | Self::Dead | Self::EndOfGame
        )
    }
}
