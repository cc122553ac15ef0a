//! Enumeration types for the Zappy agent.
//!
//! The server knows seven ground items: food and six stones. Stones are the
//! ritual currency and are tracked per kind; food is only ever eaten, so it
//! gets its own [`Item`] variant rather than a [`Resource`] slot.

use core::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Resource kinds
// ---------------------------------------------------------------------------

/// A stone kind consumed by elevation rituals.
///
/// The declaration order is the pickup priority order: when several needed
/// stones share a tile, the earliest variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// The most common stone, needed at every level.
    Linemate,
    /// Second stone, first needed for the ritual at level 2.
    Deraumere,
    /// Third stone, first needed for the ritual at level 2.
    Sibur,
    /// Fourth stone, first needed for the ritual at level 5.
    Mendiane,
    /// Fifth stone, first needed for the ritual at level 3.
    Phiras,
    /// The rarest stone, needed once for the final ritual.
    Thystame,
}

impl Resource {
    /// Every resource kind, in pickup priority order.
    pub const ALL: [Self; 6] = [
        Self::Linemate,
        Self::Deraumere,
        Self::Sibur,
        Self::Mendiane,
        Self::Phiras,
        Self::Thystame,
    ];

    /// The token the server uses for this resource.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linemate => "linemate",
            Self::Deraumere => "deraumere",
            Self::Sibur => "sibur",
            Self::Mendiane => "mendiane",
            Self::Phiras => "phiras",
            Self::Thystame => "thystame",
        }
    }

    /// Parse a server token into a resource kind.
    pub fn from_name(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == token)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Ground items
// ---------------------------------------------------------------------------

/// Anything the agent can pick up from a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Item {
    /// A unit of food (126 time units of survival on the server).
    Food,
    /// A ritual stone.
    Stone(Resource),
}

impl Item {
    /// Token for food on the wire and in look results.
    pub const FOOD: &'static str = "food";

    /// The token the server uses for this item.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Food => Self::FOOD,
            Self::Stone(resource) => resource.name(),
        }
    }

    /// Parse a server token into an item.
    pub fn from_name(token: &str) -> Option<Self> {
        if token == Self::FOOD {
            return Some(Self::Food);
        }
        Resource::from_name(token).map(Self::Stone)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
