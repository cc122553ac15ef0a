//! Elevation rules: per-level recipes, quorum sizes, and food safety margins.
//!
//! Row `L` describes the ritual that takes a player from level `L` to
//! `L + 1`. There is no row for level 8.

use zappy_types::Resource::{Deraumere, Linemate, Mendiane, Phiras, Sibur, Thystame};
use zappy_types::{Level, Resource};

/// Stones and company a ritual needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevationRule {
    /// Stones consumed by the ritual, in pickup priority order.
    pub recipe: &'static [(Resource, u32)],
    /// Players of the same level that must stand on the tile, caster included.
    pub quorum: u32,
    /// Food the caster must hold before committing, if any.
    pub food_threshold: Option<u32>,
}

const RULES: [ElevationRule; 7] = [
    ElevationRule {
        recipe: &[(Linemate, 1)],
        quorum: 1,
        food_threshold: None,
    },
    ElevationRule {
        recipe: &[(Linemate, 1), (Deraumere, 1), (Sibur, 1)],
        quorum: 2,
        food_threshold: Some(16),
    },
    ElevationRule {
        recipe: &[(Linemate, 2), (Sibur, 1), (Phiras, 2)],
        quorum: 2,
        food_threshold: Some(18),
    },
    ElevationRule {
        recipe: &[(Linemate, 1), (Deraumere, 1), (Sibur, 2), (Phiras, 1)],
        quorum: 4,
        food_threshold: Some(25),
    },
    ElevationRule {
        recipe: &[(Linemate, 1), (Deraumere, 2), (Sibur, 1), (Mendiane, 3)],
        quorum: 4,
        food_threshold: Some(25),
    },
    ElevationRule {
        recipe: &[(Linemate, 1), (Deraumere, 2), (Sibur, 3), (Phiras, 1)],
        quorum: 6,
        food_threshold: Some(30),
    },
    ElevationRule {
        recipe: &[
            (Linemate, 2),
            (Deraumere, 2),
            (Sibur, 2),
            (Mendiane, 2),
            (Phiras, 2),
            (Thystame, 1),
        ],
        quorum: 6,
        food_threshold: Some(30),
    },
];

/// Stones needed to climb from level 1 to level 8, per kind.
pub const TOTAL_REQUIREMENTS: [(Resource, u32); 6] = [
    (Linemate, 9),
    (Deraumere, 8),
    (Sibur, 10),
    (Mendiane, 5),
    (Phiras, 6),
    (Thystame, 1),
];

/// The ritual available at `level`, or `None` at the final level.
pub fn rule(level: Level) -> Option<&'static ElevationRule> {
    usize::from(level.get())
        .checked_sub(1)
        .and_then(|index| RULES.get(index))
}

/// Quantity of `resource` the ritual at `level` consumes.
pub fn required(level: Level, resource: Resource) -> u32 {
    rule(level)
        .and_then(|rule| rule.recipe.iter().find(|(kind, _)| *kind == resource))
        .map_or(0, |(_, quantity)| *quantity)
}

/// Number of players the ritual at `level` needs. Level 8 counts only itself.
pub fn quorum_threshold(level: Level) -> u32 {
    rule(level).map_or(1, |rule| rule.quorum)
}
