//! The elevation gate: can this player start a ritual right here?
//!
//! The gate is evaluated against the held look result and the inventory.
//! It is pure: it reports what should happen and the decision loop applies
//! the outcome to the player.

use zappy_agents::{Player, Signal, View, leveling};
use zappy_types::{Command, Level, Resource};

use crate::perception::CROWD_LIMIT;

/// Why the gate did not open this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// Level 8 has no further ritual.
    MaxLevel,
    /// Tile and inventory together hold too few of a stone.
    MissingStone {
        /// The first stone kind that falls short.
        resource: Resource,
        /// Units on the tile plus units held.
        have: u32,
        /// Units the recipe needs.
        need: u32,
    },
    /// Too many other players on the tile.
    Crowded {
        /// Players on the tile besides this one.
        others: u32,
    },
    /// An `Inventory` query is already on its way.
    AwaitingFood,
    /// Not enough food to survive the ritual.
    FoodLow {
        /// Food reported by the last inventory reply.
        have: u32,
        /// Food the level requires.
        need: u32,
    },
}

/// Result of evaluating the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The gate stays shut.
    Refused(Refusal),
    /// Stones are in place but the food count is unknown: ask for it.
    QueryFood,
    /// Open: drop these stones, then either cast alone or call for company.
    Commit {
        /// `Set` commands filling the tile up to the recipe.
        drops: Vec<Command>,
        /// Whether the ritual needs other players.
        needs_company: bool,
    },
}

impl GateOutcome {
    /// Commands to send for a committed gate: the drops, then either the
    /// ready broadcast or the `Incantation` itself.
    pub fn commit_commands(drops: Vec<Command>, needs_company: bool, level: Level) -> Vec<Command> {
        let mut commands = drops;
        if needs_company {
            commands.push(Signal::ready(level).to_command());
        } else {
            commands.push(Command::Incantation);
        }
        commands
    }
}

/// Whether the crowd check is waived: an originator at levels 5 to 7
/// expects followers to gather around it.
const fn crowd_waived(player: &Player) -> bool {
    player.just_completed_ritual && matches!(player.level.get(), 5..=7)
}

/// Evaluate the gate for `player` standing on tile 0 of `view`.
pub fn evaluate(player: &Player, view: &View) -> GateOutcome {
    let Some(rule) = leveling::rule(player.level) else {
        return GateOutcome::Refused(Refusal::MaxLevel);
    };

    let mut drops = Vec::new();
    for (resource, need) in rule.recipe {
        let on_tile = view.count(0, resource.name());
        let held = player.inventory.count(*resource);
        let have = on_tile.saturating_add(held);
        if have < *need {
            return GateOutcome::Refused(Refusal::MissingStone {
                resource: *resource,
                have,
                need: *need,
            });
        }
        let missing = need.saturating_sub(on_tile);
        drops.extend((0..missing).map(|_| Command::Set(*resource)));
    }

    let others = view.other_players_here();
    if others > CROWD_LIMIT && !crowd_waived(player) {
        return GateOutcome::Refused(Refusal::Crowded { others });
    }

    if let Some(need) = rule.food_threshold {
        match player.pending_food {
            None if player.pending().any(|c| *c == Command::Inventory) => {
                return GateOutcome::Refused(Refusal::AwaitingFood);
            }
            None => return GateOutcome::QueryFood,
            Some(have) if have < need => {
                return GateOutcome::Refused(Refusal::FoodLow { have, need });
            }
            Some(_) => {}
        }
    }

    GateOutcome::Commit {
        drops,
        needs_company: rule.quorum > 1,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn view(tiles: &[&str]) -> View {
        View::new(tiles.iter().map(|t| (*t).to_owned()).collect())
    }

    fn player_at(level: u8) -> Player {
        let mut player = Player::new();
        player.level = Level::new(level).unwrap();
        player
    }

    #[test]
    fn level_one_with_linemate_on_tile_casts_alone() {
        let player = player_at(1);
        let outcome = evaluate(&player, &view(&["player linemate"]));
        assert_eq!(
            outcome,
            GateOutcome::Commit {
                drops: vec![],
                needs_company: false,
            }
        );
    }

    #[test]
    fn level_one_drops_held_linemate() {
        let mut player = player_at(1);
        player.inventory.add(Resource::Linemate, 1).unwrap();
        let outcome = evaluate(&player, &view(&["player"]));
        assert_eq!(
            outcome,
            GateOutcome::Commit {
                drops: vec![Command::Set(Resource::Linemate)],
                needs_company: false,
            }
        );
    }

    #[test]
    fn missing_stone_refuses() {
        let mut player = player_at(2);
        player.inventory.add(Resource::Linemate, 1).unwrap();
        let outcome = evaluate(&player, &view(&["player deraumere"]));
        assert_eq!(
            outcome,
            GateOutcome::Refused(Refusal::MissingStone {
                resource: Resource::Sibur,
                have: 0,
                need: 1,
            })
        );
    }

    #[test]
    fn unknown_food_queries_once() {
        let mut player = player_at(2);
        for resource in [Resource::Linemate, Resource::Deraumere, Resource::Sibur] {
            player.inventory.add(resource, 1).unwrap();
        }
        let v = view(&["player"]);
        assert_eq!(evaluate(&player, &v), GateOutcome::QueryFood);

        player.issue(Command::Inventory).unwrap();
        assert_eq!(
            evaluate(&player, &v),
            GateOutcome::Refused(Refusal::AwaitingFood)
        );
    }

    #[test]
    fn low_food_refuses() {
        let mut player = player_at(3);
        player.inventory.add(Resource::Linemate, 2).unwrap();
        player.inventory.add(Resource::Sibur, 1).unwrap();
        player.inventory.add(Resource::Phiras, 2).unwrap();
        player.pending_food = Some(17);
        assert_eq!(
            evaluate(&player, &view(&["player"])),
            GateOutcome::Refused(Refusal::FoodLow { have: 17, need: 18 })
        );
    }

    #[test]
    fn drops_only_what_the_tile_lacks() {
        let mut player = player_at(3);
        player.inventory.add(Resource::Linemate, 1).unwrap();
        player.inventory.add(Resource::Sibur, 1).unwrap();
        player.inventory.add(Resource::Phiras, 2).unwrap();
        player.pending_food = Some(18);
        let outcome = evaluate(&player, &view(&["player linemate sibur"]));
        assert_eq!(
            outcome,
            GateOutcome::Commit {
                drops: vec![
                    Command::Set(Resource::Linemate),
                    Command::Set(Resource::Phiras),
                    Command::Set(Resource::Phiras),
                ],
                needs_company: true,
            }
        );
    }

    #[test]
    fn crowd_refuses_unless_originator_at_high_level() {
        let mut player = player_at(5);
        player.inventory.add(Resource::Linemate, 1).unwrap();
        player.inventory.add(Resource::Deraumere, 2).unwrap();
        player.inventory.add(Resource::Sibur, 1).unwrap();
        player.inventory.add(Resource::Mendiane, 3).unwrap();
        player.pending_food = Some(40);
        let crowded = view(&["player player player"]);

        assert_eq!(
            evaluate(&player, &crowded),
            GateOutcome::Refused(Refusal::Crowded { others: 2 })
        );

        player.just_completed_ritual = true;
        assert!(matches!(
            evaluate(&player, &crowded),
            GateOutcome::Commit { .. }
        ));
    }

    #[test]
    fn level_eight_never_opens() {
        let mut player = player_at(8);
        player.pending_food = Some(100);
        assert_eq!(
            evaluate(&player, &view(&["player linemate"])),
            GateOutcome::Refused(Refusal::MaxLevel)
        );
    }

    #[test]
    fn commit_commands_end_with_broadcast_or_incantation() {
        let level = Level::new(2).unwrap();
        let with_company =
            GateOutcome::commit_commands(vec![Command::Set(Resource::Sibur)], true, level);
        assert_eq!(
            with_company,
            vec![
                Command::Set(Resource::Sibur),
                Command::Broadcast("Level 2 r".to_owned()),
            ]
        );
        let alone = GateOutcome::commit_commands(vec![], false, Level::MIN);
        assert_eq!(alone, vec![Command::Incantation]);
    }
}
