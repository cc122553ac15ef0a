//! The player: everything the agent knows about itself.
//!
//! A [`Player`] is owned by the decision loop and mutated in place as
//! replies arrive. Sending a command goes through [`Player::issue_all`] so
//! the bookkeeping that depends on what was sent (reserved stones, the held
//! view, the pending queue) happens in one place.

use std::collections::BTreeMap;

use serde::Serialize;
use zappy_types::{Command, Level, Resource};

use crate::error::AgentError;
use crate::inventory::Inventory;
use crate::queue::CommandQueue;
use crate::ritual::Coordination;
use crate::view::Sight;

/// State of one connected agent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Player {
    /// Current level, 1 to 8.
    pub level: Level,
    /// Held stones and collection ceilings.
    pub inventory: Inventory,
    /// Food count from the last inventory reply. Consumed by the gate.
    pub pending_food: Option<u32>,
    /// Latest look result, or why there is none.
    pub sight: Sight,
    /// Ritual state, quorum tally, and silence counter.
    pub coordination: Coordination,
    /// The last level-up answered this player's own `Incantation`.
    pub just_completed_ritual: bool,
    /// Send `Fork` at the next opportunity.
    pub should_reproduce: bool,
    pending: CommandQueue,
}

impl Player {
    /// A fresh level-1 player.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands sent and not yet answered.
    pub const fn pending(&self) -> &CommandQueue {
        &self.pending
    }

    /// Pop the command the just-received reply answers.
    pub fn acknowledge(&mut self) -> Option<Command> {
        self.pending.pop()
    }

    /// Queue `commands` and apply their send-time effects.
    ///
    /// Either every command is queued or none is: the batch is refused if it
    /// does not fit in the queue or if its `Set`s need more stones than the
    /// player holds.
    ///
    /// Send-time effects: `Look` marks the view as awaited, movement drops
    /// the view, `Set` reserves the stone and shows it on the own tile, and
    /// `Take` removes the item from the own tile.
    pub fn issue_all(&mut self, commands: Vec<Command>) -> Result<(), AgentError> {
        self.check_reservations(&commands)?;
        if let Some(overflow) = commands.get(self.pending.free()) {
            return Err(AgentError::QueueFull {
                command: overflow.clone(),
                pending: self.pending.len(),
                capacity: crate::queue::QUEUE_CAPACITY,
            });
        }
        for command in &commands {
            self.apply_send_effects(command)?;
        }
        self.pending.push_all(commands)
    }

    /// Queue a single command. See [`Self::issue_all`].
    pub fn issue(&mut self, command: Command) -> Result<(), AgentError> {
        self.issue_all(vec![command])
    }

    fn check_reservations(&self, commands: &[Command]) -> Result<(), AgentError> {
        let mut wanted: BTreeMap<Resource, u32> = BTreeMap::new();
        for command in commands {
            if let Command::Set(resource) = command {
                let entry = wanted.entry(*resource).or_insert(0);
                *entry = entry.saturating_add(1);
            }
        }
        for (resource, requested) in wanted {
            let available = self.inventory.count(resource);
            if requested > available {
                return Err(AgentError::InsufficientResource {
                    resource,
                    requested,
                    available,
                });
            }
        }
        Ok(())
    }

    fn apply_send_effects(&mut self, command: &Command) -> Result<(), AgentError> {
        match command {
            Command::Look => self.sight = Sight::Awaiting,
            moved if moved.is_movement() => self.sight = Sight::Blind,
            Command::Set(resource) => {
                self.inventory.reserve(*resource, 1)?;
                if let Some(view) = self.sight.view_mut() {
                    view.add_token(0, resource.name());
                }
            }
            Command::Take(item) => {
                if let Some(view) = self.sight.view_mut() {
                    view.remove_token(0, item.name());
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// JSON snapshot for debug logging.
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::queue::QUEUE_CAPACITY;
    use crate::view::View;
    use zappy_types::Item;

    fn seen(tiles: &[&str]) -> Sight {
        Sight::Seen(View::new(tiles.iter().map(|t| (*t).to_owned()).collect()))
    }

    #[test]
    fn look_then_move_updates_sight() {
        let mut player = Player::new();
        player.issue(Command::Look).unwrap();
        assert!(player.sight.is_awaiting());

        player.sight = seen(&["player food"]);
        player.issue(Command::Forward).unwrap();
        assert_eq!(player.sight, Sight::Blind);
        assert_eq!(player.pending().len(), 2);
    }

    #[test]
    fn set_reserves_and_shows_stone_on_tile() {
        let mut player = Player::new();
        player.inventory.add(Resource::Sibur, 1).unwrap();
        player.sight = seen(&["player"]);

        player.issue(Command::Set(Resource::Sibur)).unwrap();
        assert_eq!(player.inventory.count(Resource::Sibur), 0);
        assert_eq!(player.sight.view().unwrap().count(0, "sibur"), 1);
    }

    #[test]
    fn take_removes_token_from_view() {
        let mut player = Player::new();
        player.sight = seen(&["player food linemate"]);
        player.issue(Command::Take(Item::Food)).unwrap();
        assert_eq!(player.sight.view().unwrap().count(0, "food"), 0);
        assert_eq!(player.sight.view().unwrap().count(0, "linemate"), 1);
    }

    #[test]
    fn batch_with_unbacked_set_changes_nothing() {
        let mut player = Player::new();
        player.inventory.add(Resource::Linemate, 1).unwrap();
        let batch = vec![
            Command::Set(Resource::Linemate),
            Command::Set(Resource::Linemate),
        ];
        let err = player.issue_all(batch).unwrap_err();
        assert!(matches!(
            err,
            AgentError::InsufficientResource {
                requested: 2,
                available: 1,
                ..
            }
        ));
        assert_eq!(player.inventory.count(Resource::Linemate), 1);
        assert!(player.pending().is_empty());
    }

    #[test]
    fn batch_too_large_for_queue_is_refused() {
        let mut player = Player::new();
        for _ in 0..QUEUE_CAPACITY - 1 {
            player.issue(Command::Inventory).unwrap();
        }
        player.sight = seen(&["player"]);
        let err = player
            .issue_all(vec![Command::Left, Command::Forward])
            .unwrap_err();
        assert!(matches!(err, AgentError::QueueFull { .. }));
        assert!(player.sight.view().is_some());
    }

    #[test]
    fn acknowledge_pops_in_order() {
        let mut player = Player::new();
        player
            .issue_all(vec![Command::Look, Command::Inventory])
            .unwrap();
        assert_eq!(player.acknowledge(), Some(Command::Look));
        assert_eq!(player.acknowledge(), Some(Command::Inventory));
        assert_eq!(player.acknowledge(), None);
    }

    #[test]
    fn snapshot_is_json_object() {
        let snapshot = Player::new().snapshot();
        assert_eq!(snapshot["level"], 1);
        assert_eq!(snapshot["sight"]["sight"], "blind");
        assert_eq!(snapshot["pending"], serde_json::json!([]));
    }

    #[test]
    fn snapshot_lists_pending_commands() {
        let mut player = Player::new();
        player.issue_all(vec![Command::Look, Command::Take(Item::Food)]).unwrap();
        let snapshot = player.snapshot();
        assert_eq!(
            snapshot["pending"],
            serde_json::json!([{"op": "look"}, {"op": "take", "arg": "food"}])
        );
    }
}
