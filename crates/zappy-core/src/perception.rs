//! What to pick up and where to walk when no ritual is in play.
//!
//! Food always comes first: a starving player levels nobody up. Stones are
//! taken only while the player is below its ceiling for that kind and the
//! tile is not crowded, since a crowded tile is usually someone else's
//! ritual in progress.

use rand::Rng;
use zappy_agents::{Inventory, View};
use zappy_types::{Command, Item, Resource};

use crate::navigation;

/// More than this many other players on a tile means it is crowded.
pub const CROWD_LIMIT: u32 = 1;

/// The item worth taking from the own tile, if any.
pub fn item_to_take(view: &View, inventory: &Inventory) -> Option<Item> {
    if view.has(0, Item::Food) {
        return Some(Item::Food);
    }
    if view.other_players_here() > CROWD_LIMIT {
        return None;
    }
    inventory
        .needed()
        .find(|resource| view.has(0, Item::Stone(*resource)))
        .map(Item::Stone)
}

/// Whether tile `index` holds food or a stone the player still needs.
pub fn is_useful(view: &View, inventory: &Inventory, index: usize) -> bool {
    view.has(index, Item::Food)
        || Resource::ALL
            .into_iter()
            .any(|resource| inventory.needs(resource) && view.has(index, Item::Stone(resource)))
}

/// Movement plan when nothing on the own tile is worth taking.
///
/// Heads for the nearest useful tile within `max_ring`, or wanders.
pub fn plan_travel(view: &View, inventory: &Inventory, max_ring: u32, rng: &mut impl Rng) -> Vec<Command> {
    navigation::nearest(view.len(), max_ring, |index| is_useful(view, inventory, index))
        .map_or_else(|| wander(rng), navigation::path_to_index)
}

/// A short random walk: mostly straight, sometimes a dogleg.
pub fn wander(rng: &mut impl Rng) -> Vec<Command> {
    let roll: f64 = rng.random();
    if roll > 0.4 {
        vec![Command::Forward]
    } else if roll > 0.2 {
        vec![Command::Forward, Command::Left, Command::Forward]
    } else {
        vec![Command::Forward, Command::Right, Command::Forward]
    }
}

/// Full collection step for one send opportunity.
pub fn collect(view: &View, inventory: &Inventory, max_ring: u32, rng: &mut impl Rng) -> Vec<Command> {
    item_to_take(view, inventory).map_or_else(
        || plan_travel(view, inventory, max_ring, rng),
        |item| vec![Command::Take(item)],
    )
}
