//! Stone inventory with per-kind collection ceilings.
//!
//! The player only tracks stones locally. Each kind has a ceiling: the number
//! still needed to finish every remaining ritual. Ceilings start at the
//! totals for the whole climb and shrink by one recipe per level-up, so the
//! player stops hoarding stones it will never spend.
//!
//! All arithmetic is checked -- no silent overflows, no panics.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;
use zappy_types::{Level, Resource};

use crate::error::AgentError;
use crate::leveling::{self, TOTAL_REQUIREMENTS};

/// Held stones and how many of each are still worth collecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inventory {
    counts: BTreeMap<Resource, u32>,
    ceilings: BTreeMap<Resource, u32>,
    /// Highest level whose recipe has already been taken off the ceilings.
    reduced_through: Option<Level>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// Empty inventory with ceilings set for the full climb to level 8.
    pub fn new() -> Self {
        Self {
            counts: Resource::ALL.into_iter().map(|r| (r, 0)).collect(),
            ceilings: TOTAL_REQUIREMENTS.into_iter().collect(),
            reduced_through: None,
        }
    }

    /// Units of `resource` held.
    pub fn count(&self, resource: Resource) -> u32 {
        self.counts.get(&resource).copied().unwrap_or(0)
    }

    /// Current collection ceiling for `resource`.
    pub fn ceiling(&self, resource: Resource) -> u32 {
        self.ceilings.get(&resource).copied().unwrap_or(0)
    }

    /// Whether another unit of `resource` is worth picking up.
    pub fn needs(&self, resource: Resource) -> bool {
        self.count(resource) < self.ceiling(resource)
    }

    /// Stones still below their ceiling, in pickup priority order.
    pub fn needed(&self) -> impl Iterator<Item = Resource> + '_ {
        Resource::ALL.into_iter().filter(|r| self.needs(*r))
    }

    /// Credit `amount` units of `resource`.
    pub fn add(&mut self, resource: Resource, amount: u32) -> Result<(), AgentError> {
        let entry = self.counts.entry(resource).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| AgentError::ArithmeticOverflow {
                context: format!("adding {amount} {resource} to inventory"),
            })?;
        Ok(())
    }

    /// Take `amount` units of `resource` out of the inventory.
    ///
    /// Fails without touching the count if the player holds fewer units.
    pub fn reserve(&mut self, resource: Resource, amount: u32) -> Result<(), AgentError> {
        let available = self.count(resource);
        let remaining = available
            .checked_sub(amount)
            .ok_or(AgentError::InsufficientResource {
                resource,
                requested: amount,
                available,
            })?;
        self.counts.insert(resource, remaining);
        Ok(())
    }

    /// Lower the ceilings by the recipe of the ritual that reached `reached`.
    ///
    /// Runs at most once per level: returns `false` and changes nothing if the
    /// ceilings already account for `reached`. Ceilings saturate at zero.
    pub fn reduce_ceilings(&mut self, reached: Level) -> bool {
        if self.reduced_through.is_some_and(|done| done >= reached) {
            return false;
        }
        let Some(rule) = reached.previous().and_then(leveling::rule) else {
            return false;
        };
        for (resource, quantity) in rule.recipe {
            let ceiling = self.ceilings.entry(*resource).or_insert(0);
            *ceiling = ceiling.saturating_sub(*quantity);
        }
        self.reduced_through = Some(reached);
        debug!(%reached, ceilings = ?self.ceilings, "Collection ceilings reduced");
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn level(n: u8) -> Level {
        Level::new(n).unwrap()
    }

    #[test]
    fn starts_empty_with_full_ceilings() {
        let inv = Inventory::new();
        for resource in Resource::ALL {
            assert_eq!(inv.count(resource), 0);
        }
        assert_eq!(inv.ceiling(Resource::Linemate), 9);
        assert_eq!(inv.ceiling(Resource::Deraumere), 8);
        assert_eq!(inv.ceiling(Resource::Sibur), 10);
        assert_eq!(inv.ceiling(Resource::Mendiane), 5);
        assert_eq!(inv.ceiling(Resource::Phiras), 6);
        assert_eq!(inv.ceiling(Resource::Thystame), 1);
    }

    #[test]
    fn add_then_reserve() {
        let mut inv = Inventory::new();
        inv.add(Resource::Sibur, 3).unwrap();
        inv.reserve(Resource::Sibur, 2).unwrap();
        assert_eq!(inv.count(Resource::Sibur), 1);
    }

    #[test]
    fn reserve_more_than_held_fails_and_keeps_count() {
        let mut inv = Inventory::new();
        inv.add(Resource::Phiras, 1).unwrap();
        let err = inv.reserve(Resource::Phiras, 2).unwrap_err();
        assert!(matches!(
            err,
            AgentError::InsufficientResource {
                resource: Resource::Phiras,
                requested: 2,
                available: 1,
            }
        ));
        assert_eq!(inv.count(Resource::Phiras), 1);
    }

    #[test]
    fn add_overflow_is_an_error() {
        let mut inv = Inventory::new();
        inv.add(Resource::Linemate, u32::MAX).unwrap();
        assert!(matches!(
            inv.add(Resource::Linemate, 1),
            Err(AgentError::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn needs_stops_at_ceiling() {
        let mut inv = Inventory::new();
        inv.add(Resource::Thystame, 1).unwrap();
        assert!(!inv.needs(Resource::Thystame));
        assert!(inv.needs(Resource::Linemate));
        assert_eq!(inv.needed().next(), Some(Resource::Linemate));
    }

    #[test]
    fn reduce_ceilings_once_per_level() {
        let mut inv = Inventory::new();
        assert!(inv.reduce_ceilings(level(2)));
        assert_eq!(inv.ceiling(Resource::Linemate), 8);
        assert_eq!(inv.ceiling(Resource::Deraumere), 8);

        assert!(!inv.reduce_ceilings(level(2)));
        assert_eq!(inv.ceiling(Resource::Linemate), 8);

        assert!(inv.reduce_ceilings(level(3)));
        assert_eq!(inv.ceiling(Resource::Linemate), 7);
        assert_eq!(inv.ceiling(Resource::Deraumere), 7);
        assert_eq!(inv.ceiling(Resource::Sibur), 9);
    }

    #[test]
    fn reduce_ceilings_is_monotonic_and_reaches_zero() {
        let mut inv = Inventory::new();
        let mut previous: Vec<u32> = Resource::ALL.iter().map(|r| inv.ceiling(*r)).collect();
        for n in 2..=8 {
            assert!(inv.reduce_ceilings(level(n)));
            let current: Vec<u32> = Resource::ALL.iter().map(|r| inv.ceiling(*r)).collect();
            for (now, before) in current.iter().zip(&previous) {
                assert!(now <= before);
            }
            previous = current;
        }
        assert!(previous.iter().all(|c| *c == 0));
    }

    #[test]
    fn reduce_ceilings_ignores_level_one() {
        let mut inv = Inventory::new();
        assert!(!inv.reduce_ceilings(Level::MIN));
        assert_eq!(inv.ceiling(Resource::Linemate), 9);
    }
}
