//! The most recent look result and whether one is on its way.

use serde::Serialize;
use zappy_types::Item;

/// Token for a player in a look result.
pub const PLAYER_TOKEN: &str = "player";
/// Token for an egg in a look result.
pub const EGG_TOKEN: &str = "egg";

/// Tile contents from one look, nearest ring first.
///
/// Each tile is a space-separated list of tokens. Indices past the end read
/// as empty tiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct View {
    tiles: Vec<String>,
}

impl View {
    /// Wrap the tiles of a look result.
    pub const fn new(tiles: Vec<String>) -> Self {
        Self { tiles }
    }

    /// Number of tiles seen.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the look returned no tiles at all.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tokens on tile `index`.
    pub fn tokens(&self, index: usize) -> impl Iterator<Item = &str> {
        self.tiles
            .get(index)
            .map(String::as_str)
            .unwrap_or_default()
            .split_whitespace()
    }

    /// Occurrences of `token` on tile `index`.
    pub fn count(&self, index: usize, token: &str) -> u32 {
        let n = self.tokens(index).filter(|t| *t == token).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }

    /// Whether tile `index` holds at least one `item`.
    pub fn has(&self, index: usize, item: Item) -> bool {
        self.tokens(index).any(|t| t == item.name())
    }

    /// Players on the own tile besides this one.
    pub fn other_players_here(&self) -> u32 {
        self.count(0, PLAYER_TOKEN).saturating_sub(1)
    }

    /// Drop one `token` from tile `index`. Returns whether one was there.
    pub fn remove_token(&mut self, index: usize, token: &str) -> bool {
        let Some(tile) = self.tiles.get_mut(index) else {
            return false;
        };
        let mut removed = false;
        let kept: Vec<&str> = tile
            .split_whitespace()
            .filter(|t| {
                if !removed && *t == token {
                    removed = true;
                    false
                } else {
                    true
                }
            })
            .collect();
        if removed {
            *tile = kept.join(" ");
        }
        removed
    }

    /// Add one `token` to tile `index`. Does nothing past the end.
    pub fn add_token(&mut self, index: usize, token: &str) {
        if let Some(tile) = self.tiles.get_mut(index) {
            if !tile.is_empty() {
                tile.push(' ');
            }
            tile.push_str(token);
        }
    }
}

/// What the player currently knows about its surroundings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "sight", content = "view", rename_all = "snake_case")]
pub enum Sight {
    /// No usable look result and none requested.
    #[default]
    Blind,
    /// A `Look` is in flight.
    Awaiting,
    /// A look result is held and still describes the current position.
    Seen(View),
}

impl Sight {
    /// The held look result, if any.
    pub const fn view(&self) -> Option<&View> {
        match self {
            Self::Seen(view) => Some(view),
            Self::Blind | Self::Awaiting => None,
        }
    }

    /// Mutable access to the held look result.
    pub const fn view_mut(&mut self) -> Option<&mut View> {
        match self {
            Self::Seen(view) => Some(view),
            Self::Blind | Self::Awaiting => None,
        }
    }

    /// Whether a `Look` has been sent but not answered.
    pub const fn is_awaiting(&self) -> bool {
        matches!(self, Self::Awaiting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zappy_types::Resource;

    fn view(tiles: &[&str]) -> View {
        View::new(tiles.iter().map(|t| (*t).to_owned()).collect())
    }

    #[test]
    fn counts_tokens_per_tile() {
        let v = view(&["player player food linemate linemate", "", "sibur"]);
        assert_eq!(v.count(0, "linemate"), 2);
        assert_eq!(v.count(0, PLAYER_TOKEN), 2);
        assert_eq!(v.other_players_here(), 1);
        assert!(v.has(2, Item::Stone(Resource::Sibur)));
        assert!(!v.has(1, Item::Food));
    }

    #[test]
    fn out_of_bounds_reads_as_empty() {
        let v = view(&["player"]);
        assert_eq!(v.count(7, "food"), 0);
        assert_eq!(v.tokens(100).count(), 0);
        assert!(!v.has(3, Item::Food));
    }

    #[test]
    fn remove_and_add_tokens() {
        let mut v = view(&["player food food linemate"]);
        assert!(v.remove_token(0, "food"));
        assert_eq!(v.count(0, "food"), 1);
        assert!(!v.remove_token(0, "sibur"));
        assert!(!v.remove_token(4, "food"));

        v.add_token(0, "sibur");
        assert_eq!(v.count(0, "sibur"), 1);

        let mut empty = view(&[""]);
        empty.add_token(0, "phiras");
        assert_eq!(empty.tokens(0).collect::<Vec<_>>(), vec!["phiras"]);
    }

    #[test]
    fn sight_exposes_view_only_when_seen() {
        assert!(Sight::Blind.view().is_none());
        assert!(Sight::Awaiting.is_awaiting());
        let seen = Sight::Seen(view(&["food"]));
        assert_eq!(seen.view().map(View::len), Some(1));
        assert!(!seen.is_awaiting());
    }
}
