//! Turning look indices and broadcast directions into movement commands.
//!
//! A look result lists tiles ring by ring. Ring `r` holds `2r + 1` tiles,
//! left to right as seen by the player, starting at index `r²`. Index `i`
//! therefore sits on ring `floor(sqrt(i))` with lateral offset
//! `i - r² - r`: negative to the left, zero straight ahead.
//!
//! Paths go straight out to the ring, then sideways, then turn back so the
//! player ends facing the way it started.

use zappy_types::{Command, Direction};

/// Position of a view tile relative to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Distance ring, 0 for the own tile.
    pub ring: u32,
    /// Columns to the right of centre; negative means left.
    pub offset: i64,
}

impl Cell {
    /// Locate view index `index`.
    pub fn from_index(index: usize) -> Option<Self> {
        let ring = index.isqrt();
        let centre = ring.checked_mul(ring)?.checked_add(ring)?;
        let offset = i64::try_from(index)
            .ok()?
            .checked_sub(i64::try_from(centre).ok()?)?;
        Some(Self {
            ring: u32::try_from(ring).ok()?,
            offset,
        })
    }

    /// View index of this cell, if the cell lies inside its ring.
    pub fn index(self) -> Option<usize> {
        if self.offset.unsigned_abs() > u64::from(self.ring) {
            return None;
        }
        let ring = i64::from(self.ring);
        let centre = ring.checked_mul(ring)?.checked_add(ring)?;
        usize::try_from(centre.checked_add(self.offset)?).ok()
    }
}

/// Commands that carry the player onto `cell` and restore its heading.
pub fn path_to(cell: Cell) -> Vec<Command> {
    let sideways = usize::try_from(cell.offset.unsigned_abs()).unwrap_or(0);
    let ahead = usize::try_from(cell.ring).unwrap_or(0);

    let mut path = vec![Command::Forward; ahead];
    if sideways > 0 {
        let (turn, back) = if cell.offset < 0 {
            (Command::Left, Command::Right)
        } else {
            (Command::Right, Command::Left)
        };
        path.push(turn);
        path.extend(std::iter::repeat_n(Command::Forward, sideways));
        path.push(back);
    }
    path
}

/// Commands toward view index `index`. Empty for the own tile.
pub fn path_to_index(index: usize) -> Vec<Command> {
    Cell::from_index(index).map(path_to).unwrap_or_default()
}

/// One step toward where a broadcast came from.
///
/// Directions follow the server's convention: 1 is straight ahead, then
/// counter-clockwise around the player. Direction 0 is the own tile and
/// needs no movement.
pub fn path_toward(direction: Direction) -> Vec<Command> {
    use Command::{Forward as F, Left as L, Right as R};
    match direction.get() {
        1 => vec![F],
        2 => vec![F, L, F],
        3 => vec![L, F],
        4 => vec![L, F, L, F],
        5 => vec![L, L, F],
        6 => vec![R, F, R, F],
        7 => vec![R, F],
        8 => vec![F, R, F],
        _ => Vec::new(),
    }
}

/// View indices of `ring` in visiting order: centre first, then outward,
/// left before right.
pub fn ring_indices(ring: u32) -> impl Iterator<Item = usize> {
    let width = i64::from(ring);
    std::iter::once(0)
        .chain((1..=width).flat_map(|d| [-d, d]))
        .filter_map(move |offset| Cell { ring, offset }.index())
}

/// Nearest view index within rings `1..=max_ring` whose tile satisfies
/// `wanted`. Indices past `view_len` are skipped.
pub fn nearest(view_len: usize, max_ring: u32, wanted: impl Fn(usize) -> bool) -> Option<usize> {
    (1..=max_ring)
        .flat_map(ring_indices)
        .filter(|index| *index < view_len)
        .find(|index| wanted(*index))
}
